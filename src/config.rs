//! Conversion thresholds

/// Number of leading bytes the classifier examines.
pub const SAMPLE_LEN: usize = 4096;

/// Share of control characters in the sample above which a buffer is binary.
pub const CONTROL_RATIO_LIMIT: f64 = 0.10;

/// Share of decoded characters that must survive sanitization.
pub const MIN_RETAINED_RATIO: f64 = 0.5;

/// Tunables for classification and the content-loss check
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Prefix length examined by the classifier
    pub sample_len: usize,
    /// Control-character ratio that must be exceeded to reject
    pub control_ratio_limit: f64,
    /// Minimum sanitized/decoded length ratio before content counts as noisy
    pub min_retained_ratio: f64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sample_len: SAMPLE_LEN,
            control_ratio_limit: CONTROL_RATIO_LIMIT,
            min_retained_ratio: MIN_RETAINED_RATIO,
        }
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classifier sample length
    pub fn with_sample_len(mut self, len: usize) -> Self {
        self.sample_len = len;
        self
    }

    /// Set the control-character rejection ratio
    pub fn with_control_ratio_limit(mut self, ratio: f64) -> Self {
        self.control_ratio_limit = ratio;
        self
    }

    /// Set the minimum retained ratio for the noisy-content check
    pub fn with_min_retained_ratio(mut self, ratio: f64) -> Self {
        self.min_retained_ratio = ratio;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_named_constants() {
        let config = ConvertConfig::default();
        assert_eq!(config.sample_len, 4096);
        assert_eq!(config.control_ratio_limit, 0.10);
        assert_eq!(config.min_retained_ratio, 0.5);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConvertConfig::new()
            .with_sample_len(16)
            .with_control_ratio_limit(0.25)
            .with_min_retained_ratio(0.9);
        assert_eq!(config.sample_len, 16);
        assert_eq!(config.control_ratio_limit, 0.25);
        assert_eq!(config.min_retained_ratio, 0.9);
    }
}
