//! Byte signature classification
//!
//! A cheap prefix-only gate that decides whether a buffer may be treated as
//! text at all. Only the first [`SAMPLE_LEN`](crate::config::SAMPLE_LEN) bytes
//! are examined; the sanitizer's loss check is the second line of defense.
//!
//! Rules, first match wins:
//! 1. `MZ` header → Binary (ExecutableSignature)
//! 2. `{"` followed by a control byte → Binary (StructuredSave)
//! 3. Any `0x00` in the sample → Binary (NullByte)
//! 4. Control-character ratio above the limit → Binary (ControlCharacters)
//! 5. Otherwise → Text

use std::fmt;

use crate::config::ConvertConfig;

/// Legacy DOS/PE executable magic.
pub const EXECUTABLE_MAGIC: [u8; 2] = [0x4D, 0x5A];

/// Game-save style header: `{"` followed by a byte below 0x20.
const SAVE_OPEN_BRACE: u8 = 0x7B;
const SAVE_QUOTE: u8 = 0x22;
const SAVE_MAX_THIRD: u8 = 0x1F;

/// Reason why a buffer is considered binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryReason {
    /// Starts with the `MZ` executable magic
    ExecutableSignature,
    /// Starts with a structured-save header
    StructuredSave,
    /// Contains a NUL byte in the sample
    NullByte,
    /// Too many control characters in the sample
    ControlCharacters,
}

impl fmt::Display for BinaryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryReason::ExecutableSignature => "executable signature",
            BinaryReason::StructuredSave => "structured-save signature",
            BinaryReason::NullByte => "null byte present",
            BinaryReason::ControlCharacters => "unreadable control-character ratio",
        };
        f.write_str(text)
    }
}

/// Result of classifying a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Safe to hand to the encoding detector
    Text,
    /// Must not be decoded
    Binary { reason: BinaryReason },
}

impl Classification {
    pub fn is_text(&self) -> bool {
        matches!(self, Classification::Text)
    }

    /// Rejection reason, `None` for text
    pub fn reason(&self) -> Option<BinaryReason> {
        match self {
            Classification::Text => None,
            Classification::Binary { reason } => Some(*reason),
        }
    }
}

/// Classify a buffer with the default thresholds
pub fn classify(data: &[u8]) -> Classification {
    classify_with(data, &ConvertConfig::default())
}

/// Classify a buffer with explicit thresholds
pub fn classify_with(data: &[u8], config: &ConvertConfig) -> Classification {
    let sample = &data[..data.len().min(config.sample_len)];

    if sample.starts_with(&EXECUTABLE_MAGIC) {
        return Classification::Binary { reason: BinaryReason::ExecutableSignature };
    }

    if let [SAVE_OPEN_BRACE, SAVE_QUOTE, third, ..] = sample {
        if *third <= SAVE_MAX_THIRD {
            return Classification::Binary { reason: BinaryReason::StructuredSave };
        }
    }

    if sample.contains(&0) {
        return Classification::Binary { reason: BinaryReason::NullByte };
    }

    if !sample.is_empty() {
        let controls = sample.iter().filter(|&&b| is_control(b)).count();
        let ratio = controls as f64 / sample.len() as f64;
        if ratio > config.control_ratio_limit {
            return Classification::Binary { reason: BinaryReason::ControlCharacters };
        }
    }

    Classification::Text
}

/// Control bytes other than tab, LF, VT, FF and CR
fn is_control(byte: u8) -> bool {
    byte < 9 || (byte > 13 && byte < 32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_text() {
        let verdict = classify(b"name=Alice\nrole=admin\n");
        assert!(verdict.is_text());
        assert_eq!(verdict.reason(), None);
    }

    #[test]
    fn test_empty_buffer_is_text() {
        assert_eq!(classify(b""), Classification::Text);
    }

    #[test]
    fn test_executable_signature_wins_over_printable_tail() {
        let mut data = vec![0x4D, 0x5A];
        data.extend_from_slice("perfectly readable text ".repeat(100).as_bytes());
        assert_eq!(classify(&data).reason(), Some(BinaryReason::ExecutableSignature));
    }

    #[test]
    fn test_executable_signature_before_null_byte() {
        let verdict = classify(&[0x4D, 0x5A, 0x90, 0x00]);
        assert_eq!(verdict.reason(), Some(BinaryReason::ExecutableSignature));
    }

    #[test]
    fn test_structured_save_signature() {
        let verdict = classify(&[0x7B, 0x22, 0x05, b'a', b'b']);
        assert_eq!(verdict.reason(), Some(BinaryReason::StructuredSave));
    }

    #[test]
    fn test_structured_save_third_byte_boundary() {
        let verdict = classify(&[0x7B, 0x22, 0x1F, b'a']);
        assert_eq!(verdict.reason(), Some(BinaryReason::StructuredSave));
        assert!(classify(&[0x7B, 0x22, 0x20, b'a']).is_text());
    }

    #[test]
    fn test_structured_save_before_null_byte() {
        let verdict = classify(&[0x7B, 0x22, 0x00, b'a']);
        assert_eq!(verdict.reason(), Some(BinaryReason::StructuredSave));
    }

    #[test]
    fn test_json_object_is_not_structured_save() {
        assert!(classify(br#"{"name":"Alice"}"#).is_text());
    }

    #[test]
    fn test_null_byte() {
        let verdict = classify(b"abc\0def");
        assert_eq!(verdict.reason(), Some(BinaryReason::NullByte));
    }

    #[test]
    fn test_null_byte_past_sample_is_ignored() {
        let mut data = vec![b'a'; crate::config::SAMPLE_LEN];
        data.push(0);
        assert!(classify(&data).is_text());
    }

    #[test]
    fn test_control_ratio_above_limit() {
        // 2 of 10 bytes are control characters
        let data = [b'a', b'b', 0x01, b'c', b'd', 0x1B, b'e', b'f', b'g', b'h'];
        assert_eq!(classify(&data).reason(), Some(BinaryReason::ControlCharacters));
    }

    #[test]
    fn test_control_ratio_at_limit_is_text() {
        // exactly 10% is not above the limit
        let data = [b'a', b'b', 0x01, b'c', b'd', b'e', b'f', b'g', b'h', b'i'];
        assert!(classify(&data).is_text());
    }

    #[test]
    fn test_whitespace_controls_are_allowed() {
        assert!(classify(b"\t\n\x0B\x0C\r\t\n\r").is_text());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let data = b"key=value\x01\x02\x03";
        assert_eq!(classify(data), classify(data));
    }

    #[test]
    fn test_custom_sample_len() {
        let config = ConvertConfig::new().with_sample_len(4);
        assert!(classify_with(b"abcd\0", &config).is_text());
        assert!(!classify(b"abcd\0").is_text());
    }
}
