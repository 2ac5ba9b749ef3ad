//! Conversion error taxonomy
//!
//! Every stage of the pipeline either returns a value or exactly one of these
//! variants. They are terminal: nothing in the crate retries after an error.

use crate::classify::BinaryReason;

/// Blocking failure of a conversion run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The byte signature classifier refused the buffer.
    #[error("Rejected binary content: {reason}")]
    BinaryRejected { reason: BinaryReason },

    /// Sanitization kept less than the configured share of the decoded text.
    #[error("Noisy content: only {retained} of {original} characters survived sanitization")]
    NoisyContent { original: usize, retained: usize },

    /// A structured source parsed but produced no container lines.
    #[error("Malformed {format} source: {detail}")]
    MalformedSource { format: &'static str, detail: String },

    /// Nothing usable left after trimming.
    #[error("Input is empty")]
    EmptyInput,
}

/// Failure to parse a direction or target format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseOptionError {
    #[error("Unknown target format '{0}'. Expected json, csv, txt or dat")]
    UnknownFormat(String),

    #[error("Unknown direction '{0}'. Expected decode or encode")]
    UnknownDirection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_rejected_message_carries_reason() {
        let err = ConversionError::BinaryRejected { reason: BinaryReason::ExecutableSignature };
        assert_eq!(err.to_string(), "Rejected binary content: executable signature");
    }

    #[test]
    fn test_noisy_content_message() {
        let err = ConversionError::NoisyContent { original: 10, retained: 4 };
        assert!(err.to_string().contains("only 4 of 10"));
    }
}
