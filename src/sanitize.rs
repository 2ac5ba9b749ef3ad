//! Allowed-character filtering and whitespace normalization

use crate::charset::LOCALE_LETTERS;
use crate::error::ConversionError;

/// Filter `text` down to the allowed character set and normalize whitespace.
///
/// Line structure survives: `\r\n` and `\r` become `\n`, runs of spaces and
/// tabs become one space, lines are trimmed and blank lines dropped. The
/// result is never longer than the input and `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let filtered: String = text.chars().filter(|&c| is_allowed(c)).collect();
    let mut out = String::with_capacity(filtered.len());

    for line in filtered.split(|c: char| c == '\n' || c == '\r') {
        let mut words = line.split(|c: char| c == ' ' || c == '\t').filter(|w| !w.is_empty());
        let Some(first) = words.next() else {
            continue;
        };

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(first);
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
    }

    out
}

/// Tab, newline, carriage return, printable ASCII and the locale letters
pub fn is_allowed(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' '..='~') || LOCALE_LETTERS.contains(&c)
}

/// Fail with `NoisyContent` when fewer than `min_ratio` of the original
/// characters survived sanitization.
pub fn check_loss(original: &str, sanitized: &str, min_ratio: f64) -> Result<(), ConversionError> {
    let original = original.chars().count();
    let retained = sanitized.chars().count();

    if (retained as f64) < original as f64 * min_ratio {
        return Err(ConversionError::NoisyContent { original, retained });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_RETAINED_RATIO;

    #[test]
    fn test_removes_disallowed_characters() {
        assert_eq!(sanitize("a€b\u{7}c"), "abc");
    }

    #[test]
    fn test_keeps_locale_letters() {
        assert_eq!(sanitize("şehir=İzmir"), "şehir=İzmir");
    }

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(sanitize("  key \t =   value  "), "key = value");
    }

    #[test]
    fn test_keeps_lines_and_drops_blank_ones() {
        assert_eq!(sanitize("name=Alice\r\n\r\n  \nrole=admin\r"), "name=Alice\nrole=admin");
    }

    #[test]
    fn test_never_grows() {
        for input in ["", " ", "a  b", "x\r\ny", "\t\tq\n\n", "ğ ü\u{0}"] {
            assert!(sanitize(input).chars().count() <= input.chars().count(), "{input:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        for input in ["  a\t\tb \r\n c ", "€x€\n\ny", "Ünal  =  \t1", "\r\r\r", "key=a=b"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "{input:?}");
        }
    }

    #[test]
    fn test_loss_exactly_half_is_accepted() {
        let original = "abcd€€€€";
        let sanitized = sanitize(original);
        assert_eq!(sanitized, "abcd");
        assert!(check_loss(original, &sanitized, MIN_RETAINED_RATIO).is_ok());
    }

    #[test]
    fn test_loss_over_half_is_noisy() {
        let original = "abc€€€€€";
        let sanitized = sanitize(original);
        let err = check_loss(original, &sanitized, MIN_RETAINED_RATIO).unwrap_err();
        assert_eq!(err, ConversionError::NoisyContent { original: 8, retained: 3 });
    }
}
