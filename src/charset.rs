//! Character encoding detection
//!
//! The first candidate is the default. When it decodes strictly it is used as
//! is, since a strict UTF-8 decode holds the text without loss. Otherwise
//! several single-byte code pages accept the same bytes and validity alone
//! cannot pick one, so each remaining candidate that decodes strictly is scored
//! by how much of its output looks like readable text. The best score wins and
//! ties keep the earliest candidate.

use encoding_rs::{Encoding, UTF_8, UTF_8_INIT, WINDOWS_1252_INIT, WINDOWS_1254_INIT};
use tracing::{debug, warn};

/// Locale letters that count as readable besides ASCII.
pub const LOCALE_LETTERS: &[char] = &[
    'ç', 'Ç', 'ğ', 'Ğ', 'ı', 'İ', 'ö', 'Ö', 'ş', 'Ş', 'ü', 'Ü',
];

/// A named decoder in the candidate table
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub name: &'static str,
    pub encoding: &'static Encoding,
}

/// Candidates tried in order. The first entry is the default encoding and the
/// one used for the lossy fallback.
pub static CANDIDATES: &[Candidate] = &[
    Candidate { name: "UTF-8", encoding: &UTF_8_INIT },
    Candidate { name: "windows-1252", encoding: &WINDOWS_1252_INIT },
    Candidate { name: "windows-1254", encoding: &WINDOWS_1254_INIT },
];

/// Text produced by the detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Name of the candidate that produced `text`
    pub encoding_used: &'static str,
    /// Decoded length minus unreadable characters; 0 for the lossy fallback
    pub score: usize,
    /// True when no candidate decoded strictly and replacement characters may be present
    pub lossy: bool,
}

impl DecodedText {
    /// Whether the first, default candidate produced the text
    pub fn is_default_encoding(&self) -> bool {
        CANDIDATES.first().map(|c| c.name) == Some(self.encoding_used)
    }
}

/// Detect the encoding of `data` using [`CANDIDATES`]
pub fn detect(data: &[u8]) -> DecodedText {
    detect_with(data, CANDIDATES)
}

/// Detect the encoding of `data` against an explicit candidate table
///
/// A strict decode with the first candidate wins outright. The others are
/// scored, and the highest score wins. Falls back to a replacing decode with
/// the first candidate (or UTF-8 if the table is empty) when nothing decodes
/// strictly.
pub fn detect_with(data: &[u8], candidates: &[Candidate]) -> DecodedText {
    let Some((default, rest)) = candidates.split_first() else {
        return lossy_decode(data, Candidate { name: "UTF-8", encoding: UTF_8 });
    };

    if let Some(text) = strict_decode(data, default) {
        let points = score(&text);
        debug!(encoding = default.name, score = points, "default candidate decoded");
        return DecodedText {
            text,
            encoding_used: default.name,
            score: points,
            lossy: false,
        };
    }

    let mut best: Option<DecodedText> = None;
    for candidate in rest {
        let Some(text) = strict_decode(data, candidate) else {
            continue;
        };

        let points = score(&text);
        debug!(encoding = candidate.name, score = points, "candidate decoded");

        if best.as_ref().map_or(true, |b| points > b.score) {
            best = Some(DecodedText {
                text,
                encoding_used: candidate.name,
                score: points,
                lossy: false,
            });
        }
    }

    best.unwrap_or_else(|| lossy_decode(data, *default))
}

fn strict_decode(data: &[u8], candidate: &Candidate) -> Option<String> {
    let text = candidate
        .encoding
        .decode_without_bom_handling_and_without_replacement(data);
    if text.is_none() {
        debug!(encoding = candidate.name, "strict decode failed");
    }
    text.map(|t| t.into_owned())
}

fn lossy_decode(data: &[u8], fallback: Candidate) -> DecodedText {
    let (text, had_errors) = fallback.encoding.decode_without_bom_handling(data);
    warn!(
        encoding = fallback.name,
        had_errors, "no candidate decoded strictly, using lossy decode"
    );

    DecodedText {
        text: text.into_owned(),
        encoding_used: fallback.name,
        score: 0,
        lossy: true,
    }
}

/// Decoded length minus the number of unreadable characters
pub fn score(text: &str) -> usize {
    let mut total = 0;
    let mut unreadable = 0;
    for c in text.chars() {
        total += 1;
        if !is_readable(c) {
            unreadable += 1;
        }
    }
    total - unreadable
}

/// Printable ASCII, whitespace or a locale letter
pub fn is_readable(c: char) -> bool {
    c.is_ascii_graphic() || c.is_whitespace() || LOCALE_LETTERS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_prefers_default_encoding() {
        let decoded = detect(b"name=Alice\nrole=admin");
        assert_eq!(decoded.encoding_used, "UTF-8");
        assert_eq!(decoded.text, "name=Alice\nrole=admin");
        assert!(decoded.is_default_encoding());
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_default_encoding_scores_full_length() {
        let input = "şehir=İstanbul\nülke=Türkiye";
        let decoded = detect(input.as_bytes());
        assert_eq!(decoded.encoding_used, "UTF-8");
        assert_eq!(decoded.score, input.chars().count());
    }

    #[test]
    fn test_valid_utf8_in_other_scripts_stays_utf8() {
        // Cyrillic lead bytes such as 0xD0 read as 'Ğ' in windows-1254
        let input = "şehir=Москва\nad=Привет";
        let decoded = detect(input.as_bytes());
        assert_eq!(decoded.encoding_used, "UTF-8");
        assert_eq!(decoded.text, input);
        assert!(decoded.is_default_encoding());
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_turkish_code_page_beats_latin1() {
        // "ışık" in windows-1254; 0xFD/0xFE are ý/þ in windows-1252
        let bytes = [0xFD, 0xFE, 0xFD, b'k'];
        let decoded = detect(&bytes);
        assert_eq!(decoded.encoding_used, "windows-1254");
        assert_eq!(decoded.text, "ışık");
        assert_eq!(decoded.score, 4);
        assert!(!decoded.is_default_encoding());
    }

    #[test]
    fn test_tie_keeps_earliest_latin_candidate() {
        // 0xE7 is 'ç' in both single-byte pages
        let decoded = detect(&[b'a', 0xE7, b'b']);
        assert_eq!(decoded.encoding_used, "windows-1252");
        assert_eq!(decoded.text, "açb");
    }

    #[test]
    fn test_lossy_fallback_when_nothing_decodes() {
        let only_utf8 = [Candidate { name: "UTF-8", encoding: UTF_8 }];
        let decoded = detect_with(&[b'o', b'k', 0xFF], &only_utf8);
        assert!(decoded.lossy);
        assert_eq!(decoded.score, 0);
        assert_eq!(decoded.encoding_used, "UTF-8");
        assert_eq!(decoded.text, "ok\u{FFFD}");
    }

    #[test]
    fn test_empty_table_decodes_lossy_utf8() {
        let decoded = detect_with(b"ok", &[]);
        assert!(decoded.lossy);
        assert_eq!(decoded.encoding_used, "UTF-8");
        assert_eq!(decoded.text, "ok");
    }

    #[test]
    fn test_score_penalizes_unreadable() {
        assert_eq!(score("abc"), 3);
        assert_eq!(score("a\u{FFFD}b"), 2);
        assert_eq!(score("Ã¼"), 0);
        assert_eq!(score(""), 0);
    }
}
