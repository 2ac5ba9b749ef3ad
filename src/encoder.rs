//! Container encoder: JSON, CSV or raw text back to container lines

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ConversionError;
use crate::record::{Record, RecordSet};

/// Shape of the text handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Json,
    Csv,
    /// Already container-shaped text
    Raw,
}

impl SourceKind {
    /// Pick the source kind from the file extension, then from the content
    pub fn detect(file_name: &str, text: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => SourceKind::Json,
            Some("csv") => SourceKind::Csv,
            _ if text.trim_start().starts_with('[') => SourceKind::Json,
            _ => SourceKind::Raw,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Json => "JSON",
            SourceKind::Csv => "CSV",
            SourceKind::Raw => "raw",
        }
    }
}

/// How the source was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// The structured source parsed into records
    Records(RecordSet),
    /// The source could not be used as structured data and is passed through
    RawFallback { reason: String },
}

/// Container payload produced by the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub payload: String,
    /// Set when the best-effort raw fallback was taken
    pub fallback: Option<String>,
}

/// Renders records, or structured text, as container lines
pub struct Encoder {
    // Currently stateless, but reserved for future options
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Encode `text` of the given kind into a container payload
    pub fn encode(&self, text: &str, kind: SourceKind) -> Result<Encoded, ConversionError> {
        if text.trim().is_empty() {
            return Err(ConversionError::EmptyInput);
        }

        let parsed = match kind {
            SourceKind::Json => parse_json(text),
            SourceKind::Csv => parse_csv(text),
            SourceKind::Raw => {
                return Ok(Encoded { payload: raw_lines(text), fallback: None });
            }
        };

        match parsed {
            Parsed::Records(records) => {
                debug!(source = kind.name(), records = records.len(), "parsed structured source");
                let payload = self.render(&records);
                if payload.is_empty() {
                    return Err(ConversionError::MalformedSource {
                        format: kind.name(),
                        detail: "source contains no values".to_string(),
                    });
                }
                Ok(Encoded { payload, fallback: None })
            }
            Parsed::RawFallback { reason } => {
                warn!(source = kind.name(), %reason, "passing source through as raw text");
                let payload = raw_lines(text);
                if payload.is_empty() {
                    return Err(ConversionError::MalformedSource {
                        format: kind.name(),
                        detail: reason,
                    });
                }
                Ok(Encoded { payload, fallback: Some(reason) })
            }
        }
    }

    /// Render records as container lines joined by `\n`
    pub fn render(&self, records: &RecordSet) -> String {
        records
            .iter()
            .flat_map(Record::container_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON array. Anything else takes the raw fallback.
pub fn parse_json(text: &str) -> Parsed {
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            let reason = "top-level JSON value is not an array".to_string();
            return Parsed::RawFallback { reason };
        }
        Err(e) => return Parsed::RawFallback { reason: format!("invalid JSON: {}", e) },
    };

    let mut records = RecordSet::new();
    for item in items {
        let record = match item {
            Value::Object(map) => Record::Keyed(
                map.into_iter().map(|(key, value)| (key, coerce(&value))).collect(),
            ),
            other => Record::Default(coerce(&other)),
        };
        records.push(record);
    }
    Parsed::Records(records)
}

/// Parse CSV with the first non-empty row as header.
///
/// Cells are zipped against the header by position and each row becomes one
/// keyed record, exactly like a JSON object. Fewer than two rows means there
/// is no data to zip and the raw fallback is taken.
pub fn parse_csv(text: &str) -> Parsed {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => return Parsed::RawFallback { reason: format!("invalid CSV: {}", e) },
        };
        if row.iter().all(str::is_empty) {
            continue;
        }
        rows.push(row);
    }

    if rows.len() < 2 {
        return Parsed::RawFallback { reason: "CSV source has no data rows".to_string() };
    }

    let header = &rows[0];
    let mut records = RecordSet::new();
    for row in &rows[1..] {
        let pairs: Vec<(String, String)> = header
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        records.push(Record::Keyed(pairs));
    }
    Parsed::Records(records)
}

/// Trimmed, non-blank lines of `text`
fn raw_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// String coercion for JSON values
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
