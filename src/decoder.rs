//! Container decoder: sanitized container text to JSON and CSV

use serde_json::Value;
use tracing::debug;

use crate::record::RecordSet;

const CSV_DELIMITER: &str = ",";
const CSV_QUOTE: char = '"';

/// Turns sanitized container text into records and renders them
pub struct Decoder {
    // Currently stateless, the record model carries all decisions
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {}
    }

    /// Parse container text into records, one per non-blank line
    pub fn decode(&self, text: &str) -> RecordSet {
        let records = RecordSet::from_text(text);
        debug!(records = records.len(), "decoded container lines");
        records
    }

    /// Render records as a pretty-printed JSON array of objects
    pub fn to_json(&self, records: &RecordSet) -> String {
        let array = Value::Array(
            records
                .iter()
                .map(|record| Value::Object(record.to_json_object()))
                .collect(),
        );
        format!("{:#}", array)
    }

    /// Render records as CSV.
    ///
    /// The header is the union of all keys in first-appearance order. Each
    /// record becomes one row with every cell quoted and `""` for missing keys.
    pub fn to_csv(&self, records: &RecordSet) -> String {
        let columns = records.columns();
        let mut lines = Vec::with_capacity(records.len() + 1);

        lines.push(
            columns
                .iter()
                .map(|name| quote_header(name))
                .collect::<Vec<_>>()
                .join(CSV_DELIMITER),
        );

        for record in records {
            let row: Vec<String> = columns
                .iter()
                .map(|column| quote_cell(record.get(column).unwrap_or("")))
                .collect();
            lines.push(row.join(CSV_DELIMITER));
        }

        lines.join("\n")
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Always quote, doubling embedded quotes
fn quote_cell(value: &str) -> String {
    let escaped = value.replace(CSV_QUOTE, "\"\"");
    format!("{CSV_QUOTE}{escaped}{CSV_QUOTE}")
}

/// Header names stay bare unless they would break the row
fn quote_header(name: &str) -> String {
    if name.contains(|c: char| matches!(c, ',' | CSV_QUOTE | '\n' | '\r')) {
        quote_cell(name)
    } else {
        name.to_string()
    }
}
