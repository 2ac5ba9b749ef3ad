//! Record model shared by the container, JSON and CSV forms
//!
//! One container line becomes one [`Record`]. A line with a `=` is split at
//! the first separator into a keyed pair; anything else is a bare value that
//! lives under [`DEFAULT_KEY`].

use serde_json::{Map, Value};

/// Key used for values that carry no label of their own.
pub const DEFAULT_KEY: &str = "satır";

/// Key/value separator in container lines.
pub const SEPARATOR: char = '=';

/// One logical unit of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Labeled pairs in source order
    Keyed(Vec<(String, String)>),
    /// A bare value without a label
    Default(String),
}

impl Record {
    /// Build a single-pair keyed record
    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Record::Keyed(vec![(key.into(), value.into())])
    }

    /// Parse one container line. Returns `None` for blank lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line.split_once(SEPARATOR) {
            Some((key, value)) => Some(Record::keyed(key.trim(), value.trim())),
            None => Some(Record::Default(line.to_string())),
        }
    }

    /// Pairs in order, with bare values reported under [`DEFAULT_KEY`]
    pub fn pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        match self {
            Record::Keyed(pairs) => Box::new(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            Record::Default(value) => Box::new(std::iter::once((DEFAULT_KEY, value.as_str()))),
        }
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Container lines for this record.
    ///
    /// The default key is never written out, so an empty default value has no
    /// line at all. Labeled pairs always render, empty or not.
    pub fn container_lines(&self) -> Vec<String> {
        self.pairs()
            .filter_map(|(key, value)| {
                if key != DEFAULT_KEY {
                    Some(format!("{}{}{}", key, SEPARATOR, value))
                } else if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            })
            .collect()
    }

    /// JSON object holding exactly this record's pairs
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.pairs()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }
}

/// Ordered records of one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One record per non-blank line, in line order
    pub fn from_text(text: &str) -> Self {
        Self {
            records: text.lines().filter_map(Record::parse_line).collect(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Union of all keys in order of first appearance
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for record in &self.records {
            for (key, _) in record.pairs() {
                if !columns.contains(&key) {
                    columns.push(key);
                }
            }
        }
        columns
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_keyed() {
        let record = Record::parse_line(" name = Alice ");
        assert_eq!(record, Some(Record::keyed("name", "Alice")));
    }

    #[test]
    fn test_parse_line_splits_at_first_separator() {
        assert_eq!(Record::parse_line("expr=a=b"), Some(Record::keyed("expr", "a=b")));
    }

    #[test]
    fn test_parse_line_default() {
        assert_eq!(Record::parse_line("Alice"), Some(Record::Default("Alice".to_string())));
    }

    #[test]
    fn test_parse_line_blank() {
        assert_eq!(Record::parse_line("   "), None);
    }

    #[test]
    fn test_from_text_one_record_per_line() {
        let set = RecordSet::from_text("a=1\n\nplain\n  \nb=2");
        assert_eq!(set.len(), 3);
        assert_eq!(set.records[0], Record::keyed("a", "1"));
        assert_eq!(set.records[1], Record::Default("plain".to_string()));
        assert_eq!(set.records[2], Record::keyed("b", "2"));
    }

    #[test]
    fn test_default_record_pairs_use_default_key() {
        let record = Record::Default("Alice".to_string());
        assert_eq!(record.pairs().collect::<Vec<_>>(), vec![(DEFAULT_KEY, "Alice")]);
        assert_eq!(record.get(DEFAULT_KEY), Some("Alice"));
    }

    #[test]
    fn test_container_lines_hide_default_key() {
        let record = Record::Keyed(vec![
            (DEFAULT_KEY.to_string(), "Alice".to_string()),
            ("age".to_string(), "30".to_string()),
        ]);
        assert_eq!(record.container_lines(), vec!["Alice", "age=30"]);
        assert_eq!(Record::Default("Bob".to_string()).container_lines(), vec!["Bob"]);
    }

    #[test]
    fn test_container_lines_keep_empty_labeled_values() {
        let record = Record::Keyed(vec![
            (DEFAULT_KEY.to_string(), String::new()),
            ("id".to_string(), "1".to_string()),
            ("name".to_string(), String::new()),
        ]);
        assert_eq!(record.container_lines(), vec!["id=1", "name="]);
        assert!(Record::Default(String::new()).container_lines().is_empty());
    }

    #[test]
    fn test_explicit_default_key_line_reads_as_bare_value() {
        // The reserved key is not escaped, so `satır=x` and `x` share a column
        let set = RecordSet::from_text("satır=x
x");
        assert_eq!(set.records[0], Record::keyed(DEFAULT_KEY, "x"));
        assert_eq!(set.records[0].container_lines(), vec!["x"]);
        assert_eq!(set.columns(), vec![DEFAULT_KEY]);
    }

    #[test]
    fn test_columns_first_appearance_without_duplicates() {
        let set = RecordSet::from_text("b=1\nAlice\na=2\nb=3");
        assert_eq!(set.columns(), vec!["b", DEFAULT_KEY, "a"]);
    }

    #[test]
    fn test_to_json_object() {
        let object = Record::keyed("id", "7").to_json_object();
        assert_eq!(object.get("id"), Some(&Value::String("7".to_string())));
        assert_eq!(object.len(), 1);
    }
}
