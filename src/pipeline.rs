//! Conversion pipeline
//!
//! Sequences the stages for one run:
//!
//! - **decode**: classify → detect encoding → sanitize → loss check → records →
//!   JSON / CSV / TXT / container
//! - **encode**: classify → detect encoding → JSON / CSV / raw source → container
//!
//! A run is a pure function of its input buffer and options. It either returns a
//! complete [`ConversionResult`] or the first [`ConversionError`] encountered.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::charset::{self, DecodedText};
use crate::classify::{classify_with, Classification};
use crate::config::ConvertConfig;
use crate::decoder::Decoder;
use crate::encoder::{Encoder, SourceKind};
use crate::error::{ConversionError, ParseOptionError};
use crate::record::RecordSet;
use crate::sanitize::{check_loss, sanitize};

/// File extension of the legacy container.
pub const CONTAINER_EXTENSION: &str = "dat";

/// Base name used when the input name has none.
pub const DEFAULT_BASE_NAME: &str = "converted";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Progress milestones reported to the caller
pub mod progress {
    pub const ACCEPTED: u8 = 10;
    pub const DECODED: u8 = 40;
    pub const PARSED: u8 = 70;
    pub const TRANSFORMED: u8 = 90;
    pub const DONE: u8 = 100;
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Container to structured text
    Decode,
    /// Structured text to container
    Encode,
}

impl FromStr for Direction {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decode" => Ok(Direction::Decode),
            "encode" => Ok(Direction::Encode),
            _ => Err(ParseOptionError::UnknownDirection(s.to_string())),
        }
    }
}

/// Output format of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Json,
    Csv,
    Txt,
    Container,
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Json => "json",
            TargetFormat::Csv => "csv",
            TargetFormat::Txt => "txt",
            TargetFormat::Container => CONTAINER_EXTENSION,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TargetFormat::Json => "application/json",
            TargetFormat::Csv => "text/csv",
            TargetFormat::Txt => "text/plain",
            TargetFormat::Container => "application/octet-stream",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(TargetFormat::Json),
            "csv" => Ok(TargetFormat::Csv),
            "txt" | "text" => Ok(TargetFormat::Txt),
            "dat" | "container" => Ok(TargetFormat::Container),
            _ => Err(ParseOptionError::UnknownFormat(s.to_string())),
        }
    }
}

/// Output of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub output_bytes: Vec<u8>,
    pub content_type: String,
    pub suggested_file_name: String,
    /// Non-fatal conditions worth showing to the user
    pub notices: Vec<String>,
}

impl ConversionResult {
    /// Write the output under `dir` using the suggested file name
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.suggested_file_name);
        fs::write(&path, &self.output_bytes)?;
        Ok(path)
    }
}

/// Classification and decoded text of a buffer, without conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub classification: Classification,
    /// `None` when the buffer was classified as binary
    pub decoded: Option<DecodedText>,
}

/// Runs conversions with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ConvertConfig,
}

impl Pipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `data` in the given direction.
    ///
    /// `file_name` only feeds the output name and, when encoding, the
    /// `.json`/`.csv` source detection. `on_progress` receives non-decreasing
    /// percentages ending with 100 on success.
    pub fn run<F>(
        &self,
        data: &[u8],
        file_name: &str,
        target: TargetFormat,
        direction: Direction,
        mut on_progress: F,
    ) -> Result<ConversionResult, ConversionError>
    where
        F: FnMut(u8),
    {
        on_progress(progress::ACCEPTED);

        if let Classification::Binary { reason } = classify_with(data, &self.config) {
            warn!(file = file_name, %reason, "rejected binary input");
            return Err(ConversionError::BinaryRejected { reason });
        }

        let result = match direction {
            Direction::Decode => self.run_decode(data, file_name, target, &mut on_progress)?,
            Direction::Encode => self.run_encode(data, file_name, target, &mut on_progress)?,
        };

        info!(
            file = file_name,
            output = %result.suggested_file_name,
            bytes = result.output_bytes.len(),
            notices = result.notices.len(),
            "conversion complete"
        );
        on_progress(progress::DONE);
        Ok(result)
    }

    fn run_decode(
        &self,
        data: &[u8],
        file_name: &str,
        target: TargetFormat,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<ConversionResult, ConversionError> {
        let mut notices = Vec::new();

        let decoded = charset::detect(data);
        notices.extend(encoding_notice(&decoded));
        on_progress(progress::DECODED);

        if decoded.text.trim().is_empty() {
            return Err(ConversionError::EmptyInput);
        }

        let sanitized = sanitize(&decoded.text);
        check_loss(&decoded.text, &sanitized, self.config.min_retained_ratio)?;
        if sanitized.is_empty() {
            return Err(ConversionError::EmptyInput);
        }

        let decoder = Decoder::new();
        let records: RecordSet = decoder.decode(&sanitized);
        on_progress(progress::PARSED);

        let output = match target {
            TargetFormat::Json => decoder.to_json(&records),
            TargetFormat::Csv => decoder.to_csv(&records),
            TargetFormat::Txt => sanitized,
            TargetFormat::Container => Encoder::new().render(&records),
        };
        on_progress(progress::TRANSFORMED);

        Ok(ConversionResult {
            output_bytes: output.into_bytes(),
            content_type: target.content_type().to_string(),
            suggested_file_name: output_name(file_name, target.extension()),
            notices,
        })
    }

    fn run_encode(
        &self,
        data: &[u8],
        file_name: &str,
        target: TargetFormat,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<ConversionResult, ConversionError> {
        if target != TargetFormat::Container {
            debug!(%target, "encode always produces container output");
        }

        let mut notices = Vec::new();

        let decoded = charset::detect(data);
        notices.extend(encoding_notice(&decoded));
        on_progress(progress::DECODED);

        let text = decoded.text.trim_start_matches(BYTE_ORDER_MARK);
        let kind = SourceKind::detect(file_name, text);
        debug!(source = kind.name(), "encoding source");

        let encoded = Encoder::new().encode(text, kind)?;
        if let Some(reason) = &encoded.fallback {
            notices.push(format!(
                "Could not read the source as {} ({}); it was passed through as raw text",
                kind.name(),
                reason
            ));
        }
        on_progress(progress::PARSED);

        let output_bytes = encoded.payload.into_bytes();
        on_progress(progress::TRANSFORMED);

        let container = TargetFormat::Container;
        Ok(ConversionResult {
            output_bytes,
            content_type: container.content_type().to_string(),
            suggested_file_name: output_name(file_name, container.extension()),
            notices,
        })
    }

    /// Classify and, for text, decode `data` without converting it
    pub fn inspect(&self, data: &[u8]) -> Inspection {
        let classification = classify_with(data, &self.config);
        let decoded = classification.is_text().then(|| charset::detect(data));
        Inspection { classification, decoded }
    }
}

/// Convert `data` with the default configuration
pub fn run<F>(
    data: &[u8],
    file_name: &str,
    target: TargetFormat,
    direction: Direction,
    on_progress: F,
) -> Result<ConversionResult, ConversionError>
where
    F: FnMut(u8),
{
    Pipeline::default().run(data, file_name, target, direction, on_progress)
}

/// Inspect `data` with the default configuration
pub fn inspect(data: &[u8]) -> Inspection {
    Pipeline::default().inspect(data)
}

/// `<base>.<ext>` where base is the input's final component without its extension
pub fn output_name(file_name: &str, ext: &str) -> String {
    let base = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME);
    format!("{}.{}", base, ext)
}

fn encoding_notice(decoded: &DecodedText) -> Option<String> {
    if decoded.lossy {
        Some(format!(
            "No candidate encoding decoded the input cleanly; \
             it was decoded as {} with replacement characters",
            decoded.encoding_used
        ))
    } else if !decoded.is_default_encoding() {
        Some(format!("Input was decoded as {}", decoded.encoding_used))
    } else {
        None
    }
}
