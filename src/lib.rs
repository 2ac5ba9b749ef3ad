//! # emx-dat
//!
//! Codec between the legacy line-oriented `.dat` container and structured text
//! (JSON array, CSV table, plain text), guarded by a binary classifier so that
//! executables and corrupted data are never treated as text.
//!
//! ## Container Format
//!
//! One record per line. A line with `=` is split at the **first** separator
//! into a labeled pair; a line without one is a bare value:
//!
//! ```text
//! name=Alice
//! url=https://example.com/?a=b
//! Bob
//! ```
//!
//! Bare values live under the reserved key `satır` in JSON and CSV and are
//! written back without a `key=` prefix.
//!
//! ## Pipeline
//!
//! Decode (container → structured):
//! 1. Classify the first 4096 bytes → reject binary
//! 2. Detect the character encoding (UTF-8, windows-1252, windows-1254, scored)
//! 3. Sanitize to the allowed character set → reject if more than half was lost
//! 4. Build records and render JSON, CSV, text or a normalized container
//!
//! Encode (structured → container):
//! 1. Classify and detect the encoding as above
//! 2. Parse JSON or CSV (by extension, then by content)
//! 3. Render `key=value` lines; unparseable sources pass through as raw text
//!
//! ## Binary Detection Rules
//!
//! Rules, in order:
//! 1. `4D 5A` (`MZ`) header → Binary (executable signature)
//! 2. `{"` followed by a byte below 0x20 → Binary (structured-save signature)
//! 3. A `0x00` byte → Binary (null byte present)
//! 4. More than 10% control characters → Binary (unreadable control-character ratio)
//! 5. Otherwise → Text
//!
//! ## Example
//!
//! ```rust
//! use emx_dat::{run, Direction, TargetFormat};
//!
//! let data = b"name=Alice\nrole=admin";
//! let result = run(data, "users.dat", TargetFormat::Json, Direction::Decode, |_| {})?;
//! assert_eq!(result.suggested_file_name, "users.json");
//! assert_eq!(result.content_type, "application/json");
//! # Ok::<(), emx_dat::ConversionError>(())
//! ```

pub mod charset;
pub mod classify;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod sanitize;

pub use charset::{detect, detect_with, Candidate, DecodedText, CANDIDATES};
pub use classify::{classify, classify_with, BinaryReason, Classification};
pub use config::ConvertConfig;
pub use decoder::Decoder;
pub use encoder::{Encoded, Encoder, Parsed, SourceKind};
pub use error::{ConversionError, ParseOptionError};
pub use pipeline::{
    inspect, output_name, run,
    ConversionResult, Direction, Inspection, Pipeline, TargetFormat,
};
pub use record::{Record, RecordSet, DEFAULT_KEY};
pub use sanitize::sanitize;
