//! Loading recorded sessions from JSON-lines files.
//!
//! The hub archives a session as one JSON sample per line. Blank lines
//! are skipped; a malformed line or an out-of-order timestamp aborts the
//! load with the offending line number. Non-finite readings are dropped
//! and counted by the buffer, matching the live ingestion policy.

use crate::ingest::buffer::SessionBuffer;
use crate::ingest::types::{Sample, SampleError};
use std::path::Path;

/// Errors raised while loading a recorded session.
#[derive(Debug)]
pub enum ReadError {
    IoError(String),
    ParseError { line: usize, message: String },
    SampleError { line: usize, source: SampleError },
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::IoError(e) => write!(f, "IO error: {e}"),
            ReadError::ParseError { line, message } => {
                write!(f, "line {line}: {message}")
            }
            ReadError::SampleError { line, source } => {
                write!(f, "line {line}: {source}")
            }
        }
    }
}

impl std::error::Error for ReadError {}

/// Load and validate a recorded session from a JSON-lines file.
pub fn load_session(path: &Path) -> Result<SessionBuffer, ReadError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ReadError::IoError(e.to_string()))?;
    parse_session(&content)
}

/// Parse JSON-lines content into a validated session buffer.
pub fn parse_session(content: &str) -> Result<SessionBuffer, ReadError> {
    let mut buffer = SessionBuffer::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let sample: Sample = serde_json::from_str(line).map_err(|e| ReadError::ParseError {
            line: idx + 1,
            message: e.to_string(),
        })?;

        match buffer.push(sample) {
            Ok(()) => {}
            // Dropped and counted, same as live ingestion
            Err(SampleError::NonFinite { .. }) => {}
            Err(source @ SampleError::OutOfOrder { .. }) => {
                return Err(ReadError::SampleError {
                    line: idx + 1,
                    source,
                });
            }
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hub_rows() {
        let content = r#"
{"t": 0, "emg": 42.0, "bpm": 61.2}
{"t": 100, "emg": 44.0, "bpm": 61.0, "temp": 36.4}

{"t": 200, "emg": 40.0, "bpm": 60.8}
"#;
        let buffer = parse_session(content).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.samples()[1].temp, Some(36.4));
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let content = "{\"t\": 0, \"emg\": 42.0, \"bpm\": 61.2}\nnot json\n";
        let err = parse_session(content).unwrap_err();
        assert!(matches!(err, ReadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_out_of_order_aborts_with_line() {
        let content = "{\"t\": 500, \"emg\": 1.0, \"bpm\": 60.0}\n{\"t\": 100, \"emg\": 1.0, \"bpm\": 60.0}\n";
        let err = parse_session(content).unwrap_err();
        assert!(matches!(err, ReadError::SampleError { line: 2, .. }));
    }
}
