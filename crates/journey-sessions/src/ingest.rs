use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::{LogEvent, LogRecord};

/// Failure at the ingestion boundary. Everything past this point is
/// well-formed by construction.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid log record: {preview}")]
    Record {
        line: usize,
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid log array")]
    Array {
        #[source]
        source: serde_json::Error,
    },
}

/// Parse raw log text into normalized events.
///
/// Accepts either a JSON array of records (first non-whitespace byte is
/// `[`) or JSONL with one record per line; blank lines are skipped.
/// Fails fast on the first malformed record, naming its line.
pub fn parse_events(input: &str) -> Result<Vec<LogEvent>, IngestError> {
    let records = if input.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<LogRecord>>(input)
            .map_err(|source| IngestError::Array { source })?
    } else {
        let mut records = Vec::new();
        for (index, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord =
                serde_json::from_str(line).map_err(|source| IngestError::Record {
                    line: index + 1,
                    preview: line.chars().take(100).collect(),
                    source,
                })?;
            records.push(record);
        }
        records
    };

    Ok(records.into_iter().map(LogEvent::from).collect())
}

/// Read a log file and parse it into events.
pub fn load_events(path: &Path) -> Result<Vec<LogEvent>, IngestError> {
    let input = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let events = parse_events(&input)?;
    tracing::debug!(
        "loaded {} events from {}",
        events.len(),
        path.display()
    );
    Ok(events)
}

/// SHA-256 hex digest of raw input bytes. Used as the snapshot
/// memoization key: identical bytes mean segmentation can be skipped.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
