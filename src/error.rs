use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for dataset and lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors surfaced by the loader, the formatter and schema resolution.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("dataset {path} unavailable: {reason}")]
    DatasetUnavailable { path: PathBuf, reason: String },
    #[error("record {address:?} has {found} fields, template expects {expected}")]
    MalformedRecord {
        address: String,
        expected: usize,
        found: usize,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl LookupError {
    pub fn dataset_unavailable(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::DatasetUnavailable {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_record(address: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::MalformedRecord {
            address: address.into(),
            expected,
            found,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
