//! Error types for the webdex inverted-index engine.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("no index found under {0}; run `webdex index` first")]
    MissingIndex(PathBuf),

    #[error("corrupt index entry in {path}: {reason}")]
    CorruptEntry { path: PathBuf, reason: String },

    #[error("offset {offset} in {path} is past end of file")]
    OffsetOutOfRange { path: PathBuf, offset: u64 },
}
