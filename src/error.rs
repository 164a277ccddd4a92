use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load image '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("malformed index row at line {line}: {reason}")]
    RowFormat { line: u64, reason: String },

    #[error("invalid bin configuration: {0}")]
    InvalidBins(String),

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
