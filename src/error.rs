//! Error types for unresume library.

use std::io;
use thiserror::Error;

/// Result type alias for unresume operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting text.
///
/// Extractors return these; [`crate::Extractor`] converts every one of them
/// into an `Extraction error: ...` warning before handing the result back.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A ZIP entry uses a compression method other than stored or deflate.
    #[error("Unsupported compression method {method} for entry {entry}")]
    UnsupportedCompression {
        /// Raw method id from the local file header.
        method: u16,
        /// Entry name.
        entry: String,
    },

    /// Inflating an entry produced more bytes than the configured limit.
    #[error("Decompressed size of {entry} exceeds limit of {limit} bytes")]
    DecompressedTooLarge {
        /// Entry name.
        entry: String,
        /// Limit in bytes.
        limit: usize,
    },

    /// The deflate stream of an entry is corrupt.
    #[error("Failed to decompress {entry}: {message}")]
    Decompress {
        /// Entry name.
        entry: String,
        /// Decoder message.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
