//! Crate error type (spec §7).

use thiserror::Error;

/// Errors produced by building, querying, or (de)serializing a [`crate::succinct_file::SuccinctFile`].
#[derive(Debug, Error)]
pub enum SuccinctFileError {
    /// The input exceeded the addressable size for the chosen index width,
    /// or the sample rate was not a positive power of two.
    #[error("cannot build index: {0}")]
    Build(String),

    /// `extract`/`char_at`/`compare` received an offset outside `[0, n]`.
    #[error("index out of range: {0}")]
    RangeOutOfBounds(String),

    /// A regex pattern could not be parsed.
    #[error(transparent)]
    RegexParse(#[from] RegexParseError),

    /// Serialization or deserialization failed at the I/O boundary.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte stream ended before a complete, well-formed index could be
    /// read; the caller must discard the partial instance.
    #[error("truncated or corrupt serialized index: {0}")]
    Truncated(String),
}

/// A regex pattern failed to parse. Carries the byte offset into the
/// pattern string where parsing failed, so a caller can point a UI at it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("regex parse error at byte {position}: {message}")]
pub struct RegexParseError {
    pub position: usize,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, SuccinctFileError>;
