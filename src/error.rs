//! Error types for readably.
//!
//! This module defines the error types returned by parsing operations.

/// Stable error discriminator.
///
/// Front-ends map these to exit codes, so the set is part of the public
/// contract even though `Error` itself carries the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTML could not be tokenized or tree-built at all.
    Parse,
    /// No viable article was produced even with all retry relaxations.
    Extraction,
    /// Metadata harvesting failed (surfaced only in strict mode).
    Metadata,
}

/// Error type for parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTML parsing failed.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// No article content was detected after all retries.
    #[error("no article content found: {0}")]
    Extraction(String),

    /// Metadata extraction failed in strict mode.
    #[error("metadata extraction failed: {0}")]
    Metadata(String),
}

impl Error {
    /// The stable kind discriminator for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Metadata(_) => ErrorKind::Metadata,
        }
    }
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
