//! Configuration options for article extraction.
//!
//! The `Options` struct controls parsing behavior. All fields are public
//! for easy configuration; use `Default::default()` for standard settings.

use crate::constants::DEFAULT_MIN_CONTENT_LENGTH;

/// Configuration options for article extraction.
///
/// # Example
///
/// ```rust
/// use readably::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     url: Some("https://example.com/posts/1".to_string()),
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL of the document.
    ///
    /// When provided, relative URIs in the extracted content and metadata
    /// are resolved against it. Absent, relative URIs remain relative.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Character encoding override for the byte entry points.
    ///
    /// When set, `parse_bytes` decodes with this encoding label instead of
    /// sniffing `<meta charset>` declarations. Ignored by the string entry
    /// points.
    ///
    /// Default: `None`
    pub character_encoding: Option<String>,

    /// Minimum length of extracted text (Unicode code points).
    ///
    /// Articles shorter than this trigger a retry with progressively
    /// relaxed heuristics before the best attempt is accepted.
    ///
    /// Default: `500`
    pub min_content_length: usize,

    /// Surface metadata extraction failures as errors.
    ///
    /// When false (the default), malformed JSON-LD and unparseable dates
    /// are silently ignored and metadata stays best-effort.
    ///
    /// Default: `false`
    pub strict_metadata: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            character_encoding: None,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            strict_metadata: false,
        }
    }
}
