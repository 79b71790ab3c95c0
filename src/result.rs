//! Result types for extraction output.
//!
//! The [`Article`] record is produced once per extraction and is immutable
//! thereafter.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The readable article extracted from a web page.
///
/// All fields except `length` are optional as not every document carries
/// every piece of metadata. `length` defaults to 0 and always equals the
/// code-point count of `text_content`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Article {
    /// Source URL of the document, when supplied by the caller.
    pub url: Option<String>,

    /// Cleaned article title.
    pub title: Option<String>,

    /// Author identification text.
    pub byline: Option<String>,

    /// Cleaned article body as an HTML fragment.
    pub content: Option<String>,

    /// Plain-text rendering of `content`.
    pub text_content: Option<String>,

    /// Character count of `text_content` in Unicode code points.
    pub length: usize,

    /// Short description, from metadata or the first paragraph.
    pub excerpt: Option<String>,

    /// Site name (e.g. "The Example Times").
    pub site_name: Option<String>,

    /// Lead image URL.
    pub image: Option<String>,

    /// Favicon URL.
    pub favicon: Option<String>,

    /// Declared document language (primary subtag, lower-cased).
    pub language: Option<String>,

    /// Publication time.
    pub published_time: Option<DateTime<Utc>>,

    /// Last-modified time. Not backfilled from `published_time`.
    pub modified_time: Option<DateTime<Utc>>,
}
