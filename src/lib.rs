//! # readably
//!
//! Reader-mode article extraction for Rust.
//!
//! This library pulls the principal human-readable article out of an
//! arbitrary HTML document, the way browser reader modes do: it strips
//! navigation, advertisements, and boilerplate, keeps the main content,
//! and harvests metadata (title, byline, excerpt, site name, lead image,
//! favicon, language, publication times).
//!
//! ## Quick Start
//!
//! ```rust
//! use readably::parse;
//!
//! let html = r#"<html><head><title>My Article</title></head><body>
//! <div id="main"><p>A reasonably long opening paragraph, with commas,
//! and enough substance for the extractor to score it as content.</p></div>
//! </body></html>"#;
//!
//! let article = parse(html)?;
//! println!("Title: {:?}", article.title);
//! println!("Text: {}", article.text_content.unwrap_or_default());
//! # Ok::<(), readably::Error>(())
//! ```
//!
//! ## How it works
//!
//! Extraction is a sequential pipeline over a single mutable DOM:
//! metadata harvesting (JSON-LD, meta tags, `<title>`), a preparation
//! pass (scripts, lazy images, `<br>` runs), paragraph scoring with
//! ancestor propagation, top-candidate selection, sibling assembly, and
//! post-extraction cleanup. When the result is too short the engine
//! retries with progressively relaxed heuristics.

mod cache;
mod candidates;
mod clean;
mod constants;
mod error;
mod extract;
mod metadata;
mod options;
mod patterns;
mod preprocess;
mod result;
mod scoring;
mod visibility;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Text utilities: whitespace normalization, counting, inner text.
pub mod text;

/// URL utilities for resolving relative references.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, ErrorKind, Result};
pub use options::Options;
pub use result::Article;

/// Extracts the readable article from an HTML document using default options.
///
/// # Example
///
/// ```rust
/// use readably::parse;
///
/// let html = "<html><body><article><p>A paragraph long enough, with a comma, \
///             to be recognized as article content by the scorer.</p></article></body></html>";
/// let article = parse(html)?;
/// assert!(article.length > 0);
/// # Ok::<(), readably::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn parse(html: &str) -> Result<Article> {
    parse_with_options(html, &Options::default())
}

/// Extracts the readable article with custom options.
///
/// # Example
///
/// ```rust
/// use readably::{parse_with_options, Options};
///
/// let html = r#"<html><body><article><p>Body text with an <img src="/a.png"> image,
/// and enough length, commas included, to be scored as content.</p></article></body></html>"#;
/// let options = Options {
///     url: Some("https://example.com/posts/1".to_string()),
///     ..Options::default()
/// };
/// let article = parse_with_options(html, &options)?;
/// # Ok::<(), readably::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn parse_with_options(html: &str, options: &Options) -> Result<Article> {
    extract::parse_document(html, options)
}

/// Extracts the readable article from raw bytes.
///
/// The character encoding is sniffed from `<meta>` declarations and
/// defaults to UTF-8; decoding is lossy rather than fatal.
#[allow(clippy::missing_errors_doc)]
pub fn parse_bytes(html: &[u8]) -> Result<Article> {
    parse_bytes_with_options(html, &Options::default())
}

/// Extracts the readable article from raw bytes with custom options.
///
/// `Options::character_encoding` overrides encoding detection.
///
/// # Example
///
/// ```rust
/// use readably::{parse_bytes_with_options, Options};
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><article>\
///     <p>Caf\xE9 culture, long enough a paragraph, with commas, to extract.</p>\
///     </article></body></html>";
/// let article = parse_bytes_with_options(html, &Options::default())?;
/// assert!(article.text_content.unwrap_or_default().contains("Caf\u{e9}"));
/// # Ok::<(), readably::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn parse_bytes_with_options(html: &[u8], options: &Options) -> Result<Article> {
    let decoded = encoding::decode_html(html, options.character_encoding.as_deref());
    parse_with_options(&decoded, options)
}
