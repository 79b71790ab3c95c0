//! URL utilities.
//!
//! Relative URI resolution for metadata and content rewriting. Resolution
//! never fails: on any parsing problem the input string is returned
//! unchanged, so a malformed href degrades to itself rather than erroring
//! the extraction.

use url::Url;

/// Parse a base URL supplied by the caller. `None` when unusable.
#[must_use]
pub fn parse_base(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    Url::parse(url).ok().filter(|u| u.has_host())
}

/// Check whether a string is already an absolute URI (scheme + authority).
#[must_use]
pub fn is_absolute_uri(s: &str) -> bool {
    Url::parse(s).is_ok_and(|u| u.has_host())
}

/// Convert a URI reference to absolute form against an optional base.
///
/// Returned unchanged when empty, fragment-only (`#...`), a `data:` URL,
/// already absolute, or when no base is available.
#[must_use]
pub fn to_absolute_uri(uri: &str, base: Option<&Url>) -> String {
    let Some(base) = base else {
        return uri.to_string();
    };

    if uri.is_empty() || uri.starts_with('#') || uri.starts_with("data:") {
        return uri.to_string();
    }

    if is_absolute_uri(uri) {
        return uri.to_string();
    }

    match base.join(uri) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => uri.to_string(),
    }
}
