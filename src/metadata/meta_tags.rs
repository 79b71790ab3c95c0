//! `<meta>` tag harvesting.
//!
//! Scans every `<meta>` element and builds a map keyed by the normalized
//! property identifier taken from `property`, `itemprop`, `name`, or
//! `http-equiv`. Per-field lookups then walk the namespace precedence
//! `dc > dcterm > og > article > twitter > bare-name`.

use std::collections::HashMap;

use crate::dom::{self, Document, Selection};
use crate::patterns::{RX_NAME_PATTERN, RX_PROPERTY_PATTERN};

/// Normalized meta key → content value. First declaration wins.
pub(crate) type MetaValues = HashMap<String, String>;

/// Collect all recognizable meta values from the document head.
pub(crate) fn collect_meta_values(doc: &Document) -> MetaValues {
    let mut values = MetaValues::new();

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);
        let content = dom::get_attribute(&meta, "content").unwrap_or_default();
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        // property/itemprop values may carry several space-separated ids
        for attr in ["property", "itemprop"] {
            if let Some(value) = dom::get_attribute(&meta, attr) {
                for segment in value.split_whitespace() {
                    if let Some(key) = normalize_property(segment) {
                        values.entry(key).or_insert_with(|| content.to_string());
                    }
                }
            }
        }

        for attr in ["name", "http-equiv"] {
            if let Some(value) = dom::get_attribute(&meta, attr) {
                if let Some(key) = normalize_name(&value) {
                    values.entry(key).or_insert_with(|| content.to_string());
                }
            }
        }
    }

    values
}

/// First value present among the given keys, in order.
pub(crate) fn first_meta(values: &MetaValues, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| values.get(*key)).cloned()
}

fn normalize_property(segment: &str) -> Option<String> {
    let caps = RX_PROPERTY_PATTERN.captures(segment)?;
    let prefix = caps.get(1)?.as_str().to_lowercase();
    let field = normalize_field(caps.get(2)?.as_str());
    Some(format!("{prefix}:{field}"))
}

fn normalize_name(value: &str) -> Option<String> {
    let caps = RX_NAME_PATTERN.captures(value)?;
    let field = normalize_field(caps.get(3)?.as_str());
    match caps.get(1) {
        Some(prefix) => {
            let prefix = prefix.as_str().to_lowercase().replace('.', ":");
            Some(format!("{prefix}:{field}"))
        }
        None => Some(field),
    }
}

/// Collapse suffixed image keys (`image:secure_url`, `image:src`) onto the
/// logical `image` field.
fn normalize_field(field: &str) -> String {
    let field = field.to_lowercase();
    if field.starts_with("image") {
        "image".to_string()
    } else {
        field
    }
}

// Namespace-ordered lookup keys per logical field.

pub(crate) const TITLE_KEYS: &[&str] = &[
    "dc:title",
    "dcterm:title",
    "og:title",
    "article:title",
    "twitter:title",
    "weibo:article:title",
    "weibo:webpage:title",
    "title",
];

pub(crate) const BYLINE_KEYS: &[&str] = &[
    "dc:author",
    "dc:creator",
    "dcterm:author",
    "dcterm:creator",
    "og:author",
    "article:author",
    "twitter:author",
    "twitter:creator",
    "author",
    "creator",
];

pub(crate) const EXCERPT_KEYS: &[&str] = &[
    "dc:description",
    "dcterm:description",
    "og:description",
    "article:description",
    "twitter:description",
    "weibo:article:description",
    "weibo:webpage:description",
    "description",
];

pub(crate) const SITE_NAME_KEYS: &[&str] = &[
    "dc:site_name",
    "dcterm:site_name",
    "og:site_name",
    "article:site_name",
    "twitter:site_name",
    "site_name",
];

pub(crate) const IMAGE_KEYS: &[&str] = &[
    "dc:image",
    "dcterm:image",
    "og:image",
    "article:image",
    "twitter:image",
    "image",
];

pub(crate) const PUBLISHED_TIME_KEYS: &[&str] = &[
    "dc:published_time",
    "dcterm:published_time",
    "og:published_time",
    "article:published_time",
    "twitter:published_time",
    "published_time",
];

pub(crate) const MODIFIED_TIME_KEYS: &[&str] = &[
    "dc:modified_time",
    "dcterm:modified_time",
    "og:modified_time",
    "article:modified_time",
    "twitter:modified_time",
    "modified_time",
];
