//! Text utilities: whitespace normalization, counting, inner-text extraction.

use crate::cache::Cache;
use crate::constants::INNER_TEXT_CACHE_THRESHOLD;
use crate::dom::{self, NodeRef, Selection};

/// Commas recognized by [`count_commas`]: ASCII plus the common CJK forms.
const COMMA_CHARS: &[char] = &[',', '\u{3001}', '\u{ff0c}'];

/// Collapse every run of Unicode whitespace to a single space.
///
/// Leading and trailing whitespace is kept (as one space); see [`trim`]
/// for the stripping variant.
#[must_use]
pub fn normalize_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Normalize spaces, then strip leading and trailing whitespace.
#[must_use]
pub fn trim(text: &str) -> String {
    normalize_spaces(text).trim().to_string()
}

/// Number of whitespace-delimited tokens.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of Unicode code points.
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Number of comma characters, ASCII and CJK.
#[must_use]
pub fn count_commas(text: &str) -> usize {
    text.chars().filter(|ch| COMMA_CHARS.contains(ch)).count()
}

/// Concatenated descendant text in document order, skipping script-like
/// subtrees. Results for large subtrees are memoized in `cache`.
pub(crate) fn inner_text(sel: &Selection, normalize: bool, cache: &mut Cache) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };

    let fingerprint = cache.fingerprint(node.id, "inner_text", Some(normalize));
    if let Some(hit) = cache.get_text(&fingerprint) {
        return hit.clone();
    }

    let mut raw = String::new();
    collect_text(node, &mut raw);
    let cacheable = raw.len() >= INNER_TEXT_CACHE_THRESHOLD;

    let result = if normalize { trim(&raw) } else { raw };
    if cacheable {
        cache.put_text(fingerprint, result.clone());
    }
    result
}

/// Uncached variant for one-shot reads outside an extraction attempt.
pub(crate) fn inner_text_uncached(sel: &Selection, normalize: bool) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };
    let mut raw = String::new();
    collect_text(node, &mut raw);
    if normalize {
        trim(&raw)
    } else {
        raw
    }
}

fn collect_text(node: &NodeRef, out: &mut String) {
    for child in node.children_it(false) {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            match dom::node_tag_name(&child).as_deref() {
                Some("script" | "style" | "noscript" | "template") => {}
                _ => collect_text(&child, out),
            }
        }
    }
}
