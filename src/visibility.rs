//! Visibility and role classification.
//!
//! Decides whether a node is user-visible and whether its class/id/role
//! signals it is navigation chrome rather than content. Visibility results
//! are cached per node, fingerprinted through the extraction cache.

use crate::cache::Cache;
use crate::dom::{self, Selection};
use crate::patterns::{
    RX_DISPLAY_NONE, RX_MAYBE_CANDIDATE, RX_UNLIKELY_CANDIDATES, RX_VISIBILITY_HIDDEN,
    UNLIKELY_ROLES,
};

/// Concatenated `class`, `id`, and `role` attributes, the haystack for the
/// candidate-filtering regexes.
pub(crate) fn match_string(sel: &Selection) -> String {
    let mut out = String::new();
    for name in ["class", "id", "role"] {
        if let Some(value) = dom::get_attribute(sel, name) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&value);
        }
    }
    out
}

/// Whether the node is user-visible. Cached per node.
pub(crate) fn is_visible(sel: &Selection, cache: &mut Cache) -> bool {
    let Some(id) = dom::node_id(sel) else {
        return true;
    };

    let fingerprint = cache.fingerprint(id, "visibility", None);
    if let Some(hit) = cache.get_flag(&fingerprint) {
        return hit;
    }

    let visible = compute_visibility(sel);
    cache.put_flag(fingerprint, visible);
    visible
}

fn compute_visibility(sel: &Selection) -> bool {
    if let Some(style) = dom::get_attribute(sel, "style") {
        if RX_DISPLAY_NONE.is_match(&style) || RX_VISIBILITY_HIDDEN.is_match(&style) {
            return false;
        }
    }

    if dom::has_attribute(sel, "hidden") {
        return false;
    }

    if dom::get_attribute(sel, "aria-hidden").as_deref() == Some("true") {
        // Kept visible so noscript image salvage can still find them
        let class = dom::get_attribute(sel, "class").unwrap_or_default();
        if !class.contains("fallback-image") {
            return false;
        }
    }

    true
}

/// Whether the node's explicit ARIA role marks it as non-content.
pub(crate) fn has_unlikely_role(sel: &Selection) -> bool {
    dom::get_attribute(sel, "role")
        .is_some_and(|role| UNLIKELY_ROLES.contains(&role.to_lowercase().as_str()))
}

/// Whether the node should be stripped as an unlikely candidate.
///
/// Matches the unlikely regex without the rescue regex, never strips
/// `<body>`/`<a>`, and leaves nodes inside tables or code samples alone.
pub(crate) fn is_unlikely_candidate(sel: &Selection) -> bool {
    let haystack = match_string(sel);
    if haystack.is_empty() {
        return false;
    }

    if !RX_UNLIKELY_CANDIDATES.is_match(&haystack) || RX_MAYBE_CANDIDATE.is_match(&haystack) {
        return false;
    }

    match dom::tag_name(sel).as_deref() {
        Some("body" | "a" | "html") | None => return false,
        _ => {}
    }

    let Some(node) = sel.nodes().first() else {
        return false;
    };
    !(dom::has_ancestor_tag(node, "table") || dom::has_ancestor_tag(node, "code"))
}
