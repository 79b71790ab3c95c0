//! DOM operations adapter.
//!
//! Thin helpers over the `dom_query` crate, giving the pipeline a small,
//! consistent vocabulary for reading and mutating the parsed document.
//! Node-level walks use `NodeRef` directly; everything attribute-shaped
//! goes through `Selection`.

// Re-export core types for internal use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril so callers can hold zero-copy text
pub use tendril::StrTendril;

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone a document by serializing and re-parsing it.
///
/// Used for retry snapshots: each attempt mutates its own copy, so the
/// prepared tree stays restorable between attempts.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

// === Attribute operations ===

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Check if an attribute exists.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// All attributes of the first node as key-value pairs.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag / node information ===

/// Tag name of the first node, lower-cased.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes().first().and_then(node_tag_name)
}

/// Tag name of a node, lower-cased. `None` for non-elements.
#[must_use]
pub fn node_tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_lowercase())
}

/// Stable identity of the first node in a selection.
#[inline]
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|node| node.id)
}

// === Text content ===

/// All descendant text of the selection, as parsed (no normalization).
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Inner HTML of the first node.
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Outer HTML of the first node.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

/// Outer HTML of a node, covering text nodes as well as elements.
///
/// Text content is re-escaped so it can be spliced into rebuilt markup.
#[must_use]
pub fn node_outer_html(node: &NodeRef) -> String {
    if node.is_element() {
        Selection::from(*node).html().to_string()
    } else {
        escape_text(&node.text())
    }
}

/// Escape text for inclusion in rebuilt HTML.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// === Tree navigation ===

/// Parent element of the first node.
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// All child nodes of a node, text nodes included, in order.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children_it(false).collect()
}

/// Element children of a node, in order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children_it(false).filter(NodeRef::is_element).collect()
}

/// Whether any ancestor of `node` has the given tag name.
#[must_use]
pub fn has_ancestor_tag(node: &NodeRef, tag: &str) -> bool {
    node.ancestors(None)
        .into_iter()
        .any(|anc| node_tag_name(&anc).as_deref() == Some(tag))
}

// === Tree manipulation ===

/// Remove the node and its subtree.
#[inline]
pub fn remove_node(node: &NodeRef) {
    Selection::from(*node).remove();
}

/// Rename the first element, preserving attributes and children.
#[inline]
pub fn rename(sel: &Selection, new_tag: &str) {
    sel.rename(new_tag);
}
