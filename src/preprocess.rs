//! Document preparation pass.
//!
//! Runs once per parse, before scoring, and mutates the DOM in place:
//! script/style removal, lazy-image promotion, noscript image salvage,
//! `<br>`-run coalescing into paragraphs, `<font>` replacement, and
//! removal of subtrees with non-content ARIA roles. Passes collect their
//! targets first and mutate afterwards, so sibling iteration never sees a
//! half-removed tree.

use crate::dom::{self, Document, NodeRef, Selection};
use crate::patterns::{
    LAZY_IMAGE_ATTRIBUTES, LAZY_SRCSET_ATTRIBUTES, PHRASING_ELEMS, RX_B64_DATA_URL,
    RX_HTML_COMMENT, RX_LAZY_IMAGE_SRC, RX_LAZY_IMAGE_SRCSET,
};
use crate::text;
use crate::visibility;

/// Strip HTML comments from raw markup.
///
/// The DOM layer does not expose comment nodes, so this happens on the
/// string before parsing.
pub(crate) fn strip_comments(html: &str) -> String {
    RX_HTML_COMMENT.replace_all(html, "").into_owned()
}

/// Run the full preparation pass over a parsed document.
pub(crate) fn prepare(doc: &Document) {
    salvage_noscript_images(doc);
    remove_script_like(doc);
    fix_lazy_images(doc);
    coalesce_br_runs(doc);
    replace_font_with_span(doc);
    remove_unlikely_roles(doc);
}

/// Replace a hidden placeholder `<img>` with the real one from an adjacent
/// `<noscript>` wrapper, a pattern common to lazy-loading frameworks.
fn salvage_noscript_images(doc: &Document) {
    let mut replacements: Vec<(NodeRef, String)> = Vec::new();

    for noscript in doc.select("noscript").nodes() {
        let sel = Selection::from(*noscript);

        // noscript content is usually unparsed text; re-parse to inspect it.
        // Fall back to parsed children for tree builders that expand it.
        let inner = Document::from(sel.text().to_string());
        let img_html = {
            let reparsed = inner.select("img");
            if reparsed.length() == 1 && text::trim(&inner.select("body").text()).is_empty() {
                Some(reparsed.html().to_string())
            } else {
                let parsed = sel.select("img");
                if parsed.length() == 1 && text::trim(&sel.text()).is_empty() {
                    Some(parsed.html().to_string())
                } else {
                    None
                }
            }
        };
        let Some(img_html) = img_html else {
            continue;
        };

        let Some(prev) = noscript.prev_element_sibling() else {
            continue;
        };
        if !is_single_image(&prev) {
            continue;
        }

        replacements.push((prev, img_html));
    }

    for (prev, img_html) in replacements {
        Selection::from(prev).replace_with_html(img_html.as_str());
    }
}

/// Whether a node is an `<img>`, or a wrapper whose only content is one.
fn is_single_image(node: &NodeRef) -> bool {
    if dom::node_tag_name(node).as_deref() == Some("img") {
        return true;
    }
    let children = dom::element_children(node);
    if children.len() != 1 {
        return false;
    }
    if !text::trim(&node.text()).is_empty() {
        return false;
    }
    is_single_image(&children[0])
}

fn remove_script_like(doc: &Document) {
    doc.select("script, noscript, style").remove();
}

/// Promote lazy-loading attributes to real `src`/`srcset` values.
fn fix_lazy_images(doc: &Document) {
    for img in doc.select("img").nodes() {
        let sel = Selection::from(*img);

        // Drop tiny base64 placeholders so the real URL can take over
        if let Some(src) = dom::get_attribute(&sel, "src") {
            if let Some(caps) = RX_B64_DATA_URL.captures(&src) {
                let is_svg = caps
                    .get(1)
                    .is_some_and(|m| m.as_str().eq_ignore_ascii_case("image/svg+xml"));
                let payload_len = src.len() - caps.get(0).map_or(0, |m| m.end());
                if !is_svg && payload_len < 133 && has_lazy_source(&sel) {
                    dom::remove_attribute(&sel, "src");
                }
            }
        }

        if !dom::has_attribute(&sel, "src") {
            let promoted = LAZY_IMAGE_ATTRIBUTES
                .iter()
                .find_map(|name| dom::get_attribute(&sel, name))
                .or_else(|| scan_data_attributes(&sel, &RX_LAZY_IMAGE_SRC));
            if let Some(value) = promoted {
                dom::set_attribute(&sel, "src", value.trim());
            }
        }

        if !dom::has_attribute(&sel, "srcset") {
            let promoted = LAZY_SRCSET_ATTRIBUTES
                .iter()
                .find_map(|name| dom::get_attribute(&sel, name))
                .or_else(|| scan_data_attributes(&sel, &RX_LAZY_IMAGE_SRCSET));
            if let Some(value) = promoted {
                dom::set_attribute(&sel, "srcset", value.trim());
            }
        }
    }
}

fn has_lazy_source(sel: &Selection) -> bool {
    dom::get_all_attributes(sel).iter().any(|(name, value)| {
        name.starts_with("data-")
            && (RX_LAZY_IMAGE_SRC.is_match(value) || RX_LAZY_IMAGE_SRCSET.is_match(value))
    })
}

fn scan_data_attributes(sel: &Selection, pattern: &regex::Regex) -> Option<String> {
    dom::get_all_attributes(sel)
        .into_iter()
        .find(|(name, value)| name.starts_with("data-") && pattern.is_match(value))
        .map(|(_, value)| value)
}

/// Replace runs of two or more `<br>` with paragraph breaks.
///
/// Each break opens a `<p>` that absorbs the following phrasing content up
/// to the next block-level element, so `a<br><br>b` becomes two paragraphs.
fn coalesce_br_runs(doc: &Document) {
    let mut parents: Vec<NodeRef> = Vec::new();

    for br in doc.select("br").nodes() {
        if let Some(parent) = br.parent() {
            if parent.is_element() && !parents.iter().any(|p| p.id == parent.id) {
                parents.push(parent);
            }
        }
    }

    for parent in parents {
        if has_double_br(&parent) {
            rebuild_with_paragraphs(&parent);
        }
    }
}

fn is_br(node: &NodeRef) -> bool {
    dom::node_tag_name(node).as_deref() == Some("br")
}

fn is_whitespace_text(node: &NodeRef) -> bool {
    node.is_text() && node.text().trim().is_empty()
}

fn has_double_br(parent: &NodeRef) -> bool {
    let mut after_br = false;
    for child in dom::child_nodes(parent) {
        if is_br(&child) {
            if after_br {
                return true;
            }
            after_br = true;
        } else if !is_whitespace_text(&child) {
            after_br = false;
        }
    }
    false
}

fn rebuild_with_paragraphs(parent: &NodeRef) {
    let children = dom::child_nodes(parent);
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut has_content = false;

    let flush = |out: &mut String, paragraph: &mut String, has_content: &mut bool| {
        if *has_content {
            out.push_str("<p>");
            out.push_str(paragraph.trim());
            out.push_str("</p>");
        } else {
            out.push_str(paragraph);
        }
        paragraph.clear();
        *has_content = false;
    };

    let mut i = 0;
    while i < children.len() {
        let node = children[i];

        if is_br(&node) {
            // Measure the run, stepping over whitespace between breaks
            let mut j = i + 1;
            let mut count = 1;
            while j < children.len() {
                if is_br(&children[j]) {
                    count += 1;
                    j += 1;
                } else if is_whitespace_text(&children[j]) {
                    j += 1;
                } else {
                    break;
                }
            }
            if count >= 2 {
                flush(&mut out, &mut paragraph, &mut has_content);
                i = j;
            } else {
                paragraph.push_str("<br>");
                i += 1;
            }
            continue;
        }

        let tag = dom::node_tag_name(&node);
        let is_block = tag
            .as_deref()
            .is_some_and(|t| !PHRASING_ELEMS.contains(&t));

        if is_block {
            flush(&mut out, &mut paragraph, &mut has_content);
            out.push_str(&dom::node_outer_html(&node));
        } else {
            let html = dom::node_outer_html(&node);
            if !html.trim().is_empty() {
                has_content = true;
            }
            paragraph.push_str(&html);
        }
        i += 1;
    }
    flush(&mut out, &mut paragraph, &mut has_content);

    Selection::from(*parent).set_html(out.as_str());
}

fn replace_font_with_span(doc: &Document) {
    for font in doc.select("font").iter() {
        font.rename("span");
    }
}

/// Remove subtrees whose ARIA role marks them as non-content.
fn remove_unlikely_roles(doc: &Document) {
    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in doc.select("[role]").nodes() {
        let sel = Selection::from(*node);
        if !visibility::has_unlikely_role(&sel) {
            continue;
        }
        if matches!(dom::tag_name(&sel).as_deref(), Some("body" | "a" | "html")) {
            continue;
        }
        doomed.push(*node);
    }
    for node in doomed {
        dom::remove_node(&node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_before_parsing() {
        let html = "<div><!-- hidden -->visible</div>";
        assert_eq!(strip_comments(html), "<div>visible</div>");
    }

    #[test]
    fn removes_scripts_and_styles() {
        let doc = dom::parse(
            "<html><body><script>x()</script><style>p{}</style><p>keep</p></body></html>",
        );
        prepare(&doc);
        assert!(doc.select("script").is_empty());
        assert!(doc.select("style").is_empty());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn promotes_data_src_to_src() {
        let doc = dom::parse(r#"<body><img data-src="https://example.com/a.jpg"></body>"#);
        prepare(&doc);
        assert_eq!(
            doc.select("img").attr("src").map(|s| s.to_string()),
            Some("https://example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn promotes_unknown_data_attribute_matching_image_url() {
        let doc = dom::parse(r#"<body><img data-hi-res="https://example.com/hi.png"></body>"#);
        prepare(&doc);
        assert_eq!(
            doc.select("img").attr("src").map(|s| s.to_string()),
            Some("https://example.com/hi.png".to_string())
        );
    }

    #[test]
    fn promotes_data_srcset() {
        let doc =
            dom::parse(r#"<body><img src="a.jpg" data-srcset="b.jpg 1x, c.jpg 2x"></body>"#);
        prepare(&doc);
        assert_eq!(
            doc.select("img").attr("srcset").map(|s| s.to_string()),
            Some("b.jpg 1x, c.jpg 2x".to_string())
        );
    }

    #[test]
    fn coalesces_double_br_into_paragraphs() {
        let doc = dom::parse("<html><body><div>Line1<br><br>Line2<br><br>Line3</div></body></html>");
        prepare(&doc);

        assert_eq!(doc.select("div p").length(), 3);
        assert!(doc.select("div br").is_empty());
        let text = doc.select("div").text().to_string();
        assert!(text.contains("Line1") && text.contains("Line2") && text.contains("Line3"));
    }

    #[test]
    fn single_br_is_preserved() {
        let doc = dom::parse("<html><body><div>Line1<br>Line2</div></body></html>");
        prepare(&doc);

        assert_eq!(doc.select("div br").length(), 1);
        assert!(doc.select("div p").is_empty());
    }

    #[test]
    fn paragraph_absorbs_until_block_element() {
        let doc = dom::parse(
            "<html><body><div>a<br><br>b <em>c</em><ul><li>d</li></ul></div></body></html>",
        );
        prepare(&doc);

        assert_eq!(doc.select("div > p").length(), 2);
        assert!(doc.select("div > p em").exists());
        assert!(doc.select("div > ul").exists());
    }

    #[test]
    fn font_becomes_span() {
        let doc = dom::parse(r#"<html><body><font color="red">text</font></body></html>"#);
        prepare(&doc);
        assert!(doc.select("font").is_empty());
        assert_eq!(doc.select("span").text().to_string(), "text");
    }

    #[test]
    fn unlikely_roles_are_removed() {
        let doc = dom::parse(
            r#"<html><body>
                <div role="navigation">nav</div>
                <div role="main"><p>content</p></div>
            </body></html>"#,
        );
        prepare(&doc);
        assert!(doc.select("[role='navigation']").is_empty());
        assert!(doc.select("[role='main']").exists());
    }

    #[test]
    fn noscript_image_replaces_placeholder_sibling() {
        let doc = dom::parse(
            r#"<html><body><div>
                <img src="data:image/gif;base64,R0lGOD" class="lazy">
                <noscript>&lt;img src="https://example.com/real.jpg"&gt;</noscript>
            </div></body></html>"#,
        );
        prepare(&doc);

        let img_src = doc.select("div img").attr("src").map(|s| s.to_string());
        assert_eq!(img_src, Some("https://example.com/real.jpg".to_string()));
        assert!(doc.select("noscript").is_empty());
    }
}
