//! Post-extraction cleanup.
//!
//! Applied to the assembled article fragment: share widgets, scored
//! conditional containers, duplicate headers, foreign embeds, and
//! presentational attributes go; URIs become absolute; single-child div
//! chains flatten. Every pass collects its targets before mutating.

use url::Url;

use crate::cache::Cache;
use crate::candidates::SCORE_ATTRIBUTE;
use crate::constants::{
    CONDITIONAL_EMBED_MIN_TEXT, CONDITIONAL_LINK_DENSITY_HIGH, CONDITIONAL_LINK_DENSITY_LOW,
    CONDITIONAL_LI_SURPLUS, CONDITIONAL_MIN_CONTENT_LENGTH, CONDITIONAL_WEIGHT_THRESHOLD,
    SHARE_ELEMENT_MAX_TEXT,
};
use crate::dom::{self, Document, NodeRef, Selection};
use crate::patterns::{
    DEPRECATED_SIZE_ATTRIBUTE_ELEMS, PRESENTATIONAL_ATTRIBUTES, RX_SHARE_ELEMENTS, RX_SRCSET_URL,
    RX_VIDEOS,
};
use crate::scoring;
use crate::text;
use crate::visibility;

/// Clean the assembled article in place.
pub(crate) fn clean_article(
    doc: &Document,
    title: Option<&str>,
    base: Option<&Url>,
    weight_classes: bool,
    clean_conditionally: bool,
    cache: &mut Cache,
) {
    remove_share_elements(doc, cache);
    strip_presentational_attributes(doc);
    remove_empty_paragraphs(doc);
    unwrap_single_child_divs(doc);
    if clean_conditionally {
        clean_conditional_tags(doc, weight_classes, cache);
    }
    clean_headers(doc, title, weight_classes);
    resolve_uris(doc, base);
    clean_embeds(doc);
    flatten_div_chains(doc);
    strip_score_attributes(doc);
}

/// The assembled `<div>` wrapper inside the fragment document.
fn article_root<'a>(doc: &'a Document) -> Option<NodeRef<'a>> {
    doc.select("body > div").nodes().first().copied()
}

fn is_root(node: &NodeRef, doc: &Document) -> bool {
    article_root(doc).is_some_and(|root| root.id == node.id)
}

/// Share/social widgets with little text are never article content.
fn remove_share_elements(doc: &Document, cache: &mut Cache) {
    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in doc.select("*").nodes() {
        if is_root(node, doc) {
            continue;
        }
        let sel = Selection::from(*node);
        if !RX_SHARE_ELEMENTS.is_match(&visibility::match_string(&sel)) {
            continue;
        }
        let inner = text::inner_text(&sel, true, cache);
        if text::char_count(&inner) < SHARE_ELEMENT_MAX_TEXT {
            doomed.push(*node);
        }
    }
    for node in doomed {
        dom::remove_node(&node);
    }
    cache.clear();
}

fn strip_presentational_attributes(doc: &Document) {
    for node in doc.select("*").nodes() {
        let sel = Selection::from(*node);
        for attr in PRESENTATIONAL_ATTRIBUTES {
            dom::remove_attribute(&sel, attr);
        }

        let tag = dom::node_tag_name(node).unwrap_or_default();
        let keeps_size = DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&tag.as_str());
        for attr in ["width", "height"] {
            let Some(value) = dom::get_attribute(&sel, attr) else {
                continue;
            };
            let numeric = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());
            if !(keeps_size && numeric) {
                dom::remove_attribute(&sel, attr);
            }
        }
    }
}

fn remove_empty_paragraphs(doc: &Document) {
    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in doc.select("p").nodes() {
        let sel = Selection::from(*node);
        if !text::trim(&dom::text_content(&sel)).is_empty() {
            continue;
        }
        if sel.select("img, embed, object, iframe").exists() {
            continue;
        }
        doomed.push(*node);
    }
    for node in doomed {
        dom::remove_node(&node);
    }
}

/// Replace a `<div>` whose only content is one block child with that child.
fn unwrap_single_child_divs(doc: &Document) {
    let mut replacements: Vec<(NodeRef, String)> = Vec::new();
    for node in doc.select("div").nodes() {
        if is_root(node, doc) {
            continue;
        }
        if let Some(child) = single_block_child(node) {
            replacements.push((*node, dom::node_outer_html(&child)));
        }
    }
    for (node, html) in replacements {
        Selection::from(node).replace_with_html(html.as_str());
    }
}

fn single_block_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut only_element: Option<NodeRef<'a>> = None;
    for child in node.children_it(false) {
        if child.is_text() {
            if !child.text().trim().is_empty() {
                return None;
            }
        } else if child.is_element() {
            if only_element.is_some() {
                return None;
            }
            only_element = Some(child);
        }
    }

    let child = only_element?;
    let tag = dom::node_tag_name(&child)?;
    matches!(
        tag.as_str(),
        "div" | "section" | "p" | "ul" | "ol" | "dl" | "table" | "blockquote" | "pre"
    )
    .then_some(child)
}

fn node_score(sel: &Selection) -> f64 {
    dom::get_attribute(sel, SCORE_ATTRIBUTE)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or_default()
}

/// Scored-content heuristics for forms, tables, lists, and divs.
fn clean_conditional_tags(doc: &Document, weight_classes: bool, cache: &mut Cache) {
    let mut doomed: Vec<NodeRef> = Vec::new();

    for node in doc.select("form, fieldset, table, ul, div").nodes() {
        if is_root(node, doc) {
            continue;
        }
        let sel = Selection::from(*node);

        let weight = if weight_classes {
            scoring::selection_class_weight(&sel)
        } else {
            0
        };
        let content_score = node_score(&sel);

        if f64::from(weight) + content_score < 0.0 {
            doomed.push(*node);
            continue;
        }

        if should_remove_by_counts(&sel, node, weight, cache) {
            doomed.push(*node);
        }
    }

    for node in doomed {
        dom::remove_node(&node);
    }
    cache.clear();
}

fn should_remove_by_counts(
    sel: &Selection,
    node: &NodeRef,
    weight: i32,
    cache: &mut Cache,
) -> bool {
    let tag = dom::node_tag_name(node).unwrap_or_default();

    let paragraphs = sel.select("p").length();
    let images = sel.select("img").length();
    let list_items = sel.select("li").length();
    let inputs = sel.select("input").length();

    // A video embed anywhere in the subtree vetoes removal
    let mut embeds = 0;
    for embed in sel.select("embed, object, iframe").nodes() {
        let embed_sel = Selection::from(*embed);
        let src = dom::get_attribute(&embed_sel, "src").unwrap_or_default();
        if RX_VIDEOS.is_match(&src) {
            return false;
        }
        embeds += 1;
    }

    let inner = text::inner_text(sel, true, cache);
    let content_length = text::char_count(&inner);
    let density = scoring::link_density(sel);

    if images > paragraphs && !dom::has_ancestor_tag(node, "figure") {
        return true;
    }
    if list_items > paragraphs + CONDITIONAL_LI_SURPLUS && !matches!(tag.as_str(), "ul" | "ol") {
        return true;
    }
    if inputs > paragraphs / 3 {
        return true;
    }
    if content_length < CONDITIONAL_MIN_CONTENT_LENGTH && (images == 0 || images > 2) {
        return true;
    }
    if weight < CONDITIONAL_WEIGHT_THRESHOLD && density > CONDITIONAL_LINK_DENSITY_LOW {
        return true;
    }
    if weight >= CONDITIONAL_WEIGHT_THRESHOLD && density > CONDITIONAL_LINK_DENSITY_HIGH {
        return true;
    }
    (embeds == 1 && content_length < CONDITIONAL_EMBED_MIN_TEXT) || embeds > 1
}

/// Drop `<h1>`/`<h2>` with negative class weight or duplicating the title.
fn clean_headers(doc: &Document, title: Option<&str>, weight_classes: bool) {
    let normalized_title = title.map(|t| text::trim(t).to_lowercase()).unwrap_or_default();

    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in doc.select("h1, h2").nodes() {
        let sel = Selection::from(*node);
        if weight_classes && scoring::selection_class_weight(&sel) < 0 {
            doomed.push(*node);
            continue;
        }
        if !normalized_title.is_empty() {
            let heading = text::trim(&dom::text_content(&sel)).to_lowercase();
            if heading == normalized_title {
                doomed.push(*node);
            }
        }
    }
    for node in doomed {
        dom::remove_node(&node);
    }
}

/// Keep only embeds pointing at known video hosts.
fn clean_embeds(doc: &Document) {
    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in doc.select("iframe, embed, object").nodes() {
        let sel = Selection::from(*node);
        let src = dom::get_attribute(&sel, "src")
            .or_else(|| dom::get_attribute(&sel, "data"))
            .unwrap_or_default();
        if !RX_VIDEOS.is_match(&src) {
            doomed.push(*node);
        }
    }
    for node in doomed {
        dom::remove_node(&node);
    }
}

/// Rewrite `src`, `href`, `poster`, and `srcset` through the URI resolver.
fn resolve_uris(doc: &Document, base: Option<&Url>) {
    let Some(base) = base else {
        return;
    };

    for attr in ["src", "href", "poster"] {
        for node in doc.select(&format!("[{attr}]")).nodes() {
            let sel = Selection::from(*node);
            if let Some(value) = dom::get_attribute(&sel, attr) {
                let resolved = crate::url_utils::to_absolute_uri(value.trim(), Some(base));
                dom::set_attribute(&sel, attr, &resolved);
            }
        }
    }

    for node in doc.select("[srcset]").nodes() {
        let sel = Selection::from(*node);
        if let Some(srcset) = dom::get_attribute(&sel, "srcset") {
            let rewritten = RX_SRCSET_URL.replace_all(&srcset, |caps: &regex::Captures| {
                let url = caps.get(1).map_or("", |m| m.as_str());
                let descriptor = caps.get(2).map_or("", |m| m.as_str());
                let terminator = caps.get(3).map_or("", |m| m.as_str());
                format!(
                    "{}{descriptor}{terminator}",
                    crate::url_utils::to_absolute_uri(url, Some(base))
                )
            });
            dom::set_attribute(&sel, "srcset", &rewritten);
        }
    }
}

/// Collapse nested single-child `<div>` wrappers left over from assembly.
fn flatten_div_chains(doc: &Document) {
    // Unwrapping can expose a new single-child chain, so iterate briefly
    for _ in 0..3 {
        let before = doc.select("div").length();
        unwrap_single_child_divs(doc);
        if doc.select("div").length() == before {
            break;
        }
    }
}

fn strip_score_attributes(doc: &Document) {
    for node in doc.select(&format!("[{SCORE_ATTRIBUTE}]")).nodes() {
        Selection::from(*node).remove_attr(SCORE_ATTRIBUTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str, title: Option<&str>, base: Option<&str>) -> Document {
        let doc = dom::parse(html);
        let base = base.and_then(crate::url_utils::parse_base);
        let mut cache = Cache::new();
        clean_article(&doc, title, base.as_ref(), true, true, &mut cache);
        doc
    }

    #[test]
    fn strips_presentational_attributes() {
        let doc = clean(
            r##"<div><p align="center" style="color:red" bgcolor="#fff">text</p>
               <table width="400" height="20"><tr><td>cell content that is long enough to stay</td></tr></table>
               <img width="100" height="50" src="x.jpg"></div>"##,
            None,
            None,
        );

        let p = doc.select("p");
        assert!(!p.has_attr("align"));
        assert!(!p.has_attr("style"));
        assert!(!p.has_attr("bgcolor"));
        // tables keep numeric sizes, images do not
        assert!(doc.select("table").has_attr("width"));
        assert!(!doc.select("img").has_attr("width"));
    }

    #[test]
    fn removes_empty_paragraphs_but_keeps_image_ones() {
        let doc = clean(
            r#"<div><p>   </p><p id="img-p"><img src="x.jpg"></p><p>real text</p></div>"#,
            None,
            None,
        );
        assert_eq!(doc.select("p").length(), 2);
        assert!(doc.select("#img-p").exists());
    }

    #[test]
    fn unwraps_div_with_single_block_child() {
        let doc = clean(
            "<div><div id=\"wrapper\"><p>only child paragraph with some text in it</p></div></div>",
            None,
            None,
        );
        assert!(!doc.select("#wrapper").exists());
        assert!(doc.select("body > div > p").exists());
    }

    #[test]
    fn conditional_cleaning_removes_negative_weight() {
        let doc = clean(
            r#"<div><div class="sidebar widget"><p>short promo</p><p>more promo</p></div>
               <p>body text that stays</p></div>"#,
            None,
            None,
        );
        assert!(!doc.select(".sidebar").exists());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn conditional_cleaning_removes_link_farms() {
        let doc = clean(
            r##"<div>
              <div id="farm">
                <a href="/1">one link</a> <a href="/2">two link</a>
                <a href="/3">three link</a> <a href="/4">four link</a>
              </div>
              <p>article text long enough to stay around after cleaning, with commas.</p>
            </div>"##,
            None,
            None,
        );
        assert!(!doc.select("#farm").exists());
    }

    #[test]
    fn conditional_cleaning_keeps_real_lists() {
        let doc = clean(
            r#"<div><ul id="steps">
                <li>First step of the recipe, with plenty of descriptive text to read.</li>
                <li>Second step of the recipe, also carrying a fair amount of text.</li>
            </ul></div>"#,
            None,
            None,
        );
        assert!(doc.select("#steps").exists());
    }

    #[test]
    fn headers_duplicating_title_are_removed() {
        let doc = clean(
            "<div><h1>The   Article Title</h1><h2>A subhead that stays</h2><p>text</p></div>",
            Some("The Article Title"),
            None,
        );
        assert!(doc.select("h1").is_empty());
        assert!(doc.select("h2").exists());
    }

    #[test]
    fn video_embeds_survive_other_iframes_do_not() {
        let doc = clean(
            r#"<div>
                <iframe id="yt" src="https://www.youtube.com/embed/abc"></iframe>
                <iframe id="ad" src="https://ads.example.com/frame"></iframe>
                <p>text</p>
            </div>"#,
            None,
            None,
        );
        assert!(doc.select("#yt").exists());
        assert!(!doc.select("#ad").exists());
    }

    #[test]
    fn uris_become_absolute() {
        let doc = clean(
            r#"<div><img src="/img/a.png" srcset="/img/a.png 1x, /img/b.png 2x">
               <a href="rel/page">link</a><p>text</p></div>"#,
            None,
            Some("https://example.com/posts/1"),
        );

        assert_eq!(
            doc.select("img").attr("src").map(|s| s.to_string()),
            Some("https://example.com/img/a.png".to_string())
        );
        let srcset = doc.select("img").attr("srcset").map(|s| s.to_string()).unwrap_or_default();
        assert!(srcset.contains("https://example.com/img/a.png 1x"));
        assert!(srcset.contains("https://example.com/img/b.png 2x"));
        assert_eq!(
            doc.select("a").attr("href").map(|s| s.to_string()),
            Some("https://example.com/posts/rel/page".to_string())
        );
    }

    #[test]
    fn share_widgets_are_removed() {
        let doc = clean(
            r##"<div><div class="share-buttons"><a href="#">Tweet</a></div><p>text stays</p></div>"##,
            None,
            None,
        );
        assert!(!doc.select(".share-buttons").exists());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn score_attributes_are_stripped() {
        let doc = clean(
            &format!(r#"<div {SCORE_ATTRIBUTE}="12.5"><p {SCORE_ATTRIBUTE}="3.0">text</p></div>"#),
            None,
            None,
        );
        assert!(doc.select(&format!("[{SCORE_ATTRIBUTE}]")).is_empty());
    }
}
