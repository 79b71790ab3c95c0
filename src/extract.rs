//! Extraction orchestration.
//!
//! Wires the pipeline: metadata harvest, document preparation, candidate
//! preparation and scoring, assembly, cleanup, and the retry controller
//! that relaxes heuristics one flag at a time when the result is too
//! short. Each attempt runs on its own re-parse of the prepared snapshot,
//! so the tree is restored between attempts and failure modes stay
//! deterministic.

use std::panic::{catch_unwind, AssertUnwindSafe};

use url::Url;

use crate::cache::Cache;
use crate::candidates;
use crate::constants::{EXCERPT_LENGTH, SIBLING_LINK_DENSITY_MAX};
use crate::dom::{self, Document, NodeRef, Selection};
use crate::error::{Error, Result};
use crate::metadata::{self, Metadata};
use crate::options::Options;
use crate::patterns::DIV_TO_P_ELEMS;
use crate::preprocess;
use crate::result::Article;
use crate::scoring;
use crate::text;
use crate::url_utils;
use crate::visibility;

/// Engine-wide relaxation flags, toggled off one at a time by the retry
/// controller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flags {
    pub strip_unlikelys: bool,
    pub weight_classes: bool,
    pub clean_conditionally: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self { strip_unlikelys: true, weight_classes: true, clean_conditionally: true }
    }
}

/// One completed extraction attempt.
struct Attempt {
    html: String,
    text: String,
    length: usize,
    byline: Option<String>,
    body_fallback: bool,
}

/// Full parse: decode nothing (input is already a string), harvest
/// metadata, prepare, extract with retries, and build the final record.
pub(crate) fn parse_document(html: &str, options: &Options) -> Result<Article> {
    if text::trim(html).is_empty() {
        return Err(Error::Parse("input document is empty".to_string()));
    }

    if cfg!(debug_assertions) {
        eprintln!("DEBUG: starting parse (HTML length: {} chars)", html.len());
    }

    let stripped = preprocess::strip_comments(html);
    let doc = dom::parse(&stripped);
    let base = options.url.as_deref().and_then(url_utils::parse_base);

    let meta = metadata::extract_metadata(&doc, base.as_ref(), options.strict_metadata)?;

    preprocess::prepare(&doc);
    let snapshot = doc.html().to_string();
    drop(doc);

    let attempt = run_with_retries(&snapshot, options, &meta, base.as_ref())?;

    let excerpt = meta
        .excerpt
        .clone()
        .or_else(|| first_paragraph_excerpt(&attempt.html));
    let byline = meta.byline.clone().or(attempt.byline);

    Ok(Article {
        url: options.url.clone(),
        title: meta.title,
        byline,
        length: attempt.length,
        content: Some(attempt.html),
        text_content: Some(attempt.text),
        excerpt,
        site_name: meta.site_name,
        image: meta.image,
        favicon: meta.favicon,
        language: meta.language,
        published_time: meta.published_time,
        modified_time: meta.modified_time,
    })
}

/// Retry controller: relax `strip_unlikelys`, then `weight_classes`, then
/// `clean_conditionally`; finally accept the longest attempt.
fn run_with_retries(
    snapshot: &str,
    options: &Options,
    meta: &Metadata,
    base: Option<&Url>,
) -> Result<Attempt> {
    let mut flags = Flags::default();
    let mut best: Option<Attempt> = None;
    let mut panic_message: Option<String> = None;

    loop {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            run_attempt(snapshot, flags, meta, base)
        }));

        match outcome {
            Ok(Some(attempt)) => {
                if cfg!(debug_assertions) {
                    eprintln!(
                        "DEBUG: attempt produced {} chars (flags: {flags:?})",
                        attempt.length
                    );
                }
                // A body-promoted result is only accepted once no
                // relaxation is left to try
                if attempt.length >= options.min_content_length && !attempt.body_fallback {
                    return Ok(attempt);
                }
                let longer = best.as_ref().is_none_or(|b| attempt.length > b.length);
                if longer {
                    best = Some(attempt);
                }
            }
            Ok(None) => {}
            Err(payload) => {
                panic_message = Some(describe_panic(payload.as_ref()));
            }
        }

        if flags.strip_unlikelys {
            flags.strip_unlikelys = false;
        } else if flags.weight_classes {
            flags.weight_classes = false;
        } else if flags.clean_conditionally {
            flags.clean_conditionally = false;
        } else {
            break;
        }
    }

    match best {
        Some(attempt) if attempt.length > 0 => Ok(attempt),
        _ => {
            let detail = panic_message
                .unwrap_or_else(|| "document has no scorable content".to_string());
            Err(Error::Extraction(detail))
        }
    }
}

fn describe_panic(payload: &(dyn std::any::Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("heuristic failure: {message}")
}

/// One scoring/assembly/cleanup pass over a fresh copy of the snapshot.
fn run_attempt(
    snapshot: &str,
    flags: Flags,
    meta: &Metadata,
    base: Option<&Url>,
) -> Option<Attempt> {
    let doc = dom::parse(snapshot);
    let mut cache = Cache::new();

    let byline = prepare_candidates(&doc, flags, meta.byline.is_some(), &mut cache);
    // preparation mutated the tree; cached text/visibility is stale
    cache.clear();

    let mut scores = scoring::score_candidates(&doc, flags.weight_classes, &mut cache);
    let top = candidates::select_top_candidate(&doc, &mut scores)?;
    let body_fallback = top.body_fallback;
    let article_html = candidates::assemble_article(&doc, &top, &scores, &mut cache);
    drop(scores);
    drop(cache);

    let article_doc = dom::parse(&article_html);
    let mut clean_cache = Cache::new();
    crate::clean::clean_article(
        &article_doc,
        meta.title.as_deref(),
        base,
        flags.weight_classes,
        flags.clean_conditionally,
        &mut clean_cache,
    );

    let root = article_doc.select("body > div");
    if !root.exists() {
        return None;
    }
    let text_content = text::inner_text(&root, true, &mut clean_cache);
    let length = text::char_count(&text_content);
    let html = root.html().to_string();

    Some(Attempt { html, text: text_content, length, byline, body_fallback })
}

/// Pre-scoring walk over the body: drop invisible nodes, capture and drop
/// the byline, strip unlikely candidates (flag-dependent), and promote
/// paragraph-shaped divs to `<p>`.
fn prepare_candidates(
    doc: &Document,
    flags: Flags,
    have_byline: bool,
    cache: &mut Cache,
) -> Option<String> {
    let mut byline: Option<String> = None;

    let body_node = doc.select("body").nodes().first().copied()?;

    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in body_node.descendants() {
        if !node.is_element() {
            continue;
        }
        let sel = Selection::from(node);

        if !visibility::is_visible(&sel, cache) {
            doomed.push(node);
            continue;
        }

        if byline.is_none() && !have_byline && metadata::is_byline_node(&sel) {
            let candidate = text::inner_text(&sel, true, cache);
            if metadata::is_valid_byline(&candidate) {
                byline = Some(text::trim(&candidate));
                doomed.push(node);
                continue;
            }
        }

        if flags.strip_unlikelys && visibility::is_unlikely_candidate(&sel) {
            doomed.push(node);
        }
    }
    for node in doomed {
        dom::remove_node(&node);
    }

    promote_paragraph_divs(doc);

    byline
}

/// Divs wrapping a single `<p>` collapse onto it; divs with no block-level
/// descendants are paragraphs in disguise and are renamed.
fn promote_paragraph_divs(doc: &Document) {
    let block_selector = DIV_TO_P_ELEMS.join(", ");

    let mut renames: Vec<NodeRef> = Vec::new();
    let mut replacements: Vec<(NodeRef, String)> = Vec::new();

    for node in doc.select("div").nodes() {
        let sel = Selection::from(*node);

        if let Some(paragraph) = single_paragraph_child(node) {
            if scoring::link_density(&sel) < SIBLING_LINK_DENSITY_MAX {
                replacements.push((*node, dom::node_outer_html(&paragraph)));
                continue;
            }
        }

        if !sel.select(&block_selector).exists() {
            renames.push(*node);
        }
    }

    for (node, html) in replacements {
        Selection::from(node).replace_with_html(html.as_str());
    }
    for node in renames {
        Selection::from(node).rename("p");
    }
}

fn single_paragraph_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut only: Option<NodeRef<'a>> = None;
    for child in node.children_it(false) {
        if child.is_text() {
            if !child.text().trim().is_empty() {
                return None;
            }
        } else if child.is_element() {
            if only.is_some() {
                return None;
            }
            only = Some(child);
        }
    }
    only.filter(|child| dom::node_tag_name(child).as_deref() == Some("p"))
}

/// Excerpt fallback: the first real paragraph, cut to ~200 chars on a
/// word boundary.
fn first_paragraph_excerpt(article_html: &str) -> Option<String> {
    let doc = dom::parse(article_html);
    for node in doc.select("p").nodes() {
        let sel = Selection::from(*node);
        let paragraph = text::trim(&dom::text_content(&sel));
        if paragraph.is_empty() {
            continue;
        }
        if text::char_count(&paragraph) <= EXCERPT_LENGTH {
            return Some(paragraph);
        }
        let cut: String = paragraph.chars().take(EXCERPT_LENGTH).collect();
        let trimmed = match cut.rfind(' ') {
            Some(pos) => cut[..pos].to_string(),
            None => cut,
        };
        return Some(trimmed);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_P: &str = "A long paragraph of about one hundred and fifty characters, with commas, \
         dots, and enough substance to score well in the candidate scorer today.";

    fn parse(html: &str) -> Result<Article> {
        parse_document(html, &Options::default())
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = parse("");
        assert!(matches!(err, Err(Error::Parse(_))));
        let err = parse("   \n  ");
        assert!(matches!(err, Err(Error::Parse(_))));
    }

    #[test]
    fn bodyless_document_is_an_extraction_error() {
        let err = parse("<html><head><title>T</title></head><body></body></html>");
        assert!(matches!(err, Err(Error::Extraction(_))));
    }

    #[test]
    fn extracts_simple_article() {
        let html = format!(
            r#"<html><body>
                <div id="main"><h1>T</h1><p>{LONG_P}</p><p>{LONG_P}</p>
                <p>{LONG_P}</p><p>{LONG_P}</p></div>
                <div class="sidebar"><p>short</p></div>
            </body></html>"#
        );
        let article = parse(&html).unwrap_or_default();

        let content = article.content.unwrap_or_default();
        assert!(content.contains("one hundred and fifty"));
        assert!(!content.contains("sidebar"));
        assert!(article.length > 200);
    }

    #[test]
    fn length_matches_text_content() {
        let html = format!(
            r#"<html><body><div id="main"><p>{LONG_P}</p><p>{LONG_P}</p>
               <p>{LONG_P}</p><p>{LONG_P}</p></div></body></html>"#
        );
        let article = parse(&html).unwrap_or_default();
        let text_content = article.text_content.unwrap_or_default();
        assert_eq!(article.length, text::char_count(&text_content));
    }

    #[test]
    fn byline_is_captured_and_removed_from_content() {
        let html = format!(
            r#"<html><body><div id="main">
                <p class="byline">By Jane Doe</p>
                <p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p>
            </div></body></html>"#
        );
        let article = parse(&html).unwrap_or_default();
        assert_eq!(article.byline.as_deref(), Some("By Jane Doe"));
        let content = article.content.unwrap_or_default();
        assert!(!content.contains("Jane Doe"));
    }

    #[test]
    fn hidden_content_is_dropped() {
        let html = format!(
            r#"<html><body><div id="main">
                <p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p>
                <p style="display: none">HIDDEN_MARKER</p>
            </div></body></html>"#
        );
        let article = parse(&html).unwrap_or_default();
        assert!(!article.content.unwrap_or_default().contains("HIDDEN_MARKER"));
    }

    #[test]
    fn retry_recovers_content_wrapped_in_unlikely_classes() {
        let paragraphs: String =
            (0..6).map(|_| format!("<p>{LONG_P}</p>")).collect();
        let html = format!(
            r#"<html><body><div class="sidebar">{paragraphs}</div></body></html>"#
        );
        let article = parse(&html).unwrap_or_default();
        assert!(article.length >= 500, "length {}", article.length);
    }

    #[test]
    fn excerpt_falls_back_to_first_paragraph() {
        let html = format!(
            r#"<html><body><div id="main"><p>{LONG_P}</p><p>{LONG_P}</p>
               <p>{LONG_P}</p><p>{LONG_P}</p></div></body></html>"#
        );
        let article = parse(&html).unwrap_or_default();
        let excerpt = article.excerpt.unwrap_or_default();
        assert!(excerpt.starts_with("A long paragraph"));
        assert!(text::char_count(&excerpt) <= EXCERPT_LENGTH);
    }

    #[test]
    fn parse_is_idempotent_on_its_own_output() {
        let html = format!(
            r#"<html><body><div id="main"><p>{LONG_P}</p><p>{LONG_P}</p>
               <p>{LONG_P}</p><p>{LONG_P}</p></div></body></html>"#
        );
        let first = parse(&html).unwrap_or_default();
        let second = parse(&html).unwrap_or_default();
        assert_eq!(first.content, second.content);

        let reparsed = parse(&first.content.clone().unwrap_or_default()).unwrap_or_default();
        let original_text = first.text_content.unwrap_or_default();
        let reparsed_text = reparsed.text_content.unwrap_or_default();
        assert_eq!(text::trim(&reparsed_text), text::trim(&original_text));
    }

    #[test]
    fn relative_image_uris_become_absolute() {
        let html = format!(
            r#"<html><body><div id="main">
                <p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p><p>{LONG_P}</p>
                <img src="/img/a.png">
            </div></body></html>"#
        );
        let options = Options {
            url: Some("https://example.com/posts/1".to_string()),
            ..Options::default()
        };
        let article = parse_document(&html, &options).unwrap_or_default();
        assert!(article
            .content
            .unwrap_or_default()
            .contains(r#"src="https://example.com/img/a.png""#));
        assert_eq!(article.url.as_deref(), Some("https://example.com/posts/1"));
    }
}
