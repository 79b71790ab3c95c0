//! Top-candidate selection and article assembly.
//!
//! After scoring, every scored node's score is discounted by its link
//! density, the best node is chosen (with parent promotion when the
//! surrounding container is equally strong), and the article is assembled
//! by serializing the candidate plus qualifying siblings into a fresh
//! `<div>`. Scores ride along as an internal attribute so the cleaner can
//! read them after the re-parse.

use crate::cache::Cache;
use crate::constants::{
    PARENT_PROMOTION_CHILD_RATIO, PARENT_PROMOTION_MIN_CHILDREN, PARENT_PROMOTION_RATIO,
    SIBLING_LINK_DENSITY_MAX, SIBLING_PARAGRAPH_MIN_LENGTH, SIBLING_SCORE_FLOOR,
    SIBLING_SCORE_RATIO,
};
use crate::dom::{self, Document, NodeRef, Selection};
use crate::patterns::{ALTER_TO_DIV_EXCEPTIONS, RX_SENTENCE_PERIOD};
use crate::scoring::{self, ScoreMap};
use crate::text;

/// Internal attribute carrying a node's score into the assembled fragment.
pub(crate) const SCORE_ATTRIBUTE: &str = "data-readably-score";

/// The chosen extraction root.
pub(crate) struct TopCandidate<'a> {
    pub node: NodeRef<'a>,
    pub score: f64,
    /// True when no candidate scored and the body was promoted; the retry
    /// controller treats such attempts as weak.
    pub body_fallback: bool,
}

/// Apply the link-density discount to every scored node and pick the best.
///
/// Falls back to `<body>` (flagged) when nothing scored at all.
pub(crate) fn select_top_candidate<'a>(
    doc: &'a Document,
    scores: &mut ScoreMap,
) -> Option<TopCandidate<'a>> {
    let mut best: Option<(NodeRef<'a>, f64)> = None;

    for node in doc.select("*").nodes() {
        let Some(score) = scores.get(&node.id).copied() else {
            continue;
        };

        let sel = Selection::from(*node);
        let adjusted = score * (1.0 - scoring::link_density(&sel));
        scores.insert(node.id, adjusted);

        if matches!(dom::node_tag_name(node).as_deref(), Some("body" | "html")) {
            continue;
        }

        match best {
            Some((_, best_score)) if best_score >= adjusted => {}
            _ => best = Some((*node, adjusted)),
        }
    }

    if let Some((node, score)) = best {
        let (node, score) = promote_to_parent(node, score, scores);
        return Some(TopCandidate { node, score, body_fallback: false });
    }

    doc.select("body").nodes().first().map(|body| TopCandidate {
        node: *body,
        score: 0.0,
        body_fallback: true,
    })
}

/// Walk up while the parent is nearly as strong as the candidate and has
/// enough strong children of its own.
fn promote_to_parent<'a>(
    mut node: NodeRef<'a>,
    mut score: f64,
    scores: &ScoreMap,
) -> (NodeRef<'a>, f64) {
    loop {
        let Some(parent) = node.parent() else {
            break;
        };
        if !parent.is_element()
            || matches!(dom::node_tag_name(&parent).as_deref(), Some("body" | "html") | None)
        {
            break;
        }
        let Some(parent_score) = scores.get(&parent.id).copied() else {
            break;
        };
        if parent_score < score * PARENT_PROMOTION_RATIO {
            break;
        }

        let strong_children = dom::element_children(&parent)
            .iter()
            .filter(|child| {
                scores.get(&child.id).copied().unwrap_or_default()
                    >= score * PARENT_PROMOTION_CHILD_RATIO
            })
            .count();
        if strong_children < PARENT_PROMOTION_MIN_CHILDREN {
            break;
        }

        node = parent;
        score = parent_score;
    }

    (node, score)
}

/// Serialize the top candidate plus qualifying siblings into a new `<div>`.
pub(crate) fn assemble_article(
    doc: &Document,
    top: &TopCandidate,
    scores: &ScoreMap,
    cache: &mut Cache,
) -> String {
    stamp_scores(doc, scores);

    if top.body_fallback {
        let body = Selection::from(top.node);
        return format!("<div>{}</div>", body.inner_html());
    }

    let threshold = (top.score * SIBLING_SCORE_RATIO).max(SIBLING_SCORE_FLOOR);
    let top_class = dom::get_attribute(&Selection::from(top.node), "class").unwrap_or_default();

    let siblings: Vec<NodeRef> = match top.node.parent() {
        Some(parent) if parent.is_element() => dom::element_children(&parent),
        _ => vec![top.node],
    };

    let mut out = String::from("<div>");
    for sibling in siblings {
        let is_top = sibling.id == top.node.id;
        if !is_top && !sibling_qualifies(&sibling, top, &top_class, threshold, scores, cache) {
            continue;
        }

        let sel = Selection::from(sibling);
        if !is_top {
            let tag = dom::node_tag_name(&sibling).unwrap_or_default();
            if !ALTER_TO_DIV_EXCEPTIONS.contains(&tag.as_str()) {
                sel.rename("div");
            }
        }
        out.push_str(&sel.html());
        out.push('\n');
    }
    out.push_str("</div>");
    out
}

fn sibling_qualifies(
    sibling: &NodeRef,
    top: &TopCandidate,
    top_class: &str,
    threshold: f64,
    scores: &ScoreMap,
    cache: &mut Cache,
) -> bool {
    let sel = Selection::from(*sibling);

    let mut bonus = 0.0;
    if !top_class.is_empty()
        && dom::get_attribute(&sel, "class").as_deref() == Some(top_class)
    {
        bonus += top.score * SIBLING_SCORE_RATIO;
    }

    let score = scores.get(&sibling.id).copied().unwrap_or_default();
    if score + bonus >= threshold {
        return true;
    }

    if dom::node_tag_name(sibling).as_deref() != Some("p") {
        return false;
    }

    let inner = text::inner_text(&sel, true, cache);
    let length = text::char_count(&inner);
    let density = scoring::link_density(&sel);

    if length >= SIBLING_PARAGRAPH_MIN_LENGTH && density < SIBLING_LINK_DENSITY_MAX {
        return true;
    }
    length > 0
        && length < SIBLING_PARAGRAPH_MIN_LENGTH
        && density == 0.0
        && ends_like_sentence(&inner)
        && text::count_commas(&inner) > 0
}

/// A short sibling paragraph must read like prose: ends on a period
/// (ASCII or CJK).
fn ends_like_sentence(text_value: &str) -> bool {
    if RX_SENTENCE_PERIOD.is_match(text_value) {
        return true;
    }
    text_value.trim_end().ends_with('\u{3002}')
}

fn stamp_scores(doc: &Document, scores: &ScoreMap) {
    for node in doc.select("*").nodes() {
        if let Some(score) = scores.get(&node.id) {
            Selection::from(*node).set_attr(SCORE_ATTRIBUTE, &format!("{score:.4}"));
        }
    }
}
