//! Candidate scoring.
//!
//! Assigns a content score to every paragraph-like node and propagates it
//! up the ancestor chain with depth decay. Scores live in a map keyed by
//! node identity, bounded to one extraction attempt; link density is
//! applied at selection time by the candidate picker.

use std::collections::HashMap;

use crate::cache::Cache;
use crate::constants::{
    CLASS_WEIGHT, MAX_LENGTH_POINTS, MAX_SCORE_ANCESTORS, MIN_PARAGRAPH_LENGTH,
    PARAGRAPH_LENGTH_PER_POINT,
};
use crate::dom::{self, Document, NodeId, Selection};
use crate::patterns::{RX_NEGATIVE_CLASS, RX_POSITIVE_CLASS};
use crate::text;

/// Content scores keyed by node identity. Lifetime: one extraction attempt.
pub(crate) type ScoreMap = HashMap<NodeId, f64>;

/// Class/id weighting: ±25 per positive/negative hit across both strings.
#[must_use]
pub fn class_weight(class: &str, id: &str) -> i32 {
    let mut weight = 0;

    for value in [class, id] {
        if value.is_empty() {
            continue;
        }
        if RX_POSITIVE_CLASS.is_match(value) {
            weight += CLASS_WEIGHT;
        }
        if RX_NEGATIVE_CLASS.is_match(value) {
            weight -= CLASS_WEIGHT;
        }
    }

    weight
}

/// Class weight of a selection's own `class`/`id` attributes.
pub(crate) fn selection_class_weight(sel: &Selection) -> i32 {
    let class = dom::get_attribute(sel, "class").unwrap_or_default();
    let id = dom::get_attribute(sel, "id").unwrap_or_default();
    class_weight(&class, &id)
}

/// Ratio of anchor-descendant text to total inner text.
pub(crate) fn link_density(sel: &Selection) -> f64 {
    let total_text = dom::text_content(sel);
    let total_len = total_text.trim().chars().count();
    if total_len == 0 {
        return 0.0;
    }

    let link_len: usize = sel
        .select("a")
        .iter()
        .map(|a| dom::text_content(&a).trim().chars().count())
        .sum();

    (link_len as f64) / (total_len as f64)
}

/// Starting score for a freshly seen ancestor, from its tag and
/// (when class weighting is on) its class/id. Applied exactly once, at
/// initialization.
fn initialize_score(sel: &Selection, weight_classes: bool) -> f64 {
    let mut score = tag_score_bias(dom::tag_name(sel).as_deref().unwrap_or_default());
    if weight_classes {
        score += f64::from(selection_class_weight(sel));
    }
    score
}

fn tag_score_bias(tag: &str) -> f64 {
    match tag {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Points a paragraph earns from its own text: one for existing, one per
/// comma, one per 100 chars capped at three.
fn paragraph_score(inner: &str) -> f64 {
    let length_points =
        ((text::char_count(inner) / PARAGRAPH_LENGTH_PER_POINT) as f64).min(MAX_LENGTH_POINTS);
    1.0 + text::count_commas(inner) as f64 + length_points
}

/// Score every paragraph-like node and propagate to its ancestors.
///
/// Divs that read as paragraphs were renamed to `<p>` by the candidate
/// preparation walk, so the selector here covers them too.
pub(crate) fn score_candidates(
    doc: &Document,
    weight_classes: bool,
    cache: &mut Cache,
) -> ScoreMap {
    let mut scores = ScoreMap::new();

    for node in doc.select("p, pre, td, article").nodes() {
        let sel = Selection::from(*node);
        let inner = text::inner_text(&sel, true, cache);
        if text::char_count(&inner) < MIN_PARAGRAPH_LENGTH {
            continue;
        }

        let base = paragraph_score(&inner);

        for (level, ancestor) in node
            .ancestors(Some(MAX_SCORE_ANCESTORS))
            .into_iter()
            .enumerate()
        {
            if !ancestor.is_element() {
                break;
            }
            match dom::node_tag_name(&ancestor).as_deref() {
                Some("html" | "head") | None => break,
                _ => {}
            }

            let ancestor_sel = Selection::from(ancestor);
            let entry = scores
                .entry(ancestor.id)
                .or_insert_with(|| initialize_score(&ancestor_sel, weight_classes));

            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                level => (level * 3) as f64,
            };
            *entry += base / divider;
        }
    }

    scores
}
