//! Metadata extraction.
//!
//! Harvests structured metadata before the preparation pass mutates the
//! document. Sources in priority order: JSON-LD, `<meta>` tags, then the
//! document `<title>` and `<link>` fallbacks. All extracted URIs pass
//! through the URI resolver; times are parsed last, from whichever source
//! won.

pub(crate) mod json_ld;
pub(crate) mod meta_tags;

use chrono::{DateTime, Utc};
use url::Url;

use crate::constants::{MAX_BYLINE_LENGTH, MIN_TITLE_LENGTH, MIN_TITLE_WORDS};
use crate::dom::{self, Document, Selection};
use crate::error::Result;
use crate::patterns::{
    RX_BYLINE, RX_FAVICON_SIZE, RX_TITLE_ANY_SEPARATOR, RX_TITLE_HIERARCHY_SEP,
    RX_TITLE_REMOVE_1ST_PART, RX_TITLE_REMOVE_FINAL_PART, RX_TITLE_SEPARATOR,
};
use crate::text;

/// Intermediate harvest: every field an optional string, times unparsed.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetadataRecord {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub language: Option<String>,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
}

impl MetadataRecord {
    /// Fill empty fields of `self` from `other` (higher-priority first).
    fn merge_missing_from(&mut self, other: MetadataRecord) {
        merge(&mut self.title, other.title);
        merge(&mut self.byline, other.byline);
        merge(&mut self.excerpt, other.excerpt);
        merge(&mut self.site_name, other.site_name);
        merge(&mut self.image, other.image);
        merge(&mut self.favicon, other.favicon);
        merge(&mut self.language, other.language);
        merge(&mut self.published_time, other.published_time);
        merge(&mut self.modified_time, other.modified_time);
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Final metadata with parsed timestamps.
#[derive(Debug, Clone, Default)]
pub(crate) struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub language: Option<String>,
    pub published_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
}

/// Run the full metadata harvest over an unmodified document.
pub(crate) fn extract_metadata(
    doc: &Document,
    base: Option<&Url>,
    strict: bool,
) -> Result<Metadata> {
    let mut record = json_ld::extract_json_ld(doc, strict)?;

    let values = meta_tags::collect_meta_values(doc);
    record.merge_missing_from(MetadataRecord {
        title: meta_tags::first_meta(&values, meta_tags::TITLE_KEYS),
        byline: meta_tags::first_meta(&values, meta_tags::BYLINE_KEYS),
        excerpt: meta_tags::first_meta(&values, meta_tags::EXCERPT_KEYS),
        site_name: meta_tags::first_meta(&values, meta_tags::SITE_NAME_KEYS),
        image: meta_tags::first_meta(&values, meta_tags::IMAGE_KEYS),
        published_time: meta_tags::first_meta(&values, meta_tags::PUBLISHED_TIME_KEYS),
        modified_time: meta_tags::first_meta(&values, meta_tags::MODIFIED_TIME_KEYS),
        ..MetadataRecord::default()
    });

    if record.title.is_none() {
        let raw = text::trim(&doc.select("head title").text());
        // clean_title also covers the no-<title> case via a lone <h1>
        let cleaned = clean_title(&raw, doc);
        if !cleaned.is_empty() {
            record.title = Some(cleaned);
        }
    }

    if record.favicon.is_none() {
        record.favicon = find_favicon(doc);
    }

    if record.language.is_none() {
        record.language = document_language(doc);
    }

    Ok(Metadata {
        title: record.title,
        byline: record.byline.map(|b| text::trim(&b)).filter(|b| !b.is_empty()),
        excerpt: record.excerpt,
        site_name: record.site_name,
        image: record
            .image
            .map(|uri| crate::url_utils::to_absolute_uri(&uri, base)),
        favicon: record
            .favicon
            .map(|uri| crate::url_utils::to_absolute_uri(&uri, base)),
        language: record.language,
        published_time: record.published_time.as_deref().and_then(parse_time),
        modified_time: record.modified_time.as_deref().and_then(parse_time),
    })
}

/// Reduce a raw `<title>` to the article's own title.
///
/// Separator-delimited titles keep the segment matching an `<h1>`/`<h2>`
/// when one exists; hierarchical titles drop the trailing (site) segment;
/// otherwise the longer side of the separator wins when it carries enough
/// words. Results that shrink below the minimum fall back to the original.
pub(crate) fn clean_title(raw: &str, doc: &Document) -> String {
    let original = text::trim(raw);

    if RX_TITLE_SEPARATOR.is_match(&original) {
        if let Some(matched) = heading_matching_segment(&original, doc) {
            return matched;
        }

        let mut candidate = RX_TITLE_REMOVE_FINAL_PART
            .captures(&original)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| original.clone());

        if !RX_TITLE_HIERARCHY_SEP.is_match(&original)
            && text::word_count(&candidate) < MIN_TITLE_WORDS
        {
            if let Some(tail) = RX_TITLE_REMOVE_1ST_PART
                .captures(&original)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
            {
                candidate = tail;
            }
        }

        let candidate = text::trim(&candidate);
        if text::char_count(&candidate) >= MIN_TITLE_LENGTH
            || text::char_count(&original) < MIN_TITLE_LENGTH
        {
            return candidate;
        }
        return original;
    }

    // Over- or under-sized standalone titles defer to a lone <h1>
    let len = text::char_count(&original);
    if !(MIN_TITLE_LENGTH..=150).contains(&len) {
        let h1s = doc.select("h1");
        if h1s.length() == 1 {
            let heading = text::trim(&h1s.text());
            if !heading.is_empty() {
                return heading;
            }
        }
    }

    original
}

/// Longest title segment whose text matches an `<h1>`/`<h2>` heading.
fn heading_matching_segment(title: &str, doc: &Document) -> Option<String> {
    let headings: Vec<String> = doc
        .select("h1, h2")
        .iter()
        .map(|h| text::trim(&h.text()).to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();
    if headings.is_empty() {
        return None;
    }

    RX_TITLE_ANY_SEPARATOR
        .split(title)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter(|segment| headings.contains(&segment.to_lowercase()))
        .max_by_key(|segment| text::char_count(segment))
        .map(ToString::to_string)
}

/// First `<link rel=icon>`-style reference, preferring the largest
/// declared `NxN` size.
fn find_favicon(doc: &Document) -> Option<String> {
    let mut best: Option<(u64, String)> = None;

    for link in doc.select("link").nodes() {
        let sel = Selection::from(*link);
        let rel = dom::get_attribute(&sel, "rel")
            .unwrap_or_default()
            .to_lowercase();
        if !matches!(rel.as_str(), "icon" | "shortcut icon" | "apple-touch-icon") {
            continue;
        }

        let Some(href) = dom::get_attribute(&sel, "href").filter(|h| !h.trim().is_empty()) else {
            continue;
        };

        let size = dom::get_attribute(&sel, "sizes")
            .and_then(|sizes| {
                RX_FAVICON_SIZE.captures(&sizes).and_then(|caps| {
                    let w: u64 = caps.get(1)?.as_str().parse().ok()?;
                    let h: u64 = caps.get(2)?.as_str().parse().ok()?;
                    Some(w * h)
                })
            })
            .unwrap_or(0);

        match &best {
            Some((best_size, _)) if *best_size >= size => {}
            _ => best = Some((size, href.trim().to_string())),
        }
    }

    best.map(|(_, href)| href)
}

fn document_language(doc: &Document) -> Option<String> {
    let lang = doc.select("html").attr("lang").map(|l| l.to_string()).or_else(|| {
        doc.select("meta[http-equiv]").nodes().iter().find_map(|node| {
            let sel = Selection::from(*node);
            let equiv = dom::get_attribute(&sel, "http-equiv")?;
            if equiv.eq_ignore_ascii_case("content-language") {
                dom::get_attribute(&sel, "content")
            } else {
                None
            }
        })
    })?;

    let primary = lang.split(['-', '_']).next().unwrap_or(&lang).trim();
    if primary.is_empty() {
        None
    } else {
        Some(primary.to_lowercase())
    }
}

/// Parse an ISO-8601-ish timestamp from metadata.
pub(crate) fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

/// Whether a node is shaped like a byline container.
pub(crate) fn is_byline_node(sel: &Selection) -> bool {
    if dom::get_attribute(sel, "rel").as_deref() == Some("author") {
        return true;
    }
    if dom::get_attribute(sel, "itemprop").is_some_and(|ip| ip.to_lowercase().contains("author")) {
        return true;
    }

    let class = dom::get_attribute(sel, "class").unwrap_or_default();
    let id = dom::get_attribute(sel, "id").unwrap_or_default();
    RX_BYLINE.is_match(&format!("{class} {id}"))
}

/// Bylines are short: non-empty and at most 100 chars after trimming.
pub(crate) fn is_valid_byline(text_value: &str) -> bool {
    let trimmed = text::trim(text_value);
    !trimmed.is_empty() && text::char_count(&trimmed) <= MAX_BYLINE_LENGTH
}
