//! Compiled regex patterns and lexicon tables for article extraction.
//!
//! All patterns are compiled once at startup using `LazyLock` and shared
//! process-wide; they are immutable after construction. Patterns are
//! organized by their purpose in the extraction pipeline.

#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class / id weighting
// =============================================================================

/// Class or id fragments that mark an element as likely content.
pub static RX_POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("RX_POSITIVE_CLASS regex")
});

/// Class or id fragments that mark an element as likely chrome.
pub static RX_NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget")
        .expect("RX_NEGATIVE_CLASS regex")
});

// =============================================================================
// Candidate filtering
// =============================================================================

/// Class/id/role fragments marking elements that are almost never article
/// content (comment threads, sidebars, pagination, popups).
pub static RX_UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote")
        .expect("RX_UNLIKELY_CANDIDATES regex")
});

/// Fragments that rescue an otherwise unlikely element.
pub static RX_MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|shadow").expect("RX_MAYBE_CANDIDATE regex")
});

/// Byline containers: class/id fragments and microformat names.
pub static RX_BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("RX_BYLINE regex")
});

/// Share widgets, matched on `_`/word boundaries to avoid e.g. "shareholder".
pub static RX_SHARE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").expect("RX_SHARE_ELEMENTS regex")
});

// =============================================================================
// Visibility
// =============================================================================

/// Inline style hiding an element.
pub static RX_DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display\s*:\s*none").expect("RX_DISPLAY_NONE regex"));

/// Inline style hiding an element without collapsing it.
pub static RX_VISIBILITY_HIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)visibility\s*:\s*hidden").expect("RX_VISIBILITY_HIDDEN regex"));

// =============================================================================
// Metadata
// =============================================================================

/// Namespaced `<meta property=...>` identifiers we harvest.
pub static RX_PROPERTY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(dc|dcterm|og|article|twitter)\s*:\s*(author|creator|description|title|site_name|published_time|modified_time|image\S*)\s*")
        .expect("RX_PROPERTY_PATTERN regex")
});

/// Bare (or dotted) `<meta name=...>` identifiers we harvest.
pub static RX_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(dc|dcterm|article|og|twitter|weibo:(article|webpage))\s*[\.:]\s*)?(author|creator|description|title|site_name|published_time|modified_time|image)\s*$")
        .expect("RX_NAME_PATTERN regex")
});

/// `@type` values of schema.org objects that describe an article.
pub static RX_JSON_LD_ARTICLE_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference)$")
        .expect("RX_JSON_LD_ARTICLE_TYPES regex")
});

/// CDATA markers wrapping JSON-LD payloads on some CMSes.
pub static RX_CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!\[CDATA\[|\]\]>\s*$").expect("RX_CDATA regex"));

/// The schema.org `@context` URL.
pub static RX_SCHEMA_ORG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://schema\.org/?$").expect("RX_SCHEMA_ORG regex"));

// =============================================================================
// Titles
// =============================================================================

/// A spaced separator between title parts (`" | "`, `" - "`, `" » "`, ...).
pub static RX_TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-\\/>»] ").expect("RX_TITLE_SEPARATOR regex"));

/// Separators that imply a hierarchy (section » subsection » site).
pub static RX_TITLE_HIERARCHY_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\\/>»] ").expect("RX_TITLE_HIERARCHY_SEP regex"));

/// Any run of separator characters, for splitting a title into segments.
pub static RX_TITLE_ANY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-\\/>»]+ ").expect("RX_TITLE_ANY_SEPARATOR regex"));

/// Everything before the final separator.
pub static RX_TITLE_REMOVE_FINAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*) [\|\-\\/>»] .*").expect("RX_TITLE_REMOVE_FINAL_PART regex"));

/// Everything after the first separator.
pub static RX_TITLE_REMOVE_1ST_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\|\-\\/>»]* [\|\-\\/>»] (.*)").expect("RX_TITLE_REMOVE_1ST_PART regex")
});

// =============================================================================
// Images and media
// =============================================================================

/// Hosts whose embeds are kept during video cleanup.
pub static RX_VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)")
        .expect("RX_VIDEOS regex")
});

/// A srcset-style value (image URL followed by a density/width descriptor).
pub static RX_LAZY_IMAGE_SRCSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").expect("RX_LAZY_IMAGE_SRCSET regex")
});

/// A bare image URL, the whole attribute value.
pub static RX_LAZY_IMAGE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").expect("RX_LAZY_IMAGE_SRC regex")
});

/// One `url [descriptor][,]` entry inside a srcset value.
pub static RX_SRCSET_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").expect("RX_SRCSET_URL regex"));

/// A base64 data URL prefix, for spotting placeholder images.
pub static RX_B64_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").expect("RX_B64_DATA_URL regex")
});

/// An `NxN` pair inside a favicon `sizes` attribute.
pub static RX_FAVICON_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)x(\d+)").expect("RX_FAVICON_SIZE regex"));

// =============================================================================
// Text
// =============================================================================

/// A sentence-terminating period (followed by a space or end of text).
pub static RX_SENTENCE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("RX_SENTENCE_PERIOD regex"));

/// Runs of whitespace, for normalization.
pub static RX_NORMALIZE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("RX_NORMALIZE_SPACES regex"));

/// Fragment-only URI references.
pub static RX_HASH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#.+").expect("RX_HASH_URL regex"));

/// HTML comments, stripped from raw markup before parsing.
pub static RX_HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("RX_HTML_COMMENT regex"));

// =============================================================================
// Lexicons
// =============================================================================

/// ARIA roles that mark a subtree as non-content.
pub const UNLIKELY_ROLES: &[&str] = &[
    "menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog",
];

/// Elements whose presence makes a `<div>` a block container rather than a
/// paragraph-in-disguise.
pub const DIV_TO_P_ELEMS: &[&str] = &[
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul", "select",
];

/// Tags an assembled sibling may keep; everything else is renamed to `div`.
pub const ALTER_TO_DIV_EXCEPTIONS: &[&str] = &["div", "article", "section", "p"];

/// Attributes that only affect presentation and are dropped in cleanup.
pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace",
    "rules", "style", "valign", "vspace",
];

/// Elements that legitimately carry numeric `width`/`height` attributes.
pub const DEPRECATED_SIZE_ATTRIBUTE_ELEMS: &[&str] = &["table", "th", "td", "hr", "pre"];

/// Phrasing-content elements (inline flow, absorbed into paragraphs).
pub const PHRASING_ELEMS: &[&str] = &[
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// Attribute names promoted to `src` when an image is lazily loaded.
pub const LAZY_IMAGE_ATTRIBUTES: &[&str] = &["data-src", "data-original", "data-lazy-src"];

/// Attribute names promoted to `srcset`.
pub const LAZY_SRCSET_ATTRIBUTES: &[&str] = &["data-srcset"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_and_negative_classes() {
        assert!(RX_POSITIVE_CLASS.is_match("article-body"));
        assert!(RX_POSITIVE_CLASS.is_match("main-story"));
        assert!(RX_NEGATIVE_CLASS.is_match("sidebar"));
        assert!(RX_NEGATIVE_CLASS.is_match("share-tools"));
        assert!(!RX_NEGATIVE_CLASS.is_match("prose"));
    }

    #[test]
    fn unlikely_but_maybe() {
        assert!(RX_UNLIKELY_CANDIDATES.is_match("comment-thread"));
        assert!(RX_UNLIKELY_CANDIDATES.is_match("sidebar"));
        assert!(RX_MAYBE_CANDIDATE.is_match("sidebar main-column"));
        assert!(!RX_MAYBE_CANDIDATE.is_match("popup"));
    }

    #[test]
    fn title_separators() {
        assert!(RX_TITLE_SEPARATOR.is_match("Section » Site"));
        assert!(RX_TITLE_SEPARATOR.is_match("Post - Blog"));
        assert!(RX_TITLE_HIERARCHY_SEP.is_match("Section » Site"));
        assert!(!RX_TITLE_HIERARCHY_SEP.is_match("Post - Blog"));
    }

    #[test]
    fn json_ld_article_types_match_exactly() {
        assert!(RX_JSON_LD_ARTICLE_TYPES.is_match("NewsArticle"));
        assert!(RX_JSON_LD_ARTICLE_TYPES.is_match("blogposting"));
        assert!(!RX_JSON_LD_ARTICLE_TYPES.is_match("Recipe"));
        assert!(!RX_JSON_LD_ARTICLE_TYPES.is_match("NewsArticleX"));
    }

    #[test]
    fn schema_org_context() {
        assert!(RX_SCHEMA_ORG.is_match("https://schema.org"));
        assert!(RX_SCHEMA_ORG.is_match("http://schema.org/"));
        assert!(!RX_SCHEMA_ORG.is_match("https://schema.org/Article"));
    }

    #[test]
    fn video_hosts() {
        assert!(RX_VIDEOS.is_match("https://www.youtube.com/embed/xyz"));
        assert!(RX_VIDEOS.is_match("//player.vimeo.com/video/1"));
        assert!(!RX_VIDEOS.is_match("https://example.com/embed/xyz"));
    }

    #[test]
    fn srcset_entries() {
        let srcset = "a.jpg 1x, b.jpg 2x";
        let urls: Vec<&str> = RX_SRCSET_URL
            .captures_iter(srcset)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn comment_stripper_is_non_greedy() {
        let html = "<p>a</p><!-- one --><p>b</p><!-- two -->";
        let stripped = RX_HTML_COMMENT.replace_all(html, "");
        assert_eq!(stripped, "<p>a</p><p>b</p>");
    }

    #[test]
    fn meta_property_pattern_segments() {
        let caps = RX_PROPERTY_PATTERN.captures("og:title").map(|c| {
            (
                c.get(1).map(|m| m.as_str().to_lowercase()),
                c.get(2).map(|m| m.as_str().to_lowercase()),
            )
        });
        assert_eq!(
            caps,
            Some((Some("og".to_string()), Some("title".to_string())))
        );
    }
}
