//! Heuristic constants for the extraction pipeline.
//!
//! Every magic number used by the scoring, assembly, and cleaning passes
//! lives here, named and annotated with the scenario that tuned it. Keeping
//! them in one table makes threshold experiments a one-file change.

/// Minimum extracted text length before the retry controller starts
/// relaxing heuristics. Tuned against short news briefs: anything under
/// 500 chars is usually a teaser or a mis-selected sidebar.
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 500;

/// Paragraph-like nodes shorter than this never become scoring seeds.
/// Filters out "Read more" stubs and image credits.
pub const MIN_PARAGRAPH_LENGTH: usize = 25;

/// One scoring point per this many characters of paragraph text.
pub const PARAGRAPH_LENGTH_PER_POINT: usize = 100;

/// Cap on length-derived points so one giant wall of text cannot drown
/// out comma structure.
pub const MAX_LENGTH_POINTS: f64 = 3.0;

/// How far up the tree a paragraph's score propagates.
pub const MAX_SCORE_ANCESTORS: usize = 5;

/// Magnitude added or subtracted per positive/negative class-name hit.
pub const CLASS_WEIGHT: i32 = 25;

/// Floor for the sibling inclusion threshold during assembly. Keeps weak
/// top candidates from dragging in every short sibling.
pub const SIBLING_SCORE_FLOOR: f64 = 10.0;

/// Sibling inclusion threshold as a fraction of the top score.
pub const SIBLING_SCORE_RATIO: f64 = 0.2;

/// Paragraph siblings at least this long qualify on length alone
/// (subject to the link-density cap below).
pub const SIBLING_PARAGRAPH_MIN_LENGTH: usize = 80;

/// Maximum link density for a long paragraph sibling to qualify.
pub const SIBLING_LINK_DENSITY_MAX: f64 = 0.25;

/// A parent replaces the top candidate when its score reaches this
/// fraction of the candidate's score (and the strong-children guard holds).
pub const PARENT_PROMOTION_RATIO: f64 = 0.75;

/// Strong scored children a parent needs before it can absorb the top
/// candidate. Avoids promoting page-level wrappers around a lone article.
pub const PARENT_PROMOTION_MIN_CHILDREN: usize = 3;

/// A promotion-qualifying child must score at least this fraction of the
/// top score.
pub const PARENT_PROMOTION_CHILD_RATIO: f64 = 0.5;

/// Raw subtree text must exceed this many bytes before its inner text is
/// cached. Caps cache memory at a small multiple of the useful content.
pub const INNER_TEXT_CACHE_THRESHOLD: usize = 500;

/// Byline text length bounds: non-empty, at most this many chars.
/// Longer matches are bios or related-author boxes, not bylines.
pub const MAX_BYLINE_LENGTH: usize = 100;

/// Titles shorter than this fall back to the uncleaned original
/// (unless the original was itself shorter).
pub const MIN_TITLE_LENGTH: usize = 15;

/// A title segment kept after separator splitting needs this many words.
pub const MIN_TITLE_WORDS: usize = 3;

/// Excerpt length when falling back to the first paragraph.
pub const EXCERPT_LENGTH: usize = 200;

/// Conditional cleaning: minimum content length before an element with a
/// suspicious image count is kept.
pub const CONDITIONAL_MIN_CONTENT_LENGTH: usize = 25;

/// Conditional cleaning: surplus of list items over paragraphs tolerated
/// outside real lists.
pub const CONDITIONAL_LI_SURPLUS: usize = 100;

/// Conditional cleaning: class weight at which the stricter link-density
/// cap applies.
pub const CONDITIONAL_WEIGHT_THRESHOLD: i32 = 25;

/// Conditional cleaning: link-density cap for low-weight elements.
pub const CONDITIONAL_LINK_DENSITY_LOW: f64 = 0.2;

/// Conditional cleaning: link-density cap for high-weight elements.
pub const CONDITIONAL_LINK_DENSITY_HIGH: f64 = 0.5;

/// Conditional cleaning: a single embed is kept only above this much text.
pub const CONDITIONAL_EMBED_MIN_TEXT: usize = 75;

/// Share widgets shorter than this are stripped from the article.
pub const SHARE_ELEMENT_MAX_TEXT: usize = 500;
