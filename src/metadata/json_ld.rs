//! JSON-LD metadata harvesting.
//!
//! Parses `<script type="application/ld+json">` payloads and extracts
//! fields from schema.org objects whose `@type` describes an article.
//! JSON-LD values are dynamically shaped — scalars, objects, and arrays
//! appear in every position — so each field is normalized through a small
//! set of tolerant readers before use.

use serde_json::Value;

use crate::dom::{self, Document, Selection};
use crate::error::{Error, Result};
use crate::metadata::MetadataRecord;
use crate::patterns::{RX_CDATA, RX_JSON_LD_ARTICLE_TYPES, RX_SCHEMA_ORG};

/// Extract article metadata from JSON-LD scripts.
///
/// Only surfaced as an error in strict mode; otherwise malformed payloads
/// are skipped and the record stays partial.
pub(crate) fn extract_json_ld(doc: &Document, strict: bool) -> Result<MetadataRecord> {
    let mut record = MetadataRecord::default();

    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let sel = Selection::from(*script);
        let raw = dom::text_content(&sel).to_string();
        let raw = RX_CDATA.replace_all(&raw, "");
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let data: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                if strict {
                    return Err(Error::Metadata(format!("invalid JSON-LD: {err}")));
                }
                continue;
            }
        };

        for object in candidate_objects(&data) {
            if !is_article_object(object) {
                continue;
            }
            merge_article(&mut record, object);
        }
    }

    Ok(record)
}

/// Top-level object, array of objects, or `@graph` members.
fn candidate_objects(data: &Value) -> Vec<&serde_json::Map<String, Value>> {
    let mut out = Vec::new();
    match data {
        Value::Object(map) => {
            if let Some(Value::Array(graph)) = map.get("@graph") {
                for item in graph {
                    if let Value::Object(m) = item {
                        out.push(m);
                    }
                }
            }
            out.push(map);
        }
        Value::Array(items) => {
            for item in items {
                if let Value::Object(m) = item {
                    out.push(m);
                }
            }
        }
        _ => {}
    }
    out
}

/// Accept objects with a schema.org `@context` (or none, as in `@graph`
/// members) whose `@type` matches the article-type table.
fn is_article_object(object: &serde_json::Map<String, Value>) -> bool {
    if let Some(Value::String(context)) = object.get("@context") {
        if !RX_SCHEMA_ORG.is_match(context.trim()) {
            return false;
        }
    }

    match object.get("@type") {
        Some(Value::String(t)) => RX_JSON_LD_ARTICLE_TYPES.is_match(t.trim()),
        Some(Value::Array(types)) => types.iter().any(|t| {
            t.as_str()
                .is_some_and(|t| RX_JSON_LD_ARTICLE_TYPES.is_match(t.trim()))
        }),
        _ => false,
    }
}

fn merge_article(record: &mut MetadataRecord, object: &serde_json::Map<String, Value>) {
    if record.title.is_none() {
        record.title = string_field(object, "headline").or_else(|| string_field(object, "name"));
    }
    if record.byline.is_none() {
        record.byline = object.get("author").and_then(author_names);
    }
    if record.excerpt.is_none() {
        record.excerpt = string_field(object, "description");
    }
    if record.site_name.is_none() {
        record.site_name = object
            .get("publisher")
            .and_then(Value::as_object)
            .and_then(|publisher| string_field(publisher, "name"));
    }
    if record.published_time.is_none() {
        record.published_time = string_field(object, "datePublished");
    }
    if record.modified_time.is_none() {
        record.modified_time = string_field(object, "dateModified");
    }
    if record.image.is_none() {
        record.image = object.get("image").and_then(image_url);
    }
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().and_then(non_empty)),
        _ => None,
    }
}

/// Author fields may be a name, a `{name}` object, or an array of either.
/// Multiple authors are joined with `", "`.
fn author_names(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(map) => map.get("name").and_then(Value::as_str).and_then(non_empty),
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(author_names).collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}

/// Image fields may be a URL, a `{url}` object, or an array of either.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(map) => map.get("url").and_then(Value::as_str).and_then(non_empty),
        Value::Array(items) => items.iter().find_map(image_url),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
