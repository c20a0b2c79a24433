//! Field normalization and tag construction for catalog records.
//!
//! Every record is reduced to a [`NormalizedRecord`] once at load time and then
//! flattened into a single "tag" string, which is what the vectorizer indexes.
//!
//! # Processing Pipeline
//!
//! 1. **List fields** (genres, production companies) - parse the literal list,
//!    collapse each name to one token ("Science Fiction" → "ScienceFiction"),
//!    join with single spaces. Any parse failure yields `""`.
//! 2. **Plain fields** (title, overview, tagline, language) - missing becomes
//!    `""`, everything else is lowercased.
//! 3. **Tag** - fields joined in fixed order with single spaces.
//!
//! # Example
//!
//! ```
//! use vibeflicks::search::canonicalize::normalize_name_list;
//!
//! let clean = normalize_name_list(r#"[{"name":"Science Fiction"},{"name":"Drama"}]"#);
//! assert_eq!(clean, "ScienceFiction Drama");
//! ```

use crate::model::types::{MovieRecord, NormalizedRecord};
use crate::search::name_list::extract_names;

/// Normalize one catalog record. Pure and total.
pub fn normalize(record: &MovieRecord) -> NormalizedRecord {
    NormalizedRecord {
        title_clean: lowercase_or_empty(record.title.as_deref()),
        genres_clean: record
            .genres
            .as_deref()
            .map(normalize_name_list)
            .unwrap_or_default(),
        companies_clean: record
            .production_companies
            .as_deref()
            .map(normalize_name_list)
            .unwrap_or_default(),
        overview_clean: lowercase_or_empty(record.overview.as_deref()),
        tagline_clean: lowercase_or_empty(record.tagline.as_deref()),
        language_clean: lowercase_or_empty(record.original_language.as_deref()),
    }
}

/// Turn an encoded list of named objects into space-joined name tokens.
///
/// Names keep their case; whitespace inside a name is removed so multi-word
/// names survive tokenization as a single term. Malformed input gives `""`.
pub fn normalize_name_list(encoded: &str) -> String {
    match extract_names(encoded) {
        Some(names) => names
            .iter()
            .map(|name| strip_whitespace(name))
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

/// Build the indexing document for a normalized record.
pub fn build_tag(normalized: &NormalizedRecord) -> String {
    [
        normalized.title_clean.as_str(),
        normalized.genres_clean.as_str(),
        normalized.companies_clean.as_str(),
        normalized.overview_clean.as_str(),
        normalized.tagline_clean.as_str(),
        normalized.language_clean.as_str(),
    ]
    .join(" ")
}

fn lowercase_or_empty(value: Option<&str>) -> String {
    value.map(str::to_lowercase).unwrap_or_default()
}

fn strip_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}
