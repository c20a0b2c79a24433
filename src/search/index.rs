//! The catalog index: records, their normalized views, tags and vectors.
//!
//! All four tables are built together in [`CatalogIndex::build`] and share the
//! record position as their key. Nothing reorders them afterwards, so a row in
//! [`CorpusVectors`] always describes the record at the same position.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::catalog::{CatalogError, load_catalog};
use crate::model::types::{MovieRecord, NormalizedRecord};
use crate::search::canonicalize::{build_tag, normalize};
use crate::search::vectorizer::{CorpusVectors, CountVectorizer, Vocabulary};

/// Immutable, fully built search index over one catalog.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    records: Vec<MovieRecord>,
    normalized: Vec<NormalizedRecord>,
    tags: Vec<String>,
    vectorizer: CountVectorizer,
    vectors: CorpusVectors,
}

/// Summary figures for a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub records: usize,
    pub vocabulary: usize,
    pub nonzero_entries: usize,
    /// `(language, count)`, most common first, ties by code.
    pub languages: Vec<(String, usize)>,
}

impl CatalogIndex {
    /// Normalize, tag and vectorize `records`, keeping their order.
    pub fn build(records: Vec<MovieRecord>) -> Self {
        let started = Instant::now();
        let normalized: Vec<NormalizedRecord> = records.iter().map(normalize).collect();
        let tags: Vec<String> = normalized.iter().map(build_tag).collect();
        let (vectorizer, vectors) = CountVectorizer::fit(&tags);

        info!(
            records = records.len(),
            vocabulary = vectorizer.vocabulary().len(),
            nnz = vectors.nnz(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog_indexed"
        );

        Self {
            records,
            normalized,
            tags,
            vectorizer,
            vectors,
        }
    }

    /// Load the CSV catalog at `path` and index it.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let records = load_catalog(path)?;
        Ok(Self::build(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn record(&self, position: usize) -> Option<&MovieRecord> {
        self.records.get(position)
    }

    pub fn normalized(&self, position: usize) -> Option<&NormalizedRecord> {
        self.normalized.get(position)
    }

    pub fn tag(&self, position: usize) -> Option<&str> {
        self.tags.get(position).map(String::as_str)
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vectorizer.vocabulary()
    }

    pub fn vectors(&self) -> &CorpusVectors {
        &self.vectors
    }

    pub(crate) fn normalized_all(&self) -> &[NormalizedRecord] {
        &self.normalized
    }

    pub fn stats(&self) -> CatalogStats {
        let mut by_language: BTreeMap<&str, usize> = BTreeMap::new();
        for n in &self.normalized {
            *by_language.entry(n.language_clean.as_str()).or_insert(0) += 1;
        }
        let mut languages: Vec<(String, usize)> = by_language
            .into_iter()
            .map(|(code, count)| (code.to_string(), count))
            .collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        CatalogStats {
            records: self.len(),
            vocabulary: self.vocabulary().len(),
            nonzero_entries: self.vectors.nnz(),
            languages,
        }
    }
}
