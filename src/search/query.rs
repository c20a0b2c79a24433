use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::types::SearchHit;
use crate::search::index::CatalogIndex;
use crate::search::vectorizer::{SparseVector, cosine_similarity};

/// Minimum cosine similarity for a record to be returned.
pub const SIMILARITY_THRESHOLD: f64 = 0.15;

/// Slack applied at the threshold so a score of exactly 0.15 survives rounding.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Hard cap on returned rows.
pub const MAX_RESULTS: usize = 1000;

/// Minimum candidate count before scoring fans out across the rayon pool.
/// Below this, task overhead outweighs the gain.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Chunk size for parallel scoring.
const PARALLEL_CHUNK_SIZE: usize = 1024;

/// User-facing query fields. Every field is optional; blank means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub title: String,
    pub genres: String,
    pub language: String,
    pub overview: String,
    pub tagline: String,
    pub company: String,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = value.into();
        self
    }

    pub fn genres(mut self, value: impl Into<String>) -> Self {
        self.genres = value.into();
        self
    }

    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = value.into();
        self
    }

    pub fn overview(mut self, value: impl Into<String>) -> Self {
        self.overview = value.into();
        self
    }

    pub fn tagline(mut self, value: impl Into<String>) -> Self {
        self.tagline = value.into();
        self
    }

    pub fn company(mut self, value: impl Into<String>) -> Self {
        self.company = value.into();
        self
    }

    /// True when any of the five text fields is set.
    pub fn has_text(&self) -> bool {
        [
            &self.title,
            &self.genres,
            &self.overview,
            &self.tagline,
            &self.company,
        ]
        .iter()
        .any(|f| !f.trim().is_empty())
    }

    pub fn has_language(&self) -> bool {
        !self.language.trim().is_empty()
    }

    /// True when all six fields are blank.
    pub fn is_blank(&self) -> bool {
        !self.has_text() && !self.has_language()
    }

    /// Lowercased text fields joined in order title, genres, overview,
    /// tagline, company. Genres and company stay plain keywords.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.title, self.genres, self.overview, self.tagline, self.company
        )
        .to_lowercase()
    }

    fn language_key(&self) -> Option<String> {
        self.has_language()
            .then(|| self.language.trim().to_lowercase())
    }
}

/// A record position plus its similarity (absent when no scoring ran).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedMatch {
    pub position: usize,
    pub score: Option<f64>,
}

/// True when `score` counts as at or above [`SIMILARITY_THRESHOLD`].
pub fn clears_threshold(score: f64) -> bool {
    score + SCORE_EPSILON >= SIMILARITY_THRESHOLD
}

impl CatalogIndex {
    /// Rank the catalog against `query` and project rows for display.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        self.search_ranked(query)
            .into_iter()
            .filter_map(|m| self.record(m.position).map(SearchHit::from_record))
            .collect()
    }

    /// Rank the catalog against `query`, returning positions and scores.
    ///
    /// At most [`MAX_RESULTS`] matches, best first. Equal scores keep catalog
    /// order.
    pub fn search_ranked(&self, query: &SearchQuery) -> Vec<RankedMatch> {
        let language = query.language_key();
        let candidates = self.candidates(language.as_deref());

        tracing::info!(
            has_text = query.has_text(),
            language = language.as_deref().unwrap_or(""),
            candidates = candidates.len(),
            "search_start"
        );

        if !query.has_text() && language.is_some() {
            let browse: Vec<RankedMatch> = candidates
                .into_iter()
                .take(MAX_RESULTS)
                .map(|position| RankedMatch {
                    position,
                    score: None,
                })
                .collect();
            tracing::info!(branch = "browse", hits = browse.len(), "search_done");
            return browse;
        }

        let query_vector = self.vectorizer().transform(&query.combined_text());
        if query_vector.is_zero() {
            tracing::info!(branch = "empty_query", hits = 0, "search_done");
            return Vec::new();
        }

        let mut scored: Vec<RankedMatch> = self
            .score_candidates(&query_vector, &candidates)
            .into_iter()
            .filter(|m| m.score.is_some_and(clears_threshold))
            .collect();

        // Stable sort keeps catalog order among equal scores.
        scored.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .total_cmp(&a.score.unwrap_or(0.0))
        });
        scored.truncate(MAX_RESULTS);

        tracing::info!(branch = "similarity", hits = scored.len(), "search_done");
        scored
    }

    fn candidates(&self, language: Option<&str>) -> Vec<usize> {
        match language {
            Some(lang) => self
                .normalized_all()
                .iter()
                .enumerate()
                .filter(|(_, n)| n.language_clean == lang)
                .map(|(position, _)| position)
                .collect(),
            None => (0..self.len()).collect(),
        }
    }

    fn score_candidates(&self, query: &SparseVector, candidates: &[usize]) -> Vec<RankedMatch> {
        let rows = self.vectors().rows();
        let score = |&position: &usize| RankedMatch {
            position,
            score: Some(cosine_similarity(query, &rows[position])),
        };

        if candidates.len() >= PARALLEL_THRESHOLD {
            candidates
                .par_iter()
                .with_min_len(PARALLEL_CHUNK_SIZE)
                .map(score)
                .collect()
        } else {
            candidates.iter().map(score).collect()
        }
    }
}
