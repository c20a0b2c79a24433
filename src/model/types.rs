//! Catalog entity structs.

use serde::{Deserialize, Serialize};

/// One row of the movie catalog, as read from the source table.
///
/// List fields (`genres`, `production_companies`) keep their raw encoding; the
/// normalizer decides whether they parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub original_language: Option<String>,
}

impl MovieRecord {
    /// Convenience constructor used by fixtures and benches.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.original_language = Some(code.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn with_genres(mut self, encoded: impl Into<String>) -> Self {
        self.genres = Some(encoded.into());
        self
    }

    pub fn with_companies(mut self, encoded: impl Into<String>) -> Self {
        self.production_companies = Some(encoded.into());
        self
    }

    pub fn with_vote_average(mut self, vote: f64) -> Self {
        self.vote_average = Some(vote);
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }
}

/// Lowercased, index-ready view of a [`MovieRecord`]. Built once per load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub title_clean: String,
    pub genres_clean: String,
    pub companies_clean: String,
    pub overview_clean: String,
    pub tagline_clean: String,
    pub language_clean: String,
}

/// A result row handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub vote_average: Option<f64>,
    pub release_date: String,
}

impl SearchHit {
    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            title: record.title.clone().unwrap_or_default(),
            vote_average: record.vote_average,
            release_date: record.release_date.clone().unwrap_or_default(),
        }
    }
}
