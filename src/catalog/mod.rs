//! CSV catalog loader.
//!
//! Reads the TMDB export into [`MovieRecord`]s. Cell-level problems (empty
//! cells, unparseable ratings, malformed list encodings) never fail the load;
//! structural problems (missing file, missing required column, broken CSV) do.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::types::MovieRecord;

/// Columns the catalog must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "title",
    "vote_average",
    "release_date",
    "genres",
    "production_companies",
    "overview",
    "tagline",
    "original_language",
];

/// Default catalog file name, resolved relative to the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "top_1000_popular_movies_tmdb.csv";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to open catalog at {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("malformed catalog row {row}: {source}")]
    Row { row: u64, source: csv::Error },
    #[error("unreadable catalog: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    production_companies: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    original_language: Option<String>,
}

impl From<CatalogRow> for MovieRecord {
    fn from(row: CatalogRow) -> Self {
        Self {
            title: non_empty(row.title),
            vote_average: row.vote_average.filter(|v| v.is_finite()),
            release_date: non_empty(row.release_date),
            genres: non_empty(row.genres),
            production_companies: non_empty(row.production_companies),
            overview: non_empty(row.overview),
            tagline: non_empty(row.tagline),
            original_language: non_empty(row.original_language),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Load every record from the CSV file at `path`, in file order.
pub fn load_catalog(path: &Path) -> Result<Vec<MovieRecord>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_catalog(file)?;
    info!(
        path = %path.display(),
        records = records.len(),
        "catalog_read"
    );
    Ok(records)
}

/// Parse catalog records from any CSV reader.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<MovieRecord>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(CatalogError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = row.map_err(|source| CatalogError::Row {
            row: idx as u64 + 1,
            source,
        })?;
        records.push(MovieRecord::from(row));
    }
    debug!(columns = headers.len(), records = records.len(), "catalog_parsed");
    Ok(records)
}
