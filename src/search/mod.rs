//! Search layer facade.
//!
//! - **[`name_list`]**: Parser for the list-of-objects encoding of genres and companies.
//! - **[`canonicalize`]**: Per-record field normalization and tag construction.
//! - **[`tokenizer`]**: Word tokenizer with the fixed English stop-word list.
//! - **[`vectorizer`]**: Bounded vocabulary, sparse count vectors, cosine similarity.
//! - **[`index`]**: [`index::CatalogIndex`], the immutable index built once per catalog.
//! - **[`query`]**: Query fields, language pre-filter and similarity ranking.

pub mod canonicalize;
pub mod index;
pub mod name_list;
pub mod query;
pub mod tokenizer;
pub mod vectorizer;

pub use index::{CatalogIndex, CatalogStats};
pub use query::{
    MAX_RESULTS, PARALLEL_THRESHOLD, RankedMatch, SIMILARITY_THRESHOLD, SearchQuery,
    clears_threshold,
};
