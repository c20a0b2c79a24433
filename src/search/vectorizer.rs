//! Bounded-vocabulary term-count vectorizer.
//!
//! `fit` learns a [`Vocabulary`] from the corpus tags and produces one sparse
//! count vector per document. `transform` maps arbitrary text into the same
//! space without growing the vocabulary.
//!
//! Vocabulary selection when the corpus has more distinct terms than the cap:
//! terms are ranked by total occurrence count across the corpus (descending),
//! ties broken lexicographically, and the top `max_features` are kept. Column
//! ids are then assigned in lexicographic term order.

use fxhash::FxHashMap;
use std::collections::BTreeMap;

use crate::search::tokenizer::tokenize;

/// Maximum number of vocabulary terms kept after fit.
pub const MAX_FEATURES: usize = 8000;

/// Token → column id mapping. Immutable after fit.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    columns: FxHashMap<String, u32>,
    terms: Vec<String>,
}

impl Vocabulary {
    fn from_sorted_terms(terms: Vec<String>) -> Self {
        let columns = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx as u32))
            .collect();
        Self { columns, terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<u32> {
        self.columns.get(term).copied()
    }

    pub fn term(&self, column: u32) -> Option<&str> {
        self.terms.get(column as usize).map(String::as_str)
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse non-negative count vector, entries sorted by column.
///
/// The squared norm is kept as an exact integer so cosine scores only round
/// once, in the final square root and division.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseVector {
    entries: Vec<(u32, u32)>,
    norm_squared: u64,
}

impl SparseVector {
    fn from_counts(counts: BTreeMap<u32, u32>) -> Self {
        let entries: Vec<(u32, u32)> = counts.into_iter().collect();
        let norm_squared = entries
            .iter()
            .map(|&(_, c)| u64::from(c) * u64::from(c))
            .sum();
        Self {
            entries,
            norm_squared,
        }
    }

    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm_squared(&self) -> u64 {
        self.norm_squared
    }

    pub fn norm(&self) -> f64 {
        (self.norm_squared as f64).sqrt()
    }

    /// Count stored for `column`, zero when absent.
    pub fn get(&self, column: u32) -> u32 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|idx| self.entries[idx].1)
            .unwrap_or(0)
    }

    pub fn dot(&self, other: &SparseVector) -> u64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0u64;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, va) = self.entries[i];
            let (cb, vb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += u64::from(va) * u64::from(vb);
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity; zero when either side is the zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let denom = (a.norm_squared as f64 * b.norm_squared as f64).sqrt();
    a.dot(b) as f64 / denom
}

/// One vector per catalog record, in record order.
#[derive(Debug, Clone, Default)]
pub struct CorpusVectors {
    rows: Vec<SparseVector>,
    dimension: usize,
}

impl CorpusVectors {
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, position: usize) -> Option<&SparseVector> {
        self.rows.get(position)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }
}

/// Vectorizer holding the fitted vocabulary.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    vocabulary: Vocabulary,
}

impl CountVectorizer {
    /// Fit on the corpus with the default [`MAX_FEATURES`] cap.
    pub fn fit<S: AsRef<str>>(tags: &[S]) -> (Self, CorpusVectors) {
        Self::fit_with_max_features(tags, MAX_FEATURES)
    }

    pub fn fit_with_max_features<S: AsRef<str>>(
        tags: &[S],
        max_features: usize,
    ) -> (Self, CorpusVectors) {
        let tokenized: Vec<Vec<String>> = tags.iter().map(|t| tokenize(t.as_ref())).collect();

        let mut totals: FxHashMap<&str, u64> = FxHashMap::default();
        for tokens in &tokenized {
            for token in tokens {
                *totals.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
        if ranked.len() > max_features {
            ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            ranked.truncate(max_features);
        }
        let mut kept: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        kept.sort_unstable();

        let vectorizer = Self {
            vocabulary: Vocabulary::from_sorted_terms(kept),
        };
        let rows = tokenized
            .iter()
            .map(|tokens| vectorizer.count(tokens))
            .collect();
        let corpus = CorpusVectors {
            rows,
            dimension: vectorizer.vocabulary.len(),
        };
        (vectorizer, corpus)
    }

    /// Map `text` into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.count(&tokenize(text))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn count(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(column) = self.vocabulary.column(token) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }
        SparseVector::from_counts(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_lexicographic_term_order() {
        let (cv, corpus) = CountVectorizer::fit(&["zebra apple", "mango apple"]);
        assert_eq!(cv.vocabulary().terms(), &["apple", "mango", "zebra"]);
        assert_eq!(corpus.row_count(), 2);
        assert_eq!(corpus.dimension(), 3);
        let first = corpus.row(0).unwrap();
        assert_eq!(first.get(0), 1);
        assert_eq!(first.get(1), 0);
        assert_eq!(first.get(2), 1);
    }

    #[test]
    fn counts_repeated_terms() {
        let (cv, corpus) = CountVectorizer::fit(&["dream dream heist"]);
        let dream = cv.vocabulary().column("dream").unwrap();
        assert_eq!(corpus.row(0).unwrap().get(dream), 2);
    }

    #[test]
    fn cap_keeps_most_frequent_terms_with_lexicographic_ties() {
        let tags = ["alpha beta beta gamma", "beta delta gamma", "epsilon"];
        let (cv, _) = CountVectorizer::fit_with_max_features(&tags, 3);
        // beta=3, gamma=2, then alpha/delta/epsilon tie at 1 -> alpha wins.
        assert_eq!(cv.vocabulary().terms(), &["alpha", "beta", "gamma"]);
    }

    #[test]
    fn vocabulary_never_exceeds_cap() {
        let tags: Vec<String> = (0..500).map(|i| format!("term{i} shared")).collect();
        let (cv, corpus) = CountVectorizer::fit_with_max_features(&tags, 100);
        assert_eq!(cv.vocabulary().len(), 100);
        assert_eq!(corpus.dimension(), 100);
        assert!(cv.vocabulary().column("shared").is_some());
    }

    #[test]
    fn transform_ignores_unknown_and_stop_words() {
        let (cv, _) = CountVectorizer::fit(&["inception dream"]);
        let q = cv.transform("The Inception of nothing unknownword");
        assert_eq!(q.nnz(), 1);
        assert!(cv.transform("the of and").is_zero());
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        let (cv, corpus) = CountVectorizer::fit(&["inception dream"]);
        let zero = cv.transform("");
        assert_eq!(cosine_similarity(&zero, corpus.row(0).unwrap()), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let (cv, corpus) = CountVectorizer::fit(&["dream dream heist", "ocean"]);
        let q = cv.transform("dream heist dream");
        let sim = cosine_similarity(&q, corpus.row(0).unwrap());
        assert!((sim - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&q, corpus.row(1).unwrap()), 0.0);
    }

    #[test]
    fn cosine_matches_hand_computed_value() {
        // q = (1,1,0), d = (1,0,1) -> 1 / (sqrt2 * sqrt2) = 0.5
        let (cv, corpus) = CountVectorizer::fit(&["apple cherry", "banana"]);
        let q = cv.transform("apple banana");
        let sim = cosine_similarity(&q, corpus.row(0).unwrap());
        assert!((sim - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_exact_for_perfect_square_norms() {
        // 9 shared terms, 48 query terms, 75 document terms:
        // 9 / (sqrt(48) * sqrt(75)) = 9 / 60 = 0.15
        let shared: Vec<String> = (0..9).map(|i| format!("shared{i}")).collect();
        let doc: Vec<String> = shared
            .iter()
            .cloned()
            .chain((0..66).map(|i| format!("doc{i}")))
            .collect();
        let query: Vec<String> = shared
            .iter()
            .cloned()
            .chain((0..39).map(|i| format!("qry{i}")))
            .collect();
        let (cv, corpus) = CountVectorizer::fit(&[doc.join(" "), query.join(" ")]);
        let q = cv.transform(&query.join(" "));
        let d = corpus.row(0).unwrap();
        assert_eq!(q.norm_squared(), 48);
        assert_eq!(d.norm_squared(), 75);
        assert_eq!(q.dot(d), 9);
        assert_eq!(cosine_similarity(&q, d), 0.15);
    }
}
