use std::{
    collections::{BTreeSet, HashSet},
    hash::{BuildHasher, Hash},
};

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::trace;

use crate::{
    config::validate_min_score,
    error::Result,
    vectorizer::{
        compute::compare::cosine_similarity,
        evaluate::scoring::{HitEntry, Hits},
        key::DocumentId,
        preprocess::Preprocessor,
        term::TermVector,
        tfidf::TFIDFEngine,
        tokenizer::Tokenizer,
        Corpus,
    },
};

/// Restricts a query to a set of documents.
pub trait DocSubset<K> {
    fn contains_doc(&self, key: &K) -> bool;
}

impl<K, S> DocSubset<K> for HashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn contains_doc(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K, S> DocSubset<K> for IndexSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn contains_doc(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K: Ord> DocSubset<K> for BTreeSet<K> {
    #[inline]
    fn contains_doc(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K: PartialEq> DocSubset<K> for [K] {
    #[inline]
    fn contains_doc(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K: PartialEq> DocSubset<K> for Vec<K> {
    #[inline]
    fn contains_doc(&self, key: &K) -> bool {
        self.as_slice().contains(key)
    }
}

/// Query implementations
impl<K, T, P, E> Corpus<K, T, P, E>
where
    K: DocumentId,
    T: Tokenizer,
    P: Preprocessor,
    E: TFIDFEngine<K>,
{
    /// Documents similar to `text`, scoring strictly above the corpus's default minimum score.
    pub fn query(&self, text: &str) -> Hits<K> {
        self.search_vector(&self.vectorize(text), self.min_score(), None)
    }

    /// Documents similar to `text`.
    ///
    /// # Arguments
    /// * `text` - query text, run through the corpus's preprocessor and tokenizer
    /// * `min_score` - hits must score strictly above this value
    /// * `subset` - when given, only these documents are candidates
    ///
    /// # Returns
    /// * `Hits<K>` - sorted by score descending, ties by id ascending. Every hit carries the
    ///   candidate count (after subset filtering, before score filtering).
    ///
    /// # Errors
    /// `InvalidMinScore` when `min_score` is NaN.
    pub fn query_with(
        &self,
        text: &str,
        min_score: f64,
        subset: Option<&dyn DocSubset<K>>,
    ) -> Result<Hits<K>> {
        validate_min_score(min_score)?;
        Ok(self.search_vector(&self.vectorize(text), min_score, subset))
    }

    /// Same as [`query_with`](Self::query_with) for an already computed TF vector.
    pub fn query_vector(
        &self,
        query_vec: &TermVector,
        min_score: f64,
        subset: Option<&dyn DocSubset<K>>,
    ) -> Result<Hits<K>> {
        validate_min_score(min_score)?;
        Ok(self.search_vector(query_vec, min_score, subset))
    }

    fn search_vector(
        &self,
        query_vec: &TermVector,
        min_score: f64,
        subset: Option<&dyn DocSubset<K>>,
    ) -> Hits<K> {
        let mut candidates = self.posting_index().candidates(query_vec.keys());
        if let Some(subset) = subset {
            candidates.retain(|key| subset.contains_doc(key));
        }
        let candidate_count = candidates.len();

        let candidates: Vec<&K> = candidates.into_iter().collect();
        let list: Vec<HitEntry<K>> = candidates
            .into_par_iter()
            .filter_map(|key| {
                let doc = self.term_vector(key)?;
                let score = cosine_similarity(query_vec, doc, self.idf_table());
                (score > min_score).then(|| HitEntry {
                    key: key.clone(),
                    score,
                    candidate_count,
                })
            })
            .collect();

        let mut hits = Hits::new(list, candidate_count);
        hits.sort_by_score();
        trace!(candidates = candidate_count, hits = hits.len(), min_score, "query scored");
        hits
    }
}
