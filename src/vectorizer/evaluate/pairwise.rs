use std::collections::BTreeMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::vectorizer::{
    compute::compare::{cosine_similarity, WeightTable},
    index::PostingIndex,
    key::DocumentId,
    preprocess::Preprocessor,
    term::TermVector,
    tfidf::TFIDFEngine,
    tokenizer::Tokenizer,
    Corpus,
};

/// Similarity of every document pair sharing at least one token.
///
/// Pairs are stored once, smaller id first. Pairs without a shared token are absent and read
/// as 0 through [`get`](Self::get).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityDict<K>
where
    K: Ord,
{
    pairs: BTreeMap<(K, K), f64>,
}

impl<K> SimilarityDict<K>
where
    K: DocumentId,
{
    /// Similarity of `a` and `b` in either order, 0.0 for pairs never compared
    pub fn get(&self, a: &K, b: &K) -> f64 {
        let pair = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.pairs.get(&pair).copied().unwrap_or(0.0)
    }

    /// `true` when the pair shares a token (in either order)
    pub fn contains_pair(&self, a: &K, b: &K) -> bool {
        let pair = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.pairs.contains_key(&pair)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// (smaller id, larger id, score), ordered by ids
    pub fn iter(&self) -> impl Iterator<Item = (&K, &K, f64)> + '_ {
        self.pairs.iter().map(|((a, b), &score)| (a, b, score))
    }

    pub fn into_inner(self) -> BTreeMap<(K, K), f64> {
        self.pairs
    }
}

/// Compute the similarity of every co-occurring document pair.
///
/// For each document `d`, every `d2 > d` found in the posting lists of `d`'s tokens is scored
/// once. Self pairs and pairs with no common token are never computed.
pub fn similarity_dict<K, W>(
    term_vectors: &IndexMap<K, TermVector>,
    posting_index: &PostingIndex<K>,
    weights: &W,
) -> SimilarityDict<K>
where
    K: DocumentId,
    W: WeightTable + ?Sized,
{
    let docs: Vec<(&K, &TermVector)> = term_vectors.iter().collect();
    let pairs: BTreeMap<(K, K), f64> = docs
        .par_iter()
        .flat_map_iter(|&(key, vec)| {
            posting_index
                .candidates(vec.keys())
                .into_iter()
                .filter(|other| key < *other)
                .filter_map(|other| {
                    let other_vec = term_vectors.get(other)?;
                    let score = cosine_similarity(vec, other_vec, weights);
                    Some(((key.clone(), other.clone()), score))
                })
                .collect::<Vec<_>>()
        })
        .collect();
    SimilarityDict { pairs }
}

impl<K, T, P, E> Corpus<K, T, P, E>
where
    K: DocumentId,
    T: Tokenizer,
    P: Preprocessor,
    E: TFIDFEngine<K>,
{
    /// Pairwise similarity over the whole corpus (see [`similarity_dict`])
    pub fn pairwise_similarity(&self) -> SimilarityDict<K> {
        let dict = similarity_dict(self.term_vectors(), self.posting_index(), self.idf_table());
        debug!(documents = self.doc_num(), pairs = dict.len(), "pairwise similarity computed");
        dict
    }
}
