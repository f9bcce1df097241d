use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DocCountStrategy, IdfConfig, DEFAULT_MAX_BITSET_ID},
    error::{Error, Result},
    utils::bitset::{Cardinality, DocBitSet},
    vectorizer::{index::PostingIndex, key::DocumentId, term::TermVector, token::TokenFrequency},
};

/// Plug-in point for the TF and IDF calculation of a [`Corpus`](crate::Corpus).
///
/// [`DefaultTFIDFEngine`] implements the textbook formulas; another engine can swap either half.
pub trait TFIDFEngine<K>: Send + Sync
where
    K: DocumentId,
{
    /// TF vector of one document or query
    fn tf_vec(&self, freq: &TokenFrequency) -> TermVector;

    /// IDF table derived from the finished posting index
    fn idf_vec(&self, index: &PostingIndex<K>) -> Result<IdfTable>;

    /// Reject a document id before any work is done for it.
    fn check_key(&self, _key: &K) -> Result<()> {
        Ok(())
    }
}

/// Default TF-IDF engine
///
/// - TF: `count / total`
/// - IDF: `ln(doc_num / doc_freq)`, `doc_num` counted by the configured [`DocCountStrategy`]
///
/// Under the bitset count, ids must lie in `1..=max_bitset_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTFIDFEngine {
    doc_count: DocCountStrategy,
    max_bitset_id: u64,
}

impl Default for DefaultTFIDFEngine {
    fn default() -> Self {
        Self::with_doc_count(DocCountStrategy::default())
    }
}

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc_count(doc_count: DocCountStrategy) -> Self {
        Self {
            doc_count,
            max_bitset_id: DEFAULT_MAX_BITSET_ID,
        }
    }

    /// Replace the largest id accepted by the bitset count.
    pub fn with_max_bitset_id(mut self, max_bitset_id: u64) -> Self {
        self.max_bitset_id = max_bitset_id;
        self
    }

    pub fn from_config(config: &IdfConfig) -> Self {
        Self::with_doc_count(config.doc_count).with_max_bitset_id(config.max_bitset_id)
    }

    pub fn doc_count(&self) -> DocCountStrategy {
        self.doc_count
    }

    pub fn max_bitset_id(&self) -> u64 {
        self.max_bitset_id
    }
}

impl<K> TFIDFEngine<K> for DefaultTFIDFEngine
where
    K: DocumentId,
{
    #[inline]
    fn tf_vec(&self, freq: &TokenFrequency) -> TermVector {
        tf(freq)
    }

    fn idf_vec(&self, index: &PostingIndex<K>) -> Result<IdfTable> {
        match self.doc_count {
            DocCountStrategy::Distinct => Ok(idf(index)),
            DocCountStrategy::Bitset => idf_bitset_with_limit(index, self.max_bitset_id),
        }
    }

    fn check_key(&self, key: &K) -> Result<()> {
        match self.doc_count {
            DocCountStrategy::Distinct => Ok(()),
            DocCountStrategy::Bitset => bit_position(key, self.max_bitset_id).map(|_| ()),
        }
    }
}

/// IDF weights per token.
///
/// Unknown tokens weigh `0.0`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    #[serde(with = "indexmap::map::serde_seq")]
    weights: IndexMap<Box<str>, f64>,
    /// number of contributing documents the weights were computed with
    doc_num: u64,
}

impl IdfTable {
    /// Weight of a token, 0.0 when unknown
    #[inline]
    pub fn get(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    /// IDF denominator: documents that contributed at least one token
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(token, &weight)| (token.as_ref(), weight))
    }
}

/// Term frequency
///
/// Each count is divided by the sum of all counts, so the result sums to 1.
/// An empty input gives an empty vector.
///
/// ```
/// use tf_idf_similarity::{tf, TokenFrequency};
/// let mut freq = TokenFrequency::new();
/// freq.add_token_n("a", 1).add_token_n("b", 3);
/// let tf = tf(&freq);
/// assert_eq!(tf.get("b"), 0.75);
/// ```
pub fn tf(freq: &TokenFrequency) -> TermVector {
    let total = freq.token_sum() as f64;
    if total == 0.0 {
        return TermVector::new();
    }
    let mut tf_vec = TermVector::with_capacity(freq.token_num());
    for (token, count) in freq.iter() {
        tf_vec.insert(token, count as f64 / total);
    }
    tf_vec
}

/// Inverse document frequency
///
/// `doc_num` is the number of distinct ids found across all posting lists, so a document
/// without tokens does not count. Each token weighs `ln(doc_num / doc_freq)`; a token present
/// in every contributing document weighs 0.
pub fn idf<K>(index: &PostingIndex<K>) -> IdfTable
where
    K: DocumentId,
{
    let doc_num = index.doc_ids().len() as u64;
    idf_with_doc_num(index, doc_num)
}

/// Inverse document frequency, counting documents with a bitset.
///
/// Every id sets bit `id - 1`; the number of set bits is the denominator. Same result as
/// [`idf`] for integer ids.
///
/// # Errors
/// `InvalidDocumentId` for an id that is not an integer in `1..=DEFAULT_MAX_BITSET_ID`.
pub fn idf_bitset<K>(index: &PostingIndex<K>) -> Result<IdfTable>
where
    K: DocumentId,
{
    idf_bitset_with_limit(index, DEFAULT_MAX_BITSET_ID)
}

/// [`idf_bitset`] accepting ids up to `max_id`.
///
/// # Errors
/// `InvalidDocumentId` for an id that is not an integer in `1..=max_id`.
pub fn idf_bitset_with_limit<K>(index: &PostingIndex<K>, max_id: u64) -> Result<IdfTable>
where
    K: DocumentId,
{
    let mut bitset = DocBitSet::new();
    for (_, docs) in index.iter() {
        for key in docs {
            bitset.insert(bit_position(key, max_id)?);
        }
    }
    Ok(idf_with_doc_num(index, bitset.cardinality()))
}

/// bit `id - 1`, only for ids in `1..=max_id`
fn bit_position<K: DocumentId>(key: &K, max_id: u64) -> Result<u64> {
    key.bit_position()
        .filter(|&position| position < max_id)
        .ok_or_else(|| Error::InvalidDocumentId(format!("{key:?}")))
}

fn idf_with_doc_num<K>(index: &PostingIndex<K>, doc_num: u64) -> IdfTable
where
    K: DocumentId,
{
    let total = doc_num as f64;
    let mut weights = IndexMap::with_capacity(index.len());
    for (token, docs) in index.iter() {
        // 空のposting listは重みなし(=0)
        if docs.is_empty() {
            continue;
        }
        weights.insert(Box::from(token), (total / docs.len() as f64).ln());
    }
    IdfTable { weights, doc_num }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    fn scenario_index() -> PostingIndex<u32> {
        [
            ("a", (1..=2).collect::<Vec<u32>>()),
            ("b", (2..=6).collect()),
            ("c", (1..=20).collect()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn tf_divides_by_total() {
        let mut freq = TokenFrequency::new();
        freq.add_token_n("a", 10)
            .add_token_n("b", 10)
            .add_token_n("c", 60)
            .add_token_n("d", 20);
        let tf_vec = tf(&freq);
        assert_close(tf_vec.get("a"), 0.1);
        assert_close(tf_vec.get("b"), 0.1);
        assert_close(tf_vec.get("c"), 0.6);
        assert_close(tf_vec.get("d"), 0.2);
        assert_close(tf_vec.sum(), 1.0);
    }

    #[test]
    fn tf_of_empty_counts_is_empty() {
        assert!(tf(&TokenFrequency::new()).is_empty());
    }

    #[test]
    fn idf_matches_log_ratio() {
        let table = idf(&scenario_index());
        assert_eq!(table.doc_num(), 20);
        assert_eq!(table.get("c"), 0.0);
        assert_close(table.get("b"), 4f64.ln());
        assert_close(table.get("a"), 10f64.ln());
        assert_eq!(table.get("unknown"), 0.0);
    }

    #[test]
    fn idf_bitset_agrees_with_distinct_count() {
        let index = scenario_index();
        assert_eq!(idf_bitset(&index).unwrap(), idf(&index));
    }

    #[test]
    fn idf_bitset_rejects_non_positive_ids() {
        let index: PostingIndex<i32> = [("a", vec![1, 0])].into_iter().collect();
        assert_eq!(
            idf_bitset(&index).unwrap_err(),
            Error::InvalidDocumentId("0".to_string())
        );
        let index: PostingIndex<String> = [("a", vec!["x".to_string()])].into_iter().collect();
        assert!(idf_bitset(&index).is_err());
    }

    #[test]
    fn idf_bitset_rejects_ids_above_limit() {
        let index: PostingIndex<u64> = [("a", vec![1, u64::MAX])].into_iter().collect();
        assert_eq!(
            idf_bitset(&index).unwrap_err(),
            Error::InvalidDocumentId(u64::MAX.to_string())
        );

        let index: PostingIndex<u64> = [("a", vec![1, 10]), ("b", vec![10])].into_iter().collect();
        assert!(idf_bitset_with_limit(&index, 9).is_err());
        let table = idf_bitset_with_limit(&index, 10).unwrap();
        assert_eq!(table.doc_num(), 2);
    }

    #[test]
    fn idf_is_positive_for_strict_subset() {
        let index: PostingIndex<u32> = [("common", vec![1, 2, 3]), ("rare", vec![2])].into_iter().collect();
        let table = idf(&index);
        assert_eq!(table.get("common"), 0.0);
        assert!(table.get("rare") > 0.0);
    }

    #[test]
    fn engine_checks_keys_only_for_bitset() {
        let distinct = DefaultTFIDFEngine::new();
        let bitset = DefaultTFIDFEngine::with_doc_count(DocCountStrategy::Bitset);
        let key = "doc".to_string();
        assert!(TFIDFEngine::<String>::check_key(&distinct, &key).is_ok());
        assert!(TFIDFEngine::<String>::check_key(&bitset, &key).is_err());
        assert!(TFIDFEngine::<u64>::check_key(&bitset, &7).is_ok());
        assert!(TFIDFEngine::<u64>::check_key(&bitset, &u64::MAX).is_err());

        let small = bitset.with_max_bitset_id(5);
        assert!(TFIDFEngine::<u64>::check_key(&small, &5).is_ok());
        assert!(TFIDFEngine::<u64>::check_key(&small, &6).is_err());
    }
}
