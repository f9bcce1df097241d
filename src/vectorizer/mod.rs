pub mod compute;
pub mod evaluate;
pub mod index;
pub mod key;
pub mod preprocess;
pub mod term;
pub mod tfidf;
pub mod token;
pub mod tokenizer;

use std::{collections::HashSet, fmt::Debug};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    config::{validate_min_score, CorpusConfig, DEFAULT_MIN_SCORE},
    error::{Error, Result},
    vectorizer::{
        index::PostingIndex,
        key::DocumentId,
        preprocess::{Identity, Preprocessor},
        term::TermVector,
        tfidf::{DefaultTFIDFEngine, IdfTable, TFIDFEngine},
        token::TokenFrequency,
        tokenizer::{NGramTokenizer, Tokenizer},
    },
};

/// Immutable similarity index over a fixed set of documents.
///
/// Holds:
/// - the TF vector of every document
/// - the posting index (token -> documents)
/// - the IDF table derived from the posting index
/// - the tokenizer, preprocessor and engine it was built with, reused for queries
///
/// Nothing is mutated after construction, so a `Corpus` can be shared across threads for
/// reading. A changed document set needs a new `Corpus`.
pub struct Corpus<K, T = NGramTokenizer, P = Identity, E = DefaultTFIDFEngine>
where
    K: DocumentId,
{
    /// Document's TF Vector
    term_vectors: IndexMap<K, TermVector>,
    /// token -> documents containing it
    posting_index: PostingIndex<K>,
    /// IDF weights, derived from `posting_index`
    idf_table: IdfTable,
    tokenizer: T,
    preprocessor: P,
    engine: E,
    /// threshold used by `query`
    min_score: f64,
}

impl<K> Corpus<K>
where
    K: DocumentId,
{
    /// Build with the default tokenizer (3..=5 char n-grams plus dash-split words),
    /// no preprocessing and distinct-id document counting.
    ///
    /// ```
    /// use tf_idf_similarity::Corpus;
    /// let corpus = Corpus::new([(1, "foo-bar"), (2, "foo-baz"), (3, "qux")]).unwrap();
    /// let hits = corpus.query_with("foo", 0.0, None).unwrap();
    /// assert_eq!(hits.len(), 2);
    /// assert_eq!(hits.candidate_count, 2);
    /// ```
    pub fn new<I, S>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str> + Sync,
    {
        CorpusBuilder::new().build(docs)
    }

    /// Build with every setting taken from `config`.
    pub fn from_config<I, S>(config: &CorpusConfig, docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str> + Sync,
    {
        CorpusBuilder::from_config(config)?.build(docs)
    }
}

/// Accessors
impl<K, T, P, E> Corpus<K, T, P, E>
where
    K: DocumentId,
    T: Tokenizer,
    P: Preprocessor,
    E: TFIDFEngine<K>,
{
    /// TF vectors of all documents, in input order
    #[inline]
    pub fn term_vectors(&self) -> &IndexMap<K, TermVector> {
        &self.term_vectors
    }

    /// TF vector of one document
    #[inline]
    pub fn term_vector(&self, key: &K) -> Option<&TermVector> {
        self.term_vectors.get(key)
    }

    #[inline]
    pub fn posting_index(&self) -> &PostingIndex<K> {
        &self.posting_index
    }

    #[inline]
    pub fn idf_table(&self) -> &IdfTable {
        &self.idf_table
    }

    /// Number of indexed documents (including ones without tokens)
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.term_vectors.len()
    }

    #[inline]
    pub fn contains_doc(&self, key: &K) -> bool {
        self.term_vectors.contains_key(key)
    }

    /// Document ids in input order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.term_vectors.keys()
    }

    #[inline]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    #[inline]
    pub fn preprocessor(&self) -> &P {
        &self.preprocessor
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Default threshold of [`query`](Self::query)
    #[inline]
    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Token counts of `text` through this corpus's preprocessor and tokenizer
    pub fn tokenize(&self, text: &str) -> TokenFrequency {
        self.tokenizer.tokenize(&self.preprocessor.preprocess(text))
    }

    /// TF vector of `text`, computed the same way as the documents'
    pub fn vectorize(&self, text: &str) -> TermVector {
        self.engine.tf_vec(&self.tokenize(text))
    }
}

impl<K, T, P, E> Debug for Corpus<K, T, P, E>
where
    K: DocumentId,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("doc_num", &self.term_vectors.len())
            .field("vocab_size", &self.posting_index.len())
            .field("idf_doc_num", &self.idf_table.doc_num())
            .field("min_score", &self.min_score)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Corpus`]
///
/// ```
/// use tf_idf_similarity::{CorpusBuilder, Lowercase, NGramTokenizer};
/// let corpus = CorpusBuilder::new()
///     .tokenizer(NGramTokenizer::new(2, 4).unwrap())
///     .preprocessor(Lowercase)
///     .min_score(0.5)
///     .build([
///         ("a".to_string(), "Foo-Bar"),
///         ("b".to_string(), "foo-bar"),
///         ("c".to_string(), "something-else"),
///     ])
///     .unwrap();
/// assert_eq!(corpus.query("FOO-BAR").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CorpusBuilder<T = NGramTokenizer, P = Identity, E = DefaultTFIDFEngine> {
    tokenizer: T,
    preprocessor: P,
    engine: E,
    min_score: f64,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self {
            tokenizer: NGramTokenizer::default(),
            preprocessor: Identity,
            engine: DefaultTFIDFEngine::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with tokenizer, query and IDF settings from `config`.
    ///
    /// # Errors
    /// The config is validated first.
    pub fn from_config(config: &CorpusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: NGramTokenizer::from_config(&config.tokenizer)?,
            preprocessor: Identity,
            engine: DefaultTFIDFEngine::from_config(&config.idf),
            min_score: config.query.min_score,
        })
    }
}

impl<T, P, E> CorpusBuilder<T, P, E> {
    /// Replace the tokenizer
    pub fn tokenizer<T2: Tokenizer>(self, tokenizer: T2) -> CorpusBuilder<T2, P, E> {
        CorpusBuilder {
            tokenizer,
            preprocessor: self.preprocessor,
            engine: self.engine,
            min_score: self.min_score,
        }
    }

    /// Replace the preprocessor
    pub fn preprocessor<P2: Preprocessor>(self, preprocessor: P2) -> CorpusBuilder<T, P2, E> {
        CorpusBuilder {
            tokenizer: self.tokenizer,
            preprocessor,
            engine: self.engine,
            min_score: self.min_score,
        }
    }

    /// Replace the TF-IDF engine
    pub fn engine<E2>(self, engine: E2) -> CorpusBuilder<T, P, E2> {
        CorpusBuilder {
            tokenizer: self.tokenizer,
            preprocessor: self.preprocessor,
            engine,
            min_score: self.min_score,
        }
    }

    /// Default threshold of [`Corpus::query`]
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }
}

impl<T, P, E> CorpusBuilder<T, P, E>
where
    T: Tokenizer,
    P: Preprocessor,
{
    /// Index `docs`.
    ///
    /// Tokenizing runs in parallel; the posting index is merged on the calling thread in input
    /// order.
    ///
    /// # Errors
    /// - `InvalidMinScore` for a NaN threshold
    /// - `DuplicateDocument` when an id repeats
    /// - whatever the engine rejects (`InvalidDocumentId` under the bitset document count)
    pub fn build<K, I, S>(self, docs: I) -> Result<Corpus<K, T, P, E>>
    where
        K: DocumentId,
        E: TFIDFEngine<K>,
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str> + Sync,
    {
        validate_min_score(self.min_score)?;
        let docs: Vec<(K, S)> = docs.into_iter().collect();

        // idは全部先に検査する
        let mut seen = HashSet::with_capacity(docs.len());
        for (key, _) in &docs {
            self.engine.check_key(key)?;
            if !seen.insert(key) {
                return Err(Error::DuplicateDocument(format!("{key:?}")));
            }
        }
        drop(seen);

        let tokenized: Vec<TokenFrequency> = docs
            .par_iter()
            .map(|(_, text)| {
                self.tokenizer
                    .tokenize(&self.preprocessor.preprocess(text.as_ref()))
            })
            .collect();

        let mut term_vectors = IndexMap::with_capacity(docs.len());
        let mut posting_index = PostingIndex::new();
        for ((key, _), freq) in docs.into_iter().zip(tokenized) {
            if freq.is_empty() {
                warn!(doc = ?key, "document produced no tokens, it is left out of the idf document count");
            }
            posting_index.add_doc(&key, &freq);
            term_vectors.insert(key, self.engine.tf_vec(&freq));
        }

        let idf_table = self.engine.idf_vec(&posting_index)?;
        debug!(
            documents = term_vectors.len(),
            vocab_size = posting_index.len(),
            idf_doc_num = idf_table.doc_num(),
            "corpus built"
        );

        Ok(Corpus {
            term_vectors,
            posting_index,
            idf_table,
            tokenizer: self.tokenizer,
            preprocessor: self.preprocessor,
            engine: self.engine,
            min_score: self.min_score,
        })
    }
}
