//! Near-duplicate text detection with character n-gram TF-IDF vectors.
//!
//! Documents are tokenized into overlapping character n-grams plus separator-split words,
//! weighted by TF-IDF and compared with a weighted cosine similarity. Only documents sharing
//! at least one token with the query are ever scored.
pub mod config;
pub mod error;
pub mod utils;
pub mod vectorizer;

/// Similarity index over a fixed set of documents
/// The top-level struct of this crate.
///
/// Internally, it holds:
/// - Sparse TF vectors for each document
/// - An inverted index of documents (token -> documents)
/// - An IDF table
/// - The tokenizer, preprocessor and TF-IDF engine used to build it
///
/// `Corpus<K, T, P, E>` has the following generic parameters:
/// - `K`: Document key type (e.g., u64, String)
/// - `T`: Tokenizer (default `NGramTokenizer`)
/// - `P`: Preprocessor applied before tokenizing (default `Identity`)
/// - `E`: TF-IDF calculation engine type (default `DefaultTFIDFEngine`)
///
/// A `Corpus` is immutable once built and can be shared among threads.
pub use vectorizer::Corpus;

/// Builder for `Corpus`, for swapping the tokenizer, preprocessor, engine or threshold
pub use vectorizer::CorpusBuilder;

/// Token Frequency structure
/// A structure for analyzing token occurrence counts.
/// It keeps the count of each token and the total number of tokens.
pub use vectorizer::token::TokenFrequency;

/// Sparse token -> weight vector
pub use vectorizer::term::TermVector;

/// Inverted index: token -> documents containing it
pub use vectorizer::index::PostingIndex;

/// TF-IDF calculation engine
///
/// The engine computes TF vectors and the IDF table of a corpus.
/// `DefaultTFIDFEngine` is provided; implement `TFIDFEngine` for custom weighting.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, IdfTable, TFIDFEngine};

/// TF and IDF as plain functions
pub use vectorizer::tfidf::{idf, idf_bitset, idf_bitset_with_limit, tf};

/// Tokenization
///
/// `NGramTokenizer` is the default tokenizer. Any `Fn(&str) -> TokenFrequency` is a `Tokenizer`.
pub use vectorizer::tokenizer::{ngrams, tokenize, NGramTokenizer, NGrams, Tokenizer};

/// Text normalization applied before tokenizing
pub use vectorizer::preprocess::{Identity, Lowercase, Preprocessor};

/// Weighted cosine similarity
pub use vectorizer::compute::compare::{cosine_similarity, Uniform, WeightTable};

/// Query results
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Restricting a query to some documents
pub use vectorizer::evaluate::query::DocSubset;

/// Pairwise similarity over a corpus
pub use vectorizer::evaluate::pairwise::{similarity_dict, SimilarityDict};

/// Document id types
pub use vectorizer::key::DocumentId;

pub use config::{CorpusConfig, DocCountStrategy, IdfConfig, QueryConfig, TokenizerConfig};
pub use error::{Error, Result};
