use thiserror::Error;

/// Errors raised when the index is misconfigured.
///
/// Degenerate numeric input (empty documents, zero norms, unknown tokens) is never an error;
/// those cases resolve to zero locally. Only caller misuse ends up here, so an `Err` can not
/// be confused with "no similar documents found".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// n-gram bounds must satisfy `1 <= min_n <= max_n`.
    #[error("invalid n-gram range: min_n={min_n}, max_n={max_n} (expected 1 <= min_n <= max_n)")]
    InvalidNGramRange { min_n: usize, max_n: usize },
    /// The minimum score threshold was NaN.
    #[error("invalid minimum score: {0}")]
    InvalidMinScore(f64),
    /// A document id that can not be placed in the document bitset: not an integer, below 1,
    /// or above the configured maximum.
    #[error("document id {0} is not an integer within the range of the bitset document count")]
    InvalidDocumentId(String),
    /// The same document id was supplied twice at construction.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
