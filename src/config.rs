//! Runtime configuration for the tokenizer, the IDF calculation and queries.
//!
//! Every struct deserializes with serde and falls back to the defaults below for missing
//! fields, so a partial config such as `{"tokenizer": {"max_n": 4}}` is valid.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default lower bound of the n-gram length.
pub const DEFAULT_MIN_N: usize = 3;

/// Default upper bound of the n-gram length.
pub const DEFAULT_MAX_N: usize = 5;

/// Default word separator.
/// Words split on this character are counted next to the n-grams.
pub const DEFAULT_SEPARATOR: char = '-';

/// Default threshold for query results.
/// A hit must score strictly above it.
pub const DEFAULT_MIN_SCORE: f64 = 0.8;

/// n-gram tokenizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// shortest n-gram (in chars)
    pub min_n: usize,
    /// longest n-gram (in chars)
    pub max_n: usize,
    /// word separator
    pub separator: char,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_n: DEFAULT_MIN_N,
            max_n: DEFAULT_MAX_N,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl TokenizerConfig {
    /// Check `1 <= min_n <= max_n`.
    pub fn validate(&self) -> Result<()> {
        validate_ngram_range(self.min_n, self.max_n)
    }
}

pub(crate) fn validate_ngram_range(min_n: usize, max_n: usize) -> Result<()> {
    if min_n == 0 || min_n > max_n {
        return Err(Error::InvalidNGramRange { min_n, max_n });
    }
    Ok(())
}

/// Query settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// hits must score strictly above this value
    pub min_score: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { min_score: DEFAULT_MIN_SCORE }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        validate_min_score(self.min_score)
    }
}

pub(crate) fn validate_min_score(min_score: f64) -> Result<()> {
    if min_score.is_nan() {
        return Err(Error::InvalidMinScore(min_score));
    }
    Ok(())
}

/// Largest document id the bitset document count accepts by default.
/// The bitset needs one bit per id up to the largest one seen, 2 MiB at this bound.
pub const DEFAULT_MAX_BITSET_ID: u64 = 1 << 24;

/// How the IDF denominator (number of contributing documents) is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocCountStrategy {
    /// Collect the distinct ids seen across all posting lists.
    /// Works with any document id type.
    #[default]
    Distinct,
    /// OR `1 << (id - 1)` into a bitset and count the set bits.
    /// Requires document ids to be integers >= 1.
    Bitset,
}

/// IDF settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdfConfig {
    pub doc_count: DocCountStrategy,
    /// ids above this are rejected under [`DocCountStrategy::Bitset`]
    pub max_bitset_id: u64,
}

impl Default for IdfConfig {
    fn default() -> Self {
        Self {
            doc_count: DocCountStrategy::default(),
            max_bitset_id: DEFAULT_MAX_BITSET_ID,
        }
    }
}

/// Complete corpus configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub tokenizer: TokenizerConfig,
    pub query: QueryConfig,
    pub idf: IdfConfig,
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<()> {
        self.tokenizer.validate()?;
        self.query.validate()
    }
}
