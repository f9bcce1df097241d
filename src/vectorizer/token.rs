use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TokenFrequency struct
/// Counts how many times each token occurs in one document (or query).
/// This is the raw input of the TF calculation.
///
/// Tokens keep their first-insertion order, so iteration is reproducible.
///
/// # Examples
/// ```
/// use tf_idf_similarity::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("foo");
/// token_freq.add_token("bar");
/// token_freq.add_token("foo");
///
/// assert_eq!(token_freq.token_count("foo"), 2);
/// assert_eq!(token_freq.token_count("baz"), 0);
/// assert_eq!(token_freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Adding tokens
impl TokenFrequency {
    /// Create an empty TokenFrequency
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Add a token
    ///
    /// # Arguments
    /// * `token` - token to add
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        // 既存tokenならallocしない
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self.total_token_count += 1;
        self
    }

    /// Add a token `count` times
    ///
    /// # Arguments
    /// * `token` - token to add
    /// * `count` - number of occurrences, 0 is a no-op
    #[inline]
    pub fn add_token_n(&mut self, token: &str, count: u32) -> &mut Self {
        if count == 0 {
            return self;
        }
        if let Some(existing) = self.token_count.get_mut(token) {
            *existing += count;
        } else {
            self.token_count.insert(token.to_string(), count);
        }
        self.total_token_count += count as u64;
        self
    }
}

/// Getting information
impl TokenFrequency {
    /// Occurrences of a token
    ///
    /// # Arguments
    /// * `token` - token
    ///
    /// # Returns
    /// * `u32` - occurrences, 0 when the token was never added
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// Sum of all counts
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    /// `true` when no token was added
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_count.contains_key(token)
    }

    /// (token, count) pairs, in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}

impl<S> FromIterator<S> for TokenFrequency
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = TokenFrequency::new();
        for token in iter {
            freq.add_token(token.as_ref());
        }
        freq
    }
}

impl<S> Extend<S> for TokenFrequency
where
    S: AsRef<str>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.add_token(token.as_ref());
        }
    }
}
