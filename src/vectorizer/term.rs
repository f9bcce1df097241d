use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermVector struct
/// Sparse token -> weight mapping of one document or query.
/// After [`tf`](crate::vectorizer::tfidf::tf) every value lies in (0, 1] and the values sum to 1.
///
/// Looking up a token that is not present yields `0.0`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    #[serde(with = "indexmap::map::serde_seq")]
    weights: IndexMap<Box<str>, f64>,
}

impl TermVector {
    pub fn new() -> Self {
        Self { weights: IndexMap::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { weights: IndexMap::with_capacity(capacity) }
    }

    /// Set the weight of a token, replacing any previous weight.
    #[inline]
    pub fn insert(&mut self, token: &str, weight: f64) {
        self.weights.insert(Box::from(token), weight);
    }

    /// Weight of a token
    ///
    /// # Returns
    /// * `f64` - the weight, 0.0 for absent tokens
    #[inline]
    pub fn get(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Tokens in insertion order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(|token| token.as_ref())
    }

    /// (token, weight) pairs in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(token, &weight)| (token.as_ref(), weight))
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl<S> FromIterator<(S, f64)> for TermVector
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut vector = TermVector::new();
        for (token, weight) in iter {
            vector.insert(token.as_ref(), weight);
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_token_reads_zero() {
        let vector: TermVector = [("a", 0.25), ("b", 0.75)].into_iter().collect();
        assert_eq!(vector.get("a"), 0.25);
        assert_eq!(vector.get("zzz"), 0.0);
        assert!(!vector.contains_token("zzz"));
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.sum(), 1.0);
    }

    #[test]
    fn insert_replaces_weight() {
        let mut vector = TermVector::new();
        vector.insert("a", 1.0);
        vector.insert("a", 2.0);
        assert_eq!(vector.get("a"), 2.0);
        assert_eq!(vector.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}
