use indexmap::{IndexMap, IndexSet};

use crate::vectorizer::{key::DocumentId, token::TokenFrequency};

/// Reverse index: token -> ids of the documents that contain it.
///
/// Posting lists keep the order in which documents were added. Looking up an unknown token
/// gives an empty list, never an error.
#[derive(Debug, Clone)]
pub struct PostingIndex<K> {
    postings: IndexMap<Box<str>, IndexSet<K>>,
}

impl<K> Default for PostingIndex<K> {
    fn default() -> Self {
        Self { postings: IndexMap::new() }
    }
}

impl<K> PostingIndex<K>
where
    K: DocumentId,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` contains `token`.
    #[inline]
    pub fn add(&mut self, token: &str, key: K) {
        if let Some(docs) = self.postings.get_mut(token) {
            docs.insert(key);
        } else {
            self.postings.insert(Box::from(token), IndexSet::from([key]));
        }
    }

    /// Record every token of a document.
    pub fn add_doc(&mut self, key: &K, freq: &TokenFrequency) {
        for (token, _) in freq.iter() {
            self.add(token, key.clone());
        }
    }

    /// Posting list of a token, `None` when the token was never indexed.
    #[inline]
    pub fn posting_list(&self, token: &str) -> Option<&IndexSet<K>> {
        self.postings.get(token)
    }

    /// Documents containing `token`, empty for unknown tokens.
    #[inline]
    pub fn postings(&self, token: &str) -> impl Iterator<Item = &K> + '_ {
        self.postings.get(token).into_iter().flatten()
    }

    /// Number of documents containing `token`.
    #[inline]
    pub fn doc_freq(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, |docs| docs.len())
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// vocabulary size
    #[inline]
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// (token, posting list) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<K>)> + '_ {
        self.postings.iter().map(|(token, docs)| (token.as_ref(), docs))
    }

    /// Distinct ids appearing in at least one posting list.
    pub fn doc_ids(&self) -> IndexSet<&K> {
        self.postings.values().flatten().collect()
    }

    /// Union of the posting lists of `tokens`.
    pub fn candidates<'a, I>(&self, tokens: I) -> IndexSet<&K>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut candidates = IndexSet::new();
        for token in tokens {
            candidates.extend(self.postings(token));
        }
        candidates
    }
}

impl<K, S, D> FromIterator<(S, D)> for PostingIndex<K>
where
    K: DocumentId,
    S: AsRef<str>,
    D: IntoIterator<Item = K>,
{
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut index = PostingIndex::new();
        for (token, docs) in iter {
            for key in docs {
                index.add(token.as_ref(), key);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_has_no_postings() {
        let index: PostingIndex<u32> = PostingIndex::new();
        assert_eq!(index.postings("nope").count(), 0);
        assert_eq!(index.doc_freq("nope"), 0);
        assert!(index.posting_list("nope").is_none());
    }

    #[test]
    fn posting_lists_deduplicate() {
        let mut index = PostingIndex::new();
        index.add("foo", 1u32);
        index.add("foo", 1u32);
        index.add("foo", 2u32);
        assert_eq!(index.doc_freq("foo"), 2);
        assert_eq!(index.postings("foo").copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn add_doc_indexes_every_token() {
        let freq: TokenFrequency = ["foo", "bar", "foo"].into_iter().collect();
        let mut index = PostingIndex::new();
        index.add_doc(&"d1", &freq);
        assert!(index.contains_token("foo"));
        assert!(index.contains_token("bar"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn doc_ids_and_candidates_are_unions() {
        let index: PostingIndex<u32> =
            [("a", vec![1, 2]), ("b", vec![2, 3]), ("c", vec![4])].into_iter().collect();
        assert_eq!(index.doc_ids().len(), 4);
        let candidates = index.candidates(["a", "b", "missing"]);
        let mut ids: Vec<u32> = candidates.into_iter().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
