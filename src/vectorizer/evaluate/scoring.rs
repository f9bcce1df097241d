use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// One query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEntry<K> {
    /// document id
    pub key: K,
    /// cosine similarity to the query, in [0, 1]
    pub score: f64,
    /// number of candidate documents the query was scored against
    /// (after subset filtering, before score filtering)
    pub candidate_count: usize,
}

/// Structure to store query results
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Hits<K> {
    pub list: Vec<HitEntry<K>>,
    /// candidates scored, also known when no hit passed the threshold
    pub candidate_count: usize,
}

impl<K> Hits<K> {
    /// Create a new Hits instance
    pub fn new(list: Vec<HitEntry<K>>, candidate_count: usize) -> Self {
        Hits { list, candidate_count }
    }

    /// Sort results by descending score, then by ascending key
    pub fn sort_by_score(&mut self) -> &mut Self
    where
        K: Ord,
    {
        // Remove NaN scores
        self.list.retain(|hit| !hit.score.is_nan());
        self.list
            .sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.key.cmp(&b.key)));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry<K>> {
        self.list.iter()
    }

    /// Document ids in result order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|hit| &hit.key)
    }

    /// Best hit, if any
    pub fn first(&self) -> Option<&HitEntry<K>> {
        self.list.first()
    }
}

impl<K> IntoIterator for Hits<K> {
    type Item = HitEntry<K>;
    type IntoIter = std::vec::IntoIter<HitEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a Hits<K> {
    type Item = &'a HitEntry<K>;
    type IntoIter = std::slice::Iter<'a, HitEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits ({} candidates) [", self.candidate_count)?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:.6} (candidates: {})", hit.key, hit.score, hit.candidate_count)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<K> Display for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>4}. {:?}\t{:.6}", rank + 1, hit.key, hit.score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(key: u32, score: f64) -> HitEntry<u32> {
        HitEntry { key, score, candidate_count: 4 }
    }

    #[test]
    fn sorts_descending_with_key_tiebreak() {
        let mut hits = Hits::new(vec![hit(3, 0.5), hit(1, 0.9), hit(4, 0.5), hit(2, 0.5)], 4);
        hits.sort_by_score();
        assert_eq!(hits.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn drops_nan_scores() {
        let mut hits = Hits::new(vec![hit(1, f64::NAN), hit(2, 0.1)], 4);
        hits.sort_by_score();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().map(|h| h.key), Some(2));
    }

    #[test]
    fn display_ranks_hits() {
        let hits = Hits::new(vec![hit(7, 0.25)], 4);
        assert_eq!(hits.to_string(), "   1. 7\t0.250000\n");
        assert!(format!("{hits:#?}").contains("7: 0.250000 (candidates: 4)"));
    }
}
