use crate::vectorizer::{term::TermVector, tfidf::IdfTable};

/// Per-token weight used by [`cosine_similarity`].
///
/// Tokens the table does not know must weigh 0.
pub trait WeightTable: Sync {
    fn weight(&self, token: &str) -> f64;
}

impl WeightTable for IdfTable {
    #[inline(always)]
    fn weight(&self, token: &str) -> f64 {
        self.get(token)
    }
}

/// Same weight for every token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform(pub f64);

impl WeightTable for Uniform {
    #[inline(always)]
    fn weight(&self, _token: &str) -> f64 {
        self.0
    }
}

impl<F> WeightTable for F
where
    F: Fn(&str) -> f64 + Sync,
{
    #[inline(always)]
    fn weight(&self, token: &str) -> f64 {
        self(token)
    }
}

/// Weighted cosine similarity
///
/// dot = Σ(a_t * b_t * w_t^2) over shared tokens
/// ||a||^2 = Σ(a_t^2 * w_t^2)
/// score = sqrt(dot^2 / (||a||^2 * ||b||^2))
///
/// The result is the absolute cosine, in [0, 1] for non-negative inputs.
/// A zero norm on either side gives 0.
/// The final `min(1.0)` only absorbs floating point rounding; by Cauchy-Schwarz the exact
/// value never exceeds 1, whatever the sign of the weights.
///
/// ```
/// use tf_idf_similarity::{cosine_similarity, TermVector, Uniform};
/// let a: TermVector = [("a", 6.0), ("b", 8.0)].into_iter().collect();
/// let b: TermVector = [("a", 3.0), ("e", 4.0)].into_iter().collect();
/// let score = cosine_similarity(&a, &b, &Uniform(1.0));
/// assert!((score - 0.36).abs() < 1e-12);
/// ```
pub fn cosine_similarity<W>(vec: &TermVector, other: &TermVector, weights: &W) -> f64
where
    W: WeightTable + ?Sized,
{
    let mut dot = 0_f64;
    let mut norm_a = 0_f64;
    for (token, va) in vec.iter() {
        let w = weights.weight(token);
        let w2 = w * w;
        norm_a += va * va * w2;
        if other.contains_token(token) {
            dot += va * other.get(token) * w2;
        }
    }
    let norm_b = weighted_norm_sq(other, weights);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    ((dot * dot) / (norm_a * norm_b)).sqrt().min(1.0)
}

/// Σ(v_t^2 * w_t^2)
#[inline]
fn weighted_norm_sq<W>(vec: &TermVector, weights: &W) -> f64
where
    W: WeightTable + ?Sized,
{
    vec.iter()
        .map(|(token, v)| {
            let w = weights.weight(token);
            v * v * (w * w)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, f64)]) -> TermVector {
        pairs.iter().map(|&(token, weight)| (token, weight)).collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn self_similarity_is_one() {
        let d1 = vector(&[("a", 10.0), ("b", 10.0), ("c", 10.0), ("d", 10.0)]);
        assert_eq!(cosine_similarity(&d1, &d1, &Uniform(1.0)), 1.0);

        let d2 = vector(&[("a", 6.0), ("b", 8.0)]);
        assert_eq!(cosine_similarity(&d2, &d2, &Uniform(1.0)), 1.0);
        assert_eq!(cosine_similarity(&d2, &d2, &Uniform(0.3)), 1.0);
    }

    #[test]
    fn disjoint_vectors_score_zero() {
        let d1 = vector(&[("a", 10.0), ("b", 10.0), ("c", 10.0), ("d", 10.0)]);
        let d2 = vector(&[("e", 10.0)]);
        assert_eq!(cosine_similarity(&d1, &d2, &Uniform(1.0)), 0.0);
    }

    #[test]
    fn partial_overlap() {
        let d1 = vector(&[("a", 6.0), ("b", 8.0)]);
        let d2 = vector(&[("a", 3.0), ("e", 4.0)]);
        assert_close(cosine_similarity(&d1, &d2, &Uniform(1.0)), 0.36);
    }

    #[test]
    fn per_token_weights() {
        let d1 = vector(&[("a", 6.0), ("b", 4.0)]);
        let d2 = vector(&[("a", 3.0), ("e", 4.0)]);
        let weights = |token: &str| if token == "b" { 2.0 } else { 1.0 };
        assert_close(cosine_similarity(&d1, &d2, &weights), 0.36);
    }

    #[test]
    fn symmetric() {
        let d1 = vector(&[("a", 0.1), ("b", 0.5), ("c", 0.4)]);
        let d2 = vector(&[("c", 0.7), ("a", 0.2), ("x", 0.1)]);
        let weights = |token: &str| match token {
            "a" => 1.5,
            "b" => 0.2,
            _ => 0.9,
        };
        assert_close(
            cosine_similarity(&d1, &d2, &weights),
            cosine_similarity(&d2, &d1, &weights),
        );
    }

    #[test]
    fn weight_sign_does_not_matter() {
        let d1 = vector(&[("a", 0.3), ("b", 0.5), ("c", 0.2)]);
        let d2 = vector(&[("a", 0.6), ("c", 0.4)]);
        let positive = |token: &str| if token == "b" { 2.0 } else { 0.7 };
        let negative = |token: &str| -positive(token);
        let score = cosine_similarity(&d1, &d2, &negative);
        assert_eq!(score, cosine_similarity(&d1, &d2, &positive));
        assert!(score > 0.0 && score < 1.0);
        assert_eq!(cosine_similarity(&d1, &d1, &negative), 1.0);
    }

    #[test]
    fn zero_norm_scores_zero() {
        let empty = TermVector::new();
        let d1 = vector(&[("a", 1.0)]);
        assert_eq!(cosine_similarity(&empty, &d1, &Uniform(1.0)), 0.0);
        assert_eq!(cosine_similarity(&d1, &empty, &Uniform(1.0)), 0.0);
        // every token weighs 0
        assert_eq!(cosine_similarity(&d1, &d1, &IdfTable::default()), 0.0);
    }
}
