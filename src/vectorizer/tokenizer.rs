use std::iter::FusedIterator;

use crate::{
    config::{validate_ngram_range, TokenizerConfig, DEFAULT_MAX_N, DEFAULT_MIN_N, DEFAULT_SEPARATOR},
    error::Result,
    vectorizer::token::TokenFrequency,
};

/// Turns text into token counts.
///
/// Implemented by [`NGramTokenizer`] and by any `Fn(&str) -> TokenFrequency`, so a closure can be
/// plugged into [`CorpusBuilder::tokenizer`](crate::CorpusBuilder::tokenizer).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> TokenFrequency;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> TokenFrequency + Send + Sync,
{
    #[inline]
    fn tokenize(&self, text: &str) -> TokenFrequency {
        self(text)
    }
}

/// Lazy iterator over the contiguous substrings of a text whose length (in chars) lies in
/// `[min_n, max_n]`.
///
/// For each start `i` it yields `text[i..j]` for `j` in `i + min_n ..= min(len, i + max_n)`.
/// Slices always fall on char boundaries.
#[derive(Debug, Clone)]
pub struct NGrams<'a> {
    text: &'a str,
    /// byte offset of every char plus `text.len()`
    bounds: Vec<usize>,
    min_n: usize,
    max_n: usize,
    start: usize,
    end: usize,
}

impl<'a> NGrams<'a> {
    fn new_unchecked(text: &'a str, min_n: usize, max_n: usize) -> Self {
        let mut bounds: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        bounds.push(text.len());
        Self {
            text,
            bounds,
            min_n,
            max_n,
            start: 0,
            end: min_n,
        }
    }

    /// text length in chars
    #[inline]
    fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }
}

impl<'a> Iterator for NGrams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let len = self.char_len();
        while self.start < len {
            let upper = len.min(self.start.saturating_add(self.max_n));
            if self.end <= upper {
                let gram = &self.text[self.bounds[self.start]..self.bounds[self.end]];
                self.end += 1;
                return Some(gram);
            }
            self.start += 1;
            self.end = self.start.saturating_add(self.min_n);
        }
        None
    }
}

impl FusedIterator for NGrams<'_> {}

/// n-grams of `text` between `min_n` and `max_n` chars.
///
/// Lengths above the remaining text are clamped; `min_n > len` yields nothing.
///
/// # Errors
/// `InvalidNGramRange` unless `1 <= min_n <= max_n`.
///
/// ```
/// use tf_idf_similarity::ngrams;
/// let grams: Vec<&str> = ngrams("abcd", 3, 4).unwrap().collect();
/// assert_eq!(grams, vec!["abc", "abcd", "bcd"]);
/// ```
pub fn ngrams(text: &str, min_n: usize, max_n: usize) -> Result<NGrams<'_>> {
    validate_ngram_range(min_n, max_n)?;
    Ok(NGrams::new_unchecked(text, min_n, max_n))
}

/// Default tokenizer: char n-grams plus separator-delimited words.
///
/// Both sources feed the same counter, so a word that equals one of the n-grams counts twice.
/// Splitting keeps empty fragments (`"a--b"` gives `"a"`, `""`, `"b"`), and an empty text
/// contributes a single empty word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGramTokenizer {
    min_n: usize,
    max_n: usize,
    separator: char,
}

impl Default for NGramTokenizer {
    fn default() -> Self {
        Self {
            min_n: DEFAULT_MIN_N,
            max_n: DEFAULT_MAX_N,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl NGramTokenizer {
    /// Create a tokenizer with the default separator.
    ///
    /// # Errors
    /// `InvalidNGramRange` unless `1 <= min_n <= max_n`.
    pub fn new(min_n: usize, max_n: usize) -> Result<Self> {
        validate_ngram_range(min_n, max_n)?;
        Ok(Self { min_n, max_n, separator: DEFAULT_SEPARATOR })
    }

    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_n: config.min_n,
            max_n: config.max_n,
            separator: config.separator,
        })
    }

    /// Replace the word separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn min_n(&self) -> usize {
        self.min_n
    }

    pub fn max_n(&self) -> usize {
        self.max_n
    }

    pub fn separator(&self) -> char {
        self.separator
    }
}

impl Tokenizer for NGramTokenizer {
    fn tokenize(&self, text: &str) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.extend(NGrams::new_unchecked(text, self.min_n, self.max_n));
        freq.extend(text.split(self.separator));
        freq
    }
}

/// Count the n-grams and dash-split words of `text`.
///
/// # Errors
/// `InvalidNGramRange` unless `1 <= min_n <= max_n`.
pub fn tokenize(text: &str, min_n: usize, max_n: usize) -> Result<TokenFrequency> {
    Ok(NGramTokenizer::new(min_n, max_n)?.tokenize(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sorted<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        let mut v: Vec<&str> = iter.collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn unigrams_are_every_char() {
        let s = "1234567 abcd";
        let mut chars: Vec<String> = s.chars().map(String::from).collect();
        chars.sort_unstable();
        let grams: Vec<String> = sorted(ngrams(s, 1, 1).unwrap()).into_iter().map(String::from).collect();
        assert_eq!(grams, chars);
    }

    #[test]
    fn full_length_gram_is_the_text() {
        let s = "1234567 abcd";
        let n = s.chars().count();
        assert_eq!(ngrams(s, n, n).unwrap().collect::<Vec<_>>(), vec![s]);
        assert_eq!(ngrams(s, n, n + 1).unwrap().collect::<Vec<_>>(), vec![s]);
        assert!(ngrams(s, n + 1, n + 1).unwrap().next().is_none());
    }

    #[test]
    fn near_full_length_grams() {
        let s = "1234567 abcd";
        let n = s.chars().count();
        let grams = sorted(ngrams(s, n - 1, n).unwrap());
        let mut expected = vec![&s[..n - 1], s, &s[1..]];
        expected.sort_unstable();
        assert_eq!(grams, expected);
    }

    #[test]
    fn every_gram_is_within_bounds_and_a_substring() {
        let s = "tested-string-is-this";
        for (min_n, max_n) in [(1, 1), (2, 4), (3, 5), (5, 50)] {
            for gram in ngrams(s, min_n, max_n).unwrap() {
                let len = gram.chars().count();
                assert!(len >= min_n && len <= max_n, "{gram:?} outside [{min_n}, {max_n}]");
                assert!(s.contains(gram));
            }
        }
    }

    #[test]
    fn huge_max_n_does_not_overflow() {
        let grams: Vec<&str> = ngrams("abc", 2, usize::MAX).unwrap().collect();
        assert_eq!(grams, vec!["ab", "abc", "bc"]);
    }

    #[test]
    fn ngrams_respect_char_boundaries() {
        let grams: Vec<&str> = ngrams("日本語", 2, 2).unwrap().collect();
        assert_eq!(grams, vec!["日本", "本語"]);
    }

    #[test]
    fn ngrams_reject_invalid_range() {
        assert_eq!(
            ngrams("abc", 3, 2).unwrap_err(),
            Error::InvalidNGramRange { min_n: 3, max_n: 2 }
        );
        assert!(ngrams("abc", 0, 2).is_err());
    }

    #[test]
    fn ngrams_of_empty_text() {
        assert!(ngrams("", 1, 3).unwrap().next().is_none());
    }

    #[test]
    fn tokenizer_counts_words_and_grams_together() {
        // no 7-grams in a 6 char word, so only the split words are counted
        let s = "tested-string-is-this-and-this-goes-on";
        let freq = tokenize(s, 7, 9).unwrap();
        assert_eq!(freq.token_count("this"), 2);
        assert_eq!(freq.token_count("tested"), 1);
        // 7..=9 char windows across the dashes
        assert_eq!(freq.token_count("tested-"), 1);

        let freq = tokenize("ab-ab", 2, 2).unwrap();
        // "ab" twice as 2-gram and twice as word
        assert_eq!(freq.token_count("ab"), 4);
        assert_eq!(freq.token_count("b-"), 1);
        assert_eq!(freq.token_count("-a"), 1);
        assert_eq!(freq.token_sum(), 6);
    }

    #[test]
    fn tokenizer_keeps_empty_fragments() {
        let freq = NGramTokenizer::default().tokenize("");
        assert_eq!(freq.token_count(""), 1);
        assert_eq!(freq.token_sum(), 1);

        let freq = tokenize("a--b", 3, 3).unwrap();
        assert_eq!(freq.token_count(""), 1);
        assert_eq!(freq.token_count("a--"), 1);
        assert_eq!(freq.token_count("--b"), 1);
    }

    #[test]
    fn custom_separator() {
        let tokenizer = NGramTokenizer::new(20, 20).unwrap().with_separator(' ');
        let freq = tokenizer.tokenize("foo bar foo");
        assert_eq!(freq.token_count("foo"), 2);
        assert_eq!(freq.token_count("bar"), 1);
        assert_eq!(freq.token_num(), 2);
    }

    #[test]
    fn closures_are_tokenizers() {
        let whitespace = |text: &str| text.split_whitespace().collect::<TokenFrequency>();
        let freq = whitespace.tokenize("a b a");
        assert_eq!(freq.token_count("a"), 2);
    }
}
