//! Word vectors and the scripted deltas that overwrite them.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The fixed vocabulary every panel works with, in display order.
pub const VOCABULARY: [&str; 4] = ["cat", "dog", "car", "book"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeltaError {
    #[error("word `{0}` is not part of the vocabulary")]
    UnknownWord(String),
    #[error("vector for `{word}` has {got} dimensions, expected {expected}")]
    Dimensions {
        word: String,
        got: usize,
        expected: usize,
    },
    #[error("{got} rows given for a vocabulary of {expected} words")]
    RowCount { got: usize, expected: usize },
}

/// Per-word vector overwrites applied when an example is consumed.
///
/// Setting the same word twice keeps the later vector.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Delta {
    overwrites: Vec<(&'static str, Vec<f32>)>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, word: &'static str, vector: impl Into<Vec<f32>>) -> Self {
        self.set(word, vector);
        self
    }

    pub fn set(&mut self, word: &'static str, vector: impl Into<Vec<f32>>) {
        let vector = vector.into();
        match self.overwrites.iter_mut().find(|(w, _)| *w == word) {
            Some(entry) => entry.1 = vector,
            None => self.overwrites.push((word, vector)),
        }
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.overwrites
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, v)| v.as_slice())
    }

    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.overwrites.iter().map(|(w, _)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f32])> {
        self.overwrites.iter().map(|(w, v)| (*w, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.overwrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overwrites.is_empty()
    }
}

/// The current vector of every vocabulary word.
///
/// Every word always has an entry and every entry has `dims()` values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WordVectors {
    words: &'static [&'static str],
    dims: usize,
    vectors: Vec<Vec<f32>>,
}

impl WordVectors {
    /// Every word starts at the same value.
    pub fn uniform(words: &'static [&'static str], dims: usize, value: f32) -> Self {
        Self {
            words,
            dims,
            vectors: vec![vec![value; dims]; words.len()],
        }
    }

    /// One row per word, in vocabulary order.
    pub fn from_rows(
        words: &'static [&'static str],
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, DeltaError> {
        let dims = rows.first().map(Vec::len).unwrap_or(0);
        if rows.len() != words.len() {
            return Err(DeltaError::RowCount {
                got: rows.len(),
                expected: words.len(),
            });
        }
        for (word, row) in words.iter().zip(&rows) {
            if row.len() != dims {
                return Err(DeltaError::Dimensions {
                    word: word.to_string(),
                    got: row.len(),
                    expected: dims,
                });
            }
        }
        Ok(Self {
            words,
            dims,
            vectors: rows,
        })
    }

    pub fn words(&self) -> &'static [&'static str] {
        self.words
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| *w == word)
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index_of(word).map(|i| self.vectors[i].as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f32])> {
        self.words
            .iter()
            .copied()
            .zip(self.vectors.iter().map(Vec::as_slice))
    }

    /// Reject deltas that name unknown words or carry the wrong length.
    pub fn check(&self, delta: &Delta) -> Result<(), DeltaError> {
        for (word, vector) in delta.iter() {
            if self.index_of(word).is_none() {
                return Err(DeltaError::UnknownWord(word.to_string()));
            }
            if vector.len() != self.dims {
                return Err(DeltaError::Dimensions {
                    word: word.to_string(),
                    got: vector.len(),
                    expected: self.dims,
                });
            }
        }
        Ok(())
    }

    /// Overwrite each word named by `delta`; other words keep their vector.
    ///
    /// Deltas are checked when their catalog is built, so entries that would
    /// break the invariants are skipped rather than applied.
    pub fn apply(&mut self, delta: &Delta) {
        for (word, vector) in delta.iter() {
            debug_assert_eq!(vector.len(), self.dims, "delta for `{word}`");
            match self.index_of(word) {
                Some(i) if vector.len() == self.dims => {
                    self.vectors[i].clear();
                    self.vectors[i].extend_from_slice(vector);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_only_named_words() {
        let mut s = WordVectors::uniform(&VOCABULARY, 4, 0.1);
        let delta = Delta::new().with("cat", [0.6, 0.3, 0.2, 0.2]);
        s.apply(&delta);

        assert_eq!(s.get("cat"), Some(&[0.6, 0.3, 0.2, 0.2][..]));
        for w in ["dog", "car", "book"] {
            assert_eq!(s.get(w), Some(&[0.1; 4][..]));
        }
    }

    #[test]
    fn apply_replaces_instead_of_adding() {
        let mut s = WordVectors::uniform(&VOCABULARY, 4, 0.5);
        s.apply(&Delta::new().with("dog", [0.2, 0.2, 0.2, 0.2]));
        s.apply(&Delta::new().with("dog", [0.3, 0.1, 0.0, 0.9]));
        assert_eq!(s.get("dog"), Some(&[0.3, 0.1, 0.0, 0.9][..]));
    }

    #[test]
    fn delta_set_twice_keeps_latest() {
        let d = Delta::new().with("car", [0.0; 4]).with("car", [1.0; 4]);
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("car"), Some(&[1.0; 4][..]));
    }

    #[test]
    fn check_rejects_bad_deltas() {
        let s = WordVectors::uniform(&VOCABULARY, 4, 0.1);
        let unknown = Delta::new().with("mouse", [0.1; 4]);
        assert_eq!(
            s.check(&unknown),
            Err(DeltaError::UnknownWord("mouse".to_string()))
        );

        let short = Delta::new().with("cat", [0.1; 3]);
        assert!(matches!(
            s.check(&short),
            Err(DeltaError::Dimensions { got: 3, expected: 4, .. })
        ));
    }

    #[test]
    fn from_rows_validates_shape() {
        let ok = WordVectors::from_rows(&VOCABULARY, vec![vec![0.0; 2]; 4]).unwrap();
        assert_eq!(ok.dims(), 2);

        let ragged = vec![vec![0.0; 2], vec![0.0; 2], vec![0.0; 3], vec![0.0; 2]];
        assert!(WordVectors::from_rows(&VOCABULARY, ragged).is_err());
        assert!(WordVectors::from_rows(&VOCABULARY, vec![vec![0.0; 2]; 3]).is_err());
    }

    #[test]
    fn iter_follows_vocabulary_order() {
        let s = WordVectors::uniform(&VOCABULARY, 1, 0.0);
        let words: Vec<_> = s.iter().map(|(w, _)| w).collect();
        assert_eq!(words, VOCABULARY);
    }
}
