//! "Understanding Token Initialization": every word gets a token id and a
//! vector of random starting values. Regenerating draws everything afresh.

use crate::display::VOCABULARY;
use crate::prng::Prng;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Token ids are drawn from `0..MAX_TOKEN_ID`.
pub const MAX_TOKEN_ID: u32 = 5000;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TokenRow {
    pub word: &'static str,
    pub token_id: u32,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TokenInit {
    dims: usize,
    rows: Vec<TokenRow>,
}

impl TokenInit {
    pub fn generate(prng: &mut Prng, dims: usize) -> Self {
        let mut init = Self {
            dims,
            rows: Vec::with_capacity(VOCABULARY.len()),
        };
        init.regenerate(prng);
        init
    }

    pub fn regenerate(&mut self, prng: &mut Prng) {
        self.rows = VOCABULARY
            .iter()
            .map(|&word| TokenRow {
                word,
                token_id: prng.gen_range_u32(0, MAX_TOKEN_ID),
                values: prng.vector(self.dims, 0.0, 1.0, 3),
            })
            .collect();
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn rows(&self) -> &[TokenRow] {
        &self.rows
    }
}

/// Cells fade with lower values but never disappear.
pub fn opacity(value: f32) -> f32 {
    value * 0.8 + 0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_word() {
        let mut prng = Prng::new(9);
        let t = TokenInit::generate(&mut prng, 8);
        let words: Vec<_> = t.rows().iter().map(|r| r.word).collect();
        assert_eq!(words, VOCABULARY);
        for row in t.rows() {
            assert!(row.token_id < MAX_TOKEN_ID);
            assert_eq!(row.values.len(), 8);
            assert!(row.values.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn regenerate_changes_values() {
        let mut prng = Prng::new(9);
        let mut t = TokenInit::generate(&mut prng, 8);
        let before = t.clone();
        t.regenerate(&mut prng);
        assert_ne!(t, before);
        assert_eq!(t.dims(), 8);
    }

    #[test]
    fn opacity_range() {
        assert!((opacity(0.0) - 0.2).abs() < 1e-6);
        assert!((opacity(1.0) - 1.0).abs() < 1e-6);
    }
}
