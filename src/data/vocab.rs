//! Character vocabulary built from the corpus.
//!
//! Id 0 is always the boundary symbol `'.'`, which marks both ends of a word.
//! The remaining ids `1..=K` enumerate the distinct corpus characters in
//! sorted order.

use ndarray::Array1;
use std::collections::{BTreeSet, HashMap};

use crate::core::{TrigramError, TrigramResult};

/// Sentinel symbol padding every word.
pub const BOUNDARY: char = '.';

/// Id reserved for [`BOUNDARY`].
pub const BOUNDARY_ID: usize = 0;

/// Character-to-id vocabulary with the boundary symbol at id 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Ordered list of symbols; `chars[id]` is the symbol for `id`.
    pub chars: Vec<char>,
    /// Reverse mapping from symbol to id.
    pub char_to_idx: HashMap<char, usize>,
}

impl Vocabulary {
    /// Build the vocabulary from a list of words.
    ///
    /// A corpus that itself contains `'.'` maps it to the boundary id rather
    /// than giving it a second id.
    #[must_use]
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let distinct: BTreeSet<char> = words
            .iter()
            .flat_map(|w| w.as_ref().chars())
            .filter(|&c| c != BOUNDARY)
            .collect();

        let chars: Vec<char> = std::iter::once(BOUNDARY).chain(distinct).collect();
        let char_to_idx: HashMap<char, usize> =
            chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { chars, char_to_idx }
    }

    /// Number of symbols, boundary included.
    #[must_use]
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Get the id for a character, or `None` if not in vocabulary.
    #[must_use]
    pub fn char_to_index(&self, c: char) -> Option<usize> {
        self.char_to_idx.get(&c).copied()
    }

    /// Get the character for an id, or `None` if out of bounds.
    #[must_use]
    pub fn index_to_char(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    /// Like [`Vocabulary::char_to_index`] but an error for unknown characters.
    ///
    /// # Errors
    /// - `UnknownChar` if `c` is not in the vocabulary
    pub fn encode(&self, c: char) -> TrigramResult<usize> {
        self.char_to_index(c).ok_or(TrigramError::UnknownChar(c))
    }

    /// Like [`Vocabulary::index_to_char`] but an error for unknown ids.
    ///
    /// # Errors
    /// - `UnknownId` if `idx >= self.size()`
    pub fn decode(&self, idx: usize) -> TrigramResult<char> {
        self.index_to_char(idx).ok_or(TrigramError::UnknownId(idx))
    }

    /// One-hot vector of length `self.size()` for a single id.
    ///
    /// # Errors
    /// - `UnknownId` if `idx >= self.size()`
    pub fn one_hot(&self, idx: usize) -> TrigramResult<Array1<f32>> {
        let mut v = Array1::zeros(self.size());
        *v.get_mut(idx).ok_or(TrigramError::UnknownId(idx))? = 1.0;
        Ok(v)
    }

    /// Encode a two-symbol context as the sum of the two one-hot vectors.
    ///
    /// When `first == second` that position holds 2.0.
    ///
    /// # Errors
    /// - `UnknownId` if either id is out of range
    pub fn encode_context(&self, first: usize, second: usize) -> TrigramResult<Array1<f32>> {
        Ok(self.one_hot(first)? + self.one_hot(second)?)
    }
}
