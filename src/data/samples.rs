//! Word-to-example conversion for next-character prediction.
//!
//! Each word is padded as `. w_1 ... w_L .` and every window of three
//! consecutive symbols becomes one example: the first two symbols are the
//! context, the third is the label. A word of length `L` yields `L`
//! examples, so an empty word contributes none.

use ndarray::Array2;
use std::path::Path;

use super::vocab::{Vocabulary, BOUNDARY_ID};
use crate::core::{TrigramError, TrigramResult};

/// Training examples as parallel context and label sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// `(first, second)` context ids, one per example.
    pub contexts: Vec<(usize, usize)>,
    /// Next-symbol id, one per example.
    pub labels: Vec<usize>,
}

impl Dataset {
    /// Build the dataset for `words`, in word order then window order.
    ///
    /// # Errors
    /// - `UnknownChar` if a word contains a character outside `vocab`
    pub fn from_words<S: AsRef<str>>(words: &[S], vocab: &Vocabulary) -> TrigramResult<Self> {
        let mut dataset = Self::default();
        for word in words {
            for (first, second, label) in word_trigrams(word.as_ref(), vocab)? {
                dataset.contexts.push((first, second));
                dataset.labels.push(label);
            }
        }
        Ok(dataset)
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Encode every context as the summed one-hot of its two ids.
    ///
    /// Returns shape `(self.len(), vocab.size())`. A position holds 2.0 when
    /// both context ids coincide.
    ///
    /// # Errors
    /// - `UnknownId` if a context id is outside `vocab`
    pub fn encode_inputs(&self, vocab: &Vocabulary) -> TrigramResult<Array2<f32>> {
        let mut inputs = Array2::zeros((self.len(), vocab.size()));
        for (row, &(first, second)) in self.contexts.iter().enumerate() {
            inputs
                .row_mut(row)
                .assign(&vocab.encode_context(first, second)?);
        }
        Ok(inputs)
    }
}

/// All `(first, second, label)` windows of one boundary-padded word.
///
/// # Errors
/// - `UnknownChar` if `word` contains a character outside `vocab`
pub fn word_trigrams(word: &str, vocab: &Vocabulary) -> TrigramResult<Vec<(usize, usize, usize)>> {
    let mut ids = Vec::with_capacity(word.chars().count() + 2);
    ids.push(BOUNDARY_ID);
    for c in word.chars() {
        ids.push(vocab.encode(c)?);
    }
    ids.push(BOUNDARY_ID);

    Ok(ids.windows(3).map(|w| (w[0], w[1], w[2])).collect())
}

/// Read a corpus file with one word per line.
///
/// Empty lines and duplicates are kept, and `\r\n` endings are stripped.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read.
pub fn load_words(path: &Path) -> TrigramResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|source| TrigramError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(raw.lines().map(str::to_string).collect())
}
