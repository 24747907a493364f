//! Name generation from a trained model.
//!
//! Sampling starts at the boundary symbol. At each step the current symbol is
//! one-hot encoded, the model's next-symbol distribution is computed, and one
//! id is drawn from it. A sequence ends when the boundary is drawn again;
//! that final boundary is not part of the output. There is no length limit.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::core::{Model, TrigramError, TrigramResult};
use crate::data::{Vocabulary, BOUNDARY_ID};

/// Draw one symbol id from the model's distribution after `current`.
///
/// `current` is fed to the model as a plain one-hot via [`Vocabulary::one_hot`].
///
/// # Errors
/// - `UnknownId` if `current` is outside the vocabulary
/// - `ShapeMismatch` if the model and vocabulary sizes differ
/// - `InvalidDistribution` if the probabilities contain NaN, are negative,
///   or sum to zero
pub fn next_symbol<R: Rng + ?Sized>(
    model: &Model,
    vocab: &Vocabulary,
    current: usize,
    rng: &mut R,
) -> TrigramResult<usize> {
    let probs = model.next_distribution(&vocab.one_hot(current)?)?;
    let dist = WeightedIndex::new(probs.iter().copied())
        .map_err(|e| TrigramError::InvalidDistribution(format!("after symbol {current}: {e}")))?;
    Ok(dist.sample(rng))
}

/// Generate one name.
///
/// # Errors
/// - `ShapeMismatch` if the model and vocabulary sizes differ
/// - `InvalidDistribution` if a probability row cannot be sampled
pub fn sample_name<R: Rng + ?Sized>(model: &Model, vocab: &Vocabulary, rng: &mut R) -> TrigramResult<String> {
    if model.vocab_size() != vocab.size() {
        return Err(TrigramError::ShapeMismatch(format!(
            "model scores {} symbols, vocabulary has {}",
            model.vocab_size(),
            vocab.size()
        )));
    }

    let mut name = String::new();
    let mut current = BOUNDARY_ID;
    loop {
        current = next_symbol(model, vocab, current, rng)?;
        if current == BOUNDARY_ID {
            return Ok(name);
        }
        name.push(vocab.decode(current)?);
    }
}

/// Generate `count` independent names from the same generator.
///
/// # Errors
/// Same as [`sample_name`].
pub fn sample_names<R: Rng + ?Sized>(
    model: &Model,
    vocab: &Vocabulary,
    count: usize,
    rng: &mut R,
) -> TrigramResult<Vec<String>> {
    (0..count).map(|_| sample_name(model, vocab, rng)).collect()
}
