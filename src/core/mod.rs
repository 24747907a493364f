//! Core trigram model: the weight matrix, forward pass, loss, and gradient.
//!
//! The model is a single linear layer followed by a row-wise softmax:
//! ```text
//! logits = X W
//! P      = softmax(logits)
//! L      = mean_i(-ln P[i, y_i]) + λ mean(W²)
//! ```
//!
//! `X` has one row per example, each row the encoding of a context over the
//! `V = K + 1` symbols. `W` has shape `(V, V)`.
//!
//! ## Gradient
//!
//! Softmax followed by negative log-likelihood has the closed-form gradient
//! ```text
//! ∂L/∂W = Xᵀ (P - Y) / N + 2λ W / V²
//! ```
//! where `Y` is the one-hot label matrix and `N` the number of examples.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::{mean_square, softmax_rows};

/// Error type for trigram operations.
#[derive(Debug, Error)]
pub enum TrigramError {
    /// Corpus file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Character has no id in the vocabulary
    #[error("character {0:?} is not in the vocabulary")]
    UnknownChar(char),
    /// Id is outside the vocabulary
    #[error("symbol id {0} is out of range")]
    UnknownId(usize),
    /// Shape mismatch between inputs, labels, and weights
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    /// Invalid hyper-parameters
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A probability row that cannot be sampled from
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
}

pub type TrigramResult<T> = Result<T, TrigramError>;

/// Trigram language model over a vocabulary of `V` symbols.
///
/// Holds the only learned parameter, a dense `(V, V)` weight matrix. Row `i`
/// of `W` is the contribution of input symbol `i` to every next-symbol logit.
#[derive(Debug, Clone)]
pub struct Model {
    /// Weight matrix, shape `(V, V)`
    pub w: Array2<f32>,
}

impl Model {
    /// Create a model with weights drawn from N(0, 1).
    ///
    /// The caller owns the generator so initialisation can be seeded
    /// independently of sampling.
    pub fn new<R: Rng + ?Sized>(vocab_size: usize, rng: &mut R) -> Self {
        let w = Array2::random_using((vocab_size, vocab_size), StandardNormal, rng);
        Self { w }
    }

    /// Wrap an existing weight matrix, e.g. hand-set or previously trained
    /// weights.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `w` is not square
    pub fn from_weights(w: Array2<f32>) -> TrigramResult<Self> {
        if w.nrows() != w.ncols() {
            return Err(TrigramError::ShapeMismatch(format!(
                "weights must be square, got {:?}",
                w.dim()
            )));
        }
        Ok(Self { w })
    }

    /// Number of symbols the model scores.
    pub fn vocab_size(&self) -> usize {
        self.w.nrows()
    }

    fn check_inputs(&self, inputs: &ArrayView2<'_, f32>) -> TrigramResult<()> {
        if inputs.ncols() != self.vocab_size() {
            return Err(TrigramError::ShapeMismatch(format!(
                "inputs have {} columns, model expects {}",
                inputs.ncols(),
                self.vocab_size()
            )));
        }
        Ok(())
    }

    fn check_labels(&self, inputs: &ArrayView2<'_, f32>, labels: &[usize]) -> TrigramResult<()> {
        if labels.len() != inputs.nrows() {
            return Err(TrigramError::ShapeMismatch(format!(
                "{} labels for {} input rows",
                labels.len(),
                inputs.nrows()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&y| y >= self.vocab_size()) {
            return Err(TrigramError::UnknownId(bad));
        }
        Ok(())
    }

    /// Next-symbol probabilities for a batch of encoded contexts.
    ///
    /// Computes `softmax(inputs · W)` row-wise, shape `(N, V)`.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `inputs` does not have `V` columns
    pub fn forward(&self, inputs: &Array2<f32>) -> TrigramResult<Array2<f32>> {
        self.check_inputs(&inputs.view())?;
        Ok(softmax_rows(&inputs.dot(&self.w)))
    }

    /// Next-symbol distribution for a single encoded input, as a one-row batch.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `input` does not have length `V`
    pub fn next_distribution(&self, input: &Array1<f32>) -> TrigramResult<Array1<f32>> {
        let batch = input.view().insert_axis(Axis(0)).to_owned();
        let probs = self.forward(&batch)?;
        Ok(probs.row(0).to_owned())
    }

    /// Mean negative log-likelihood of `labels` under `probs`.
    ///
    /// Zero for an empty batch.
    fn nll_from_probs(probs: &Array2<f32>, labels: &[usize]) -> f32 {
        if labels.is_empty() {
            return 0.0;
        }
        let total: f32 = labels
            .iter()
            .enumerate()
            .map(|(i, &y)| -probs[[i, y]].ln())
            .sum();
        total / labels.len() as f32
    }

    /// Mean negative log-likelihood without the regularization term.
    ///
    /// # Errors
    /// - `ShapeMismatch` if inputs and labels disagree in length or width
    /// - `UnknownId` if a label is outside the vocabulary
    pub fn nll(&self, inputs: &Array2<f32>, labels: &[usize]) -> TrigramResult<f32> {
        self.check_labels(&inputs.view(), labels)?;
        let probs = self.forward(inputs)?;
        Ok(Self::nll_from_probs(&probs, labels))
    }

    /// Full training loss: NLL plus `reg_strength * mean(W²)`.
    ///
    /// # Errors
    /// Same as [`Model::nll`].
    pub fn loss(&self, inputs: &Array2<f32>, labels: &[usize], reg_strength: f32) -> TrigramResult<f32> {
        Ok(self.nll(inputs, labels)? + reg_strength * mean_square(&self.w))
    }

    /// Compute the loss and its gradient with respect to `W` in one pass.
    ///
    /// Returns `(loss, grad)` with `grad` shaped like `W`. With no examples the
    /// gradient is the L2 term alone.
    ///
    /// # Errors
    /// Same as [`Model::nll`].
    pub fn loss_and_gradient(
        &self,
        inputs: &Array2<f32>,
        labels: &[usize],
        reg_strength: f32,
    ) -> TrigramResult<(f32, Array2<f32>)> {
        self.check_labels(&inputs.view(), labels)?;
        let probs = self.forward(inputs)?;

        let n_weights = self.w.len() as f32;
        let loss = Self::nll_from_probs(&probs, labels) + reg_strength * mean_square(&self.w);

        // L2 term: d/dW [λ mean(W²)] = 2λW / |W|
        let mut grad = self.w.mapv(|v| 2.0 * reg_strength * v / n_weights);

        if !labels.is_empty() {
            // dL/dlogits = (P - Y) / N
            let n = labels.len() as f32;
            let mut d_logits = probs;
            for (mut row, &y) in d_logits.axis_iter_mut(Axis(0)).zip(labels) {
                row[y] -= 1.0;
            }
            d_logits /= n;
            grad += &inputs.t().dot(&d_logits);
        }

        Ok((loss, grad))
    }

    /// Gradient-descent update: `W ← W - lr * grad`.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `grad` is not shaped like `W`
    pub fn apply_gradient(&mut self, grad: &Array2<f32>, learning_rate: f32) -> TrigramResult<()> {
        if grad.dim() != self.w.dim() {
            return Err(TrigramError::ShapeMismatch(format!(
                "gradient {:?} does not match weights {:?}",
                grad.dim(),
                self.w.dim()
            )));
        }
        self.w.scaled_add(-learning_rate, grad);
        Ok(())
    }
}
