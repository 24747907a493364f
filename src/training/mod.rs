//! Full-batch gradient-descent training loop.
//!
//! Each step runs a forward pass over the whole dataset, computes the
//! closed-form gradient, and applies `W ← W - η ∇W`. There is no early
//! stopping and no mini-batching: the loop always runs `config.iterations`
//! steps.

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::core::{Model, TrigramResult};
use crate::Config;

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Loss at each step, measured before that step's update.
    pub losses: Vec<f32>,
    /// Loss of the final weights.
    pub final_loss: f32,
    /// Mean negative log-likelihood of the final weights, without the L2 term.
    pub final_nll: f32,
}

/// Run one gradient-descent step and return the loss before the update.
///
/// # Errors
/// - `ShapeMismatch` or `UnknownId` if inputs, labels, and weights disagree
pub fn train_step(
    model: &mut Model,
    inputs: &Array2<f32>,
    labels: &[usize],
    config: &Config,
) -> TrigramResult<f32> {
    let (loss, grad) = model.loss_and_gradient(inputs, labels, config.reg_strength)?;
    model.apply_gradient(&grad, config.learning_rate)?;
    Ok(loss)
}

/// Train for `config.iterations` steps.
///
/// `on_step(step, loss)` is called after every step with the loss reported by
/// [`train_step`]. A non-finite loss is logged once and training continues.
///
/// # Errors
/// - `InvalidConfig` if the hyper-parameters fail [`Config::validate`]
/// - `ShapeMismatch` or `UnknownId` if inputs, labels, and weights disagree
pub fn train<F>(
    model: &mut Model,
    inputs: &Array2<f32>,
    labels: &[usize],
    config: &Config,
    mut on_step: F,
) -> TrigramResult<TrainReport>
where
    F: FnMut(usize, f32),
{
    config.validate()?;
    info!(
        examples = labels.len(),
        vocab_size = model.vocab_size(),
        iterations = config.iterations,
        learning_rate = config.learning_rate,
        reg_strength = config.reg_strength,
        "training"
    );

    let mut losses = Vec::with_capacity(config.iterations);
    let mut warned = false;
    for step in 0..config.iterations {
        let loss = train_step(model, inputs, labels, config)?;
        debug!(step, loss, "step");
        if !loss.is_finite() && !warned {
            warn!(step, loss, "loss is no longer finite");
            warned = true;
        }
        on_step(step, loss);
        losses.push(loss);
    }

    let final_nll = model.nll(inputs, labels)?;
    let final_loss = model.loss(inputs, labels, config.reg_strength)?;
    info!(final_loss, final_nll, "training complete");

    Ok(TrainReport {
        losses,
        final_loss,
        final_nll,
    })
}
