//! # Trigram
//!
//! A character-level trigram language model for generating name-like strings.
//!
//! ## Overview
//!
//! Every name is padded with a boundary symbol `'.'` on both sides. Each run
//! of three symbols becomes one example: the first two predict the third. A
//! single `(V, V)` weight matrix maps the summed one-hot encoding of the two
//! context symbols to next-symbol logits. It is trained by full-batch gradient
//! descent on mean negative log-likelihood plus an L2 penalty, then sampled
//! one symbol at a time until the boundary is drawn again.
//!
//! ## Structure
//!
//! - [`core`] — Weight matrix, forward pass, loss and gradient
//! - [`data`] — Corpus loading, vocabulary, trigram examples
//! - [`training`] — Full-batch gradient-descent loop
//! - [`sampling`] — Categorical sampling of new names
//! - [`utils`] — Softmax and other math helpers
//!
//! A [`Model`] comes from [`Model::new`] (N(0, 1) weights from a caller-owned
//! generator) or from [`Model::from_weights`] for a known weight matrix.

pub mod core;
pub mod data;
pub mod sampling;
pub mod training;
pub mod utils;

pub use crate::core::{Model, TrigramError, TrigramResult};
pub use data::{Dataset, Vocabulary};
pub use sampling::{sample_name, sample_names};
pub use training::{train, train_step, TrainReport};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyper-parameters for training and sampling.
///
/// Used by [`train`], [`train_step`], and the `trigram` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of full-batch gradient-descent steps.
    pub iterations: usize,
    pub learning_rate: f32,
    /// Weight of the `mean(W²)` penalty.
    pub reg_strength: f32,
    /// Names to generate after training.
    pub num_samples: usize,
    /// Seed for weight initialisation; `None` draws from OS entropy.
    pub init_seed: Option<u64>,
    /// Seed for sampling; `None` draws from OS entropy.
    pub sample_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 100,
            learning_rate: 10.0,
            reg_strength: 0.01,
            num_samples: 20,
            init_seed: None,
            sample_seed: None,
        }
    }
}

impl Config {
    /// Check that the numeric hyper-parameters are usable.
    ///
    /// # Errors
    /// - `InvalidConfig` if `learning_rate` is not finite, or `reg_strength`
    ///   is negative or not finite
    pub fn validate(&self) -> TrigramResult<()> {
        if !self.learning_rate.is_finite() {
            return Err(TrigramError::InvalidConfig(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if !self.reg_strength.is_finite() || self.reg_strength < 0.0 {
            return Err(TrigramError::InvalidConfig(format!(
                "reg_strength must be finite and non-negative, got {}",
                self.reg_strength
            )));
        }
        Ok(())
    }

    /// Generator for weight initialisation.
    #[must_use]
    pub fn init_rng(&self) -> StdRng {
        seeded_rng(self.init_seed)
    }

    /// Generator for sampling, independent of [`Config::init_rng`].
    #[must_use]
    pub fn sample_rng(&self) -> StdRng {
        seeded_rng(self.sample_seed)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.learning_rate, 10.0);
        assert_eq!(config.reg_strength, 0.01);
        assert_eq!(config.num_samples, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = Config {
            reg_strength: -1.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(TrigramError::InvalidConfig(_))));

        let config = Config {
            learning_rate: f32::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seeded_rngs_are_reproducible() {
        let config = Config {
            init_seed: Some(1),
            sample_seed: Some(1),
            ..Config::default()
        };
        let a: u64 = config.init_rng().gen();
        let b: u64 = config.init_rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_serde() {
        let config = Config {
            init_seed: Some(42),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
