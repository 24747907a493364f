//! Corpus loading, vocabulary, and training examples.
//!
//! ## Submodules
//!
//! - [`vocab`] — Character vocabulary with the boundary symbol at id 0
//! - [`samples`] — Word-to-trigram conversion and input encoding

pub mod samples;
pub mod vocab;

pub use samples::{load_words, word_trigrams, Dataset};
pub use vocab::{Vocabulary, BOUNDARY, BOUNDARY_ID};
