//! Classifier implementations.
//!
//! Estimators are small and pure so the scoring path stays generic over
//! `dyn Classifier`:
//! - request encoding (one-hot) lives in `encode`
//! - `logistic` and `trees` evaluate one encoded row

pub mod classifier;
pub mod encode;
pub mod logistic;
pub mod trees;

pub use classifier::*;
pub use encode::*;
