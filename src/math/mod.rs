//! Mathematical utilities: link functions shared by the estimators.

pub mod link;

pub use link::*;
