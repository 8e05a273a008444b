//! Domain types used throughout the scorer.
//!
//! This module defines:
//!
//! - the feature schema and scoring request (`FeatureSpec`, `ScoringRequest`)
//! - decision types (`Threshold`, `RiskLabel`, `ScoreResult`)
//! - the borrower form and its clamping rules (`BorrowerProfile`, `FORM_FIELDS`)

pub mod borrower;
pub mod types;

pub use borrower::*;
pub use types::*;
