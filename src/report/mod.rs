//! Reporting utilities: score results and model summaries.
//!
//! We keep formatting code in one place so the loading/scoring code stays
//! free of presentation concerns.

pub mod format;

pub use format::*;
