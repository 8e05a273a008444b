//! Input/output helpers.
//!
//! - classifier artifact + threshold loading (`artifact`)
//! - scoring request JSON read/write (`request`)

pub mod artifact;
pub mod request;

pub use artifact::*;
pub use request::*;
