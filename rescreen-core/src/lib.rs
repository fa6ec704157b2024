//! # rescreen-core
//!
//! Shared building blocks for the rescreen crates: the data model (libraries,
//! cohorts, hit rows, overlap and recovery records), the error taxonomy, run
//! configuration, and the on-disk [`layout::OutputLayout`] contract.
//!
pub mod config;
pub mod consts;
pub mod errors;
pub mod layout;
pub mod models;
pub mod utils;

// re-expose the pieces nearly every consumer needs
pub use errors::{RescreenError, Result};
pub use layout::OutputLayout;
