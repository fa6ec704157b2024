//! # rescreen-analysis
//!
//! Aggregates the result tables of a rescreen run. Each cohort's hits are
//! compared with a standard hit set (by default the full-data screen):
//!
//! - **overlap**: per cohort, the fraction of the standard set it recovered
//! - **recovery**: per standard gene, the fraction of cohorts that called it,
//!   overall or per subset size
//!
//! ```no_run
//! use std::path::Path;
//! use rescreen_analysis::{BootstrapAnalysis, ResultTableLoader};
//!
//! let loader = ResultTableLoader::new(0.1).with_exclude_prefix(Some("amalgam".to_string()));
//! let analysis = BootstrapAnalysis::load(Path::new("bootstraps"), None, &loader)?;
//! for record in analysis.overlaps()? {
//!     println!("{}\t{}", record.cohort, record.frac_overlapping);
//! }
//! # Ok::<(), rescreen_core::RescreenError>(())
//! ```
pub mod analysis;
pub mod export;
pub mod loader;
pub mod overlap;
pub mod recovery;
pub mod tables;

pub use analysis::BootstrapAnalysis;
pub use export::ExportTable;
pub use loader::ResultTableLoader;
pub use overlap::OverlapEngine;
pub use recovery::RecoveryEngine;
pub use tables::{BootstrapTable, StandardSet};
