//! # rescreen-bootstrap
//!
//! Runs a bootstrap stability experiment over a CRISPR screen count matrix:
//! the test libraries are resampled into cohorts of increasing size, and
//! `crispr_screen` is run once per cohort on a bounded worker pool.
//!
//! ```no_run
//! use rescreen_bootstrap::Rescreener;
//! use rescreen_core::config::RunConfig;
//!
//! let config = RunConfig {
//!     table: Some("counts.tsv".into()),
//!     reference: vec!["R1".to_string(), "R2".to_string()],
//!     ..Default::default()
//! };
//! let report = Rescreener::from_config(config)?.run()?;
//! println!("{}/{} cohorts completed", report.completed.len(), report.total);
//! # Ok::<(), rescreen_core::RescreenError>(())
//! ```
pub mod catalog;
pub mod invoker;
pub mod rescreener;
pub mod sampler;
pub mod scheduler;

pub use catalog::LibraryCatalog;
pub use invoker::{AggregationMethod, CommandTool, ScreenInvoker, ScreenOutcome, ScreenTool, ToolOutput};
pub use rescreener::Rescreener;
pub use sampler::{CohortSampler, SamplerConfig, SamplingMode};
pub use scheduler::{BootstrapReport, BootstrapScheduler, CohortFailure};
