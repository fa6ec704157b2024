//! Parallel fan-out of cohorts onto the screen tool.
//!
//! Cohorts run on a bounded rayon pool, so at most `threads` tool processes are
//! alive at once. A failing cohort never aborts the pool: it is logged, its
//! partial output is removed and it is recorded in the [`BootstrapReport`].

use std::fs::remove_file;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use rescreen_core::consts::FAILURE_MANIFEST;
use rescreen_core::models::{Cohort, CohortKey};
use rescreen_core::utils::progress_bar;
use rescreen_core::{OutputLayout, RescreenError, Result};

use crate::invoker::{ScreenInvoker, ScreenOutcome, ScreenTool};

#[derive(Debug, Clone, PartialEq)]
pub struct CohortFailure {
    pub key: CohortKey,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    pub total: usize,
    /// Names of cohorts whose result table is on disk, in cohort order.
    pub completed: Vec<String>,
    pub failures: Vec<CohortFailure>,
}

impl BootstrapReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.completed.is_empty()
    }

    ///
    /// Write `cohort, subset, replicate, reason` rows for every failed cohort.
    /// Returns the path written, or `None` when nothing failed.
    ///
    pub fn write_manifest(&self, root: &Path) -> Result<Option<PathBuf>> {
        if !self.has_failures() {
            return Ok(None);
        }

        let path = root.join(FAILURE_MANIFEST);
        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(&path)?;
        writer.write_record(["cohort", "subset", "replicate", "reason"])?;
        for failure in &self.failures {
            writer.write_record([
                failure.key.name.clone(),
                failure.key.subset.to_string(),
                failure.key.replicate.to_string(),
                failure.reason.clone(),
            ])?;
        }
        writer.flush()?;

        Ok(Some(path))
    }
}

pub struct BootstrapScheduler {
    threads: Option<usize>,
    show_progress: bool,
}

impl Default for BootstrapScheduler {
    fn default() -> Self {
        BootstrapScheduler::new(None)
    }
}

impl BootstrapScheduler {
    /// `None` or `Some(0)` uses every available execution unit.
    pub fn new(threads: Option<usize>) -> Self {
        BootstrapScheduler {
            threads,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    ///
    /// Run every cohort once and block until all have finished.
    ///
    /// # Arguments
    /// - invoker: run-constant tool arguments
    /// - layout: a ready output layout; each cohort writes to `subsets/<name>`
    /// - cohorts: the pre-drawn cohorts
    ///
    pub fn run<T: ScreenTool>(
        &self,
        invoker: &ScreenInvoker<T>,
        layout: &OutputLayout,
        cohorts: &[Cohort],
    ) -> Result<BootstrapReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .build()
            .map_err(|e| RescreenError::Config(format!("Unable to build worker pool: {}", e)))?;

        info!(
            "Running {} bootstrap screens on {} workers",
            cohorts.len(),
            pool.current_num_threads()
        );

        let bar = progress_bar(cohorts.len() as u64, self.show_progress);
        bar.set_message("cohorts screened");

        let outcomes: Vec<(&Cohort, std::result::Result<(), String>)> = pool.install(|| {
            cohorts
                .par_iter()
                .map(|cohort| {
                    let outcome = run_cohort(invoker, layout, cohort);
                    bar.inc(1);
                    (cohort, outcome)
                })
                .collect()
        });
        bar.finish_and_clear();

        let mut report = BootstrapReport {
            total: cohorts.len(),
            ..Default::default()
        };
        for (cohort, outcome) in outcomes {
            match outcome {
                Ok(()) => report.completed.push(cohort.name().to_string()),
                Err(reason) => report.failures.push(CohortFailure {
                    key: cohort.key.clone(),
                    reason,
                }),
            }
        }

        info!(
            "Bootstrap screens finished: {}/{} completed",
            report.completed.len(),
            report.total
        );
        Ok(report)
    }
}

fn run_cohort<T: ScreenTool>(
    invoker: &ScreenInvoker<T>,
    layout: &OutputLayout,
    cohort: &Cohort,
) -> std::result::Result<(), String> {
    let prefix = layout.cohort_prefix(cohort.name());
    let reason = match invoker.invoke(&prefix, &cohort.libraries) {
        Ok(ScreenOutcome::Completed { .. }) => return Ok(()),
        Ok(outcome) => outcome.to_string(),
        Err(e) => e.to_string(),
    };

    warn!("Cohort {} failed: {}", cohort.name(), reason);

    let partial = layout.cohort_results(cohort.name());
    if partial.exists() {
        if let Err(e) = remove_file(&partial) {
            warn!("Unable to remove partial output {}: {}", partial.display(), e);
        }
    }

    Err(reason)
}
