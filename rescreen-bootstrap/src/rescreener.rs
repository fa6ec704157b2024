use std::path::PathBuf;
use std::time::Duration;

use log::info;

use rescreen_core::config::RunConfig;
use rescreen_core::models::{Cohort, LibraryPartition};
use rescreen_core::{OutputLayout, RescreenError, Result};

use crate::catalog::LibraryCatalog;
use crate::invoker::{AggregationMethod, CommandTool, ScreenInvoker, ScreenOutcome, ScreenTool};
use crate::sampler::{CohortSampler, SamplerConfig, SamplingMode};
use crate::scheduler::{BootstrapReport, BootstrapScheduler};

///
/// A validated, ready-to-run bootstrap experiment.
///
/// Construction performs every setup check in order and fails fast before any
/// tool process is started:
/// 1. the count matrix header (`Guide`, `Gene`, samples...)
/// 2. the test-library set (explicit or derived)
/// 3. every reference and test name exists in the matrix
/// 4. the screen tool is available
/// 5. the aggregation method is supported
/// 6. the output layout is created (or replaced with `overwrite`)
///
pub struct Rescreener<T: ScreenTool> {
    config: RunConfig,
    catalog: LibraryCatalog,
    partition: LibraryPartition,
    invoker: ScreenInvoker<T>,
    layout: OutputLayout,
    show_progress: bool,
}

impl Rescreener<CommandTool> {
    /// Set up a run against the executable named in `config.tool`.
    pub fn from_config(config: RunConfig) -> Result<Self> {
        let tool = CommandTool::new(config.tool.as_str())
            .with_timeout(config.timeout_secs.map(Duration::from_secs));
        Rescreener::with_tool(config, tool)
    }
}

impl<T: ScreenTool> Rescreener<T> {
    pub fn with_tool(config: RunConfig, tool: T) -> Result<Self> {
        let table = config.table.clone().ok_or_else(|| {
            RescreenError::Config("A count matrix (`table`) must be provided".to_string())
        })?;

        let catalog = LibraryCatalog::try_from(table.as_path())?;
        let partition =
            catalog.partition(&config.reference, config.test.as_deref(), &config.exclude)?;

        tool.check_available()?;
        let method: AggregationMethod = config.aggregation_method.parse()?;

        let layout = OutputLayout::initialize(config.prefix.as_deref(), config.overwrite)?;

        info!(
            "Reference libraries: {}",
            partition.reference_names().join(", ")
        );
        info!("Test libraries: {}", partition.test_names().join(", "));

        let invoker = ScreenInvoker::new(tool, table, partition.reference_names(), method)
            .with_use_product(config.use_product)
            .with_min_base_mean(config.min_base_mean)
            .with_tool_threads(config.tool_threads);

        Ok(Rescreener {
            config,
            catalog,
            partition,
            invoker,
            layout,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LibraryCatalog {
        &self.catalog
    }

    pub fn partition(&self) -> &LibraryPartition {
        &self.partition
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn invoker(&self) -> &ScreenInvoker<T> {
        &self.invoker
    }

    /// Draw the run's cohorts from a fresh generator seeded with `config.seed`.
    pub fn cohorts(&self) -> Result<Vec<Cohort>> {
        let mut sampler = CohortSampler::new(SamplerConfig {
            step: self.config.step,
            num_reps: self.config.num_reps,
            seed: self.config.seed,
            mode: SamplingMode::from_replacement(self.config.with_replacement),
        })?;
        Ok(sampler.generate(&self.partition.test_names()))
    }

    ///
    /// Screen every test library at once, writing to `full/`. A failure here
    /// fails the whole operation.
    ///
    pub fn run_full(&self) -> Result<PathBuf> {
        info!("Starting full screen");
        let outcome = self
            .invoker
            .invoke(&self.layout.full_prefix(), &self.partition.test_names())?;

        match outcome {
            ScreenOutcome::Completed { results } => {
                info!("Full screen written to {}", results.display());
                Ok(results)
            }
            other => Err(RescreenError::ScreenFailed(other.to_string())),
        }
    }

    /// Sample cohorts and screen each one in parallel, writing to `subsets/`.
    pub fn run_bootstraps(&self) -> Result<BootstrapReport> {
        let cohorts = self.cohorts()?;
        info!("Starting bootstrap screens over {} cohorts", cohorts.len());

        BootstrapScheduler::new(self.config.threads)
            .with_progress(self.show_progress)
            .run(&self.invoker, &self.layout, &cohorts)
    }

    /// The full screen (unless `skip_full`) followed by the bootstrap fan-out.
    pub fn run(&self) -> Result<BootstrapReport> {
        if !self.config.skip_full {
            self.run_full()?;
        }
        self.run_bootstraps()
    }
}
