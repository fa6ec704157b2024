use std::fs::{File, create_dir_all};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::info;

use rescreen_core::config::AnalysisConfig;
use rescreen_core::models::{OverlapRecord, RecoveryRecord};
use rescreen_core::{OutputLayout, RescreenError, Result};

use crate::export::{ExportTable, write_overlaps, write_recovery};
use crate::loader::ResultTableLoader;
use crate::overlap::OverlapEngine;
use crate::recovery::RecoveryEngine;
use crate::tables::{BootstrapTable, StandardSet};

///
/// A loaded run directory: the standard hit set plus every cohort's filtered
/// hits, ready for overlap and recovery measurements.
///
pub struct BootstrapAnalysis {
    layout: OutputLayout,
    standard: StandardSet,
    bootstraps: BootstrapTable,
}

impl BootstrapAnalysis {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let directory = config.directory.as_deref().ok_or_else(|| {
            RescreenError::Config("An analysis directory must be provided".to_string())
        })?;
        BootstrapAnalysis::load(
            directory,
            config.standard.as_deref(),
            &ResultTableLoader::from_config(config),
        )
    }

    ///
    /// Load a run directory.
    ///
    /// # Arguments
    /// - directory: output root of a previous run (must contain `full/` and `subsets/`)
    /// - standard: result table to use as the standard; defaults to the full-run table
    /// - loader: filters applied to every table, standard included
    ///
    pub fn load(
        directory: &Path,
        standard: Option<&Path>,
        loader: &ResultTableLoader,
    ) -> Result<Self> {
        let layout = OutputLayout::open(directory)?;

        let standard_path = match standard {
            Some(path) => path.to_path_buf(),
            None => layout.full_results(),
        };
        info!("Loading standard from {}", standard_path.display());
        let standard = StandardSet::from(&loader.load(&standard_path)?);
        info!("Standard set holds {} genes", standard.len());

        let bootstraps = loader.load_bootstraps(layout.subset_dir())?;

        Ok(BootstrapAnalysis {
            layout,
            standard,
            bootstraps,
        })
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn standard(&self) -> &StandardSet {
        &self.standard
    }

    pub fn bootstraps(&self) -> &BootstrapTable {
        &self.bootstraps
    }

    pub fn overlaps(&self) -> Result<Vec<OverlapRecord>> {
        Ok(OverlapEngine::new(&self.standard)?.compute(&self.bootstraps))
    }

    pub fn recovery(&self) -> Vec<RecoveryRecord> {
        RecoveryEngine::new(&self.standard).compute(&self.bootstraps, None)
    }

    pub fn subset_recovery(&self) -> Vec<RecoveryRecord> {
        RecoveryEngine::new(&self.standard).compute_by_subset(&self.bootstraps)
    }

    ///
    /// Compute one table and write it to `outdir`, returning the file path.
    ///
    pub fn export(&self, table: ExportTable, outdir: &Path, delimiter: u8) -> Result<PathBuf> {
        enum Records {
            Overlaps(Vec<OverlapRecord>),
            Recovery(Vec<RecoveryRecord>, bool),
        }

        // no file is created for a table that fails to compute
        let records = match table {
            ExportTable::Overlaps => Records::Overlaps(self.overlaps()?),
            ExportTable::Recovery => Records::Recovery(self.recovery(), false),
            ExportTable::SubsetRecovery => Records::Recovery(self.subset_recovery(), true),
        };

        create_dir_all(outdir)?;
        let path = table.path_in(outdir, delimiter);
        let sink = BufWriter::new(File::create(&path)?);

        match records {
            Records::Overlaps(records) => write_overlaps(sink, &records, delimiter)?,
            Records::Recovery(records, with_subset) => {
                write_recovery(sink, &records, with_subset, delimiter)?
            }
        }

        info!("Wrote {} to {}", table, path.display());
        Ok(path)
    }
}
