//! The on-disk directory contract of a rescreen run.
//!
//! ```text
//! <prefix>/
//!   full/
//!     full.gene_results.tsv
//!   subsets/
//!     <subset_size>_<replicate_index>.gene_results.tsv   (one per cohort)
//! ```
//!
//! [`OutputLayout::initialize`] moves a path from `absent` (or `present` with
//! overwrite) to `ready`. Once ready, the paths handed out never change.

use std::fs::{create_dir_all, remove_dir_all};
use std::path::{Path, PathBuf};

use crate::consts::{FULL_DIR, FULL_NAME_PREFIX, SUBSET_DIR};
use crate::errors::{RescreenError, Result};
use crate::utils::gene_results_path;

/// Observed state of an output root before initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Absent,
    Present,
}

impl LayoutState {
    pub fn inspect(root: &Path) -> Self {
        match root.exists() {
            true => LayoutState::Present,
            false => LayoutState::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    root: PathBuf,
    full_dir: PathBuf,
    subset_dir: PathBuf,
}

impl OutputLayout {
    fn from_root(root: PathBuf) -> Self {
        let full_dir = root.join(FULL_DIR);
        let subset_dir = root.join(SUBSET_DIR);
        OutputLayout {
            root,
            full_dir,
            subset_dir,
        }
    }

    ///
    /// Create the output root with its `full/` and `subsets/` subdirectories.
    ///
    /// # Arguments
    /// - prefix: output root; `None` is a configuration error raised before
    ///   touching the filesystem
    /// - overwrite: recursively replace an existing root instead of failing
    ///
    pub fn initialize(prefix: Option<&Path>, overwrite: bool) -> Result<Self> {
        let prefix = prefix.ok_or_else(|| {
            RescreenError::Config(
                "A prefix must be provided to initialize the output directory.".to_string(),
            )
        })?;
        if prefix.as_os_str().is_empty() {
            return Err(RescreenError::Config(
                "A prefix must be provided to initialize the output directory.".to_string(),
            ));
        }

        let root = std::path::absolute(prefix)?;
        let layout = OutputLayout::from_root(root);

        match (LayoutState::inspect(&layout.root), overwrite) {
            (LayoutState::Present, false) => {
                return Err(RescreenError::DirectoryConflict(layout.root));
            }
            (LayoutState::Present, true) => {
                remove_dir_all(&layout.root)?;
            }
            (LayoutState::Absent, _) => {}
        }

        create_dir_all(&layout.full_dir)?;
        create_dir_all(&layout.subset_dir)?;

        Ok(layout)
    }

    ///
    /// Attach to an existing, already-populated layout (for analysis).
    /// Fails if the root or either subdirectory is missing.
    ///
    pub fn open(root: &Path) -> Result<Self> {
        let root = std::path::absolute(root)?;
        let layout = OutputLayout::from_root(root);

        for dir in [&layout.root, &layout.full_dir, &layout.subset_dir] {
            if !dir.is_dir() {
                return Err(RescreenError::DirectoryMissing(dir.clone()));
            }
        }

        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn full_dir(&self) -> &Path {
        &self.full_dir
    }

    pub fn subset_dir(&self) -> &Path {
        &self.subset_dir
    }

    /// Output prefix handed to the tool for the full-dataset screen.
    pub fn full_prefix(&self) -> PathBuf {
        self.full_dir.join(FULL_NAME_PREFIX)
    }

    pub fn full_results(&self) -> PathBuf {
        gene_results_path(&self.full_prefix())
    }

    /// Output prefix handed to the tool for one cohort.
    pub fn cohort_prefix(&self, cohort_name: &str) -> PathBuf {
        self.subset_dir.join(cohort_name)
    }

    pub fn cohort_results(&self, cohort_name: &str) -> PathBuf {
        gene_results_path(&self.cohort_prefix(cohort_name))
    }
}
