//! Constants shared across the rescreen crates: the on-disk layout contract,
//! the external tool defaults, and the analysis defaults.

/// Subdirectory of the output root holding the full-dataset screen.
pub const FULL_DIR: &str = "full";

/// Subdirectory of the output root holding one result table per cohort.
pub const SUBSET_DIR: &str = "subsets";

/// File prefix of the full-dataset screen inside [`FULL_DIR`].
pub const FULL_NAME_PREFIX: &str = "full";

/// Suffix the external tool appends to its output prefix.
pub const GENE_RESULTS_SUFFIX: &str = ".gene_results.tsv";

/// Failure manifest written next to `full/` and `subsets/` when cohorts fail.
pub const FAILURE_MANIFEST: &str = "failed_cohorts.tsv";

pub const DEFAULT_PREFIX: &str = "bootstraps";
pub const DEFAULT_TOOL: &str = "crispr_screen";
pub const DEFAULT_TOOL_SUBCOMMAND: &str = "test";
pub const DEFAULT_AGGREGATION_METHOD: &str = "geopagg";
pub const DEFAULT_TOOL_THREADS: usize = 1;
pub const DEFAULT_STEP: usize = 1;
pub const DEFAULT_NUM_REPS: usize = 50;
pub const DEFAULT_SEED: u64 = 42;

pub const DEFAULT_FDR: f64 = 0.1;
pub const DEFAULT_AMALGAM_PREFIX: &str = "amalgam";

pub const GENE_COLUMN: &str = "gene";
pub const FDR_COLUMN: &str = "fdr";

/// Fixed leading columns of an `sgcount` count matrix.
pub const GUIDE_COLUMN: &str = "Guide";
pub const GENE_MATRIX_COLUMN: &str = "Gene";

pub const TOOL_INSTALL_HINT: &str = "Refer to https://noamteyssier.github.io/crispr_screen/install.html for details.";

pub const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";
