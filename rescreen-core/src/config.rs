//! Run and analysis configuration.
//!
//! Both structs can be loaded from TOML or YAML (picked by file extension) and
//! are then overridden field by field from the command line.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_AGGREGATION_METHOD, DEFAULT_AMALGAM_PREFIX, DEFAULT_FDR, DEFAULT_NUM_REPS,
    DEFAULT_PREFIX, DEFAULT_SEED, DEFAULT_STEP, DEFAULT_TOOL, DEFAULT_TOOL_THREADS,
};
use crate::errors::{RescreenError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Count matrix produced by `sgcount`.
    pub table: Option<PathBuf>,
    pub reference: Vec<String>,
    /// Test libraries; derived from the matrix header when absent.
    pub test: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub prefix: Option<PathBuf>,
    pub overwrite: bool,
    pub aggregation_method: String,
    pub use_product: bool,
    pub min_base_mean: Option<u64>,
    pub with_replacement: bool,
    pub step: usize,
    pub num_reps: usize,
    pub seed: u64,
    /// Worker pool size; unset or zero uses every available core.
    pub threads: Option<usize>,
    pub tool: String,
    pub tool_threads: usize,
    pub timeout_secs: Option<u64>,
    pub skip_full: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            table: None,
            reference: Vec::new(),
            test: None,
            exclude: Vec::new(),
            prefix: Some(PathBuf::from(DEFAULT_PREFIX)),
            overwrite: false,
            aggregation_method: DEFAULT_AGGREGATION_METHOD.to_string(),
            use_product: false,
            min_base_mean: None,
            with_replacement: true,
            step: DEFAULT_STEP,
            num_reps: DEFAULT_NUM_REPS,
            seed: DEFAULT_SEED,
            threads: None,
            tool: DEFAULT_TOOL.to_string(),
            tool_threads: DEFAULT_TOOL_THREADS,
            timeout_secs: None,
            skip_full: false,
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        load_config(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Output root of a previous run.
    pub directory: Option<PathBuf>,
    /// Alternative standard result table; defaults to the full-run table.
    pub standard: Option<PathBuf>,
    pub fdr: f64,
    pub ignore_amalgams: bool,
    pub amalgam_prefix: String,
    /// Extra columns every result table must carry.
    pub score_columns: Vec<String>,
    pub delimiter: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            directory: None,
            standard: None,
            fdr: DEFAULT_FDR,
            ignore_amalgams: true,
            amalgam_prefix: DEFAULT_AMALGAM_PREFIX.to_string(),
            score_columns: Vec::new(),
            delimiter: '\t',
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        load_config(path)
    }

    /// The export delimiter as a single byte, as the csv writer expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                RescreenError::Config(format!(
                    "Delimiter {:?} must be a single ASCII character",
                    self.delimiter
                ))
            })
    }
}

///
/// Deserialize a config struct from a `.toml`, `.yaml` or `.yml` file.
///
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let parse_error = |message: String| RescreenError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
        }
        _ => Err(RescreenError::Config(format!(
            "Unsupported config file extension for {:?}; expected .toml, .yaml or .yml",
            path
        ))),
    }
}
