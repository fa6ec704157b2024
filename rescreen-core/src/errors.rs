use std::path::PathBuf;

use thiserror::Error;

use crate::consts::TOOL_INSTALL_HINT;

#[derive(Error, Debug)]
pub enum RescreenError {
    #[error(
        "Count matrix does not match expected columns from `sgcount`, expecting first two columns to be [ `Guide`, `Gene` ]. Found: {found:?}"
    )]
    Schema { found: Vec<String> },

    #[error("{role} sample `{name}` is missing from columns in provided matrix")]
    UnknownLibrary { role: &'static str, name: String },

    #[error(
        "No treatment libraries found - either they were all excluded for being in the reference library or too many exclusions were provided"
    )]
    EmptyTestSet,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to parse configuration file {path:?}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error(
        "Unable to find `{tool}` in `$PATH` - you will need to install it. {hint}",
        hint = TOOL_INSTALL_HINT
    )]
    ToolNotFound { tool: String },

    #[error("The directory {0:?} already exists. Use overwrite to replace it.")]
    DirectoryConflict(PathBuf),

    #[error("The expected directory {0:?} does not exist")]
    DirectoryMissing(PathBuf),

    #[error("Result table {path:?} is missing required column `{column}`")]
    MalformedTable { path: PathBuf, column: String },

    #[error("Result table {path:?} has an unparseable `fdr` value `{value}` on line {line}")]
    InvalidFdr {
        path: PathBuf,
        value: String,
        line: u64,
    },

    #[error("Cohort name `{0}` does not end in `<subset>_<replicate>`")]
    InvalidCohortName(String),

    #[error("The standard hit set is empty; overlap fractions are undefined")]
    EmptyStandardSet,

    #[error("Full screen failed: {0}")]
    ScreenFailed(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RescreenError>;
