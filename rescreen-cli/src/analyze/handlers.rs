use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use rescreen_analysis::{BootstrapAnalysis, ExportTable};
use rescreen_core::config::AnalysisConfig;

use super::cli::DEFAULT_OUTDIR;

pub fn build_analysis_config(matches: &ArgMatches) -> Result<AnalysisConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AnalysisConfig::from_file(Path::new(path))
            .with_context(|| format!("Unable to load analysis configuration from {}", path))?,
        None => AnalysisConfig::default(),
    };

    if let Some(directory) = matches.get_one::<String>("directory") {
        config.directory = Some(PathBuf::from(directory));
    }
    if let Some(standard) = matches.get_one::<String>("standard") {
        config.standard = Some(PathBuf::from(standard));
    }
    if let Some(fdr) = matches.get_one::<f64>("fdr") {
        config.fdr = *fdr;
    }
    if matches.get_flag("keep-amalgams") {
        config.ignore_amalgams = false;
    }
    if let Some(prefix) = matches.get_one::<String>("amalgam-prefix") {
        config.amalgam_prefix = prefix.clone();
    }
    if let Some(columns) = matches.get_many::<String>("score-column") {
        config.score_columns = columns.cloned().collect();
    }
    if let Some(delimiter) = matches.get_one::<char>("delimiter") {
        config.delimiter = *delimiter;
    }

    Ok(config)
}

fn requested_tables(matches: &ArgMatches) -> Result<Vec<ExportTable>> {
    let mut tables = match matches.get_many::<String>("tables") {
        Some(names) => names
            .map(|name| name.parse::<ExportTable>())
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => ExportTable::ALL.to_vec(),
    };
    tables.sort();
    tables.dedup();
    Ok(tables)
}

pub fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let config = build_analysis_config(matches)?;
    let tables = requested_tables(matches)?;
    let delimiter = config.delimiter_byte()?;

    let default_outdir = DEFAULT_OUTDIR.to_string();
    let outdir = matches.get_one::<String>("outdir").unwrap_or(&default_outdir);
    let outdir = Path::new(outdir);

    let analysis = BootstrapAnalysis::from_config(&config)?;
    for table in tables {
        analysis
            .export(table, outdir, delimiter)
            .with_context(|| format!("Unable to write the {} table", table))?;
    }

    info!("Analysis tables written to {}", outdir.display());
    Ok(())
}
