use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use rescreen_bootstrap::Rescreener;
use rescreen_core::config::RunConfig;

fn strings(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
}

///
/// Start from the config file (if any) and apply every flag that was given.
///
pub fn build_run_config(matches: &ArgMatches) -> Result<RunConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RunConfig::from_file(Path::new(path))
            .with_context(|| format!("Unable to load run configuration from {}", path))?,
        None => RunConfig::default(),
    };

    if let Some(table) = matches.get_one::<String>("table") {
        config.table = Some(PathBuf::from(table));
    }
    if let Some(reference) = strings(matches, "reference") {
        config.reference = reference;
    }
    if let Some(test) = strings(matches, "test") {
        config.test = Some(test);
    }
    if let Some(exclude) = strings(matches, "exclude") {
        config.exclude = exclude;
    }
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        config.prefix = Some(PathBuf::from(prefix));
    }
    if let Some(method) = matches.get_one::<String>("method") {
        config.aggregation_method = method.clone();
    }
    if let Some(min_base_mean) = matches.get_one::<u64>("min-base-mean") {
        config.min_base_mean = Some(*min_base_mean);
    }
    if let Some(step) = matches.get_one::<usize>("step") {
        config.step = *step;
    }
    if let Some(num_reps) = matches.get_one::<usize>("num-reps") {
        config.num_reps = *num_reps;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = Some(*threads);
    }
    if let Some(tool) = matches.get_one::<String>("tool") {
        config.tool = tool.clone();
    }
    if let Some(tool_threads) = matches.get_one::<usize>("tool-threads") {
        config.tool_threads = *tool_threads;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout_secs = Some(*timeout);
    }

    // switches only ever turn a setting on
    if matches.get_flag("overwrite") {
        config.overwrite = true;
    }
    if matches.get_flag("use-product") {
        config.use_product = true;
    }
    if matches.get_flag("without-replacement") {
        config.with_replacement = false;
    }
    if matches.get_flag("skip-full") {
        config.skip_full = true;
    }

    Ok(config)
}

pub fn run_rescreen(matches: &ArgMatches) -> Result<()> {
    let config = build_run_config(matches)?;
    let rescreener = Rescreener::from_config(config)?;
    let report = rescreener.run()?;

    if let Some(manifest) = report
        .write_manifest(rescreener.layout().root())
        .context("Unable to write the failed cohort manifest")?
    {
        warn!(
            "{} of {} cohorts failed; see {}",
            report.failures.len(),
            report.total,
            manifest.display()
        );
    }

    if report.all_failed() {
        anyhow::bail!("All {} bootstrap cohorts failed", report.total);
    }

    info!("Results written to {}", rescreener.layout().root().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::cli::create_run_cli;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    fn test_defaults() {
        let matches = create_run_cli().get_matches_from(["run", "-i", "counts.tsv", "-c", "R1"]);
        let config = build_run_config(&matches).unwrap();
        assert_eq!(config.table, Some(PathBuf::from("counts.tsv")));
        assert_eq!(config.reference, vec!["R1"]);
        assert_eq!(config.prefix, Some(PathBuf::from("bootstraps")));
        assert_eq!(config.num_reps, 50);
        assert!(config.with_replacement);
    }

    #[rstest]
    fn test_flags_override() {
        let matches = create_run_cli().get_matches_from([
            "run",
            "-i",
            "counts.tsv",
            "-c",
            "R1",
            "R2",
            "-t",
            "T1",
            "T2",
            "-g",
            "rra",
            "--num-reps",
            "5",
            "--step",
            "2",
            "-T",
            "4",
            "--timeout",
            "60",
            "--without-replacement",
            "--use-product",
        ]);
        let config = build_run_config(&matches).unwrap();
        assert_eq!(config.reference, vec!["R1", "R2"]);
        assert_eq!(config.test, Some(vec!["T1".to_string(), "T2".to_string()]));
        assert_eq!(config.aggregation_method, "rra");
        assert_eq!(config.num_reps, 5);
        assert_eq!(config.step, 2);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.timeout_secs, Some(60));
        assert!(!config.with_replacement);
        assert!(config.use_product);
    }

    #[rstest]
    fn test_flags_beat_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "table = \"counts.tsv\"\nreference = [\"R1\"]\nnum_reps = 10\nseed = 7\n",
        )
        .unwrap();

        let matches = create_run_cli().get_matches_from([
            "run",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "99",
        ]);
        let config = build_run_config(&matches).unwrap();
        assert_eq!(config.num_reps, 10);
        assert_eq!(config.seed, 99);
        assert_eq!(config.reference, vec!["R1"]);
    }
}
