//! Reading `*.gene_results.tsv` tables back from a run directory.

use std::path::{Path, PathBuf};

use glob::glob;
use log::{debug, info};

use rescreen_core::config::AnalysisConfig;
use rescreen_core::consts::{DEFAULT_FDR, FDR_COLUMN, GENE_COLUMN, GENE_RESULTS_SUFFIX};
use rescreen_core::models::{CohortKey, HitRow, HitTable};
use rescreen_core::utils::{get_dynamic_reader, progress_bar, strip_gene_results_suffix};
use rescreen_core::{RescreenError, Result};

use crate::tables::BootstrapTable;

///
/// Loads a screen result table and keeps only its significant, real-gene rows.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTableLoader {
    fdr: f64,
    exclude_prefix: Option<String>,
    score_columns: Vec<String>,
    show_progress: bool,
}

impl Default for ResultTableLoader {
    fn default() -> Self {
        ResultTableLoader::new(DEFAULT_FDR)
    }
}

impl ResultTableLoader {
    pub fn new(fdr: f64) -> Self {
        ResultTableLoader {
            fdr,
            exclude_prefix: None,
            score_columns: Vec::new(),
            show_progress: true,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let exclude_prefix = match config.ignore_amalgams {
            true => Some(config.amalgam_prefix.clone()),
            false => None,
        };
        ResultTableLoader::new(config.fdr)
            .with_exclude_prefix(exclude_prefix)
            .with_score_columns(config.score_columns.clone())
    }

    /// Drop rows whose gene name starts with `prefix` (e.g. `amalgam`).
    pub fn with_exclude_prefix(mut self, prefix: Option<String>) -> Self {
        self.exclude_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Columns that must be present in addition to `gene` and `fdr`.
    pub fn with_score_columns(mut self, columns: Vec<String>) -> Self {
        self.score_columns = columns;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn fdr(&self) -> f64 {
        self.fdr
    }

    fn keep(&self, row: &HitRow) -> bool {
        if row.fdr.is_nan() || row.fdr >= self.fdr {
            return false;
        }
        match &self.exclude_prefix {
            Some(prefix) => !row.gene.starts_with(prefix.as_str()),
            None => true,
        }
    }

    ///
    /// Load one tab-separated (optionally gzipped) result table.
    ///
    /// # Arguments
    /// - path: the `<prefix>.gene_results.tsv` file
    ///
    pub fn load(&self, path: &Path) -> Result<HitTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(get_dynamic_reader(path)?);

        let header = reader.headers()?.clone();
        let position = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| RescreenError::MalformedTable {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };

        let gene_idx = position(GENE_COLUMN)?;
        let fdr_idx = position(FDR_COLUMN)?;
        for column in &self.score_columns {
            position(column)?;
        }

        let passthrough: Vec<usize> = (0..header.len())
            .filter(|i| *i != gene_idx && *i != fdr_idx)
            .collect();

        let mut table = HitTable {
            score_columns: passthrough.iter().map(|i| header[*i].to_string()).collect(),
            rows: Vec::new(),
        };

        for record in reader.records() {
            let record = record?;
            let raw_fdr = &record[fdr_idx];
            let fdr = parse_fdr(raw_fdr).ok_or_else(|| RescreenError::InvalidFdr {
                path: path.to_path_buf(),
                value: raw_fdr.to_string(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
            })?;

            let row = HitRow {
                gene: record[gene_idx].to_string(),
                fdr,
                scores: passthrough.iter().map(|i| record[*i].to_string()).collect(),
            };
            if self.keep(&row) {
                table.rows.push(row);
            }
        }

        debug!("{}: {} rows passed filters", path.display(), table.len());
        Ok(table)
    }

    ///
    /// Load every `subsets/*.gene_results.tsv` file, in sorted path order,
    /// tagging each table with the cohort parsed from its file name.
    ///
    pub fn load_bootstraps(&self, subset_dir: &Path) -> Result<BootstrapTable> {
        let paths = bootstrap_paths(subset_dir)?;
        info!("Loading {} bootstrap result tables", paths.len());

        let bar = progress_bar(paths.len() as u64, self.show_progress);
        bar.set_message("tables loaded");

        let mut bootstraps = BootstrapTable::new();
        for path in paths {
            let key = cohort_key(&path)?;
            let table = self.load(&path)?;
            bootstraps.push(key, table);
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(bootstraps)
    }
}

/// Parse an `fdr` cell. `NA`, `nan` and empty cells become NaN and never pass.
fn parse_fdr(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw {
        "" | "NA" | "na" | "NaN" | "nan" => Some(f64::NAN),
        _ => raw.parse::<f64>().ok(),
    }
}

fn bootstrap_paths(subset_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = subset_dir.join(format!("*{}", GENE_RESULTS_SUFFIX));
    let pattern = pattern.to_string_lossy();

    let entries = glob(&pattern).map_err(|e| {
        RescreenError::Config(format!("Invalid result glob {}: {}", pattern, e))
    })?;
    let mut paths = entries
        .map(|entry| entry.map_err(|e| RescreenError::Io(e.into_error())))
        .collect::<Result<Vec<_>>>()?;
    paths.sort();

    Ok(paths)
}

fn cohort_key(path: &Path) -> Result<CohortKey> {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = strip_gene_results_suffix(&file_name)
        .ok_or_else(|| RescreenError::InvalidCohortName(file_name.clone()))?;
    CohortKey::parse(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[rstest]
    fn test_fdr_is_strict() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "t.gene_results.tsv",
            "gene\tfdr\nA\t0.05\nB\t0.1\nC\t0.0999\n",
        );
        let table = ResultTableLoader::new(0.1).load(&path).unwrap();
        assert_eq!(table.genes().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[rstest]
    #[case(Some("amalgam".to_string()), vec!["A"])]
    #[case(None, vec!["A", "amalgam_3"])]
    fn test_amalgam_filter(#[case] prefix: Option<String>, #[case] expected: Vec<&str>) {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "t.gene_results.tsv",
            "gene\tfdr\nA\t0.01\namalgam_3\t0.01\n",
        );
        let table = ResultTableLoader::new(0.1)
            .with_exclude_prefix(prefix)
            .load(&path)
            .unwrap();
        assert_eq!(table.genes().collect::<Vec<_>>(), expected);
    }

    #[rstest]
    fn test_passthrough_columns() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "t.gene_results.tsv",
            "score\tgene\tpvalue\tfdr\n-2.5\tA\t0.001\t0.01\n",
        );
        let table = ResultTableLoader::new(0.1).load(&path).unwrap();
        assert_eq!(table.score_columns, vec!["score", "pvalue"]);
        assert_eq!(table.rows[0].scores, vec!["-2.5", "0.001"]);
        assert_eq!(table.rows[0].fdr, 0.01);
    }

    #[rstest]
    #[case("gene\tpvalue\nA\t0.1\n", "fdr")]
    #[case("name\tfdr\nA\t0.1\n", "gene")]
    #[case("gene\tfdr\nA\t0.1\n", "score")]
    fn test_missing_columns(#[case] contents: &str, #[case] missing: &str) {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "t.gene_results.tsv", contents);
        let result = ResultTableLoader::new(0.1)
            .with_score_columns(vec!["score".to_string()])
            .load(&path);
        match result {
            Err(RescreenError::MalformedTable { column, .. }) => assert_eq!(column, missing),
            other => panic!("expected MalformedTable, got {:?}", other),
        }
    }

    #[rstest]
    fn test_na_fdr_is_excluded() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "t.gene_results.tsv", "gene\tfdr\nA\tNA\nB\t\nC\t0.01\n");
        let table = ResultTableLoader::new(0.1).load(&path).unwrap();
        assert_eq!(table.genes().collect::<Vec<_>>(), vec!["C"]);
    }

    #[rstest]
    fn test_garbage_fdr_names_line() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "t.gene_results.tsv", "gene\tfdr\nA\t0.01\nB\tlow\n");
        match ResultTableLoader::new(0.1).load(&path) {
            Err(RescreenError::InvalidFdr { value, line, .. }) => {
                assert_eq!(value, "low");
                assert_eq!(line, 3);
            }
            other => panic!("expected InvalidFdr, got {:?}", other),
        }
    }

    #[rstest]
    fn test_load_bootstraps_keeps_empty_cohorts() {
        let dir = tempdir().unwrap();
        write(dir.path(), "2_0.gene_results.tsv", "gene\tfdr\nA\t0.01\n");
        write(dir.path(), "1_0.gene_results.tsv", "gene\tfdr\nB\t0.5\n");
        write(dir.path(), "notes.txt", "ignored");

        let table = ResultTableLoader::new(0.1)
            .with_progress(false)
            .load_bootstraps(dir.path())
            .unwrap();

        let names: Vec<&str> = table.cohorts().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["1_0", "2_0"]);
        assert_eq!(table.len(), 1);
    }

    #[rstest]
    fn test_bad_cohort_file_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "oops.gene_results.tsv", "gene\tfdr\n");
        let result = ResultTableLoader::new(0.1)
            .with_progress(false)
            .load_bootstraps(dir.path());
        assert!(matches!(result, Err(RescreenError::InvalidCohortName(_))));
    }
}
