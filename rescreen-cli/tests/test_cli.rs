#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::{TempDir, tempdir};

const FAKE_SCREEN: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "crispr_screen 0.0.0-fake"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then out="$2"; fi
    shift
done
case "$out" in
    *FAIL_PATTERN) echo "simulated failure" >&2; exit 1 ;;
esac
printf 'gene\tfdr\nA\t0.01\nB\t0.02\nC\t0.5\n' > "$out.gene_results.tsv"
"#;

#[fixture]
fn path_to_counts() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../tests/data/counts.tsv")
}

/// Write an executable stand-in for crispr_screen that fails for prefixes
/// ending in `fail_pattern`.
fn fake_screen(dir: &Path, fail_pattern: &str) -> PathBuf {
    let path = dir.join("fake_screen");
    std::fs::write(&path, FAKE_SCREEN.replace("FAIL_PATTERN", fail_pattern)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn rescreen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rescreen"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn run_args<'a>(counts: &'a str, tool: &'a str, prefix: &'a str) -> Vec<&'a str> {
    vec![
        "run", "-i", counts, "-c", "R1", "R2", "-o", prefix, "--num-reps", "2", "-T", "2",
        "--tool", tool,
    ]
}

fn workspace() -> TempDir {
    tempdir().unwrap()
}

#[rstest]
fn test_run_then_analyze(path_to_counts: PathBuf) {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "never");
    let prefix = dir.path().join("boot");
    let outdir = dir.path().join("analysis");

    let output = rescreen(&run_args(
        path_to_counts.to_str().unwrap(),
        tool.to_str().unwrap(),
        prefix.to_str().unwrap(),
    ));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(prefix.join("full/full.gene_results.tsv").is_file());
    // four test libraries, sizes 1..=3, two replicates each
    assert_eq!(std::fs::read_dir(prefix.join("subsets")).unwrap().count(), 6);
    assert!(!prefix.join("failed_cohorts.tsv").exists());

    let output = rescreen(&[
        "analyze",
        "-i",
        prefix.to_str().unwrap(),
        "-o",
        outdir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let overlaps = std::fs::read_to_string(outdir.join("overlaps.tsv")).unwrap();
    let rows: Vec<&str> = overlaps.lines().skip(1).collect();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.ends_with("\t2\t1")));

    let recovery = std::fs::read_to_string(outdir.join("recovery.tsv")).unwrap();
    assert_eq!(recovery, "gene\tnum_tests\tfrac_tests\nA\t6\t1\nB\t6\t1\n");
    assert!(outdir.join("subset_recovery.tsv").is_file());
}

#[rstest]
fn test_failed_cohorts_manifest(path_to_counts: PathBuf) {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "2_1");
    let prefix = dir.path().join("boot");

    let output = rescreen(&run_args(
        path_to_counts.to_str().unwrap(),
        tool.to_str().unwrap(),
        prefix.to_str().unwrap(),
    ));
    assert!(output.status.success());

    let manifest = std::fs::read_to_string(prefix.join("failed_cohorts.tsv")).unwrap();
    assert_eq!(
        manifest,
        "cohort\tsubset\treplicate\treason\n2_1\t2\t1\texit status 1: simulated failure\n"
    );
    assert_eq!(std::fs::read_dir(prefix.join("subsets")).unwrap().count(), 5);
}

#[rstest]
fn test_all_cohorts_failing_exits_nonzero(path_to_counts: PathBuf) {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "_[0-9]");
    let prefix = dir.path().join("boot");

    let mut args = run_args(
        path_to_counts.to_str().unwrap(),
        tool.to_str().unwrap(),
        prefix.to_str().unwrap(),
    );
    args.push("--skip-full");
    let output = rescreen(&args);

    assert!(!output.status.success());
    assert!(prefix.join("failed_cohorts.tsv").is_file());
}

#[rstest]
fn test_existing_prefix_conflicts(path_to_counts: PathBuf) {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "never");
    let prefix = dir.path().join("boot");
    std::fs::create_dir_all(&prefix).unwrap();

    let output = rescreen(&run_args(
        path_to_counts.to_str().unwrap(),
        tool.to_str().unwrap(),
        prefix.to_str().unwrap(),
    ));

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(std::fs::read_dir(&prefix).unwrap().count(), 0);
}

#[rstest]
fn test_unknown_reference(path_to_counts: PathBuf) {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "never");
    let prefix = dir.path().join("boot");

    let output = rescreen(&[
        "run",
        "-i",
        path_to_counts.to_str().unwrap(),
        "-c",
        "R7",
        "-o",
        prefix.to_str().unwrap(),
        "--tool",
        tool.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("`R7`"));
    assert!(!prefix.exists());
}

#[rstest]
fn test_check_reports_version() {
    let dir = workspace();
    let tool = fake_screen(dir.path(), "never");

    let output = rescreen(&["check", "--tool", tool.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("crispr_screen 0.0.0-fake"));

    let output = rescreen(&["check", "--tool", "no-such-screen-tool"]);
    assert!(!output.status.success());
}
