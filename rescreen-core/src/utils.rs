use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};

use crate::consts::{GENE_RESULTS_SUFFIX, PROGRESS_TEMPLATE};
use crate::errors::Result;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read only the first line of a tab-separated file and split it into
/// column names. An empty file yields an empty header.
///
pub fn read_tsv_header(path: &Path) -> Result<Vec<String>> {
    let mut reader = get_dynamic_reader(path)?;
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() {
        return Ok(Vec::new());
    }

    Ok(line.split('\t').map(|s| s.to_string()).collect())
}

/// Path of the result table the external tool writes for a given output prefix.
pub fn gene_results_path(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(GENE_RESULTS_SUFFIX);
    PathBuf::from(name)
}

/// Strip the result-table suffix from a file name, e.g. `3_1.gene_results.tsv` -> `3_1`.
pub fn strip_gene_results_suffix(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(GENE_RESULTS_SUFFIX)
}

///
/// A progress bar in the shared style. Hidden bars still count, so callers
/// can read `position()` back in tests.
///
pub fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    let bar = match visible {
        true => ProgressBar::new(len),
        false => ProgressBar::hidden(),
    };
    bar.set_length(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[rstest]
    fn test_read_header_plain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counts.tsv");
        std::fs::write(&path, "Guide\tGene\tR1\tT1\ng1\tA\t1\t2\n").unwrap();

        let header = read_tsv_header(&path).unwrap();
        assert_eq!(header, vec!["Guide", "Gene", "R1", "T1"]);
    }

    #[rstest]
    fn test_read_header_gzipped_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counts.tsv.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"Guide\tGene\tR1\r\ng1\tA\t1\r\n").unwrap();
        enc.finish().unwrap();

        let header = read_tsv_header(&path).unwrap();
        assert_eq!(header, vec!["Guide", "Gene", "R1"]);
    }

    #[rstest]
    fn test_read_header_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        std::fs::write(&path, "").unwrap();
        assert!(read_tsv_header(&path).unwrap().is_empty());
    }

    #[rstest]
    #[case("out/subsets/3_1", "out/subsets/3_1.gene_results.tsv")]
    #[case("full/full", "full/full.gene_results.tsv")]
    fn test_gene_results_path(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(gene_results_path(Path::new(prefix)), PathBuf::from(expected));
    }

    #[rstest]
    fn test_strip_suffix() {
        assert_eq!(strip_gene_results_suffix("3_1.gene_results.tsv"), Some("3_1"));
        assert_eq!(strip_gene_results_suffix("3_1.tsv"), None);
    }

    #[rstest]
    fn test_hidden_progress_still_counts() {
        let bar = progress_bar(4, false);
        bar.inc(1);
        bar.inc(2);
        assert_eq!(bar.position(), 3);
        assert_eq!(bar.length(), Some(4));
    }
}
