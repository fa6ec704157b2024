use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rescreen_core::consts::{GENE_MATRIX_COLUMN, GUIDE_COLUMN};
use rescreen_core::models::{Library, LibraryPartition, LibraryRole};
use rescreen_core::utils::read_tsv_header;
use rescreen_core::{RescreenError, Result};

///
/// The sample columns of a count matrix. Only the header line is read.
///
#[derive(Debug, Clone)]
pub struct LibraryCatalog {
    pub path: PathBuf,
    libraries: Vec<String>,
}

impl TryFrom<&Path> for LibraryCatalog {
    type Error = RescreenError;

    ///
    /// Read the header of a count matrix and check that it starts with
    /// `Guide`, `Gene` in that order.
    ///
    /// # Arguments:
    /// - value: path to the (optionally gzipped) count matrix
    fn try_from(value: &Path) -> Result<Self> {
        let columns = read_tsv_header(value)?;

        if columns.len() < 2 || columns[0] != GUIDE_COLUMN || columns[1] != GENE_MATRIX_COLUMN {
            return Err(RescreenError::Schema {
                found: columns.into_iter().take(2).collect(),
            });
        }

        Ok(LibraryCatalog {
            path: value.to_path_buf(),
            libraries: columns.into_iter().skip(2).collect(),
        })
    }
}

impl LibraryCatalog {
    /// Every sample column, excluding `Guide` and `Gene`.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.iter().any(|l| l == name)
    }

    ///
    /// All columns minus the reference libraries, the caller's exclusions and
    /// the two fixed columns, in header order.
    ///
    pub fn derive_test_libraries(&self, reference: &[String], exclude: &[String]) -> Result<Vec<String>> {
        let mut exclusion: HashSet<&str> = exclude.iter().map(|s| s.as_str()).collect();
        exclusion.extend(reference.iter().map(|s| s.as_str()));
        exclusion.insert(GUIDE_COLUMN);
        exclusion.insert(GENE_MATRIX_COLUMN);

        let inclusion: Vec<String> = self
            .libraries
            .iter()
            .filter(|name| !exclusion.contains(name.as_str()))
            .cloned()
            .collect();

        if inclusion.is_empty() {
            return Err(RescreenError::EmptyTestSet);
        }
        Ok(inclusion)
    }

    fn validate(&self, names: &[String], role: LibraryRole) -> Result<()> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(name) => Err(RescreenError::UnknownLibrary {
                role: role.label(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    ///
    /// Split the matrix into reference and test libraries.
    ///
    /// # Arguments
    /// - reference: reference library names (must be non-empty)
    /// - test: explicit test libraries; derived from the header when `None`
    /// - exclude: samples dropped when deriving the test set
    ///
    pub fn partition(
        &self,
        reference: &[String],
        test: Option<&[String]>,
        exclude: &[String],
    ) -> Result<LibraryPartition> {
        if reference.is_empty() {
            return Err(RescreenError::Config(
                "At least one reference library must be provided".to_string(),
            ));
        }

        let test = match test {
            Some(test) if test.is_empty() => return Err(RescreenError::EmptyTestSet),
            Some(test) => test.to_vec(),
            None => self.derive_test_libraries(reference, exclude)?,
        };

        self.validate(reference, LibraryRole::Reference)?;
        self.validate(&test, LibraryRole::Test)?;

        if let Some(shared) = test.iter().find(|t| reference.contains(*t)) {
            return Err(RescreenError::Config(format!(
                "Sample `{}` cannot be both a reference and a treatment library",
                shared
            )));
        }

        Ok(LibraryPartition::new(
            reference.iter().map(Library::reference).collect(),
            test.iter().map(Library::test).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::{TempDir, tempdir};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[fixture]
    fn matrix() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counts.tsv");
        std::fs::write(
            &path,
            "Guide\tGene\tR1\tR2\tT1\tT2\tT3\ng1\tA\t1\t2\t3\t4\t5\n",
        )
        .unwrap();
        (dir, path)
    }

    #[rstest]
    fn test_reads_header(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        assert_eq!(catalog.libraries(), names(&["R1", "R2", "T1", "T2", "T3"]).as_slice());
    }

    #[rstest]
    #[case("Gene\tGuide\tR1\n")]
    #[case("guide\tgene\tR1\n")]
    #[case("Guide\n")]
    fn test_schema_error(#[case] header: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, header).unwrap();
        assert!(matches!(
            LibraryCatalog::try_from(path.as_path()),
            Err(RescreenError::Schema { .. })
        ));
    }

    #[rstest]
    fn test_derive_test_set(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        let partition = catalog
            .partition(&names(&["R1", "R2"]), None, &names(&["T2"]))
            .unwrap();
        assert_eq!(partition.test_names(), names(&["T1", "T3"]));
        assert_eq!(partition.reference_names(), names(&["R1", "R2"]));
        assert!(partition.test().iter().all(|l| l.role == LibraryRole::Test));
    }

    #[rstest]
    fn test_empty_test_set(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        let result = catalog.partition(&names(&["R1", "R2"]), None, &names(&["T1", "T2", "T3"]));
        assert!(matches!(result, Err(RescreenError::EmptyTestSet)));
    }

    #[rstest]
    fn test_unknown_reference(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        match catalog.partition(&names(&["R1", "R9"]), None, &[]) {
            Err(RescreenError::UnknownLibrary { role, name }) => {
                assert_eq!(role, "Reference");
                assert_eq!(name, "R9");
            }
            other => panic!("expected UnknownLibrary, got {:?}", other),
        }
    }

    #[rstest]
    fn test_unknown_explicit_test(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        let test = names(&["T1", "Gene"]);
        match catalog.partition(&names(&["R1"]), Some(test.as_slice()), &[]) {
            Err(RescreenError::UnknownLibrary { role, name }) => {
                assert_eq!(role, "Treatment");
                assert_eq!(name, "Gene");
            }
            other => panic!("expected UnknownLibrary, got {:?}", other),
        }
    }

    #[rstest]
    fn test_overlapping_roles_rejected(matrix: (TempDir, PathBuf)) {
        let catalog = LibraryCatalog::try_from(matrix.1.as_path()).unwrap();
        let test = names(&["R1", "T1"]);
        assert!(matches!(
            catalog.partition(&names(&["R1"]), Some(test.as_slice()), &[]),
            Err(RescreenError::Config(_))
        ));
    }
}
