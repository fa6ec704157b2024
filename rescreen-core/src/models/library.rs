use std::fmt::{self, Display};

///
/// Which side of the comparison a sample column sits on.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum LibraryRole {
    Reference,
    Test,
}

impl LibraryRole {
    /// Capitalized label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            LibraryRole::Reference => "Reference",
            LibraryRole::Test => "Treatment",
        }
    }
}

///
/// A named sample column of the count matrix, tagged with its role.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Library {
    pub name: String,
    pub role: LibraryRole,
}

impl Library {
    pub fn reference(name: impl Into<String>) -> Self {
        Library {
            name: name.into(),
            role: LibraryRole::Reference,
        }
    }

    pub fn test(name: impl Into<String>) -> Self {
        Library {
            name: name.into(),
            role: LibraryRole::Test,
        }
    }
}

impl Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

///
/// The validated split of a count matrix into reference and test libraries.
/// Built once at setup and never mutated afterward.
///
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryPartition {
    reference: Vec<Library>,
    test: Vec<Library>,
}

impl LibraryPartition {
    pub fn new(reference: Vec<Library>, test: Vec<Library>) -> Self {
        LibraryPartition { reference, test }
    }

    pub fn reference(&self) -> &[Library] {
        &self.reference
    }

    pub fn test(&self) -> &[Library] {
        &self.test
    }

    pub fn reference_names(&self) -> Vec<String> {
        self.reference.iter().map(|l| l.name.clone()).collect()
    }

    pub fn test_names(&self) -> Vec<String> {
        self.test.iter().map(|l| l.name.clone()).collect()
    }
}
