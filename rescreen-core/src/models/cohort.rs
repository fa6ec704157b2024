use std::fmt::{self, Display};

use crate::errors::{RescreenError, Result};

///
/// Identity of one bootstrap unit: its name plus the `(subset, replicate)`
/// integers encoded in that name.
///
/// The name always ends in `<subset>_<replicate>`; anything before those two
/// trailing tokens is treated as an opaque prefix.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct CohortKey {
    pub name: String,
    pub subset: usize,
    pub replicate: usize,
}

impl CohortKey {
    pub fn new(subset: usize, replicate: usize) -> Self {
        CohortKey {
            name: cohort_name(subset, replicate),
            subset,
            replicate,
        }
    }

    ///
    /// Parse a cohort name back into its key by splitting on the last two
    /// `_`-delimited tokens.
    ///
    /// # Arguments
    /// - name: cohort name, e.g. `3_12` or `subset_3_12`
    ///
    pub fn parse(name: &str) -> Result<Self> {
        let mut tokens = name.rsplitn(3, '_');
        let replicate = tokens.next().and_then(|t| t.parse::<usize>().ok());
        let subset = tokens.next().and_then(|t| t.parse::<usize>().ok());

        match (subset, replicate) {
            (Some(subset), Some(replicate)) => Ok(CohortKey {
                name: name.to_string(),
                subset,
                replicate,
            }),
            _ => Err(RescreenError::InvalidCohortName(name.to_string())),
        }
    }
}

impl Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Canonical cohort name: `"{subset_size}_{replicate_index}"`.
pub fn cohort_name(subset: usize, replicate: usize) -> String {
    format!("{}_{}", subset, replicate)
}

///
/// One randomized bootstrap unit: the libraries sampled for a given subset
/// size and replicate index. May contain duplicate library names when the
/// sampler draws with replacement.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Cohort {
    pub key: CohortKey,
    pub libraries: Vec<String>,
}

impl Cohort {
    pub fn new(subset: usize, replicate: usize, libraries: Vec<String>) -> Self {
        Cohort {
            key: CohortKey::new(subset, replicate),
            libraries,
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn subset_size(&self) -> usize {
        self.key.subset
    }

    pub fn replicate(&self) -> usize {
        self.key.replicate
    }
}
