use std::collections::{BTreeSet, HashMap};

use rescreen_core::models::{CohortKey, HitRow, HitTable};

///
/// Distinct gene names of the filtered full-run (or supplied) result table.
/// Its size is the denominator of every overlap fraction.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardSet {
    genes: BTreeSet<String>,
}

impl StandardSet {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(|g| g.as_str())
    }
}

impl From<&HitTable> for StandardSet {
    fn from(table: &HitTable) -> Self {
        StandardSet {
            genes: table.genes().map(|g| g.to_string()).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for StandardSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StandardSet {
            genes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One filtered bootstrap row tagged with its cohort.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapHit<'a> {
    pub key: &'a CohortKey,
    pub row: &'a HitRow,
}

///
/// The concatenation of every cohort's filtered result table. Cohorts are
/// registered separately from their rows, so a cohort with zero significant
/// hits still takes part in per-cohort counts.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapTable {
    pub score_columns: Vec<String>,
    cohorts: Vec<CohortKey>,
    index: HashMap<String, usize>,
    rows: Vec<(usize, HitRow)>,
}

impl BootstrapTable {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Append one cohort's table. Pushing the same cohort twice extends its
    /// rows instead of registering it again.
    ///
    pub fn push(&mut self, key: CohortKey, table: HitTable) {
        if self.score_columns.is_empty() {
            self.score_columns = table.score_columns;
        }

        let idx = match self.index.get(&key.name) {
            Some(idx) => *idx,
            None => {
                self.index.insert(key.name.clone(), self.cohorts.len());
                self.cohorts.push(key);
                self.cohorts.len() - 1
            }
        };
        self.rows.extend(table.rows.into_iter().map(|row| (idx, row)));
    }

    pub fn cohorts(&self) -> &[CohortKey] {
        &self.cohorts
    }

    pub fn num_cohorts(&self) -> usize {
        self.cohorts.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = BootstrapHit<'_>> {
        self.rows.iter().map(|(idx, row)| BootstrapHit {
            key: &self.cohorts[*idx],
            row,
        })
    }

    /// Distinct subset sizes over every registered cohort, ascending.
    pub fn subset_sizes(&self) -> BTreeSet<usize> {
        self.cohorts.iter().map(|k| k.subset).collect()
    }
}
