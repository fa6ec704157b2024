///
/// One row of a screen result table. `gene` and `fdr` are parsed; every other
/// tool-defined column is carried through untouched in `scores`, in the same
/// order as [`HitTable::score_columns`].
///
#[derive(PartialEq, Debug, Clone)]
pub struct HitRow {
    pub gene: String,
    pub fdr: f64,
    pub scores: Vec<String>,
}

impl HitRow {
    pub fn new(gene: impl Into<String>, fdr: f64) -> Self {
        HitRow {
            gene: gene.into(),
            fdr,
            scores: Vec::new(),
        }
    }
}

///
/// A filtered result table: the rows that passed the significance and
/// category filters, plus the names of the pass-through columns.
///
#[derive(PartialEq, Debug, Clone, Default)]
pub struct HitTable {
    pub score_columns: Vec<String>,
    pub rows: Vec<HitRow>,
}

impl HitTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.gene.as_str())
    }
}

impl From<Vec<HitRow>> for HitTable {
    fn from(rows: Vec<HitRow>) -> Self {
        HitTable {
            score_columns: Vec::new(),
            rows,
        }
    }
}
