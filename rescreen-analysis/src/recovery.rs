use std::collections::{BTreeMap, HashSet};

use log::info;

use rescreen_core::models::RecoveryRecord;

use crate::tables::{BootstrapTable, StandardSet};

///
/// Measures, per standard gene, the fraction of cohorts that called it.
///
pub struct RecoveryEngine<'a> {
    standard: &'a StandardSet,
}

impl<'a> RecoveryEngine<'a> {
    pub fn new(standard: &'a StandardSet) -> Self {
        RecoveryEngine { standard }
    }

    ///
    /// Recovery over the rows whose gene is in the standard set, optionally
    /// restricted to one subset size.
    ///
    /// `total_tests` is the number of distinct cohorts in that scope and
    /// `num_tests` the number of distinct cohorts calling the gene. Records
    /// are sorted by `frac_tests` ascending, then by gene.
    ///
    pub fn compute(&self, bootstraps: &BootstrapTable, subset: Option<usize>) -> Vec<RecoveryRecord> {
        let mut cohorts_in_scope: HashSet<&str> = HashSet::new();
        let mut per_gene: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

        for hit in bootstraps.rows() {
            if !self.standard.contains(&hit.row.gene) {
                continue;
            }
            if subset.is_some_and(|s| s != hit.key.subset) {
                continue;
            }
            cohorts_in_scope.insert(hit.key.name.as_str());
            per_gene
                .entry(hit.row.gene.as_str())
                .or_default()
                .insert(hit.key.name.as_str());
        }

        let total_tests = cohorts_in_scope.len();
        let mut records: Vec<RecoveryRecord> = per_gene
            .into_iter()
            .map(|(gene, cohorts)| RecoveryRecord {
                gene: gene.to_string(),
                num_tests: cohorts.len(),
                frac_tests: cohorts.len() as f64 / total_tests as f64,
                subset,
            })
            .collect();

        records.sort_by(|a, b| {
            a.frac_tests
                .total_cmp(&b.frac_tests)
                .then_with(|| a.gene.cmp(&b.gene))
        });
        records
    }

    ///
    /// [`compute`](Self::compute) once per subset size in the table, ascending,
    /// each with its own denominator, concatenated.
    ///
    pub fn compute_by_subset(&self, bootstraps: &BootstrapTable) -> Vec<RecoveryRecord> {
        info!("Measuring recovery per subset size...");
        bootstraps
            .subset_sizes()
            .into_iter()
            .flat_map(|size| self.compute(bootstraps, Some(size)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rescreen_core::models::{CohortKey, HitRow, HitTable};
    use rstest::*;

    fn table(genes: &[&str]) -> HitTable {
        HitTable::from(genes.iter().map(|g| HitRow::new(*g, 0.01)).collect::<Vec<_>>())
    }

    /// Ten cohorts that all call `B`; `A` is called in 1_0, 1_1 and 2_0.
    #[fixture]
    fn bootstraps() -> BootstrapTable {
        let mut bootstraps = BootstrapTable::new();
        for rep in 0..6 {
            let genes: &[&str] = if rep < 2 { &["A", "B"] } else { &["B"] };
            bootstraps.push(CohortKey::new(1, rep), table(genes));
        }
        for rep in 0..4 {
            let genes: &[&str] = if rep == 0 { &["A", "B", "A"] } else { &["B", "X"] };
            bootstraps.push(CohortKey::new(2, rep), table(genes));
        }
        bootstraps
    }

    #[rstest]
    fn test_three_of_ten(bootstraps: BootstrapTable) {
        let standard: StandardSet = ["A", "B"].into_iter().collect();
        let records = RecoveryEngine::new(&standard).compute(&bootstraps, None);

        assert_eq!(
            records,
            vec![
                RecoveryRecord {
                    gene: "A".to_string(),
                    num_tests: 3,
                    frac_tests: 0.3,
                    subset: None
                },
                RecoveryRecord {
                    gene: "B".to_string(),
                    num_tests: 10,
                    frac_tests: 1.0,
                    subset: None
                },
            ]
        );
    }

    #[rstest]
    fn test_restricted_to_subset(bootstraps: BootstrapTable) {
        let standard: StandardSet = ["A", "B"].into_iter().collect();
        let records = RecoveryEngine::new(&standard).compute(&bootstraps, Some(2));

        assert_eq!(records[0].gene, "A");
        assert_eq!(records[0].num_tests, 1);
        assert_eq!(records[0].frac_tests, 0.25);
        assert_eq!(records[0].subset, Some(2));
    }

    #[rstest]
    fn test_by_subset_recomputes_denominator(bootstraps: BootstrapTable) {
        let standard: StandardSet = ["A", "B"].into_iter().collect();
        let records = RecoveryEngine::new(&standard).compute_by_subset(&bootstraps);

        let summary: Vec<(&str, usize, f64, Option<usize>)> = records
            .iter()
            .map(|r| (r.gene.as_str(), r.num_tests, r.frac_tests, r.subset))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", 2, 2.0 / 6.0, Some(1)),
                ("B", 6, 1.0, Some(1)),
                ("A", 1, 0.25, Some(2)),
                ("B", 4, 1.0, Some(2)),
            ]
        );
    }

    #[rstest]
    fn test_bounds(bootstraps: BootstrapTable) {
        let standard: StandardSet = ["A", "B", "C"].into_iter().collect();
        let records = RecoveryEngine::new(&standard).compute(&bootstraps, None);
        let total_tests = 10;

        assert!(records.iter().all(|r| (0.0..=1.0).contains(&r.frac_tests)));
        let summed: usize = records.iter().map(|r| r.num_tests).sum();
        assert!(summed <= total_tests * standard.len());
        assert!(records.iter().all(|r| r.gene != "C"));
    }

    #[rstest]
    fn test_ties_break_on_gene() {
        let standard: StandardSet = ["A", "B", "C"].into_iter().collect();
        let mut bootstraps = BootstrapTable::new();
        bootstraps.push(CohortKey::new(1, 0), table(&["C", "A"]));
        bootstraps.push(CohortKey::new(1, 1), table(&["B"]));

        let genes: Vec<String> = RecoveryEngine::new(&standard)
            .compute(&bootstraps, None)
            .into_iter()
            .map(|r| r.gene)
            .collect();
        assert_eq!(genes, vec!["A", "B", "C"]);
    }

    #[rstest]
    fn test_no_rows_in_scope() {
        let standard: StandardSet = ["A"].into_iter().collect();
        let mut bootstraps = BootstrapTable::new();
        bootstraps.push(CohortKey::new(1, 0), HitTable::default());
        assert!(RecoveryEngine::new(&standard).compute(&bootstraps, None).is_empty());
    }
}
