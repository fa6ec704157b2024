use std::collections::{BTreeSet, HashMap};

use log::info;

use rescreen_core::models::OverlapRecord;
use rescreen_core::{RescreenError, Result};

use crate::tables::{BootstrapTable, StandardSet};

///
/// Measures, per cohort, the fraction of the standard set called as a hit.
///
pub struct OverlapEngine<'a> {
    standard: &'a StandardSet,
}

impl<'a> OverlapEngine<'a> {
    /// Fails with [`RescreenError::EmptyStandardSet`] when there is nothing to overlap with.
    pub fn new(standard: &'a StandardSet) -> Result<Self> {
        if standard.is_empty() {
            return Err(RescreenError::EmptyStandardSet);
        }
        Ok(OverlapEngine { standard })
    }

    ///
    /// One record per registered cohort, ordered by `(subset, replicate)`.
    ///
    /// A gene called twice in one cohort is counted once, so
    /// `num_overlapping <= |standard|`.
    ///
    pub fn compute(&self, bootstraps: &BootstrapTable) -> Vec<OverlapRecord> {
        info!("Measuring set overlaps...");

        let mut hits: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for hit in bootstraps.rows() {
            if self.standard.contains(&hit.row.gene) {
                hits.entry(hit.key.name.as_str())
                    .or_default()
                    .insert(hit.row.gene.as_str());
            }
        }

        let denominator = self.standard.len() as f64;
        let mut keys: Vec<_> = bootstraps.cohorts().iter().collect();
        keys.sort_by(|a, b| {
            (a.subset, a.replicate, &a.name).cmp(&(b.subset, b.replicate, &b.name))
        });

        keys.into_iter()
            .map(|key| {
                let num_overlapping = hits.get(key.name.as_str()).map_or(0, |g| g.len());
                OverlapRecord {
                    cohort: key.name.clone(),
                    replicate: key.replicate,
                    subset: key.subset,
                    num_overlapping,
                    frac_overlapping: num_overlapping as f64 / denominator,
                }
            })
            .collect()
    }
}
