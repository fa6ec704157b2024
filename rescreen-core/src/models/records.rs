///
/// How much of the standard hit set one cohort recovered.
///
#[derive(PartialEq, Debug, Clone)]
pub struct OverlapRecord {
    pub cohort: String,
    pub replicate: usize,
    pub subset: usize,
    pub num_overlapping: usize,
    /// `num_overlapping / |standard|`, always within `[0, 1]`.
    ///
    /// This is an `f64` quotient, so multiplying it back by `|standard|` gives
    /// `num_overlapping` only up to rounding (`1/49 * 49 != 1.0`). Compare
    /// against `num_overlapping` for exact counts.
    pub frac_overlapping: f64,
}

impl OverlapRecord {
    pub const HEADER: [&'static str; 5] = [
        "cohort",
        "replicate",
        "subset",
        "num_overlapping",
        "frac_overlapping",
    ];

    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.cohort.clone(),
            self.replicate.to_string(),
            self.subset.to_string(),
            self.num_overlapping.to_string(),
            self.frac_overlapping.to_string(),
        ]
    }
}

///
/// How often one standard gene was called a hit across cohorts, optionally
/// restricted to a single subset size.
///
#[derive(PartialEq, Debug, Clone)]
pub struct RecoveryRecord {
    pub gene: String,
    pub num_tests: usize,
    /// `num_tests / total_tests` for the record's scope, always within `[0, 1]`.
    pub frac_tests: f64,
    pub subset: Option<usize>,
}

impl RecoveryRecord {
    pub const HEADER: [&'static str; 3] = ["gene", "num_tests", "frac_tests"];
    pub const SUBSET_HEADER: [&'static str; 4] = ["gene", "num_tests", "frac_tests", "subset"];

    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.gene.clone(),
            self.num_tests.to_string(),
            self.frac_tests.to_string(),
        ];
        if let Some(subset) = self.subset {
            fields.push(subset.to_string());
        }
        fields
    }
}
