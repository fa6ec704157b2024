//! Randomized cohort generation.
//!
//! The sampler owns its own seeded generator, so the full list of cohorts is
//! pinned by `(seed, step, num_reps, mode)` and the test-library set alone. All
//! cohorts are drawn up front, before any screen runs, which keeps the draw
//! independent of scheduling order and pool size.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use rescreen_core::consts::{DEFAULT_NUM_REPS, DEFAULT_SEED, DEFAULT_STEP};
use rescreen_core::models::Cohort;
use rescreen_core::{RescreenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    WithReplacement,
    WithoutReplacement,
}

impl SamplingMode {
    pub fn from_replacement(with_replacement: bool) -> Self {
        match with_replacement {
            true => SamplingMode::WithReplacement,
            false => SamplingMode::WithoutReplacement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub step: usize,
    pub num_reps: usize,
    pub seed: u64,
    pub mode: SamplingMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            step: DEFAULT_STEP,
            num_reps: DEFAULT_NUM_REPS,
            seed: DEFAULT_SEED,
            mode: SamplingMode::WithReplacement,
        }
    }
}

pub struct CohortSampler {
    config: SamplerConfig,
    rng: StdRng,
}

impl CohortSampler {
    pub fn new(config: SamplerConfig) -> Result<Self> {
        if config.step == 0 {
            return Err(RescreenError::Config(
                "Subset size step must be a positive integer".to_string(),
            ));
        }
        Ok(CohortSampler {
            config,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Subset sizes `1, 1+step, 1+2*step, ...` strictly below `num_libraries`.
    pub fn subset_sizes(&self, num_libraries: usize) -> Vec<usize> {
        (1..num_libraries).step_by(self.config.step).collect()
    }

    /// Number of cohorts [`generate`](Self::generate) will produce.
    pub fn expected_cohorts(&self, num_libraries: usize) -> usize {
        num_libraries.saturating_sub(1).div_ceil(self.config.step) * self.config.num_reps
    }

    ///
    /// Draw every cohort for the run, ordered by subset size then replicate.
    ///
    /// # Arguments
    /// - test_libraries: the pool of test libraries to draw from
    ///
    pub fn generate(&mut self, test_libraries: &[String]) -> Vec<Cohort> {
        let n = test_libraries.len();
        let mut cohorts = Vec::with_capacity(self.expected_cohorts(n));

        for subset_size in self.subset_sizes(n) {
            for replicate in 0..self.config.num_reps {
                let libraries = self
                    .draw(n, subset_size)
                    .into_iter()
                    .map(|i| test_libraries[i].clone())
                    .collect();
                cohorts.push(Cohort::new(subset_size, replicate, libraries));
            }
        }

        cohorts
    }

    fn draw(&mut self, n: usize, amount: usize) -> Vec<usize> {
        match self.config.mode {
            SamplingMode::WithReplacement => {
                (0..amount).map(|_| self.rng.random_range(0..n)).collect()
            }
            SamplingMode::WithoutReplacement => index::sample(&mut self.rng, n, amount).into_vec(),
        }
    }
}
