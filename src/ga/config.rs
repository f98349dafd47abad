//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_ruleminer::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 1000);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_ruleminer::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(5)
///     .with_mutation_rate(0.2)
///     .with_gene_mutation_rate(0.05);
/// assert_eq!(config.effective_gene_mutation_rate(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals in the population. Constant for the run.
    pub population_size: usize,

    /// Number of generation steps after initialization. 0 returns the
    /// evaluated initial population.
    pub max_generations: usize,

    /// Probability of applying two-point crossover to an adjacent pair.
    pub crossover_rate: f64,

    /// Probability that an offspring is submitted to mutation.
    pub mutation_rate: f64,

    /// Per-gene replacement probability once an offspring is mutated.
    ///
    /// `None` reuses `mutation_rate`.
    pub gene_mutation_rate: Option<f64>,

    /// Aspirants per tournament.
    pub tournament_size: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the actual runtime may
    /// exceed it by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            max_generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            gene_mutation_rate: None,
            tournament_size: 3,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generation steps.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-individual mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets a per-gene mutation rate distinct from the per-individual one.
    pub fn with_gene_mutation_rate(mut self, rate: f64) -> Self {
        self.gene_mutation_rate = Some(rate.clamp(0.0, 1.0));
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Per-gene rate actually used by mutation.
    pub fn effective_gene_mutation_rate(&self) -> f64 {
        self.gene_mutation_rate.unwrap_or(self.mutation_rate)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(Error::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        let rates = [
            ("crossover_rate", Some(self.crossover_rate)),
            ("mutation_rate", Some(self.mutation_rate)),
            ("gene_mutation_rate", self.gene_mutation_rate),
        ];
        for (name, rate) in rates {
            if let Some(r) = rate {
                if !(0.0..=1.0).contains(&r) {
                    return Err(Error::InvalidConfig(format!(
                        "{name} must be in [0, 1], got {r}"
                    )));
                }
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err(Error::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
