//! Run configuration.
//!
//! [`RunConfig`] is the flat option set a mining + detection run is driven
//! by. It is read from JSON; every field has a default, so a file only names
//! what it changes.
//!
//! ```
//! use u_ruleminer::config::RunConfig;
//!
//! let config: RunConfig = serde_json::from_str(r#"{
//!     "population_size": 200,
//!     "fitness_weights": { "support": 0.5, "confidence": 0.5 }
//! }"#).unwrap();
//! assert_eq!(config.population_size, 200);
//! assert_eq!(config.tournament_size, 3);
//! ```

use crate::detect::DetectionPolicy;
use crate::error::{Error, Result};
use crate::fitness::FitnessWeights;
use crate::ga::GaConfig;
use crate::schema::{GeneratorTable, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one mining + detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub population_size: usize,
    pub generation_count: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    /// Per-gene rate; absent means `mutation_probability`.
    pub gene_mutation_probability: Option<f64>,
    pub tournament_size: usize,
    pub fitness_weights: FitnessWeights,
    pub equality_tolerance: f64,
    /// Records drawn for detection; absent means the whole test set.
    pub test_sample_size: Option<usize>,
    pub detection_policy: DetectionPolicy,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub time_limit_ms: Option<u64>,
    pub generators: GeneratorTable,
}

impl Default for RunConfig {
    fn default() -> Self {
        let ga = GaConfig::default();
        Self {
            population_size: ga.population_size,
            generation_count: ga.max_generations,
            crossover_probability: ga.crossover_rate,
            mutation_probability: ga.mutation_rate,
            gene_mutation_probability: ga.gene_mutation_rate,
            tournament_size: ga.tournament_size,
            fitness_weights: FitnessWeights::default(),
            equality_tolerance: DEFAULT_TOLERANCE,
            test_sample_size: None,
            detection_policy: DetectionPolicy::default(),
            seed: ga.seed,
            parallel: ga.parallel,
            time_limit_ms: ga.time_limit_ms,
            generators: GeneratorTable::default(),
        }
    }
}

impl RunConfig {
    /// Reads a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Engine parameters.
    pub fn ga_config(&self) -> GaConfig {
        GaConfig {
            population_size: self.population_size,
            max_generations: self.generation_count,
            crossover_rate: self.crossover_probability,
            mutation_rate: self.mutation_probability,
            gene_mutation_rate: self.gene_mutation_probability,
            tournament_size: self.tournament_size,
            parallel: self.parallel,
            seed: self.seed,
            time_limit_ms: self.time_limit_ms,
        }
    }

    /// Validates every option.
    pub fn validate(&self) -> Result<()> {
        self.ga_config().validate()?;
        self.fitness_weights.validate()?;
        self.generators
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if !self.equality_tolerance.is_finite() || self.equality_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "equality_tolerance must be a finite value >= 0, got {}",
                self.equality_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContinuousRange, NamePattern};

    #[test]
    fn test_defaults_match_engine_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.ga_config(), GaConfig::default());
        assert_eq!(config.equality_tolerance, 0.01);
        assert_eq!(config.fitness_weights, FitnessWeights::new(1.0, 0.0));
        assert_eq!(config.detection_policy, DetectionPolicy::RecordLabel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_json() {
        let config: RunConfig = serde_json::from_str(
            r#"{
                "population_size": 50,
                "generation_count": 0,
                "crossover_probability": 0.5,
                "mutation_probability": 0.2,
                "gene_mutation_probability": 0.05,
                "tournament_size": 4,
                "fitness_weights": { "support": 0.3, "confidence": 0.7 },
                "equality_tolerance": 0.5,
                "test_sample_size": 100,
                "detection_policy": "rule_consequent",
                "seed": 9,
                "generators": {
                    "rules": [ { "pattern": { "suffix": "_rate" },
                                 "range": { "low": 0.0, "high": 1.0, "precision": 2 } } ],
                    "fallback": { "low": 0.0, "high": 10.0 }
                }
            }"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        let ga = config.ga_config();
        assert_eq!(ga.population_size, 50);
        assert_eq!(ga.max_generations, 0);
        assert_eq!(ga.effective_gene_mutation_rate(), 0.05);
        assert_eq!(ga.seed, Some(9));
        assert_eq!(config.test_sample_size, Some(100));
        assert_eq!(config.detection_policy, DetectionPolicy::RuleConsequent);
        assert_eq!(
            config.generators.resolve("dst_host_rate"),
            ContinuousRange::new(0.0, 1.0).with_precision(2)
        );
        assert_eq!(
            config.generators.rules[0].pattern,
            NamePattern::Suffix("_rate".into())
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = [
            RunConfig {
                population_size: 0,
                ..RunConfig::default()
            },
            RunConfig {
                crossover_probability: 1.2,
                ..RunConfig::default()
            },
            RunConfig {
                equality_tolerance: -1.0,
                ..RunConfig::default()
            },
            RunConfig {
                generators: GeneratorTable::new(ContinuousRange::new(1.0, 0.0)),
                ..RunConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{ "tournament_size": 0 }"#).unwrap();
        assert!(RunConfig::from_json_file(&path).is_err());

        std::fs::write(&path, r#"{ "tournament_size": 5 }"#).unwrap();
        assert_eq!(RunConfig::from_json_file(&path).unwrap().tournament_size, 5);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RunConfig::from_json_file(&path),
            Err(Error::Json(_))
        ));
    }
}
