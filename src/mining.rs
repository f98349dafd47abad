//! Binds rules and the fitness evaluator to the GA engine.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::fitness::{FitnessEvaluator, FitnessWeights};
use crate::ga::{GaConfig, GaProblem, GaResult, GaRunner, GenerationStats};
use crate::rule::Rule;
use crate::schema::Value;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, trace};

/// Rule mining as a [`GaProblem`]: random rules, per-gene regeneration
/// from the schema, support/confidence fitness.
#[derive(Debug, Clone, Copy)]
pub struct RuleMiningProblem<'a> {
    evaluator: FitnessEvaluator<'a>,
}

impl<'a> RuleMiningProblem<'a> {
    pub fn new(evaluator: FitnessEvaluator<'a>) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<'a> {
        &self.evaluator
    }
}

impl GaProblem for RuleMiningProblem<'_> {
    type Individual = Rule;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Rule {
        Rule::random(self.evaluator.schema(), rng)
    }

    fn random_gene<R: Rng>(&self, position: usize, rng: &mut R) -> Value {
        self.evaluator.schema().generate(position, rng)
    }

    fn evaluate(&self, rule: &Rule) -> f64 {
        self.evaluator.tally(rule.genes()).fitness
    }

    fn on_generation(&self, stats: &GenerationStats) {
        trace!(
            generation = stats.generation,
            best = stats.best,
            worst = stats.worst,
            "rule population scored"
        );
    }
}

/// The terminal population, used unranked as a detector.
pub type Ruleset = Vec<Rule>;

/// Result of [`mine_rules`].
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub ruleset: Ruleset,
    pub run: GaResult<Rule>,
}

/// Evolves a ruleset over `dataset`.
///
/// Fails before any evolution if the dataset is empty or the configuration
/// is invalid.
pub fn mine_rules(
    dataset: &Dataset,
    weights: FitnessWeights,
    config: &GaConfig,
) -> Result<MiningOutcome> {
    mine_rules_with_cancel(dataset, weights, config, None)
}

/// [`mine_rules`] with a cooperative cancellation flag.
pub fn mine_rules_with_cancel(
    dataset: &Dataset,
    weights: FitnessWeights,
    config: &GaConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<MiningOutcome> {
    let evaluator = FitnessEvaluator::new(dataset, weights)?;
    let runner = GaRunner::new(config.clone())?;
    info!(
        records = dataset.len(),
        attributes = dataset.schema().arity(),
        attacks = dataset.attack_count(),
        "mining rules"
    );

    let problem = RuleMiningProblem::new(evaluator);
    let run = runner.run_with_cancel(&problem, cancel)?;
    let ruleset = run.population.clone();
    Ok(MiningOutcome { ruleset, run })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ga::{Individual, Termination};
    use crate::schema::{Attribute, AttributeSchema};

    fn dataset(rows: usize) -> Dataset {
        let schema = AttributeSchema::new(vec![
            Attribute::categorical("protocol", &["tcp", "udp", "icmp"]),
            Attribute::categorical("flag", &["SF", "S0", "REJ"]),
            Attribute::categorical("label", &["normal", "anomaly"]),
        ])
        .unwrap();
        let rows: Vec<Vec<&str>> = (0..rows)
            .map(|i| match i % 4 {
                0 | 1 => vec!["tcp", "SF", "normal"],
                2 => vec!["tcp", "S0", "anomaly"],
                _ => vec!["udp", "REJ", "anomaly"],
            })
            .collect();
        Dataset::from_rows(schema, rows).unwrap()
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(100)
            .with_max_generations(30)
            .with_seed(11)
            .with_parallel(false)
    }

    #[test]
    fn test_mining_finds_majority_rule() {
        let ds = dataset(40);
        let outcome = mine_rules(&ds, FitnessWeights::default(), &config()).unwrap();

        assert_eq!(outcome.ruleset.len(), 100);
        assert_eq!(outcome.run.termination, Termination::Completed);
        let best = outcome.run.best().unwrap();
        // [tcp, SF, normal] covers half the data.
        assert!((best.fitness().unwrap() - 0.5).abs() < 1e-12, "best {best}");
    }

    #[test]
    fn test_ruleset_fitness_is_current() {
        let ds = dataset(12);
        let outcome = mine_rules(&ds, FitnessWeights::new(0.5, 0.5), &config()).unwrap();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(0.5, 0.5)).unwrap();
        for rule in &outcome.ruleset {
            assert_eq!(Individual::fitness(rule), Some(eval.evaluate(rule).unwrap()));
        }
    }

    #[test]
    fn test_empty_dataset_aborts_before_evolution() {
        let ds = dataset(0);
        let err = mine_rules(&ds, FitnessWeights::default(), &config()).unwrap_err();
        assert!(matches!(err, Error::DegenerateDataset { .. }));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let ds = dataset(8);
        let err = mine_rules(
            &ds,
            FitnessWeights::default(),
            &config().with_population_size(0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_random_gene_follows_schema() {
        let ds = dataset(4);
        let problem =
            RuleMiningProblem::new(FitnessEvaluator::new(&ds, FitnessWeights::default()).unwrap());
        let mut rng = crate::random::create_rng(1);
        for _ in 0..50 {
            let v = problem.random_gene(2, &mut rng);
            assert!(v.is_anomaly() || v.is_normal());
        }
    }
}
