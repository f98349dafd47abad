//! Support/confidence fitness of a rule against a training dataset.
//!
//! For every record the rule's genes are compared position by position with
//! [`AttributeSchema::equal`]. Two counters accumulate over the dataset:
//!
//! - `A`: records whose antecedent fully matches the rule's antecedent
//! - `AB`: records that also match the rule's consequent
//!
//! `support = AB / N`, `confidence = AB / A` (0 when `A == 0`), and
//! `fitness = w_support * support + w_confidence * confidence`.
//!
//! Each evaluation is `O(N * arity)` and reads only the shared dataset and
//! the rule's own genes, so evaluations of distinct rules run in parallel
//! without synchronization.

use crate::dataset::{Dataset, Record};
use crate::error::{Error, Phase, Result};
use crate::rule::Rule;
use crate::schema::{AttributeSchema, Value};
use serde::{Deserialize, Serialize};

/// Weights of the two fitness terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub support: f64,
    pub confidence: f64,
}

impl Default for FitnessWeights {
    /// Support only.
    fn default() -> Self {
        Self {
            support: 1.0,
            confidence: 0.0,
        }
    }
}

impl FitnessWeights {
    pub fn new(support: f64, confidence: f64) -> Self {
        Self {
            support,
            confidence,
        }
    }

    /// Both weights must be finite.
    pub fn validate(&self) -> Result<()> {
        if !self.support.is_finite() || !self.confidence.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "fitness weights must be finite, got ({}, {})",
                self.support, self.confidence
            )));
        }
        Ok(())
    }
}

/// Match counts and derived measures for one rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleScore {
    /// `A`: antecedent matches.
    pub antecedent_matches: usize,
    /// `AB`: antecedent and consequent matches.
    pub full_matches: usize,
    /// `N`: dataset size.
    pub records: usize,
    pub support: f64,
    pub confidence: f64,
    pub fitness: f64,
}

/// Scores rules against a fixed, non-empty dataset.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    schema: &'a AttributeSchema,
    records: &'a [Record],
    weights: FitnessWeights,
}

impl<'a> FitnessEvaluator<'a> {
    /// Binds an evaluator to a dataset.
    ///
    /// Fails with [`Error::DegenerateDataset`] when the dataset is empty.
    pub fn new(dataset: &'a Dataset, weights: FitnessWeights) -> Result<Self> {
        Self::from_parts(dataset.schema(), dataset.records(), weights)
    }

    /// Binds an evaluator to a schema and records checked for arity here.
    pub fn from_parts(
        schema: &'a AttributeSchema,
        records: &'a [Record],
        weights: FitnessWeights,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::DegenerateDataset {
                phase: Phase::Training,
                reason: "no training records to evaluate rules against".into(),
            });
        }
        crate::dataset::check_arity(schema, records, Phase::Training)?;
        weights.validate()?;
        Ok(Self {
            schema,
            records,
            weights,
        })
    }

    pub fn schema(&self) -> &'a AttributeSchema {
        self.schema
    }

    pub fn weights(&self) -> FitnessWeights {
        self.weights
    }

    /// Computes `A`, `AB`, support, confidence and fitness for `genes`.
    ///
    /// Fails with [`Error::MalformedRecord`] if `genes` does not have the
    /// schema's arity.
    pub fn score(&self, genes: &[Value]) -> Result<RuleScore> {
        if genes.len() != self.schema.arity() {
            return Err(Error::MalformedRecord {
                phase: Phase::Training,
                index: 0,
                reason: format!(
                    "rule has {} genes, schema has {} attributes",
                    genes.len(),
                    self.schema.arity()
                ),
            });
        }
        Ok(self.tally(genes))
    }

    /// [`score`](Self::score) for genes already known to fit the schema,
    /// such as rules built by [`Rule::random`] and the GA operators.
    pub(crate) fn tally(&self, genes: &[Value]) -> RuleScore {
        let arity = self.schema.arity();
        debug_assert_eq!(genes.len(), arity, "rule arity differs from schema");
        let label = arity - 1;

        let mut antecedent_matches = 0usize;
        let mut full_matches = 0usize;

        for record in self.records {
            let mut matched = 0usize;
            for (i, (gene, field)) in genes.iter().zip(record.values()).enumerate() {
                if self.schema.equal(i, gene, field) {
                    matched += 1;
                } else if i < label {
                    // A missed condition rules out both counters.
                    break;
                }
                if i + 1 == label && matched == label {
                    antecedent_matches += 1;
                }
                if i == label && matched == arity {
                    full_matches += 1;
                }
            }
        }

        let n = self.records.len() as f64;
        let support = full_matches as f64 / n;
        let confidence = if antecedent_matches > 0 {
            full_matches as f64 / antecedent_matches as f64
        } else {
            0.0
        };
        RuleScore {
            antecedent_matches,
            full_matches,
            records: self.records.len(),
            support,
            confidence,
            fitness: self.weights.support * support + self.weights.confidence * confidence,
        }
    }

    /// Fitness of a rule.
    pub fn evaluate(&self, rule: &Rule) -> Result<f64> {
        Ok(self.score(rule.genes())?.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::schema::{Attribute, ContinuousRange};
    use proptest::prelude::*;

    fn dataset() -> Dataset {
        let schema = AttributeSchema::new(vec![
            Attribute::categorical("protocol", &["tcp", "udp"]),
            Attribute::continuous("bytes", ContinuousRange::new(0.0, 20.0)),
            Attribute::categorical("label", &["normal", "anomaly"]),
        ])
        .unwrap();
        Dataset::from_rows(
            schema,
            vec![
                vec!["tcp", "10", "normal"],
                vec!["tcp", "12", "anomaly"],
                vec!["udp", "5", "normal"],
                vec!["udp", "5", "anomaly"],
            ],
        )
        .unwrap()
    }

    fn rule(proto: &str, bytes: f64, label: &str) -> Rule {
        Rule::from_genes(vec![proto.into(), bytes.into(), label.into()])
    }

    #[test]
    fn test_exact_rule_scores_reference_example() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::default()).unwrap();
        let score = eval.score(rule("tcp", 10.0, "normal").genes()).unwrap();

        assert_eq!(score.antecedent_matches, 1);
        assert_eq!(score.full_matches, 1);
        assert_eq!(score.records, 4);
        assert!((score.support - 0.25).abs() < 1e-12);
        assert!((score.confidence - 1.0).abs() < 1e-12);
        assert!((score.fitness - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_shared_antecedent_splits_confidence() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(0.0, 1.0)).unwrap();
        let score = eval.score(rule("udp", 5.0, "anomaly").genes()).unwrap();

        assert_eq!(score.antecedent_matches, 2);
        assert_eq!(score.full_matches, 1);
        assert!((score.confidence - 0.5).abs() < 1e-12);
        assert!((score.fitness - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_antecedent_match_with_wrong_label() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(1.0, 1.0)).unwrap();
        let score = eval.score(rule("tcp", 12.0, "normal").genes()).unwrap();

        assert_eq!(score.antecedent_matches, 1);
        assert_eq!(score.full_matches, 0);
        assert_eq!(score.fitness, 0.0);
    }

    #[test]
    fn test_tolerance_applies_during_scoring() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::default()).unwrap();
        let near = eval.score(rule("tcp", 10.005, "normal").genes()).unwrap();
        let far = eval.score(rule("tcp", 10.5, "normal").genes()).unwrap();
        assert_eq!(near.full_matches, 1);
        assert_eq!(far.full_matches, 0);
    }

    #[test]
    fn test_no_antecedent_match_has_zero_confidence() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(1.0, 1.0)).unwrap();
        let score = eval.score(rule("tcp", 99.0, "anomaly").genes()).unwrap();
        assert_eq!(score.antecedent_matches, 0);
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.fitness, 0.0);
    }

    #[test]
    fn test_evaluate_uses_weights() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(2.0, 0.5)).unwrap();
        let f = eval.evaluate(&rule("tcp", 10.0, "normal")).unwrap();
        assert!((f - (2.0 * 0.25 + 0.5 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_dataset_is_degenerate() {
        let ds = dataset();
        let err = FitnessEvaluator::from_parts(ds.schema(), &[], FitnessWeights::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateDataset {
                phase: Phase::Training,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_training_record() {
        let ds = dataset();
        let records = vec![Record::new(vec!["tcp".into()])];
        let err = FitnessEvaluator::from_parts(ds.schema(), &records, FitnessWeights::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRecord {
                phase: Phase::Training,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        let ds = dataset();
        assert!(FitnessEvaluator::new(&ds, FitnessWeights::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_wrong_rule_arity_is_rejected() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::default()).unwrap();
        let short = Rule::from_genes(vec!["tcp".into(), Value::Real(10.0)]);
        assert!(matches!(
            eval.evaluate(&short),
            Err(Error::MalformedRecord {
                phase: Phase::Training,
                ..
            })
        ));
        let long = [
            Value::from("tcp"),
            Value::Real(10.0),
            Value::from("normal"),
            Value::from("normal"),
        ];
        assert!(eval.score(&long).is_err());
    }

    #[test]
    fn test_rule_copied_from_record_has_positive_support() {
        let ds = dataset();
        let eval = FitnessEvaluator::new(&ds, FitnessWeights::default()).unwrap();
        for record in ds.records() {
            let score = eval.score(record.values()).unwrap();
            assert!(score.support >= 1.0 / ds.len() as f64);
        }
    }

    proptest! {
        #[test]
        fn prop_support_and_confidence_bounded(seed in any::<u64>()) {
            let ds = dataset();
            let eval = FitnessEvaluator::new(&ds, FitnessWeights::new(1.0, 1.0)).unwrap();
            let mut rng = create_rng(seed);
            let rule = Rule::random(ds.schema(), &mut rng);
            let score = eval.score(rule.genes()).unwrap();

            prop_assert!((0.0..=1.0).contains(&score.support));
            prop_assert!((0.0..=1.0).contains(&score.confidence));
            prop_assert!(score.full_matches <= score.antecedent_matches);
            if score.antecedent_matches == 0 {
                prop_assert_eq!(score.confidence, 0.0);
            }
        }
    }
}
