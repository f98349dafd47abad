//! Applying a mined ruleset to held-out records.
//!
//! A record is matched when some rule's antecedent equals the record's
//! condition fields under [`AttributeSchema::equal`], the same predicate
//! used during training. The ruleset is unordered; the scan stops at the
//! first matching rule.

use crate::dataset::{check_arity, Record};
use crate::error::{Error, Phase, Result};
use crate::rule::Rule;
use crate::schema::{AttributeSchema, Value};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Predicted class of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The matching rule predicts `anomaly`.
    Anomaly,
    /// The matching rule predicts another class.
    Normal,
    /// No rule matched.
    NoMatch,
}

/// How a match is credited against the record's true label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPolicy {
    /// Any antecedent match on an attack is a detection, whatever the
    /// matching rule predicts; any match on a normal record is a false
    /// positive.
    #[default]
    RecordLabel,
    /// Only rules predicting `anomaly` flag a record. Matching scans for an
    /// `anomaly` rule first and falls back to any matching rule.
    RuleConsequent,
}

/// Tabulation bucket for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    Missed,
    TrueNegative,
}

/// Aggregate detection statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionReport {
    pub total_tests: usize,
    pub total_attacks: usize,
    pub detected: usize,
    pub missed: usize,
    pub false_positives: usize,
}

impl DetectionReport {
    fn record(&mut self, outcome: Outcome, is_attack: bool) {
        self.total_tests += 1;
        if is_attack {
            self.total_attacks += 1;
        }
        match outcome {
            Outcome::TruePositive => self.detected += 1,
            Outcome::FalsePositive => self.false_positives += 1,
            Outcome::Missed => self.missed += 1,
            Outcome::TrueNegative => {}
        }
    }

    /// Records whose true label is not `anomaly`.
    pub fn total_normal(&self) -> usize {
        self.total_tests - self.total_attacks
    }

    pub fn true_negatives(&self) -> usize {
        self.total_normal() - self.false_positives
    }

    /// `detected / total_attacks`, `None` when the sample holds no attacks.
    pub fn detection_rate(&self) -> Option<f64> {
        (self.total_attacks > 0).then(|| self.detected as f64 / self.total_attacks as f64)
    }

    /// `missed / total_attacks`, `None` when the sample holds no attacks.
    pub fn miss_rate(&self) -> Option<f64> {
        (self.total_attacks > 0).then(|| self.missed as f64 / self.total_attacks as f64)
    }

    /// Fails with [`Error::DegenerateDataset`] when no attacks were tested.
    pub fn require_attacks(&self) -> Result<()> {
        if self.total_attacks == 0 {
            return Err(Error::DegenerateDataset {
                phase: Phase::Testing,
                reason: "no attacks in sample".into(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total tests:     {}", self.total_tests)?;
        writeln!(f, "total attacks:   {}", self.total_attacks)?;
        match (self.detection_rate(), self.miss_rate()) {
            (Some(detected), Some(missed)) => {
                writeln!(
                    f,
                    "detected:        {} ({:.2}%)",
                    self.detected,
                    detected * 100.0
                )?;
                writeln!(f, "missed:          {} ({:.2}%)", self.missed, missed * 100.0)?;
            }
            _ => {
                writeln!(f, "detected:        0 (no attacks in sample)")?;
                writeln!(f, "missed:          0 (no attacks in sample)")?;
            }
        }
        write!(f, "false positives: {}", self.false_positives)
    }
}

/// Matches records against a ruleset.
#[derive(Debug, Clone, Copy)]
pub struct Detector<'a> {
    schema: &'a AttributeSchema,
    rules: &'a [Rule],
    policy: DetectionPolicy,
}

impl<'a> Detector<'a> {
    /// Creates a detector with [`DetectionPolicy::RecordLabel`].
    ///
    /// Fails with [`Error::MalformedRecord`] (index of the rule) if any
    /// rule's arity differs from the schema's.
    pub fn new(schema: &'a AttributeSchema, rules: &'a [Rule]) -> Result<Self> {
        if let Some((i, rule)) = rules
            .iter()
            .enumerate()
            .find(|(_, r)| r.genes().len() != schema.arity())
        {
            return Err(Error::MalformedRecord {
                phase: Phase::Testing,
                index: i,
                reason: format!(
                    "rule has {} genes, schema has {} attributes",
                    rule.genes().len(),
                    schema.arity()
                ),
            });
        }
        Ok(Self {
            schema,
            rules,
            policy: DetectionPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: DetectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DetectionPolicy {
        self.policy
    }

    /// First rule whose antecedent matches `record`.
    ///
    /// Fails with [`Error::MalformedRecord`] (index 0) if the record's
    /// arity differs from the schema's.
    pub fn find_match(&self, record: &[Value]) -> Result<Option<&'a Rule>> {
        self.check_record(record)?;
        Ok(self.first_match(record))
    }

    /// Predicted class of `record`.
    pub fn classify(&self, record: &[Value]) -> Result<Classification> {
        self.check_record(record)?;
        Ok(self.predict(record))
    }

    /// Tabulation bucket of `record` under the detector's policy.
    pub fn outcome(&self, record: &Record) -> Result<Outcome> {
        self.check_record(record)?;
        Ok(self.bucket(record))
    }

    fn check_record(&self, record: &[Value]) -> Result<()> {
        if record.len() != self.schema.arity() {
            return Err(Error::MalformedRecord {
                phase: Phase::Testing,
                index: 0,
                reason: format!(
                    "expected {} values, found {}",
                    self.schema.arity(),
                    record.len()
                ),
            });
        }
        Ok(())
    }

    fn first_match(&self, record: &[Value]) -> Option<&'a Rule> {
        let mut matching = self
            .rules
            .iter()
            .filter(|rule| self.schema.matches_antecedent(rule.antecedent(), record));
        match self.policy {
            DetectionPolicy::RecordLabel => matching.next(),
            DetectionPolicy::RuleConsequent => {
                let first = matching.next()?;
                if first.predicts_anomaly() {
                    return Some(first);
                }
                matching.find(|r| r.predicts_anomaly()).or(Some(first))
            }
        }
    }

    fn predict(&self, record: &[Value]) -> Classification {
        match self.first_match(record) {
            Some(rule) if rule.predicts_anomaly() => Classification::Anomaly,
            Some(_) => Classification::Normal,
            None => Classification::NoMatch,
        }
    }

    fn bucket(&self, record: &Record) -> Outcome {
        let flagged = match self.policy {
            DetectionPolicy::RecordLabel => self.first_match(record).is_some(),
            DetectionPolicy::RuleConsequent => self.predict(record) == Classification::Anomaly,
        };
        match (flagged, record.is_attack()) {
            (true, true) => Outcome::TruePositive,
            (true, false) => Outcome::FalsePositive,
            (false, true) => Outcome::Missed,
            (false, false) => Outcome::TrueNegative,
        }
    }

    /// Classifies every record and tabulates the results.
    ///
    /// Fails with [`Error::MalformedRecord`] on the first record whose
    /// arity differs from the schema. A sample without attacks is reported,
    /// not rejected; see [`DetectionReport::require_attacks`].
    pub fn evaluate(&self, records: &[Record]) -> Result<DetectionReport> {
        check_arity(self.schema, records, Phase::Testing)?;

        let mut report = DetectionReport::default();
        for record in records {
            report.record(self.bucket(record), record.is_attack());
        }

        if report.total_attacks == 0 {
            warn!(tests = report.total_tests, "no attacks in sample");
        }
        info!(
            rules = self.rules.len(),
            tests = report.total_tests,
            attacks = report.total_attacks,
            detected = report.detected,
            missed = report.missed,
            false_positives = report.false_positives,
            "detection complete"
        );
        Ok(report)
    }
}

/// Draws up to `size` records without replacement. `None` keeps them all.
pub fn sample_records<R: Rng>(records: &[Record], size: Option<usize>, rng: &mut R) -> Vec<Record> {
    match size {
        None => records.to_vec(),
        Some(n) => index::sample(rng, records.len(), n.min(records.len()))
            .into_iter()
            .map(|i| records[i].clone())
            .collect(),
    }
}
