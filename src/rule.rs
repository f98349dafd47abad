//! Classification rules: the chromosome evolved by the miner.

use crate::ga::Individual;
use crate::schema::{AttributeSchema, Value};
use rand::Rng;
use std::fmt;

/// A full assignment of values to every attribute, label last.
///
/// The antecedent is every gene but the last; the consequent is the last
/// gene (the predicted class). The cached fitness is cleared by every gene
/// change.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    genes: Vec<Value>,
    fitness: Option<f64>,
}

impl Rule {
    /// Draws every gene independently from its attribute's domain.
    pub fn random<R: Rng>(schema: &AttributeSchema, rng: &mut R) -> Self {
        Self {
            genes: (0..schema.arity())
                .map(|i| schema.generate(i, rng))
                .collect(),
            fitness: None,
        }
    }

    /// A placeholder of the schema's arity with every gene unset.
    pub fn empty(schema: &AttributeSchema) -> Self {
        Self {
            genes: vec![Value::Missing; schema.arity()],
            fitness: None,
        }
    }

    /// Wraps existing genes with no cached fitness.
    pub fn from_genes(genes: Vec<Value>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn genes(&self) -> &[Value] {
        &self.genes
    }

    /// Condition genes (all but the label).
    pub fn antecedent(&self) -> &[Value] {
        let end = self.genes.len().saturating_sub(1);
        &self.genes[..end]
    }

    /// Predicted class gene. `Missing` for a rule with no genes.
    pub fn consequent(&self) -> &Value {
        self.genes.last().unwrap_or(&Value::Missing)
    }

    /// True if the rule predicts `anomaly`.
    pub fn predicts_anomaly(&self) -> bool {
        self.consequent().is_anomaly()
    }

    /// Replaces one gene and invalidates the cached fitness.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_gene(&mut self, index: usize, value: Value) {
        self.genes[index] = value;
        self.fitness = None;
    }

    /// Cached fitness, `None` when invalid.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn into_genes(self) -> Vec<Value> {
        self.genes
    }
}

impl Individual for Rule {
    type Gene = Value;

    fn genes(&self) -> &[Value] {
        &self.genes
    }

    fn genes_mut(&mut self) -> &mut [Value] {
        &mut self.genes
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }
}

impl fmt::Display for Rule {
    /// `a=x AND b=y => label`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gene) in self.antecedent().iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "[{i}]={gene}")?;
        }
        write!(f, " => {}", self.consequent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::schema::{Attribute, ContinuousRange};

    fn schema() -> AttributeSchema {
        AttributeSchema::new(vec![
            Attribute::categorical("protocol", &["tcp", "udp"]),
            Attribute::continuous("bytes", ContinuousRange::new(0.0, 100.0)),
            Attribute::categorical("label", &["normal", "anomaly"]),
        ])
        .unwrap()
    }

    fn rule(proto: &str, bytes: f64, label: &str) -> Rule {
        Rule::from_genes(vec![proto.into(), bytes.into(), label.into()])
    }

    #[test]
    fn test_random_rule_matches_schema() {
        let schema = schema();
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let r = Rule::random(&schema, &mut rng);
            assert_eq!(r.genes().len(), 3);
            assert!(r.fitness().is_none());
            assert!(r.genes()[1].as_real().is_some());
            assert!(r.consequent().is_anomaly() || r.consequent().is_normal());
        }
    }

    #[test]
    fn test_empty_rule_has_unset_genes() {
        let r = Rule::empty(&schema());
        assert_eq!(r.genes(), &[Value::Missing, Value::Missing, Value::Missing]);
    }

    #[test]
    fn test_antecedent_and_consequent() {
        let r = rule("tcp", 10.0, "anomaly");
        assert_eq!(r.antecedent(), &[Value::from("tcp"), Value::Real(10.0)]);
        assert_eq!(r.consequent(), &Value::from("anomaly"));
        assert!(r.predicts_anomaly());
        assert!(Rule::from_genes(Vec::new()).antecedent().is_empty());
    }

    #[test]
    fn test_set_gene_invalidates_fitness() {
        let mut r = rule("tcp", 10.0, "normal");
        r.set_fitness(0.5);
        assert_eq!(Rule::fitness(&r), Some(0.5));
        r.set_gene(0, "udp".into());
        assert!(Rule::fitness(&r).is_none());
        assert_eq!(r.genes()[0], Value::from("udp"));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut a = rule("tcp", 10.0, "normal");
        let b = a.clone();
        a.set_gene(1, Value::Real(99.0));
        assert_eq!(b.genes()[1], Value::Real(10.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            rule("tcp", 10.0, "anomaly").to_string(),
            "[0]=tcp AND [1]=10 => anomaly"
        );
    }
}
