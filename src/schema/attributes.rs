//! The validated attribute schema shared by records and rules.

use super::generator::GeneratorTable;
use super::types::{Attribute, Domain, DomainDescriptor, Value, ANOMALY, NORMAL};
use crate::error::{Error, Result};
use rand::Rng;
use std::collections::HashSet;

/// Absolute tolerance for continuous equality unless configured otherwise.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Ordered attribute list; the last attribute is the class label.
///
/// Every record and every rule shares this order. Generation and equality
/// dispatch on the attribute's [`Domain`] at call time.
///
/// # Examples
///
/// ```
/// use u_ruleminer::schema::{Attribute, AttributeSchema, ContinuousRange, Value};
///
/// let schema = AttributeSchema::new(vec![
///     Attribute::categorical("protocol", &["tcp", "udp"]),
///     Attribute::continuous("bytes", ContinuousRange::new(0.0, 100.0)),
///     Attribute::categorical("label", &["normal", "anomaly"]),
/// ])
/// .unwrap();
///
/// assert!(schema.equal(1, &Value::Real(10.0), &Value::Real(10.004)));
/// assert!(!schema.equal(1, &Value::Real(10.0), &Value::Real(10.02)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
    tolerance: f64,
}

impl AttributeSchema {
    /// Validates and builds a schema with [`DEFAULT_TOLERANCE`].
    ///
    /// Requires at least one condition attribute, unique names, non-empty
    /// enumerations, valid generation ranges, and a categorical label holding
    /// both `normal` and `anomaly`.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        if attributes.len() < 2 {
            return Err(Error::InvalidSchema(format!(
                "need at least one condition attribute and a label, got {} attribute(s)",
                attributes.len()
            )));
        }

        let mut seen = HashSet::with_capacity(attributes.len());
        for attr in &attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate attribute name `{}`",
                    attr.name
                )));
            }
            match &attr.domain {
                Domain::Categorical(values) if values.is_empty() => {
                    return Err(Error::InvalidSchema(format!(
                        "attribute `{}` has an empty enumeration",
                        attr.name
                    )));
                }
                Domain::Categorical(_) => {}
                Domain::Continuous(range) => range.validate(&attr.name)?,
            }
        }

        let label = &attributes[attributes.len() - 1];
        match &label.domain {
            Domain::Categorical(values) => {
                for required in [NORMAL, ANOMALY] {
                    if !values.iter().any(|v| v == required) {
                        return Err(Error::InvalidSchema(format!(
                            "label attribute `{}` lacks the `{required}` value",
                            label.name
                        )));
                    }
                }
            }
            Domain::Continuous(_) => {
                return Err(Error::InvalidSchema(format!(
                    "label attribute `{}` must be categorical",
                    label.name
                )));
            }
        }

        Ok(Self {
            attributes,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Builds a schema from loader descriptors, resolving continuous ranges
    /// through `table`.
    ///
    /// Fails with [`Error::UnknownAttributeDomain`] on the first descriptor
    /// that is neither an enumeration nor a continuous marker.
    pub fn from_descriptors<I>(descriptors: I, table: &GeneratorTable) -> Result<Self>
    where
        I: IntoIterator<Item = (String, DomainDescriptor)>,
    {
        let attributes = descriptors
            .into_iter()
            .map(|(name, descriptor)| match descriptor {
                DomainDescriptor::Enumeration(values) => Ok(Attribute {
                    name,
                    domain: Domain::Categorical(values),
                }),
                d if d.is_continuous() => {
                    let range = table.resolve(&name);
                    Ok(Attribute {
                        name,
                        domain: Domain::Continuous(range),
                    })
                }
                d => Err(Error::UnknownAttributeDomain {
                    attribute: name,
                    descriptor: d.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(attributes)
    }

    /// Sets the continuous equality tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "equality_tolerance must be a finite value >= 0, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of attributes, label included.
    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    /// Position of the class label (always the last attribute).
    pub fn label_index(&self) -> usize {
        self.attributes.len() - 1
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Draws a random value for the attribute at `index`.
    ///
    /// # Panics
    /// Panics if `index >= arity()`.
    pub fn generate<R: Rng>(&self, index: usize, rng: &mut R) -> Value {
        match &self.attributes[index].domain {
            Domain::Categorical(values) => {
                Value::Nominal(values[rng.random_range(0..values.len())].clone())
            }
            Domain::Continuous(range) => Value::Real(range.sample(rng)),
        }
    }

    /// Type-aware equality for the attribute at `index`.
    ///
    /// Categorical values compare exactly; continuous values compare within
    /// the schema tolerance. Symmetric and reflexive for finite values.
    ///
    /// # Panics
    /// Panics if `index >= arity()`.
    pub fn equal(&self, index: usize, a: &Value, b: &Value) -> bool {
        match &self.attributes[index].domain {
            Domain::Categorical(_) => a == b,
            Domain::Continuous(_) => match (a, b) {
                (Value::Real(x), Value::Real(y)) => x == y || (x - y).abs() <= self.tolerance,
                (Value::Missing, Value::Missing) => true,
                _ => false,
            },
        }
    }

    /// True if every antecedent position matches the record.
    ///
    /// `antecedent` holds the condition genes only; the record may be full
    /// length, its label is ignored. An antecedent or record too short to
    /// cover every condition attribute never matches.
    pub fn matches_antecedent(&self, antecedent: &[Value], record: &[Value]) -> bool {
        let conditions = self.label_index();
        if antecedent.len() != conditions || record.len() < conditions {
            return false;
        }
        antecedent
            .iter()
            .zip(record)
            .enumerate()
            .all(|(i, (gene, field))| self.equal(i, gene, field))
    }

    /// Parses a text field for the attribute at `index`.
    ///
    /// `?` is a missing value. Categorical values must belong to the
    /// enumeration; continuous values must be finite numbers.
    pub fn parse_value(&self, index: usize, text: &str) -> std::result::Result<Value, String> {
        if text.trim() == "?" {
            return Ok(Value::Missing);
        }
        self.parse_literal(index, text.trim())
    }

    /// Parses a field taken verbatim, without the `?` missing marker.
    ///
    /// Used for quoted fields, where `?` is an ordinary categorical value.
    pub fn parse_literal(&self, index: usize, text: &str) -> std::result::Result<Value, String> {
        let attr = self
            .attributes
            .get(index)
            .ok_or_else(|| format!("no attribute at position {index}"))?;
        match &attr.domain {
            Domain::Categorical(values) => {
                if values.iter().any(|v| v == text) {
                    Ok(Value::Nominal(text.to_string()))
                } else {
                    Err(format!("`{text}` is not a value of `{}`", attr.name))
                }
            }
            Domain::Continuous(_) => match text.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Value::Real(x)),
                _ => Err(format!("`{text}` is not a finite number for `{}`", attr.name)),
            },
        }
    }
}
