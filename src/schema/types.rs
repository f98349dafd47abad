//! Attribute values and domain descriptions.

use super::generator::ContinuousRange;
use std::fmt;

/// Label value marking a benign connection.
pub const NORMAL: &str = "normal";

/// Label value marking an attack.
pub const ANOMALY: &str = "anomaly";

/// A single attribute value, held by both records and rule genes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A member of a categorical enumeration.
    Nominal(String),
    /// A real number.
    Real(f64),
    /// An unset gene or a missing (`?`) field.
    Missing,
}

impl Value {
    /// Returns the nominal text, if this is a categorical value.
    pub fn as_nominal(&self) -> Option<&str> {
        match self {
            Value::Nominal(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a real value.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    /// True for `Value::Nominal("anomaly")`.
    pub fn is_anomaly(&self) -> bool {
        self.as_nominal() == Some(ANOMALY)
    }

    /// True for `Value::Nominal("normal")`.
    pub fn is_normal(&self) -> bool {
        self.as_nominal() == Some(NORMAL)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nominal(s) => f.write_str(s),
            Value::Real(x) => write!(f, "{x}"),
            Value::Missing => f.write_str("?"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Nominal(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

/// Domain descriptor as produced by a dataset loader, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainDescriptor {
    /// A type marker such as `REAL`.
    Marker(String),
    /// An ordered categorical enumeration.
    Enumeration(Vec<String>),
}

impl DomainDescriptor {
    /// Markers accepted as continuous (case-insensitive).
    pub const CONTINUOUS_MARKERS: [&'static str; 3] = ["REAL", "NUMERIC", "INTEGER"];

    /// True if this is a recognized continuous marker.
    pub fn is_continuous(&self) -> bool {
        match self {
            DomainDescriptor::Marker(m) => Self::CONTINUOUS_MARKERS
                .iter()
                .any(|known| m.eq_ignore_ascii_case(known)),
            DomainDescriptor::Enumeration(_) => false,
        }
    }
}

impl fmt::Display for DomainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainDescriptor::Marker(m) => f.write_str(m),
            DomainDescriptor::Enumeration(values) => write!(f, "{{{}}}", values.join(",")),
        }
    }
}

/// Validated attribute domain.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Finite enumeration; genes are drawn uniformly from it.
    Categorical(Vec<String>),
    /// Real-valued; genes are drawn from the configured range.
    Continuous(ContinuousRange),
}

/// A named attribute and its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub domain: Domain,
}

impl Attribute {
    /// Creates a categorical attribute.
    pub fn categorical<S: Into<String>>(name: S, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Categorical(values.iter().map(|v| v.to_string()).collect()),
        }
    }

    /// Creates a continuous attribute with the given generation range.
    pub fn continuous<S: Into<String>>(name: S, range: ContinuousRange) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous(range),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.domain, Domain::Categorical(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display_is_natural_text() {
        assert_eq!(Value::from("tcp").to_string(), "tcp");
        assert_eq!(Value::Real(10.0).to_string(), "10");
        assert_eq!(Value::Real(0.25).to_string(), "0.25");
        assert_eq!(Value::Missing.to_string(), "?");
    }

    #[test]
    fn test_label_helpers() {
        assert!(Value::from("anomaly").is_anomaly());
        assert!(Value::from("normal").is_normal());
        assert!(!Value::Real(1.0).is_anomaly());
    }

    #[test]
    fn test_continuous_markers() {
        assert!(DomainDescriptor::Marker("real".into()).is_continuous());
        assert!(DomainDescriptor::Marker("NUMERIC".into()).is_continuous());
        assert!(!DomainDescriptor::Marker("STRING".into()).is_continuous());
        assert!(!DomainDescriptor::Enumeration(vec!["a".into()]).is_continuous());
    }
}
