//! Continuous-value generation rules.
//!
//! Which range (and rounding) a continuous attribute is sampled from is
//! configuration data, not code: a [`GeneratorTable`] maps attribute names
//! to [`ContinuousRange`]s through ordered [`NamePattern`]s, first match wins.

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Uniform sampling range `[low, high)` with optional decimal rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousRange {
    pub low: f64,
    pub high: f64,
    /// Number of decimals kept after sampling. `None` keeps full precision.
    #[serde(default)]
    pub precision: Option<u32>,
}

impl ContinuousRange {
    /// Creates an unrounded range.
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            precision: None,
        }
    }

    /// Sets the rounding precision.
    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.precision = Some(decimals);
        self
    }

    /// Draws one value.
    ///
    /// A degenerate range (`low == high`) always yields `low`. Rounding may
    /// land exactly on `high`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let x = if self.high > self.low {
            rng.random_range(self.low..self.high)
        } else {
            self.low
        };
        match self.precision {
            Some(p) => round_to(x, p),
            None => x,
        }
    }

    /// Checks the bounds are finite and ordered.
    pub fn validate(&self, attribute: &str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(Error::InvalidSchema(format!(
                "attribute `{attribute}`: generation range must be finite"
            )));
        }
        if self.low > self.high {
            return Err(Error::InvalidSchema(format!(
                "attribute `{attribute}`: generation range low {} exceeds high {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale
}

/// Attribute-name matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(s) => name == s,
            NamePattern::Prefix(s) => name.starts_with(s.as_str()),
            NamePattern::Suffix(s) => name.ends_with(s.as_str()),
            NamePattern::Contains(s) => name.contains(s.as_str()),
        }
    }
}

/// One row of a [`GeneratorTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRule {
    pub pattern: NamePattern,
    pub range: ContinuousRange,
}

/// Ordered name-pattern table resolving each continuous attribute's range.
///
/// # Examples
///
/// ```
/// use u_ruleminer::schema::{ContinuousRange, GeneratorTable, NamePattern};
///
/// let table = GeneratorTable::default()
///     .with_rule(NamePattern::Suffix("_rate".into()), ContinuousRange::new(0.0, 1.0).with_precision(2));
/// assert_eq!(table.resolve("serror_rate").high, 1.0);
/// assert_eq!(table.resolve("src_bytes").high, 100_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorTable {
    #[serde(default)]
    pub rules: Vec<GenerationRule>,
    pub fallback: ContinuousRange,
}

impl Default for GeneratorTable {
    /// No rules; every continuous attribute uses `[0, 100000)` unrounded.
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: ContinuousRange::new(0.0, 100_000.0),
        }
    }
}

impl GeneratorTable {
    /// Creates an empty table with the given fallback range.
    pub fn new(fallback: ContinuousRange) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Appends a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, pattern: NamePattern, range: ContinuousRange) -> Self {
        self.rules.push(GenerationRule { pattern, range });
        self
    }

    /// Heuristic preset for connection-record features.
    ///
    /// - `*_rate` → `[0, 1)` at 2 decimals
    /// - `duration`, `*bytes*` → `[0, 100000)` integers
    /// - `*count` → `[0, 512)` integers
    /// - anything else → `[0, 10)`
    pub fn network_traffic() -> Self {
        Self::new(ContinuousRange::new(0.0, 10.0))
            .with_rule(
                NamePattern::Suffix("_rate".into()),
                ContinuousRange::new(0.0, 1.0).with_precision(2),
            )
            .with_rule(
                NamePattern::Exact("duration".into()),
                ContinuousRange::new(0.0, 100_000.0).with_precision(0),
            )
            .with_rule(
                NamePattern::Contains("bytes".into()),
                ContinuousRange::new(0.0, 100_000.0).with_precision(0),
            )
            .with_rule(
                NamePattern::Suffix("count".into()),
                ContinuousRange::new(0.0, 512.0).with_precision(0),
            )
    }

    /// Returns the range for an attribute name.
    pub fn resolve(&self, name: &str) -> ContinuousRange {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(name))
            .map(|rule| rule.range)
            .unwrap_or(self.fallback)
    }

    /// Validates every range in the table.
    pub fn validate(&self) -> Result<()> {
        self.fallback.validate("<fallback>")?;
        for rule in &self.rules {
            rule.range.validate(&format!("{:?}", rule.pattern))?;
        }
        Ok(())
    }
}
