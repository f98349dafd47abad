//! Attribute schema: domains, value generation, and type-aware equality.
//!
//! The schema is the single place that knows how to draw a random value for
//! an attribute and how two values of an attribute compare. Fitness
//! evaluation and detection both go through [`AttributeSchema::equal`], so
//! training-time and test-time matching always agree.
//!
//! # Key Types
//!
//! - [`Value`]: a record field or rule gene
//! - [`Domain`]: categorical enumeration or continuous range
//! - [`AttributeSchema`]: ordered attributes, last one is the class label
//! - [`GeneratorTable`]: name-pattern table choosing continuous ranges

mod attributes;
mod generator;
mod types;

pub use attributes::{AttributeSchema, DEFAULT_TOLERANCE};
pub use generator::{ContinuousRange, GenerationRule, GeneratorTable, NamePattern};
pub use types::{Attribute, Domain, DomainDescriptor, Value, ANOMALY, NORMAL};
