//! File formats: dataset loading and ruleset persistence.
//!
//! - [`ArffLoader`]: attribute-relation dataset files → [`Dataset`](crate::dataset::Dataset)
//! - [`DelimitedRuleset`]: one rule per line, comma-separated by default

mod arff;
mod ruleset;

pub use arff::{parse_arff, ArffLoader, DatasetLoader, RawDataset};
pub use ruleset::{DelimitedRuleset, RulesetReader, RulesetWriter};
