//! Error types shared by every phase of a mining run.

use std::fmt;
use thiserror::Error;

/// The run phase an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the dataset or a ruleset from disk.
    Loading,
    /// Evolving the rule population.
    Training,
    /// Applying a ruleset to held-out records.
    Testing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Loading => f.write_str("loading"),
            Phase::Training => f.write_str("training"),
            Phase::Testing => f.write_str("testing"),
        }
    }
}

/// Errors produced by the rule miner.
///
/// No error is retried; each one aborts the phase that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// An attribute's domain descriptor is neither an enumeration nor a
    /// recognized continuous marker.
    #[error("attribute `{attribute}` has unrecognized domain `{descriptor}`")]
    UnknownAttributeDomain {
        attribute: String,
        descriptor: String,
    },

    /// The schema is structurally unusable (duplicate names, bad label, ...).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The dataset (or a sample drawn from it) is empty where records are required.
    #[error("degenerate dataset during {phase}: {reason}")]
    DegenerateDataset { phase: Phase, reason: String },

    /// A record does not fit the schema.
    #[error("malformed record {index} during {phase}: {reason}")]
    MalformedRecord {
        phase: Phase,
        index: usize,
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A text input could not be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = Error::MalformedRecord {
            phase: Phase::Testing,
            index: 7,
            reason: "expected 3 values, found 2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("record 7"), "{msg}");
        assert!(msg.contains("testing"), "{msg}");

        let err = Error::UnknownAttributeDomain {
            attribute: "when".into(),
            descriptor: "DATE".into(),
        };
        assert!(err.to_string().contains("`when`"));
    }

    #[test]
    fn test_io_conversion() {
        fn open() -> Result<()> {
            std::fs::File::open("/definitely/not/here.arff")?;
            Ok(())
        }
        assert!(matches!(open(), Err(Error::Io(_))));
    }
}
