//! Evolutionary mining of network-intrusion classification rules.
//!
//! A rule assigns a value to every attribute of a connection record, class
//! label included. A population of rules is evolved against a labelled
//! dataset under a support/confidence fitness, and the final population is
//! used, unranked, as a detector on held-out records.
//!
//! - **Schema** ([`schema`]): categorical and continuous domains,
//!   type-aware random generation and tolerance-aware equality.
//! - **Rules** ([`rule`]): the chromosome, with a cached fitness that is
//!   invalidated on every gene change.
//! - **Fitness** ([`fitness`]): `w_s * support + w_c * confidence` over the
//!   whole training set.
//! - **GA** ([`ga`]): generational loop with tournament selection,
//!   two-point crossover and uniform reset mutation; only changed
//!   individuals are re-evaluated.
//! - **Detection** ([`detect`]): first-match classification and detection
//!   statistics.
//! - **I/O** ([`io`]): ARFF loading and delimited ruleset persistence.
//!
//! # Example
//!
//! ```
//! use u_ruleminer::dataset::Dataset;
//! use u_ruleminer::detect::Detector;
//! use u_ruleminer::fitness::FitnessWeights;
//! use u_ruleminer::ga::GaConfig;
//! use u_ruleminer::mining::mine_rules;
//! use u_ruleminer::schema::{Attribute, AttributeSchema};
//!
//! let schema = AttributeSchema::new(vec![
//!     Attribute::categorical("protocol", &["tcp", "udp"]),
//!     Attribute::categorical("label", &["normal", "anomaly"]),
//! ])?;
//! let train = Dataset::from_rows(schema, vec![
//!     vec!["tcp", "normal"],
//!     vec!["udp", "anomaly"],
//! ])?;
//!
//! let config = GaConfig::default().with_population_size(20).with_max_generations(5).with_seed(1);
//! let outcome = mine_rules(&train, FitnessWeights::default(), &config)?;
//!
//! let detector = Detector::new(train.schema(), &outcome.ruleset)?;
//! let report = detector.evaluate(train.records())?;
//! assert_eq!(report.total_tests, 2);
//! # Ok::<(), u_ruleminer::Error>(())
//! ```

pub mod config;
pub mod dataset;
pub mod detect;
mod error;
pub mod fitness;
pub mod ga;
pub mod io;
pub mod mining;
pub mod random;
pub mod rule;
pub mod schema;

pub use error::{Error, Phase, Result};
