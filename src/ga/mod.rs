//! Generational genetic algorithm engine.
//!
//! A generic engine built on trait-based abstractions. A problem plugs in by
//! implementing [`GaProblem`]; the individual type implements [`Individual`]
//! and carries an optional cached fitness that operators invalidate.
//!
//! # Core Traits
//!
//! - [`Individual`]: fixed-length chromosome with cached fitness (maximized)
//! - [`GaProblem`]: initialization, gene regeneration, evaluation
//! - [`Selector`], [`Crossover`], [`Mutator`]: strategy interfaces
//!
//! # Key Types
//!
//! - [`GaConfig`]: algorithm parameters
//! - [`GaRunner`]: executes the generational loop
//! - [`GaResult`]: final population with statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use operators::{Crossover, Mutator, TwoPoint, UniformReset};
pub use runner::{GaResult, GaRunner, GenerationStats, Termination};
pub use selection::{Selector, Tournament};
pub use types::{compare_fitness, GaProblem, Individual};
