//! GA generational loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → (selection → clone → crossover → mutation
//! → re-evaluation → replacement) × generations.
//!
//! Replacement is fully generational: the offspring pool becomes the next
//! population unconditionally, with no elitism.

use super::config::GaConfig;
use super::operators::{Crossover, Mutator, TwoPoint, UniformReset};
use super::selection::{Selector, Tournament};
use super::types::{compare_fitness, GaProblem, Individual};
use crate::error::Result;
use crate::random::rng_from;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// All configured generations ran.
    Completed,
    /// The cancellation flag was observed at a generation boundary.
    Cancelled,
    /// The time limit was exceeded at a generation boundary.
    TimedOut,
}

/// Fitness summary of one population snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// 0 for the initial population.
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    /// Individuals (re-)evaluated to produce this population.
    pub evaluations: usize,
}

impl GenerationStats {
    fn collect<I: Individual>(generation: usize, population: &[I], evaluations: usize) -> Self {
        let fitnesses: Vec<f64> = population.iter().filter_map(|i| i.fitness()).collect();
        let (best, worst, sum) = fitnesses.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY, 0.0),
            |(best, worst, sum), &f| (best.max(f), worst.min(f), sum + f),
        );
        let mean = if fitnesses.is_empty() {
            0.0
        } else {
            sum / fitnesses.len() as f64
        };
        Self {
            generation,
            best,
            mean,
            worst,
            evaluations,
        }
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The final population, every fitness valid.
    pub population: Vec<I>,

    /// Number of generation steps executed.
    pub generations: usize,

    pub termination: Termination,

    /// Total fitness evaluations, initial population included.
    pub evaluations: usize,

    /// One entry for the initial population plus one per generation.
    pub history: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// The fittest individual of the final population.
    pub fn best(&self) -> Option<&I> {
        self.population
            .iter()
            .max_by(|a, b| compare_fitness(a.fitness(), b.fitness()))
    }
}

/// Executes the GA loop with pluggable selection, crossover and mutation.
///
/// Each run builds its own runner; there is no shared registry.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::new(config)?.run(&problem)?;
/// println!("best fitness: {:?}", result.best().and_then(|b| b.fitness()));
/// ```
#[derive(Debug, Clone)]
pub struct GaRunner<S = Tournament, C = TwoPoint, M = UniformReset> {
    config: GaConfig,
    selector: S,
    crossover: C,
    mutator: M,
}

impl GaRunner {
    /// Validates `config` and builds the default operator set: tournament
    /// selection, two-point crossover, uniform reset mutation.
    pub fn new(config: GaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selector: Tournament::new(config.tournament_size),
            crossover: TwoPoint,
            mutator: UniformReset::new(config.effective_gene_mutation_rate()),
            config,
        })
    }
}

impl<S: Selector, C: Crossover, M: Mutator> GaRunner<S, C, M> {
    /// Replaces the selection strategy.
    pub fn with_selector<S2: Selector>(self, selector: S2) -> GaRunner<S2, C, M> {
        GaRunner {
            config: self.config,
            selector,
            crossover: self.crossover,
            mutator: self.mutator,
        }
    }

    /// Replaces the crossover operator.
    pub fn with_crossover<C2: Crossover>(self, crossover: C2) -> GaRunner<S, C2, M> {
        GaRunner {
            config: self.config,
            selector: self.selector,
            crossover,
            mutator: self.mutator,
        }
    }

    /// Replaces the mutation operator.
    pub fn with_mutator<M2: Mutator>(self, mutator: M2) -> GaRunner<S, C, M2> {
        GaRunner {
            config: self.config,
            selector: self.selector,
            crossover: self.crossover,
            mutator,
        }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA to completion (or time limit).
    pub fn run<P: GaProblem>(&self, problem: &P) -> Result<GaResult<P::Individual>> {
        self.run_with_cancel(problem, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is set to `true`, the GA stops at the next generation
    /// boundary and returns the population it has.
    pub fn run_with_cancel<P: GaProblem>(
        &self,
        problem: &P,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>> {
        let config = &self.config;
        let started = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);
        let mut rng = rng_from(config.seed);

        info!(
            population_size = config.population_size,
            max_generations = config.max_generations,
            crossover_rate = config.crossover_rate,
            mutation_rate = config.mutation_rate,
            "starting evolution"
        );

        // 1. Initialize and evaluate
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        let mut evaluations = evaluate_invalid(problem, &mut population, config.parallel);

        let initial = GenerationStats::collect(0, &population, evaluations);
        problem.on_generation(&initial);
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(initial);

        let mut termination = Termination::Completed;
        let mut generations = 0;

        // 2. Generational loop
        for gen in 1..=config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if let Some(limit) = time_limit {
                if started.elapsed() >= limit {
                    termination = Termination::TimedOut;
                    break;
                }
            }

            let (offspring, evaluated) = self.step(problem, &population, &mut rng)?;
            population = offspring;
            evaluations += evaluated;
            generations = gen;

            let stats = GenerationStats::collect(gen, &population, evaluated);
            debug!(
                generation = gen,
                best = stats.best,
                mean = stats.mean,
                evaluated,
                "generation complete"
            );
            problem.on_generation(&stats);
            history.push(stats);
        }

        if termination != Termination::Completed {
            warn!(?termination, generations, "evolution stopped early");
        }
        info!(
            generations,
            evaluations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evolution finished"
        );

        Ok(GaResult {
            population,
            generations,
            termination,
            evaluations,
            history,
        })
    }

    /// Produces the next generation from `population`.
    ///
    /// Returns the offspring and how many of them had to be re-evaluated.
    /// Offspring that went through selection alone keep their cached
    /// fitness.
    pub fn step<P: GaProblem, R: Rng>(
        &self,
        problem: &P,
        population: &[P::Individual],
        rng: &mut R,
    ) -> Result<(Vec<P::Individual>, usize)> {
        // Selection + clone
        let chosen = self.selector.select(population, population.len(), rng)?;
        let mut offspring: Vec<P::Individual> =
            chosen.into_iter().map(|i| population[i].clone()).collect();

        // Crossover on adjacent pairs
        for pair in offspring.chunks_exact_mut(2) {
            if rng.random_range(0.0..1.0) < self.config.crossover_rate {
                let (left, right) = pair.split_at_mut(1);
                self.crossover.crossover(&mut left[0], &mut right[0], rng);
            }
        }

        // Mutation
        for child in offspring.iter_mut() {
            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                self.mutator.mutate(problem, child, rng);
            }
        }

        // Re-evaluate only what changed
        let evaluated = evaluate_invalid(problem, &mut offspring, self.config.parallel);
        Ok((offspring, evaluated))
    }
}

/// Evaluates every individual with invalid fitness; returns how many.
#[cfg(feature = "parallel")]
fn evaluate_invalid<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) -> usize {
    if parallel {
        population
            .par_iter_mut()
            .filter(|ind| !ind.has_valid_fitness())
            .map(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            })
            .count()
    } else {
        evaluate_serial(problem, population)
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_invalid<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    _parallel: bool,
) -> usize {
    evaluate_serial(problem, population)
}

fn evaluate_serial<P: GaProblem>(problem: &P, population: &mut [P::Individual]) -> usize {
    let mut count = 0;
    for ind in population.iter_mut().filter(|ind| !ind.has_valid_fitness()) {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
        count += 1;
    }
    count
}

// ============================================================================
// Tests
// ============================================================================
