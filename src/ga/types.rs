//! Core trait definitions for the GA engine.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generational engine and the rule-mining problem.
//! Fitness is maximized: higher is better.

use rand::Rng;
use std::cmp::Ordering;

/// A fixed-length chromosome carrying an optional cached fitness.
///
/// The cache is cleared whenever genes change and must be recomputed before
/// it is read again. The engine only re-evaluates individuals whose cache
/// is empty.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Bits {
///     genes: Vec<bool>,
///     fitness: Option<f64>,
/// }
///
/// impl Individual for Bits {
///     type Gene = bool;
///     fn genes(&self) -> &[bool] { &self.genes }
///     fn genes_mut(&mut self) -> &mut [bool] { &mut self.genes }
///     fn fitness(&self) -> Option<f64> { self.fitness }
///     fn set_fitness(&mut self, f: f64) { self.fitness = Some(f); }
///     fn invalidate_fitness(&mut self) { self.fitness = None; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// One position of the chromosome.
    type Gene: Clone + Send + Sync;

    fn genes(&self) -> &[Self::Gene];

    /// Raw mutable gene access for operators.
    ///
    /// Callers that change genes through this must call
    /// [`invalidate_fitness`](Individual::invalidate_fitness).
    fn genes_mut(&mut self) -> &mut [Self::Gene];

    /// Cached fitness, `None` when invalid.
    fn fitness(&self) -> Option<f64>;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Clears the cached fitness.
    fn invalidate_fitness(&mut self);

    /// True when the cached fitness is present.
    fn has_valid_fitness(&self) -> bool {
        self.fitness().is_some()
    }
}

/// Orders two cached fitness values, best last.
///
/// Invalid (`None`) fitness ranks below every valid value; NaN compares
/// equal to everything so it never wins a strict comparison.
pub fn compare_fitness(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Defines a GA optimization problem.
///
/// Covers:
///
/// 1. **Initialization**: how to create a random individual
/// 2. **Gene regeneration**: a fresh random value for one position (used
///    by reset mutation)
/// 3. **Evaluation**: how to compute fitness
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel using rayon.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual with invalid fitness.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Draws a fresh value for the gene at `position`.
    fn random_gene<R: Rng>(
        &self,
        position: usize,
        rng: &mut R,
    ) -> <Self::Individual as Individual>::Gene;

    /// Evaluates an individual. Higher is better.
    ///
    /// This is typically the most expensive operation and may run in
    /// parallel across the population.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Called at the end of each generation.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _stats: &super::GenerationStats) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_fitness_orders_invalid_lowest() {
        assert_eq!(compare_fitness(Some(0.0), None), Ordering::Greater);
        assert_eq!(compare_fitness(None, Some(-5.0)), Ordering::Less);
        assert_eq!(compare_fitness(None, None), Ordering::Equal);
        assert_eq!(compare_fitness(Some(0.2), Some(0.5)), Ordering::Less);
        assert_eq!(compare_fitness(Some(f64::NAN), Some(1.0)), Ordering::Equal);
    }
}
