//! Selection strategies for the GA.
//!
//! A [`Selector`] fills the offspring pool with indices into the current
//! population. Selection only copies; it never invalidates fitness.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{compare_fitness, Individual};
use crate::error::{Error, Phase, Result};
use rand::Rng;
use std::cmp::Ordering;

/// Chooses `count` parents from a population.
pub trait Selector: Send + Sync {
    /// Returns `count` indices into `population`, repeats allowed.
    ///
    /// Fails with [`Error::DegenerateDataset`] if `population` is empty.
    fn select<I: Individual, R: Rng>(
        &self,
        population: &[I],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>>;
}

/// Tournament selection: sample `size` individuals uniformly with
/// replacement and keep the one with the highest cached fitness.
///
/// Higher `size` = stronger selection pressure.
/// - 2: light pressure (good for diversity)
/// - 3-5: moderate pressure (typical default)
/// - >5: strong pressure (risk of premature convergence)
///
/// Ties keep the earliest draw.
///
/// # Examples
///
/// ```
/// use u_ruleminer::ga::Tournament;
///
/// let sel = Tournament::new(3);
/// assert_eq!(sel.size, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tournament {
    pub size: usize,
}

impl Tournament {
    /// Creates a tournament of `size` aspirants (at least 1).
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Runs a single tournament.
    ///
    /// # Panics
    /// Panics if `population` is empty; [`Selector::select`] checks this
    /// and returns an error instead.
    ///
    /// # Complexity
    /// O(k)
    pub fn pick<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        let n = population.len();
        let mut best_idx = rng.random_range(0..n);
        for _ in 1..self.size.max(1) {
            let idx = rng.random_range(0..n);
            if compare_fitness(population[idx].fitness(), population[best_idx].fitness())
                == Ordering::Greater
            {
                best_idx = idx;
            }
        }
        best_idx
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Tournament::new(3)
    }
}

impl Selector for Tournament {
    fn select<I: Individual, R: Rng>(
        &self,
        population: &[I],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if population.is_empty() {
            return Err(Error::DegenerateDataset {
                phase: Phase::Training,
                reason: "tournament drawn from an empty population".into(),
            });
        }
        Ok((0..count).map(|_| self.pick(population, rng)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone)]
    struct TestInd {
        genes: Vec<u8>,
        fit: Option<f64>,
    }

    impl Individual for TestInd {
        type Gene = u8;
        fn genes(&self) -> &[u8] {
            &self.genes
        }
        fn genes_mut(&mut self) -> &mut [u8] {
            &mut self.genes
        }
        fn fitness(&self) -> Option<f64> {
            self.fit
        }
        fn set_fitness(&mut self, f: f64) {
            self.fit = Some(f);
        }
        fn invalidate_fitness(&mut self) {
            self.fit = None;
        }
    }

    fn make_population(fitnesses: &[f64]) -> Vec<TestInd> {
        fitnesses
            .iter()
            .map(|&f| TestInd {
                genes: Vec::new(),
                fit: Some(f),
            })
            .collect()
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[0.1, 0.5, 0.9, 0.2]);
        let mut rng = StdRng::seed_from_u64(42);

        // With tournament size = population size, best should be selected
        // most often (though not always due to with-replacement sampling)
        let picks = Tournament::new(4).select(&pop, 10_000, &mut rng).unwrap();
        let mut counts = [0u32; 4];
        for idx in picks {
            counts[idx] += 1;
        }
        assert!(
            counts[2] > 6000,
            "expected best to be selected >60% of the time, got {counts:?}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[0.1, 0.5, 0.9, 0.2]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for idx in Tournament::new(1).select(&pop, 10_000, &mut rng).unwrap() {
            counts[idx] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_size_zero_clamped_to_one() {
        assert_eq!(Tournament::new(0).size, 1);
    }

    #[test]
    fn test_select_returns_requested_count() {
        let pop = make_population(&[0.3, 0.4]);
        let mut rng = StdRng::seed_from_u64(1);
        let picks = Tournament::default().select(&pop, 7, &mut rng).unwrap();
        assert_eq!(picks.len(), 7);
        assert!(picks.iter().all(|&i| i < 2));
    }

    #[test]
    fn test_invalid_fitness_loses() {
        let mut pop = make_population(&[0.0, 0.0]);
        pop[0].invalidate_fitness();
        let mut rng = StdRng::seed_from_u64(9);
        let picks = Tournament::new(8).select(&pop, 200, &mut rng).unwrap();
        assert!(picks.iter().filter(|&&i| i == 1).count() > 190);
    }

    #[test]
    #[should_panic]
    fn test_pick_on_empty_population_panics() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = StdRng::seed_from_u64(42);
        Tournament::new(2).pick(&pop, &mut rng);
    }

    #[test]
    fn test_empty_population_is_degenerate() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = StdRng::seed_from_u64(42);
        let err = Tournament::new(3).select(&pop, 3, &mut rng).unwrap_err();
        assert!(matches!(err, Error::DegenerateDataset { .. }));
    }
}
