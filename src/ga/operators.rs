//! Crossover and mutation operators for fixed-length chromosomes.
//!
//! # Crossover Operators
//!
//! - [`TwoPoint`]: exchange the segment between two random cuts
//!
//! # Mutation Operators
//!
//! - [`UniformReset`]: replace each gene with a fresh random value at a
//!   per-gene rate
//!
//! Both invalidate the cached fitness of every individual they change.

use super::types::{GaProblem, Individual};
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Recombines two individuals in place.
pub trait Crossover: Send + Sync {
    fn crossover<I: Individual, R: Rng>(&self, a: &mut I, b: &mut I, rng: &mut R);
}

/// Two-point crossover.
///
/// Picks cuts `1 <= c1 < c2 <= n` and swaps `a[c1..c2]` with `b[c1..c2]`.
/// Chromosomes shorter than 2 genes are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoPoint;

impl Crossover for TwoPoint {
    fn crossover<I: Individual, R: Rng>(&self, a: &mut I, b: &mut I, rng: &mut R) {
        let n = a.genes().len().min(b.genes().len());
        if n < 2 {
            return;
        }
        let (c1, c2) = cut_points(n, rng);
        swap_segment(a.genes_mut(), b.genes_mut(), c1, c2);
        a.invalidate_fitness();
        b.invalidate_fitness();
    }
}

/// Draws two cut points `1 <= c1 < c2 <= n` for a chromosome of length `n >= 2`.
pub fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    debug_assert!(n >= 2, "cut_points needs at least two genes");
    let c1 = rng.random_range(1..=n);
    let c2 = rng.random_range(1..n);
    if c2 >= c1 {
        (c1, c2 + 1)
    } else {
        (c2, c1)
    }
}

/// Exchanges `a[c1..c2]` with `b[c1..c2]`.
///
/// Applying the same cuts twice restores both slices.
///
/// # Panics
/// Panics if `c1 > c2` or `c2` exceeds either slice's length.
pub fn swap_segment<G>(a: &mut [G], b: &mut [G], c1: usize, c2: usize) {
    a[c1..c2].swap_with_slice(&mut b[c1..c2]);
}

// ============================================================================
// Mutation
// ============================================================================

/// Perturbs an individual in place.
pub trait Mutator: Send + Sync {
    /// Returns `true` if any gene was replaced.
    fn mutate<P: GaProblem, R: Rng>(
        &self,
        problem: &P,
        individual: &mut P::Individual,
        rng: &mut R,
    ) -> bool;
}

/// Uniform reset mutation: each gene is independently replaced by
/// [`GaProblem::random_gene`] with probability `gene_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformReset {
    pub gene_rate: f64,
}

impl UniformReset {
    /// Creates the operator; the rate is clamped to `[0, 1]`.
    pub fn new(gene_rate: f64) -> Self {
        Self {
            gene_rate: gene_rate.clamp(0.0, 1.0),
        }
    }
}

impl Mutator for UniformReset {
    fn mutate<P: GaProblem, R: Rng>(
        &self,
        problem: &P,
        individual: &mut P::Individual,
        rng: &mut R,
    ) -> bool {
        let mut changed = false;
        for position in 0..individual.genes().len() {
            if rng.random_range(0.0..1.0) < self.gene_rate {
                individual.genes_mut()[position] = problem.random_gene(position, rng);
                changed = true;
            }
        }
        if changed {
            individual.invalidate_fitness();
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
