//! Population-level crossover and mutation.
//!
//! [`GeneticOperators`] carries the probabilities of a run and applies
//! them to a whole generation. Every concurrent unit (one crossover pair
//! or one mutated individual) draws from its own [`SmallRng`] seeded from
//! the caller's generator, so runs with a fixed seed are reproducible
//! regardless of thread scheduling.
//!
//! # Usage
//!
//! ```
//! use u_cloud_schedule::config::GaConfig;
//! use u_cloud_schedule::ga::operators::GeneticOperators;
//!
//! let ops = GeneticOperators::from_config(&GaConfig::default());
//! assert_eq!(ops.crossover_probability, 0.3);
//! assert_eq!(ops.max_mutation_attempts, Some(256));
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::warn;

use super::chromosome::{clamp_probability, mutate_until_feasible};
use super::{CloudPicker, Crossover, FeasibilityOracle, Problem};
use crate::config::GaConfig;
use crate::models::Solution;

/// Crossover and mutation rates applied to each generation.
///
/// Probabilities outside `[0, 1]` are clamped when applied.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Per-individual probability of taking part in crossover.
    pub crossover_probability: f64,
    /// Per-gene probability of mutation.
    pub mutation_probability: f64,
    /// Oracle refusals tolerated per individual before it is kept as is.
    pub max_mutation_attempts: Option<usize>,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::from_config(&GaConfig::default())
    }
}

impl GeneticOperators {
    /// Takes the rates from a run configuration.
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            crossover_probability: config.crossover_probability,
            mutation_probability: config.mutation_probability,
            max_mutation_attempts: config.max_mutation_attempts,
        }
    }

    /// Pairs up individuals chosen for crossover and recombines each pair.
    ///
    /// Members are marked independently with `crossover_probability`.
    /// Pairs are drawn at random from the marked members; if both draws
    /// hit the same member the next one (cyclically) is used instead. An
    /// odd member left over passes through unchanged, as do unmarked
    /// members. Children come first in the returned generation, followed
    /// by the untouched individuals.
    ///
    /// Problems with at most one application have nothing to recombine;
    /// the population is returned as is.
    pub fn crossover<R: Rng>(
        &self,
        problem: &Problem,
        population: &[Solution],
        crossover: &dyn Crossover,
        oracle: &dyn FeasibilityOracle,
        rng: &mut R,
    ) -> Vec<Solution> {
        if problem.apps().len() <= 1 {
            return population.to_vec();
        }

        let marking = clamp_probability(self.crossover_probability);
        let mut pending: Vec<usize> = (0..population.len())
            .filter(|_| rng.random_bool(marking))
            .collect();
        let mut paired = vec![false; population.len()];
        let mut pairs = Vec::with_capacity(pending.len() / 2);
        while pending.len() > 1 {
            let first = rng.random_range(0..pending.len());
            let mut second = rng.random_range(0..pending.len());
            if second == first {
                second = (first + 1) % pending.len();
            }
            let (a, b) = (pending[first], pending[second]);
            pending.remove(first.max(second));
            pending.remove(first.min(second));
            paired[a] = true;
            paired[b] = true;
            pairs.push((a, b, rng.random::<u64>()));
        }
        tracing::debug!(pairs = pairs.len(), "crossover pairs drawn");

        let mut next: Vec<Solution> = pairs
            .par_iter()
            .flat_map_iter(|&(a, b, seed)| {
                let mut unit_rng = SmallRng::seed_from_u64(seed);
                let (x, y) = crossover.crossover(
                    &population[a],
                    &population[b],
                    problem,
                    oracle,
                    &mut unit_rng,
                );
                [x, y]
            })
            .collect();
        next.extend(
            population
                .iter()
                .zip(&paired)
                .filter(|(_, paired)| !**paired)
                .map(|(s, _)| s.clone()),
        );
        next
    }

    /// Mutates every individual, each in its own parallel task.
    ///
    /// A mutant is only kept once the oracle accepts it. When
    /// `max_mutation_attempts` refusals accumulate, the individual survives
    /// unmutated.
    pub fn mutate<R: Rng>(
        &self,
        problem: &Problem,
        population: &[Solution],
        picker: &dyn CloudPicker,
        oracle: &dyn FeasibilityOracle,
        rng: &mut R,
    ) -> Vec<Solution> {
        let seeds: Vec<u64> = (0..population.len()).map(|_| rng.random()).collect();
        population
            .par_iter()
            .zip(seeds)
            .map(|(chromosome, seed)| {
                let mut unit_rng = SmallRng::seed_from_u64(seed);
                mutate_until_feasible(
                    problem,
                    chromosome,
                    self.mutation_probability,
                    self.max_mutation_attempts,
                    picker,
                    oracle,
                    &mut unit_rng,
                )
                .unwrap_or_else(|| {
                    warn!(
                        attempts = ?self.max_mutation_attempts,
                        "oracle refused every mutant; keeping individual unmutated"
                    );
                    chromosome.clone()
                })
            })
            .collect()
    }
}
