//! Tournament selection and the elitist evolution archive.
//!
//! Selection evaluates every individual in parallel, runs binary
//! tournaments to build the next generation, and reconciles the best
//! individual of the generation with the best one ever seen.

use rand::Rng;
use rand::seq::index;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::{FitnessStrategy, Problem};
use crate::error::{Result, ScheduleError};
use crate::models::Solution;

/// Append-only record of a run's progress, one entry per generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    best_each_generation: Vec<f64>,
    best_fitness: Vec<f64>,
    best_solutions: Vec<Solution>,
    stagnation: usize,
}

impl EvolutionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Best fitness observed within each generation.
    pub fn best_each_generation(&self) -> &[f64] {
        &self.best_each_generation
    }

    /// Best fitness observed up to and including each generation.
    pub fn best_fitness(&self) -> &[f64] {
        &self.best_fitness
    }

    /// Best solution up to and including each generation.
    pub fn best_solutions(&self) -> &[Solution] {
        &self.best_solutions
    }

    /// Generations since the cumulative best last improved.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Number of recorded generations.
    pub fn generations(&self) -> usize {
        self.best_fitness.len()
    }

    /// Latest cumulative best fitness and solution.
    pub fn best(&self) -> Option<(f64, &Solution)> {
        Some((*self.best_fitness.last()?, self.best_solutions.last()?))
    }

    /// Records the best individual of a new generation.
    ///
    /// Returns an error if the fitness and solution records have diverged.
    pub fn record(&mut self, generation_best: f64, candidate: &Solution) -> Result<()> {
        if self.best_fitness.len() != self.best_solutions.len() {
            tracing::error!(
                fitness = self.best_fitness.len(),
                solutions = self.best_solutions.len(),
                "evolution history out of sync"
            );
            return Err(ScheduleError::HistoryMismatch {
                fitness: self.best_fitness.len(),
                solutions: self.best_solutions.len(),
            });
        }

        let kept = self
            .best()
            .filter(|(previous, _)| generation_best <= *previous)
            .map(|(previous, solution)| (previous, solution.clone()));
        let (best, solution) = match kept {
            Some(kept) => {
                self.stagnation += 1;
                kept
            }
            None => {
                self.stagnation = 0;
                (generation_best, candidate.clone())
            }
        };

        self.best_each_generation.push(generation_best);
        self.best_fitness.push(best);
        self.best_solutions.push(solution);
        Ok(())
    }

    /// Renders the fitness time series as CSV.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("generation,best_this_generation,best_so_far\n");
        for (i, (each, all)) in self
            .best_each_generation
            .iter()
            .zip(&self.best_fitness)
            .enumerate()
        {
            let _ = writeln!(out, "{i},{each},{all}");
        }
        out
    }
}

/// Evaluates every individual, one parallel task each.
pub fn evaluate_population<F: FitnessStrategy + ?Sized>(
    fitness: &F,
    problem: &Problem,
    population: &[Solution],
) -> Vec<f64> {
    population
        .par_iter()
        .map(|s| fitness.evaluate(problem, s))
        .collect()
}

/// Binary tournament selection with elitist archiving.
///
/// Runs `size` tournaments with replacement over two distinct individuals
/// (ties keep the first drawn), records the best winner in `history`, and
/// returns the next generation.
pub fn tournament_select<F, R>(
    fitness: &F,
    problem: &Problem,
    population: &[Solution],
    size: usize,
    history: &mut EvolutionHistory,
    rng: &mut R,
) -> Result<Vec<Solution>>
where
    F: FitnessStrategy + ?Sized,
    R: Rng + ?Sized,
{
    if population.is_empty() {
        return Ok(Vec::new());
    }

    let scores = evaluate_population(fitness, problem, population);
    tracing::trace!(?scores, "fitness values this generation");

    let mut next = Vec::with_capacity(size);
    let mut best_idx = None;
    for _ in 0..size {
        let winner = if population.len() < 2 {
            0
        } else {
            let picked = index::sample(rng, population.len(), 2);
            let (a, b) = (picked.index(0), picked.index(1));
            if scores[b] > scores[a] {
                b
            } else {
                a
            }
        };
        next.push(population[winner].clone());
        if best_idx.is_none_or(|i| scores[winner] > scores[i]) {
            best_idx = Some(winner);
        }
    }

    if let Some(i) = best_idx {
        history.record(scores[i], &population[i])?;
    }
    Ok(next)
}
