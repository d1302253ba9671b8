//! Gene- and chromosome-level mutation.
//!
//! A mutated gene starts from a rejection, flips a fair coin for
//! acceptance, and, when accepted, moves to a cloud other than the one it
//! occupied before. Mutated chromosomes are handed to the feasibility
//! oracle and redrawn until it accepts one.

use rand::Rng;

use super::{CloudPicker, FeasibilityOracle, Problem};
use crate::models::{Gene, Solution};

/// Draws a fresh gene to replace `original`.
///
/// The original cloud is excluded from the candidates so that an accepted
/// gene is pushed towards a different placement. If no other cloud
/// exists, the gene stays rejected.
pub fn redraw_gene<R: Rng>(
    problem: &Problem,
    original: &Gene,
    picker: &dyn CloudPicker,
    rng: &mut R,
) -> Gene {
    if !rng.random_bool(0.5) {
        return Gene::Rejected;
    }
    let excluded = original.cloud();
    let candidates: Vec<&str> = problem
        .cloud_ids()
        .filter(|id| Some(*id) != excluded)
        .collect();
    match picker.pick(&candidates, rng) {
        Some(cloud) => Gene::accepted_on(cloud),
        None => Gene::Rejected,
    }
}

/// Limits `p` to `[0, 1]`; NaN counts as 0.
pub(crate) fn clamp_probability(p: f64) -> f64 {
    p.max(0.0).min(1.0)
}

/// Copies `chromosome`, redrawing each gene with `probability`.
///
/// Probabilities outside `[0, 1]` are clamped.
pub fn mutate_genes<R: Rng>(
    problem: &Problem,
    chromosome: &Solution,
    probability: f64,
    picker: &dyn CloudPicker,
    rng: &mut R,
) -> Solution {
    let probability = clamp_probability(probability);
    chromosome
        .iter()
        .map(|(id, gene)| {
            let gene = if rng.random_bool(probability) {
                redraw_gene(problem, gene, picker, rng)
            } else {
                gene.clone()
            };
            (id.clone(), gene)
        })
        .collect()
}

/// Mutates `chromosome` until the oracle accepts a mutant.
///
/// Gives up after `max_attempts` refusals and returns `None`; with
/// `max_attempts = None` it retries forever.
pub fn mutate_until_feasible<R: Rng>(
    problem: &Problem,
    chromosome: &Solution,
    probability: f64,
    max_attempts: Option<usize>,
    picker: &dyn CloudPicker,
    oracle: &dyn FeasibilityOracle,
    rng: &mut R,
) -> Option<Solution> {
    let mut attempts = 0usize;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return None;
        }
        attempts += 1;
        let candidate = mutate_genes(problem, chromosome, probability, picker, rng);
        if let Some(feasible) = oracle.refine(problem, problem.app_order(), candidate) {
            return Some(feasible);
        }
    }
}
