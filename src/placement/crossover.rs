//! Two-point crossover over the request's application order.

use rand::{Rng, RngCore};

use crate::ga::{Crossover, FeasibilityOracle, Problem};
use crate::models::Solution;

/// Exchanges the genes between two random cut points.
///
/// Cut points `i <= j` are drawn over the request's application order and
/// the genes of `order[i..j]` are swapped between the parents. Each child
/// is then refined by the run's oracle; a refused child is replaced by a
/// copy of the parent it started from.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPointCrossover;

impl Crossover for TwoPointCrossover {
    fn crossover(
        &self,
        first: &Solution,
        second: &Solution,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        rng: &mut dyn RngCore,
    ) -> (Solution, Solution) {
        let order = problem.app_order();
        let a = rng.random_range(0..=order.len());
        let b = rng.random_range(0..=order.len());
        let (lo, hi) = (a.min(b), a.max(b));

        let mut x = first.clone();
        let mut y = second.clone();
        for id in &order[lo..hi] {
            if let (Some(gx), Some(gy)) = (first.gene(id), second.gene(id)) {
                x.set(id.as_str(), gy.clone());
                y.set(id.as_str(), gx.clone());
            }
        }

        let x = oracle
            .refine(problem, order, x)
            .unwrap_or_else(|| first.clone());
        let y = oracle
            .refine(problem, order, y)
            .unwrap_or_else(|| second.clone());
        (x, y)
    }
}
