//! Generation-zero seeding.

use rand::RngCore;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use crate::ga::{FeasibilityOracle, Initializer, Problem};
use crate::models::{Gene, Resources, Solution};

/// Accepts as many applications as capacity allows, on random clouds.
///
/// Applications are visited in request order. Each one tries the clouds
/// in a freshly shuffled order and is accepted on the first one that
/// still has room. The result is finished by the run's oracle, which
/// allocates nodes and CPU. If the oracle refuses, the individual falls
/// back to rejecting every application.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAcceptMost;

impl Initializer for RandomAcceptMost {
    fn initialize(
        &self,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        rng: &mut dyn RngCore,
    ) -> Solution {
        let mut remaining: BTreeMap<&str, Resources> = problem
            .clouds()
            .iter()
            .map(|(id, c)| (id.as_str(), c.capacity))
            .collect();
        let mut clouds: Vec<&str> = problem.cloud_ids().collect();
        let mut seed = problem.empty_solution();

        for id in problem.app_order() {
            let Some(app) = problem.app(id) else {
                continue;
            };
            clouds.shuffle(rng);
            let host = clouds.iter().copied().find(|c| {
                remaining
                    .get(c)
                    .is_some_and(|left| left.fits(&app.demand))
            });
            if let Some(cloud) = host {
                if let Some(left) = remaining.get_mut(cloud) {
                    left.consume(&app.demand);
                }
                seed.set(id.as_str(), Gene::accepted_on(cloud));
            }
        }

        oracle
            .refine(problem, problem.app_order(), seed)
            .or_else(|| oracle.refine(problem, problem.app_order(), problem.empty_solution()))
            .unwrap_or_else(|| problem.empty_solution())
    }
}
