//! Capacity-checking feasibility oracle.

use std::collections::{BTreeMap, BTreeSet};

use crate::ga::{FeasibilityOracle, Problem};
use crate::models::{Gene, Placement, Resources, Solution};

/// Packs accepted applications onto their target clouds in preference
/// order.
///
/// Each accepted gene consumes the application's demand from the target
/// cloud's remaining capacity and is allocated the demanded CPU on a node
/// labelled with the cloud ID. A gene that no longer fits is demoted to
/// [`Gene::Rejected`]; in strict mode the whole candidate is refused
/// instead.
///
/// Candidates that miss an application, carry unknown applications, or
/// target unknown clouds are always refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityOracle {
    strict: bool,
}

impl CapacityOracle {
    /// Oracle that demotes overflowing genes.
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Oracle that refuses any candidate exceeding capacity.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Whether overflow refuses the candidate.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl FeasibilityOracle for CapacityOracle {
    fn refine(&self, problem: &Problem, order: &[String], candidate: Solution) -> Option<Solution> {
        if candidate.len() != problem.apps().len() || !problem.is_complete(&candidate) {
            return None;
        }

        let mut remaining: BTreeMap<&str, Resources> = problem
            .clouds()
            .iter()
            .map(|(id, c)| (id.as_str(), c.capacity))
            .collect();
        let mut seen = BTreeSet::new();
        let mut refined = Solution::new();

        // The hint may be partial; the request order settles the rest.
        let walk = order.iter().chain(problem.app_order()).map(String::as_str);
        for id in walk {
            if !seen.insert(id) {
                continue;
            }
            let app = problem.app(id)?;
            let gene = match candidate.gene(id)?.cloud() {
                None => Gene::Rejected,
                Some(cloud) => {
                    let left = remaining.get_mut(cloud)?;
                    if left.fits(&app.demand) {
                        left.consume(&app.demand);
                        Gene::Accepted(Placement {
                            cloud: cloud.to_string(),
                            node: cloud.to_string(),
                            cpu_cores: app.demand.cpu_cores,
                        })
                    } else if self.strict {
                        return None;
                    } else {
                        Gene::Rejected
                    }
                }
            };
            refined.set(id, gene);
        }

        problem.is_complete(&refined).then_some(refined)
    }
}
