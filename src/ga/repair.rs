//! Post-processing of the final solution.
//!
//! [`FairnessRepair`] tries to give every populated priority tier at least
//! one accepted application, evicting a high-priority neighbour when that
//! is the only way to make room.

use rand::RngCore;
use rand::seq::IndexedRandom;

use super::{FeasibilityOracle, Problem};
use crate::models::{Gene, MAX_PRIORITY, MIN_PRIORITY, Solution};

/// Transforms the best solution of a run before it is returned.
pub trait PostProcessor: Send + Sync {
    /// Returns the processed solution.
    fn process(
        &self,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        solution: Solution,
        rng: &mut dyn RngCore,
    ) -> Solution;

    /// Whether `process` always returns its input unchanged.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Returns the solution untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRepair;

impl PostProcessor for NoRepair {
    fn process(
        &self,
        _problem: &Problem,
        _oracle: &dyn FeasibilityOracle,
        solution: Solution,
        _rng: &mut dyn RngCore,
    ) -> Solution {
        solution
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Priority at and above which an accepted application may be evicted.
pub const DEFAULT_RICH_THRESHOLD: i32 = 7;

/// Rescues one application of every starved priority tier.
///
/// Tiers are visited from the lowest priority up. For a tier with
/// applications but none accepted, one of them is drawn at random and
/// tried on each cloud in ID order:
///
/// 1. accept it there and let the oracle refine, with the target first in
///    the preference order;
/// 2. failing that, reject one random application on that cloud whose
///    priority is at least `rich_threshold`, and refine again.
///
/// The first refinement that keeps the target accepted is committed.
/// Tiers that cannot be rescued stay starved.
#[derive(Debug, Clone, Copy)]
pub struct FairnessRepair {
    /// Minimum priority of an eviction victim.
    pub rich_threshold: i32,
}

impl Default for FairnessRepair {
    fn default() -> Self {
        Self {
            rich_threshold: DEFAULT_RICH_THRESHOLD,
        }
    }
}

impl FairnessRepair {
    fn rescue(
        &self,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        solution: &Solution,
        target: &str,
        rng: &mut dyn RngCore,
    ) -> Option<Solution> {
        let order: Vec<String> = std::iter::once(target.to_string())
            .chain(
                problem
                    .app_order()
                    .iter()
                    .filter(|id| id.as_str() != target)
                    .cloned(),
            )
            .collect();

        for cloud in problem.cloud_ids() {
            let mut candidate = solution.clone();
            candidate.set(target, Gene::accepted_on(cloud));
            if let Some(refined) = oracle.refine(problem, &order, candidate.clone()) {
                if refined.is_accepted(target) {
                    return Some(refined);
                }
            }

            let rich: Vec<&str> = candidate
                .accepted_on(cloud)
                .filter(|id| *id != target)
                .filter(|id| {
                    problem
                        .app(id)
                        .is_some_and(|a| a.priority >= self.rich_threshold)
                })
                .collect();
            let Some(victim) = rich.choose(rng).map(|v| v.to_string()) else {
                continue;
            };
            candidate.reject(&victim);
            if let Some(refined) = oracle.refine(problem, &order, candidate) {
                if refined.is_accepted(target) {
                    tracing::debug!(app = target, %victim, cloud, "evicted to rescue starved tier");
                    return Some(refined);
                }
            }
        }
        None
    }
}

impl PostProcessor for FairnessRepair {
    fn process(
        &self,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        mut solution: Solution,
        rng: &mut dyn RngCore,
    ) -> Solution {
        for priority in MIN_PRIORITY..=MAX_PRIORITY {
            let tier: Vec<&str> = problem.apps_with_priority(priority).collect();
            if tier.is_empty() || tier.iter().any(|id| solution.is_accepted(id)) {
                continue;
            }
            let Some(&target) = tier.choose(rng) else {
                continue;
            };
            match self.rescue(problem, oracle, &solution, target, rng) {
                Some(rescued) => solution = rescued,
                None => tracing::debug!(priority, app = target, "starved tier left unrescued"),
            }
        }
        solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ScheduleRequest;
    use crate::models::{Application, Cloud, Resources};
    use crate::placement::CapacityOracle;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// One 2-core cloud; a 2-core high-priority app and a 1-core low one.
    fn crowded_problem() -> Problem {
        let clouds = vec![Cloud::new("C1").with_capacity(Resources::cpu(2.0))];
        let apps = vec![
            Application::new("HIGH")
                .with_priority(9)
                .with_demand(Resources::cpu(2.0)),
            Application::new("LOW")
                .with_priority(1)
                .with_demand(Resources::cpu(1.0)),
        ];
        Problem::new(ScheduleRequest::new(clouds, apps)).unwrap()
    }

    fn high_only(problem: &Problem) -> Solution {
        let mut s = problem.empty_solution();
        s.set("HIGH", Gene::accepted_on("C1"));
        CapacityOracle::strict()
            .refine(problem, problem.app_order(), s)
            .unwrap()
    }

    #[test]
    fn test_no_repair_is_identity() {
        let problem = crowded_problem();
        let s = high_only(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let out = NoRepair.process(&problem, &CapacityOracle::new(), s.clone(), &mut rng);
        assert_eq!(out, s);
    }

    #[test]
    fn test_rescue_by_eviction() {
        let problem = crowded_problem();
        let mut rng = SmallRng::seed_from_u64(42);

        let out = FairnessRepair::default().process(
            &problem,
            &CapacityOracle::strict(),
            high_only(&problem),
            &mut rng,
        );
        assert!(out.is_accepted("LOW"));
        // The evicted tier cannot be rescued back: LOW is not rich.
        assert!(!out.is_accepted("HIGH"));
        assert_eq!(out.gene("LOW").unwrap().cpu_cores(), 1.0);
    }

    #[test]
    fn test_rescue_without_eviction_when_room() {
        let problem = crowded_problem();
        let mut rng = SmallRng::seed_from_u64(1);
        let out = FairnessRepair::default().process(
            &problem,
            &CapacityOracle::strict(),
            problem.empty_solution(),
            &mut rng,
        );
        // LOW fits on the empty cloud; HIGH then no longer does.
        assert!(out.is_accepted("LOW"));
        assert!(problem.is_complete(&out));
    }

    #[test]
    fn test_threshold_protects_victims() {
        let problem = crowded_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let repair = FairnessRepair { rich_threshold: 10 };

        let before = high_only(&problem);
        let out = repair.process(&problem, &CapacityOracle::strict(), before.clone(), &mut rng);
        assert_eq!(out, before);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let clouds = vec![
            Cloud::new("C1").with_capacity(Resources::cpu(3.0)),
            Cloud::new("C2").with_capacity(Resources::cpu(3.0)),
        ];
        let apps = (1..=6)
            .map(|i| {
                Application::new(format!("A{i}"))
                    .with_priority(i)
                    .with_demand(Resources::cpu(1.0))
            })
            .collect();
        let problem = Problem::new(ScheduleRequest::new(clouds, apps)).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let repair = FairnessRepair::default();
        let oracle = CapacityOracle::strict();

        let once = repair.process(&problem, &oracle, problem.empty_solution(), &mut rng);
        for i in 1..=6 {
            assert!(once.is_accepted(&format!("A{i}")));
        }
        let twice = repair.process(&problem, &oracle, once.clone(), &mut rng);
        assert_eq!(twice, once);
    }
}
