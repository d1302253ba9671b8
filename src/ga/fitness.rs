//! Fitness strategies.
//!
//! Two interchangeable multi-objective scores, both "higher is better":
//!
//! - [`EnergyFitness`]: flat acceptance reward with a small priority bonus,
//!   a thermal energy cost, and a heavy penalty for every priority tier with
//!   no accepted application.
//! - [`CoverageFitness`]: per-application service quality (compute and
//!   network latency) weighted by normalized priority, plus per-tier
//!   coverage rewards and penalties for tiers served worse than lower ones.
//!
//! A solution missing a gene for any application scores [`UNFIT`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Problem;
use crate::models::{Application, Gene, MAX_PRIORITY, MIN_PRIORITY, Solution};

/// Score of an invalid individual. Lower than any real score.
pub const UNFIT: f64 = f64::MIN;

/// A scoring function over solutions.
pub trait FitnessStrategy: Send + Sync {
    /// Derives per-request statistics before a run. Called once by the
    /// scheduler before any evaluation.
    fn calibrate(&mut self, _problem: &Problem) {}

    /// Scores a solution. Deterministic given its inputs.
    fn evaluate(&self, problem: &Problem, solution: &Solution) -> f64;
}

// ======================== Energy / diversity ========================

/// Weights of [`EnergyFitness`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyWeights {
    /// Reward for any accepted application.
    pub base_reward: f64,
    /// Reward per priority unit of an accepted application.
    pub priority_weight: f64,
    /// Penalty for any rejected application.
    pub rejection_penalty: f64,
    /// Weight of the energy cost term.
    pub energy_weight: f64,
    /// Penalty per priority tier with no accepted application.
    pub missing_priority_penalty: f64,
    /// Temperature above which cooling costs energy (°C).
    pub optimal_temperature_c: f64,
    /// Temperature assumed when no cloud temperature is known (°C).
    pub default_temperature_c: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            base_reward: 1000.0,
            priority_weight: 10.0,
            rejection_penalty: 5000.0,
            energy_weight: 1.0,
            missing_priority_penalty: 10000.0,
            optimal_temperature_c: 25.0,
            default_temperature_c: 25.0,
        }
    }
}

/// Energy-aware fitness that pressures the search to cover every tier.
#[derive(Debug, Clone)]
pub struct EnergyFitness {
    weights: EnergyWeights,
    fallback_temperature_c: f64,
}

impl Default for EnergyFitness {
    fn default() -> Self {
        Self::new(EnergyWeights::default())
    }
}

impl EnergyFitness {
    /// Creates the strategy with the given weights.
    pub fn new(weights: EnergyWeights) -> Self {
        let fallback_temperature_c = weights.default_temperature_c;
        Self {
            weights,
            fallback_temperature_c,
        }
    }

    /// The weights in use.
    pub fn weights(&self) -> &EnergyWeights {
        &self.weights
    }

    /// Energy consumed by `cpu` cores at `temperature_c`.
    pub fn energy(&self, cpu: f64, temperature_c: f64) -> f64 {
        let delta = (temperature_c - self.weights.optimal_temperature_c).max(0.0);
        cpu * (1.0 + delta * delta / 100.0)
    }
}

impl FitnessStrategy for EnergyFitness {
    fn calibrate(&mut self, problem: &Problem) {
        self.fallback_temperature_c = problem
            .mean_known_temperature()
            .unwrap_or(self.weights.default_temperature_c);
    }

    fn evaluate(&self, problem: &Problem, solution: &Solution) -> f64 {
        let w = &self.weights;
        let mut fitness = 0.0;
        let mut accepted_per_priority: BTreeMap<i32, usize> = BTreeMap::new();

        for (id, app) in problem.apps() {
            let Some(gene) = solution.gene(id) else {
                return UNFIT;
            };
            match gene {
                Gene::Rejected => fitness -= w.rejection_penalty,
                Gene::Accepted(placement) => {
                    let cpu = if placement.cpu_cores > 0.0 {
                        placement.cpu_cores
                    } else {
                        1.0
                    };
                    let temperature = problem
                        .cloud(&placement.cloud)
                        .and_then(|c| c.known_temperature())
                        .unwrap_or(self.fallback_temperature_c);

                    fitness += w.base_reward + app.priority as f64 * w.priority_weight
                        - w.energy_weight * self.energy(cpu, temperature);
                    *accepted_per_priority.entry(app.priority).or_insert(0) += 1;
                }
            }
        }

        let missing = (MIN_PRIORITY..=MAX_PRIORITY)
            .filter(|p| !accepted_per_priority.contains_key(p))
            .count();
        fitness - missing as f64 * w.missing_priority_penalty
    }
}

// ======================== Coverage / violation ========================

/// Weights of [`CoverageFitness`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageWeights {
    /// Expected compute time of an application on one core.
    pub expected_compute_time: f64,
    /// Priority weights span `[1, 1 + priority_bonus_scale]`.
    pub priority_bonus_scale: f64,
    /// Coverage weights span `[1, 1 + coverage_bonus_scale]`.
    pub coverage_bonus_scale: f64,
    /// RTTs at or above this are treated as unreachable (ms).
    pub max_acceptable_rtt_ms: f64,
    pub service_weight: f64,
    pub coverage_weight: f64,
    pub acceptance_weight: f64,
    pub violation_weight: f64,
    pub zero_priority_weight: f64,
}

impl Default for CoverageWeights {
    fn default() -> Self {
        Self {
            expected_compute_time: 25.0,
            priority_bonus_scale: 1.0,
            coverage_bonus_scale: 0.5,
            max_acceptable_rtt_ms: 5000.0,
            service_weight: 1.0,
            coverage_weight: 200.0,
            acceptance_weight: 100.0,
            violation_weight: 400.0,
            zero_priority_weight: 800.0,
        }
    }
}

/// Terms of a [`CoverageFitness`] score.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageBreakdown {
    /// Priority-weighted sum of per-application service terms.
    pub base_fitness: f64,
    /// Weighted sum of per-tier coverage.
    pub coverage_score: f64,
    /// Accepted / total applications.
    pub overall_acceptance: f64,
    /// Accumulated excess coverage of lower tiers over higher tiers.
    pub violation_penalty: f64,
    /// Tiers with applications but no acceptance.
    pub zero_priority_count: usize,
}

/// Fairness-aware fitness balancing service quality and tier coverage.
#[derive(Debug, Clone)]
pub struct CoverageFitness {
    weights: CoverageWeights,
    max_reachable_rtt: f64,
    avg_dependency_count: f64,
}

#[derive(Default)]
struct TierStats {
    total: usize,
    accepted: usize,
}

impl CoverageFitness {
    /// Creates the strategy with the given weights.
    pub fn new(weights: CoverageWeights) -> Self {
        Self {
            weights,
            max_reachable_rtt: 0.0,
            avg_dependency_count: 0.0,
        }
    }

    /// Creates the strategy with default weights and the given expected
    /// single-core compute time.
    pub fn with_expected_compute_time(expected_compute_time: f64) -> Self {
        Self::new(CoverageWeights {
            expected_compute_time,
            ..CoverageWeights::default()
        })
    }

    /// The weights in use.
    pub fn weights(&self) -> &CoverageWeights {
        &self.weights
    }

    /// Computes every term of the score, or `None` for an unfit solution.
    pub fn breakdown(&self, problem: &Problem, solution: &Solution) -> Option<CoverageBreakdown> {
        let (min_pri, max_pri) = problem.priority_bounds()?;
        if !problem.is_complete(solution) {
            return None;
        }

        let mut tiers: BTreeMap<i32, TierStats> = BTreeMap::new();
        let mut total_accepted = 0usize;
        let mut base_fitness = 0.0;

        for (id, app) in problem.apps() {
            let tier = tiers.entry(app.priority).or_default();
            tier.total += 1;
            if solution.is_accepted(id) {
                tier.accepted += 1;
                total_accepted += 1;
            }
            let t = normalized_priority(app.priority, min_pri, max_pri);
            let weight = 1.0 + self.weights.priority_bonus_scale * t;
            base_fitness += self.service_term(problem, solution, app) * weight;
        }

        let coverage: BTreeMap<i32, f64> = tiers
            .iter()
            .map(|(p, s)| (*p, s.accepted as f64 / s.total as f64))
            .collect();
        let zero_priority_count = tiers.values().filter(|s| s.accepted == 0).count();

        let coverage_score = coverage
            .iter()
            .map(|(p, cov)| {
                let t = normalized_priority(*p, min_pri, max_pri);
                cov * (1.0 + self.weights.coverage_bonus_scale * t)
            })
            .sum();

        let mut violation_penalty = 0.0;
        for (high, cov_high) in &coverage {
            for (_, cov_low) in coverage.range(..*high) {
                if cov_low > cov_high {
                    violation_penalty += cov_low - cov_high;
                }
            }
        }

        Some(CoverageBreakdown {
            base_fitness,
            coverage_score,
            overall_acceptance: total_accepted as f64 / problem.apps().len() as f64,
            violation_penalty,
            zero_priority_count,
        })
    }

    /// Combines the terms into the final score.
    pub fn combine(&self, b: &CoverageBreakdown) -> f64 {
        let w = &self.weights;
        w.service_weight * b.base_fitness
            + w.coverage_weight * b.coverage_score
            + w.acceptance_weight * b.overall_acceptance
            - w.violation_weight * b.violation_penalty
            - w.zero_priority_weight * b.zero_priority_count as f64
    }

    /// Priority-agnostic service quality of one application.
    fn service_term(&self, problem: &Problem, solution: &Solution, app: &Application) -> f64 {
        let exp = self.weights.expected_compute_time;
        let net_budget = self.max_reachable_rtt * self.avg_dependency_count;

        let Some(Gene::Accepted(this)) = solution.gene(&app.id) else {
            return -(exp + net_budget) / 2.0;
        };

        let cpu = if this.cpu_cores > 0.0 { this.cpu_cores } else { 1.0 };
        let compute = exp - exp / cpu;

        let mut network = net_budget;
        for dep in &app.dependencies {
            let dep_gene = solution.gene(&dep.app_id);
            let co_located = dep_gene.and_then(Gene::node) == Some(this.node.as_str());
            if co_located {
                continue;
            }
            let rtt = dep_gene
                .and_then(Gene::cloud)
                .and_then(|dep_cloud| problem.cloud(&this.cloud)?.rtt_to(dep_cloud))
                .unwrap_or(0.0);
            network -= rtt;
        }

        compute + network.max(0.0)
    }
}

impl FitnessStrategy for CoverageFitness {
    fn calibrate(&mut self, problem: &Problem) {
        self.max_reachable_rtt = problem.max_reachable_rtt(self.weights.max_acceptable_rtt_ms);
        self.avg_dependency_count = problem.avg_dependency_count();
    }

    fn evaluate(&self, problem: &Problem, solution: &Solution) -> f64 {
        self.breakdown(problem, solution)
            .map_or(UNFIT, |b| self.combine(&b))
    }
}

/// Position of `priority` in `[min, max]` mapped to `[0, 1]`.
fn normalized_priority(priority: i32, min: i32, max: i32) -> f64 {
    if max == min {
        0.0
    } else {
        (priority - min) as f64 / (max - min) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ScheduleRequest;
    use crate::models::{Cloud, Placement, Resources};

    fn placed(cloud: &str, node: &str, cpu: f64) -> Gene {
        Gene::Accepted(Placement {
            cloud: cloud.into(),
            node: node.into(),
            cpu_cores: cpu,
        })
    }

    /// One application per priority 1..=10, two clouds at 25 °C.
    fn tiered_problem() -> Problem {
        let clouds = vec![
            Cloud::new("C1").with_temperature(25.0).with_capacity(Resources::cpu(10.0)),
            Cloud::new("C2").with_temperature(25.0).with_capacity(Resources::cpu(10.0)),
        ];
        let apps = (MIN_PRIORITY..=MAX_PRIORITY)
            .map(|p| {
                crate::models::Application::new(format!("A{p}"))
                    .with_priority(p)
                    .with_demand(Resources::cpu(1.0))
            })
            .collect();
        Problem::new(ScheduleRequest::new(clouds, apps)).unwrap()
    }

    fn all_accepted(problem: &Problem) -> Solution {
        problem
            .app_ids()
            .map(|id| (id.to_string(), placed("C1", "C1", 1.0)))
            .collect()
    }

    #[test]
    fn test_energy_rejection_strictly_worse() {
        let problem = tiered_problem();
        let mut fitness = EnergyFitness::default();
        fitness.calibrate(&problem);

        let full = all_accepted(&problem);
        let mut missing_one = full.clone();
        missing_one.reject("A1");

        let f_full = fitness.evaluate(&problem, &full);
        let f_missing = fitness.evaluate(&problem, &missing_one);
        assert!(f_full > f_missing);
        // reward 1000 + 10 - 1 energy, rejection 5000, missing tier 10000
        assert!((f_full - f_missing - (1009.0 + 5000.0 + 10000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_energy_exact_value_at_optimal_temperature() {
        let problem = tiered_problem();
        let mut fitness = EnergyFitness::default();
        fitness.calibrate(&problem);

        let f = fitness.evaluate(&problem, &all_accepted(&problem));
        // 10 × (1000 - 1) + 10 × (1 + ... + 10)
        assert!((f - (9990.0 + 550.0)).abs() < 1e-9);
    }

    #[test]
    fn test_energy_hot_cloud_costs_more() {
        let clouds = vec![
            Cloud::new("COOL").with_temperature(20.0),
            Cloud::new("HOT").with_temperature(35.0),
        ];
        let apps = vec![crate::models::Application::new("A1").with_priority(5)];
        let problem = Problem::new(ScheduleRequest::new(clouds, apps)).unwrap();
        let mut fitness = EnergyFitness::default();
        fitness.calibrate(&problem);

        let cool: Solution = [("A1".to_string(), placed("COOL", "n", 2.0))].into_iter().collect();
        let hot: Solution = [("A1".to_string(), placed("HOT", "n", 2.0))].into_iter().collect();
        let diff = fitness.evaluate(&problem, &cool) - fitness.evaluate(&problem, &hot);
        // hot: 2 × (1 + 100/100) = 4, cool: 2
        assert!((diff - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_unknown_temperature_uses_mean() {
        let clouds = vec![
            Cloud::new("C1").with_temperature(35.0),
            Cloud::new("C2").with_temperature(35.0),
            Cloud::new("C3"),
        ];
        let apps = vec![crate::models::Application::new("A1")];
        let problem = Problem::new(ScheduleRequest::new(clouds, apps)).unwrap();
        let mut fitness = EnergyFitness::default();
        fitness.calibrate(&problem);

        let on_known: Solution = [("A1".to_string(), placed("C1", "n", 1.0))].into_iter().collect();
        let on_unknown: Solution =
            [("A1".to_string(), placed("C3", "n", 1.0))].into_iter().collect();
        assert_eq!(
            fitness.evaluate(&problem, &on_known),
            fitness.evaluate(&problem, &on_unknown)
        );
    }

    #[test]
    fn test_energy_no_known_temperature_uses_default() {
        let apps = || vec![crate::models::Application::new("A1").with_priority(5)];
        let unknown = Problem::new(ScheduleRequest::new(
            vec![Cloud::new("C1"), Cloud::new("C2").with_temperature(-1.0)],
            apps(),
        ))
        .unwrap();
        let at_default = Problem::new(ScheduleRequest::new(
            vec![Cloud::new("C1").with_temperature(25.0)],
            apps(),
        ))
        .unwrap();
        let on_c1: Solution = [("A1".to_string(), placed("C1", "n", 1.0))].into_iter().collect();

        let mut fitness = EnergyFitness::default();
        assert_eq!(fitness.weights().default_temperature_c, 25.0);
        fitness.calibrate(&unknown);
        let f_unknown = fitness.evaluate(&unknown, &on_c1);
        fitness.calibrate(&at_default);
        assert_eq!(f_unknown, fitness.evaluate(&at_default, &on_c1));
        // 1000 + 50 - 1 energy, nine empty tiers
        assert!((f_unknown - (1049.0 - 90000.0)).abs() < 1e-9);

        let mut hot_default = EnergyFitness::new(EnergyWeights {
            default_temperature_c: 35.0,
            ..EnergyWeights::default()
        });
        hot_default.calibrate(&unknown);
        // 1 × (1 + 100/100) = 2
        assert!((f_unknown - hot_default.evaluate(&unknown, &on_c1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cpu_counts_as_one_core() {
        let problem = tiered_problem();
        let with_cores = |cpu: f64| -> Solution {
            problem
                .app_ids()
                .map(|id| (id.to_string(), placed("C1", "C1", cpu)))
                .collect()
        };

        let mut energy = EnergyFitness::default();
        energy.calibrate(&problem);
        assert_eq!(
            energy.evaluate(&problem, &with_cores(0.0)),
            energy.evaluate(&problem, &with_cores(1.0))
        );
        assert_ne!(
            energy.evaluate(&problem, &with_cores(0.0)),
            energy.evaluate(&problem, &with_cores(2.0))
        );

        let mut coverage = CoverageFitness::with_expected_compute_time(10.0);
        coverage.calibrate(&problem);
        assert_eq!(coverage.weights().expected_compute_time, 10.0);
        assert_eq!(
            coverage.evaluate(&problem, &with_cores(0.0)),
            coverage.evaluate(&problem, &with_cores(1.0))
        );
    }

    #[test]
    fn test_missing_gene_is_unfit() {
        let problem = tiered_problem();
        let mut partial = all_accepted(&problem);
        partial = partial
            .iter()
            .filter(|(id, _)| id.as_str() != "A5")
            .map(|(id, g)| (id.clone(), g.clone()))
            .collect();

        let mut energy = EnergyFitness::default();
        energy.calibrate(&problem);
        assert_eq!(energy.evaluate(&problem, &partial), UNFIT);

        let mut coverage = CoverageFitness::new(CoverageWeights::default());
        coverage.calibrate(&problem);
        assert_eq!(coverage.evaluate(&problem, &partial), UNFIT);
    }

    fn two_tier_problem() -> Problem {
        let apps = vec![
            crate::models::Application::new("LOW").with_priority(2),
            crate::models::Application::new("HIGH").with_priority(8),
        ];
        Problem::new(ScheduleRequest::new(vec![Cloud::new("C1")], apps)).unwrap()
    }

    #[test]
    fn test_coverage_violation_penalizes_inverted_service() {
        let problem = two_tier_problem();
        let mut fitness = CoverageFitness::with_expected_compute_time(10.0);
        fitness.calibrate(&problem);

        let mut inverted = problem.empty_solution();
        inverted.set("LOW", placed("C1", "n1", 2.0));
        let mut ordered = problem.empty_solution();
        ordered.set("HIGH", placed("C1", "n1", 2.0));

        let b_inv = fitness.breakdown(&problem, &inverted).unwrap();
        let b_ord = fitness.breakdown(&problem, &ordered).unwrap();
        assert!((b_inv.violation_penalty - 1.0).abs() < 1e-12);
        assert_eq!(b_ord.violation_penalty, 0.0);
        assert_eq!(b_inv.zero_priority_count, 1);
        assert!(fitness.evaluate(&problem, &inverted) < fitness.evaluate(&problem, &ordered));
    }

    #[test]
    fn test_coverage_breakdown_terms() {
        let problem = two_tier_problem();
        let mut fitness = CoverageFitness::with_expected_compute_time(10.0);
        fitness.calibrate(&problem);

        let mut s = problem.empty_solution();
        s.set("LOW", placed("C1", "n1", 2.0));
        s.set("HIGH", placed("C1", "n1", 2.0));
        let b = fitness.breakdown(&problem, &s).unwrap();

        // service: 10 - 10/2 = 5 each; weights 1 (LOW) and 2 (HIGH)
        assert!((b.base_fitness - 15.0).abs() < 1e-12);
        // coverage: 1 × 1.0 + 1 × 1.5
        assert!((b.coverage_score - 2.5).abs() < 1e-12);
        assert!((b.overall_acceptance - 1.0).abs() < 1e-12);
        assert_eq!(b.zero_priority_count, 0);
        let expected = 15.0 + 200.0 * 2.5 + 100.0;
        assert!((fitness.combine(&b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_network_term() {
        let clouds = vec![
            Cloud::new("C1").with_rtt("C2", 40.0),
            Cloud::new("C2").with_rtt("C1", 40.0),
        ];
        let apps = vec![
            crate::models::Application::new("A").with_dependency("B"),
            crate::models::Application::new("B"),
        ];
        let problem = Problem::new(ScheduleRequest::new(clouds, apps)).unwrap();
        let mut fitness = CoverageFitness::with_expected_compute_time(0.0);
        fitness.calibrate(&problem);
        // budget = 40 × 0.5 = 20

        let mut split = problem.empty_solution();
        split.set("A", placed("C1", "n1", 1.0));
        split.set("B", placed("C2", "n2", 1.0));
        let mut together = split.clone();
        together.set("B", placed("C1", "n1", 1.0));

        let b_split = fitness.breakdown(&problem, &split).unwrap();
        let b_together = fitness.breakdown(&problem, &together).unwrap();
        // split: A clamps to 0, B keeps 20; together: 20 + 20
        assert!((b_split.base_fitness - 20.0).abs() < 1e-12);
        assert!((b_together.base_fitness - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_coverage_empty_problem_is_unfit() {
        let problem = Problem::new(ScheduleRequest::new(vec![Cloud::new("C1")], vec![])).unwrap();
        let fitness = CoverageFitness::new(CoverageWeights::default());
        assert_eq!(fitness.evaluate(&problem, &Solution::new()), UNFIT);
    }
}
