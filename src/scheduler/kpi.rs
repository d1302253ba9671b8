//! Placement quality metrics (KPIs).
//!
//! Computes acceptance and fairness indicators from a solution and the
//! problem it answers.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Acceptance Rate | Accepted apps / all apps |
//! | Priority-Weighted Acceptance | Σ priority of accepted / Σ priority of all |
//! | Per-Priority Acceptance | Acceptance rate within each populated tier |
//! | Min Per-Priority Acceptance | Worst tier's acceptance rate |
//! | Missing Tiers | Populated tiers with nothing accepted |
//! | Mean Used Temperature | Mean known temperature of hosting clouds |

use std::collections::{BTreeMap, BTreeSet};

use crate::ga::Problem;
use crate::models::Solution;

/// Placement performance indicators.
#[derive(Debug, Clone)]
pub struct PlacementKpi {
    /// Fraction of applications accepted (0.0..1.0).
    pub acceptance_rate: f64,
    /// Acceptance rate with each application weighted by its priority.
    pub priority_weighted_acceptance: f64,
    /// Acceptance rate per populated priority tier.
    pub acceptance_by_priority: BTreeMap<i32, f64>,
    /// Lowest per-tier acceptance rate.
    pub min_priority_acceptance: f64,
    /// Populated tiers without any accepted application, ascending.
    pub missing_tiers: Vec<i32>,
    /// Mean known temperature over clouds hosting at least one application.
    pub mean_used_temperature: Option<f64>,
}

impl PlacementKpi {
    /// Computes KPIs of `solution` for `problem`.
    ///
    /// Applications without a gene count as rejected. An empty problem
    /// reports full acceptance.
    pub fn calculate(problem: &Problem, solution: &Solution) -> Self {
        let mut accepted = 0usize;
        let mut weight_total = 0.0;
        let mut weight_accepted = 0.0;
        let mut tiers: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
        let mut used_clouds = BTreeSet::new();

        for app in problem.apps().values() {
            let gene = solution.gene(&app.id);
            let tier = tiers.entry(app.priority).or_insert((0, 0));
            tier.1 += 1;
            weight_total += app.priority as f64;

            if let Some(cloud) = gene.and_then(|g| g.cloud()) {
                accepted += 1;
                tier.0 += 1;
                weight_accepted += app.priority as f64;
                used_clouds.insert(cloud);
            }
        }

        let total = problem.apps().len();
        let acceptance_rate = if total == 0 {
            1.0
        } else {
            accepted as f64 / total as f64
        };
        let priority_weighted_acceptance = if weight_total == 0.0 {
            acceptance_rate
        } else {
            weight_accepted / weight_total
        };

        let acceptance_by_priority: BTreeMap<i32, f64> = tiers
            .iter()
            .map(|(&p, &(ok, all))| (p, ok as f64 / all as f64))
            .collect();
        let min_priority_acceptance = acceptance_by_priority
            .values()
            .copied()
            .fold(1.0, f64::min);
        let missing_tiers = tiers
            .iter()
            .filter(|(_, (ok, _))| *ok == 0)
            .map(|(&p, _)| p)
            .collect();

        let temperatures: Vec<f64> = used_clouds
            .iter()
            .filter_map(|id| problem.cloud(id))
            .filter_map(|c| c.known_temperature())
            .collect();
        let mean_used_temperature = if temperatures.is_empty() {
            None
        } else {
            Some(temperatures.iter().sum::<f64>() / temperatures.len() as f64)
        };

        Self {
            acceptance_rate,
            priority_weighted_acceptance,
            acceptance_by_priority,
            min_priority_acceptance,
            missing_tiers,
            mean_used_temperature,
        }
    }

    /// Whether every tier is served and acceptance reaches the threshold.
    pub fn meets_thresholds(&self, min_acceptance: f64, min_tier_acceptance: f64) -> bool {
        self.acceptance_rate >= min_acceptance
            && self.min_priority_acceptance >= min_tier_acceptance
    }
}
