//! Placement problem definition.
//!
//! [`ScheduleRequest`] is the raw input of one scheduling request.
//! [`Problem`] is its validated, indexed form shared read-only by every
//! GA operator and collaborator during a run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Application, Cloud, Solution};
use crate::validation::{ValidationErrors, validate_input};

/// Input container for one placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Candidate clouds.
    pub clouds: Vec<Cloud>,
    /// Applications to place.
    pub apps: Vec<Application>,
    /// Application IDs, earliest preferred when capacity is scarce.
    pub app_order: Vec<String>,
}

impl ScheduleRequest {
    /// Creates a request ordering applications by descending priority.
    ///
    /// Applications sharing a priority keep their relative input order.
    pub fn new(clouds: Vec<Cloud>, apps: Vec<Application>) -> Self {
        let mut ranked: Vec<&Application> = apps.iter().collect();
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
        let app_order = ranked.into_iter().map(|a| a.id.clone()).collect();
        Self {
            clouds,
            apps,
            app_order,
        }
    }

    /// Replaces the application order.
    pub fn with_app_order(mut self, app_order: Vec<String>) -> Self {
        self.app_order = app_order;
        self
    }
}

/// Validated placement problem.
#[derive(Debug, Clone)]
pub struct Problem {
    clouds: BTreeMap<String, Cloud>,
    apps: BTreeMap<String, Application>,
    app_order: Vec<String>,
}

impl Problem {
    /// Validates a request and indexes it.
    pub fn new(request: ScheduleRequest) -> Result<Self, ValidationErrors> {
        validate_input(&request.clouds, &request.apps, &request.app_order)?;
        Ok(Self {
            clouds: request
                .clouds
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            apps: request
                .apps
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            app_order: request.app_order,
        })
    }

    /// Clouds by ID.
    pub fn clouds(&self) -> &BTreeMap<String, Cloud> {
        &self.clouds
    }

    /// Applications by ID.
    pub fn apps(&self) -> &BTreeMap<String, Application> {
        &self.apps
    }

    /// Application IDs in preference order.
    pub fn app_order(&self) -> &[String] {
        &self.app_order
    }

    /// Looks up a cloud.
    pub fn cloud(&self, id: &str) -> Option<&Cloud> {
        self.clouds.get(id)
    }

    /// Looks up an application.
    pub fn app(&self, id: &str) -> Option<&Application> {
        self.apps.get(id)
    }

    /// Cloud IDs in ascending order.
    pub fn cloud_ids(&self) -> impl Iterator<Item = &str> {
        self.clouds.keys().map(String::as_str)
    }

    /// Application IDs in ascending order.
    pub fn app_ids(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    /// Solution rejecting every application of this problem.
    pub fn empty_solution(&self) -> Solution {
        Solution::all_rejected(self.app_ids())
    }

    /// Whether `solution` has a gene for every application.
    pub fn is_complete(&self, solution: &Solution) -> bool {
        solution.covers(self.app_ids())
    }

    /// Mean temperature over clouds whose temperature is known.
    pub fn mean_known_temperature(&self) -> Option<f64> {
        let known: Vec<f64> = self
            .clouds
            .values()
            .filter_map(Cloud::known_temperature)
            .collect();
        if known.is_empty() {
            None
        } else {
            Some(known.iter().sum::<f64>() / known.len() as f64)
        }
    }

    /// Largest measured RTT strictly below `limit_ms` (0 if none).
    pub fn max_reachable_rtt(&self, limit_ms: f64) -> f64 {
        self.clouds
            .values()
            .flat_map(|c| c.net_state.values())
            .map(|ns| ns.rtt_ms)
            .filter(|rtt| *rtt < limit_ms)
            .fold(0.0, f64::max)
    }

    /// Mean number of dependencies per application (0 if no applications).
    pub fn avg_dependency_count(&self) -> f64 {
        if self.apps.is_empty() {
            return 0.0;
        }
        let total: usize = self.apps.values().map(|a| a.dependencies.len()).sum();
        total as f64 / self.apps.len() as f64
    }

    /// Lowest and highest priority present, if any application exists.
    pub fn priority_bounds(&self) -> Option<(i32, i32)> {
        let min = self.apps.values().map(|a| a.priority).min()?;
        let max = self.apps.values().map(|a| a.priority).max()?;
        Some((min, max))
    }

    /// IDs of applications with the given priority, in ID order.
    pub fn apps_with_priority(&self, priority: i32) -> impl Iterator<Item = &str> {
        self.apps
            .values()
            .filter(move |a| a.priority == priority)
            .map(|a| a.id.as_str())
    }
}
