//! GA scheduler driver and KPI evaluation.
//!
//! # Algorithm
//!
//! `GaScheduler` runs one generational genetic algorithm per request,
//! generic over the fitness strategy and the post-processor. Two presets
//! cover the common cases:
//!
//! - [`GaScheduler::energy_aware`]: energy/diversity fitness, then
//!   fairness repair of starved priority tiers.
//! - [`GaScheduler::priority_aware`]: coverage/violation fitness, no
//!   post-processing.
//!
//! # KPI
//!
//! `PlacementKpi` computes acceptance and per-tier fairness metrics.

mod engine;
mod kpi;

pub use engine::{Collaborators, GaScheduler, RunState};
pub use kpi::PlacementKpi;
