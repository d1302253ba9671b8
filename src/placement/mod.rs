//! Reference collaborators for the GA engine.
//!
//! The engine delegates capacity reasoning, seeding, and recombination to
//! the traits in [`crate::ga`]. This module provides capacity-aware
//! implementations of all of them, suitable for simulations and tests.
//!
//! # Usage
//!
//! ```
//! use u_cloud_schedule::ga::{FeasibilityOracle, Problem, ScheduleRequest};
//! use u_cloud_schedule::models::{Application, Cloud, Gene, Resources};
//! use u_cloud_schedule::placement::CapacityOracle;
//!
//! let request = ScheduleRequest::new(
//!     vec![Cloud::new("C1").with_capacity(Resources::cpu(1.0))],
//!     vec![
//!         Application::new("A1").with_priority(5).with_demand(Resources::cpu(1.0)),
//!         Application::new("A2").with_demand(Resources::cpu(1.0)),
//!     ],
//! );
//! let problem = Problem::new(request).unwrap();
//!
//! let mut candidate = problem.empty_solution();
//! candidate.set("A1", Gene::accepted_on("C1"));
//! candidate.set("A2", Gene::accepted_on("C1"));
//!
//! // A1 comes first in the preference order; A2 no longer fits.
//! let refined = CapacityOracle::new()
//!     .refine(&problem, problem.app_order(), candidate)
//!     .unwrap();
//! assert!(refined.is_accepted("A1"));
//! assert!(!refined.is_accepted("A2"));
//! ```

mod crossover;
mod initializer;
mod oracle;
mod picker;

pub use crossover::TwoPointCrossover;
pub use initializer::RandomAcceptMost;
pub use oracle::CapacityOracle;
pub use picker::UniformCloudPicker;
