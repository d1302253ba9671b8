//! Priority-fair multi-cloud application placement.
//!
//! Decides, for every application of a request, whether it is accepted
//! and on which cloud, using a genetic algorithm whose fitness rewards
//! acceptance while keeping every priority tier served.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Cloud`, `Application`, `Gene`, `Solution`
//! - **`validation`**: Input integrity checks (duplicate IDs, priority
//!   range, dependency refs, application order)
//! - **`config`**: GA hyperparameters
//! - **`ga`**: Problem, fitness strategies, operators, selection, repair
//! - **`placement`**: Capacity-aware reference collaborators
//! - **`scheduler`**: GA driver and placement KPIs
//!
//! # Example
//!
//! ```
//! use u_cloud_schedule::config::GaConfig;
//! use u_cloud_schedule::ga::{Problem, ScheduleRequest};
//! use u_cloud_schedule::models::{Application, Cloud, Resources};
//! use u_cloud_schedule::scheduler::{GaScheduler, PlacementKpi};
//!
//! let clouds = vec![
//!     Cloud::new("edge").with_capacity(Resources::cpu(2.0)).with_temperature(30.0),
//!     Cloud::new("core").with_capacity(Resources::cpu(2.0)).with_temperature(20.0),
//! ];
//! let apps = (1..=4)
//!     .map(|p| {
//!         Application::new(format!("app-{p}"))
//!             .with_priority(p)
//!             .with_demand(Resources::cpu(1.0))
//!     })
//!     .collect();
//! let problem = Problem::new(ScheduleRequest::new(clouds, apps)).unwrap();
//!
//! let config = GaConfig::default()
//!     .with_population_size(16)
//!     .with_iteration_count(25)
//!     .with_seed(7);
//! let mut scheduler = GaScheduler::priority_aware(config, 25.0);
//! let solution = scheduler.schedule(&problem).unwrap();
//!
//! let kpi = PlacementKpi::calculate(&problem, &solution);
//! assert_eq!(kpi.acceptance_rate, 1.0);
//! ```

pub mod config;
pub mod error;
pub mod ga;
pub mod models;
pub mod placement;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
