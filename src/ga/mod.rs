//! GA-based placement optimization.
//!
//! Evolves complete placement decisions for a multi-cloud request.
//!
//! # Encoding
//!
//! A chromosome is a [`Solution`](crate::models::Solution): one
//! [`Gene`](crate::models::Gene) per application, either rejected or
//! accepted on a cloud with a node and CPU allocation.
//!
//! # Submodules
//!
//! - [`operators`]: Population-level crossover and mutation
//!
//! Capacity reasoning is delegated to the collaborator traits
//! ([`Initializer`], [`Crossover`], [`FeasibilityOracle`],
//! [`CloudPicker`]); the engine only recombines, mutates, scores, and
//! selects.

mod chromosome;
mod collaborators;
mod fitness;
pub mod operators;
mod problem;
mod repair;
mod selection;

pub use chromosome::{mutate_genes, mutate_until_feasible, redraw_gene};
pub use collaborators::{CloudPicker, Crossover, FeasibilityOracle, Initializer};
pub use fitness::{
    CoverageBreakdown, CoverageFitness, CoverageWeights, EnergyFitness, EnergyWeights,
    FitnessStrategy, UNFIT,
};
pub use problem::{Problem, ScheduleRequest};
pub use repair::{DEFAULT_RICH_THRESHOLD, FairnessRepair, NoRepair, PostProcessor};
pub use selection::{EvolutionHistory, evaluate_population, tournament_select};
