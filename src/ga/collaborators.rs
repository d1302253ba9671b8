//! Contracts of the collaborators the GA engine delegates to.
//!
//! The engine never checks capacity itself: seeding, crossover, and
//! feasibility repair are behind these traits. Reference implementations
//! live in [`crate::placement`].
//!
//! A run has exactly one [`FeasibilityOracle`]. Initializers and crossover
//! operators receive it on every call instead of owning one, so every
//! individual of every generation is judged by the same oracle.
//!
//! Implementations are shared across worker threads, hence `Send + Sync`.
//! Randomness is always passed in so that each concurrent unit can use its
//! own independent stream.

use rand::RngCore;

use super::Problem;
use crate::models::Solution;

/// Produces generation-zero individuals.
pub trait Initializer: Send + Sync {
    /// Creates one individual, feasible under `oracle`.
    fn initialize(
        &self,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        rng: &mut dyn RngCore,
    ) -> Solution;
}

/// Two-parent recombination returning feasible children.
pub trait Crossover: Send + Sync {
    /// Recombines two parents into two children feasible under `oracle`.
    fn crossover(
        &self,
        first: &Solution,
        second: &Solution,
        problem: &Problem,
        oracle: &dyn FeasibilityOracle,
        rng: &mut dyn RngCore,
    ) -> (Solution, Solution);
}

/// Validates and repairs candidate solutions against capacity constraints.
pub trait FeasibilityOracle: Send + Sync {
    /// Returns a feasible version of `candidate`, or `None` if it refuses.
    ///
    /// `order` is a preference hint: earlier applications win when
    /// capacity is scarce.
    fn refine(&self, problem: &Problem, order: &[String], candidate: Solution) -> Option<Solution>;
}

/// Picks a cloud from a candidate set.
pub trait CloudPicker: Send + Sync {
    /// Picks one of `candidates`, or `None` if the set is empty.
    fn pick(&self, candidates: &[&str], rng: &mut dyn RngCore) -> Option<String>;
}
