//! GA hyperparameters.
//!
//! Hyperparameters are fixed for the lifetime of a scheduling run. They can
//! be built in code with the `with_*` methods or deserialized from any serde
//! format; missing fields fall back to [`GaConfig::default`].
//!
//! ```
//! use u_cloud_schedule::config::GaConfig;
//!
//! let config = GaConfig::default()
//!     .with_population_size(50)
//!     .with_iteration_count(100)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

/// Invalid hyperparameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("max_mutation_attempts must be positive when set")]
    ZeroMutationAttempts,
}

/// Hyperparameters of one GA run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of chromosomes in every generation.
    pub population_size: usize,
    /// Maximum number of generations after generation zero.
    pub iteration_count: usize,
    /// Probability that a chromosome takes part in crossover.
    pub crossover_probability: f64,
    /// Probability that a single gene is redrawn during mutation.
    pub mutation_probability: f64,
    /// The run converges once the best fitness has not improved for more
    /// than this many generations.
    pub stagnation_limit: usize,
    /// Attempts per chromosome to obtain a feasible mutant. `None` retries
    /// until the feasibility oracle accepts, which can stall the run if the
    /// oracle never does.
    pub max_mutation_attempts: Option<usize>,
    /// Seed for the run's random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            iteration_count: 5000,
            crossover_probability: 0.3,
            mutation_probability: 0.007,
            stagnation_limit: 50,
            max_mutation_attempts: Some(256),
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the iteration cap.
    pub fn with_iteration_count(mut self, count: usize) -> Self {
        self.iteration_count = count;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the mutation retry ceiling (`None` = unbounded).
    pub fn with_max_mutation_attempts(mut self, attempts: Option<usize>) -> Self {
        self.max_mutation_attempts = attempts;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every hyperparameter is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        for (name, value) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        if self.max_mutation_attempts == Some(0) {
            return Err(ConfigError::ZeroMutationAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = GaConfig::default()
            .with_population_size(10)
            .with_iteration_count(20)
            .with_crossover_probability(0.5)
            .with_mutation_probability(0.1)
            .with_stagnation_limit(3)
            .with_max_mutation_attempts(None)
            .with_seed(42);
        assert_eq!(c.population_size, 10);
        assert_eq!(c.iteration_count, 20);
        assert_eq!(c.stagnation_limit, 3);
        assert_eq!(c.max_mutation_attempts, None);
        assert_eq!(c.seed, Some(42));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            GaConfig::default().with_population_size(1).validate(),
            Err(ConfigError::PopulationTooSmall(1))
        );
        assert!(matches!(
            GaConfig::default().with_mutation_probability(1.5).validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "mutation_probability", .. })
        ));
        assert_eq!(
            GaConfig::default().with_max_mutation_attempts(Some(0)).validate(),
            Err(ConfigError::ZeroMutationAttempts)
        );
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let c: GaConfig =
            serde_json::from_str(r#"{"population_size": 30, "seed": 9}"#).unwrap();
        assert_eq!(c.population_size, 30);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.iteration_count, GaConfig::default().iteration_count);
    }
}
