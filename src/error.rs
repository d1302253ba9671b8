//! Crate error type.

use crate::config::ConfigError;
use crate::validation::ValidationErrors;

/// Errors that end a scheduling request.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("InvalidInput: {0}")]
    InvalidInput(#[from] ValidationErrors),
    #[error("InvalidConfig: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// No generation recorded a best solution; usually the initializer
    /// produced no individuals.
    #[error("NoSolution: no generation recorded a best solution")]
    NoSolution,
    /// Fitness and solution histories diverged in length.
    #[error("HistoryMismatch: fitness records={fitness}, solution records={solutions}")]
    HistoryMismatch { fitness: usize, solutions: usize },
}

/// Result alias for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
