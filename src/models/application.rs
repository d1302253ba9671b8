//! Application model.
//!
//! An application is a unit of work competing for placement. Its priority
//! is confined to `[MIN_PRIORITY, MAX_PRIORITY]`; a numerically larger
//! priority is more important.

use serde::{Deserialize, Serialize};

use super::Resources;

/// Lowest valid application priority.
pub const MIN_PRIORITY: i32 = 1;

/// Highest valid application priority.
pub const MAX_PRIORITY: i32 = 10;

/// Dependency on another application of the same request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// ID of the application depended upon.
    pub app_id: String,
}

/// An application to be placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique application identifier.
    pub id: String,
    /// Placement priority (higher = more important).
    pub priority: i32,
    /// Resources required to host the application.
    pub demand: Resources,
    /// Applications this one talks to; only used for latency cost.
    pub dependencies: Vec<Dependency>,
}

impl Application {
    /// Creates an application with the lowest priority and no demand.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority: MIN_PRIORITY,
            demand: Resources::default(),
            dependencies: Vec::new(),
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the resource demand.
    pub fn with_demand(mut self, demand: Resources) -> Self {
        self.demand = demand;
        self
    }

    /// Adds a dependency on another application.
    pub fn with_dependency(mut self, app_id: impl Into<String>) -> Self {
        self.dependencies.push(Dependency {
            app_id: app_id.into(),
        });
        self
    }

    /// Whether the priority lies in `[MIN_PRIORITY, MAX_PRIORITY]`.
    pub fn has_valid_priority(&self) -> bool {
        (MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_builder() {
        let app = Application::new("A1")
            .with_priority(7)
            .with_demand(Resources::cpu(2.0))
            .with_dependency("A2")
            .with_dependency("A3");

        assert_eq!(app.id, "A1");
        assert_eq!(app.priority, 7);
        assert!((app.demand.cpu_cores - 2.0).abs() < 1e-10);
        assert_eq!(app.dependencies.len(), 2);
        assert_eq!(app.dependencies[1].app_id, "A3");
    }

    #[test]
    fn test_priority_range() {
        assert!(Application::new("A").has_valid_priority());
        assert!(Application::new("A").with_priority(MAX_PRIORITY).has_valid_priority());
        assert!(!Application::new("A").with_priority(0).has_valid_priority());
        assert!(!Application::new("A").with_priority(11).has_valid_priority());
    }
}
