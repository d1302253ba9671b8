//! Input validation for placement requests.
//!
//! Checks structural integrity of clouds, applications, and the
//! application order before scheduling. Detects:
//! - Duplicate IDs
//! - Priorities outside `[MIN_PRIORITY, MAX_PRIORITY]`
//! - Dependencies on unknown applications
//! - An application order that is not a permutation of the applications
//! - Negative capacities or demands

use std::collections::HashSet;

use crate::models::{Application, Cloud, MAX_PRIORITY, MIN_PRIORITY, Resources};

/// Validation result.
pub type ValidationResult = Result<(), ValidationErrors>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An application priority lies outside the valid range.
    PriorityOutOfRange,
    /// A dependency references an application that doesn't exist.
    UnknownDependency,
    /// The application order is not a permutation of the applications.
    OrderMismatch,
    /// A capacity or demand is negative.
    NegativeQuantity,
}

/// Every error found in one request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Iterates the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data of a placement request.
///
/// Checks:
/// 1. No duplicate cloud IDs
/// 2. No duplicate application IDs
/// 3. Every priority lies in `[MIN_PRIORITY, MAX_PRIORITY]`
/// 4. Every dependency points to an existing application
/// 5. `app_order` lists every application exactly once
/// 6. No negative capacity or demand
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    clouds: &[Cloud],
    apps: &[Application],
    app_order: &[String],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut cloud_ids = HashSet::new();
    for c in clouds {
        if !cloud_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate cloud ID: {}", c.id),
            ));
        }
        if is_negative(&c.capacity) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeQuantity,
                format!("Cloud '{}' has a negative capacity", c.id),
            ));
        }
    }

    let mut app_ids = HashSet::new();
    for app in apps {
        if !app_ids.insert(app.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate application ID: {}", app.id),
            ));
        }
        if !app.has_valid_priority() {
            errors.push(ValidationError::new(
                ValidationErrorKind::PriorityOutOfRange,
                format!(
                    "Application '{}' has priority {} outside [{MIN_PRIORITY}, {MAX_PRIORITY}]",
                    app.id, app.priority
                ),
            ));
        }
        if is_negative(&app.demand) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeQuantity,
                format!("Application '{}' has a negative demand", app.id),
            ));
        }
    }

    for app in apps {
        for dep in &app.dependencies {
            if !app_ids.contains(dep.app_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!(
                        "Application '{}' depends on unknown application '{}'",
                        app.id, dep.app_id
                    ),
                ));
            }
        }
    }

    let mut ordered = HashSet::new();
    for id in app_order {
        if !app_ids.contains(id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OrderMismatch,
                format!("Application order references unknown application '{id}'"),
            ));
        } else if !ordered.insert(id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OrderMismatch,
                format!("Application order lists '{id}' more than once"),
            ));
        }
    }
    for id in &app_ids {
        if !ordered.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OrderMismatch,
                format!("Application '{id}' is missing from the application order"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn is_negative(r: &Resources) -> bool {
    r.cpu_cores < 0.0 || r.memory_mi < 0.0 || r.storage_gi < 0.0
}
