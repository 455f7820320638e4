//! Input validation for meeting problems.
//!
//! Checks structural integrity of an instance before any graph is built.
//! Detects:
//! - Instances without agents
//! - Starts outside the grid or on obstacles
//! - Two agents sharing a start cell
//! - Fewer free cells than agents (no placement can exist)
//!
//! All problems are collected rather than stopping at the first one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{GridMap, Node};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The instance has no agents.
    NoAgents,
    /// A start lies outside the grid.
    OutOfBounds,
    /// A start lies on an obstacle.
    BlockedStart,
    /// Two agents share a start.
    DuplicateStart,
    /// The grid has fewer free cells than agents.
    NotEnoughFreeCells,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a grid and agent starts.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(map: &GridMap, starts: &[Node]) -> ValidationResult {
    let mut errors = Vec::new();

    if starts.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoAgents,
            "Instance has no agents",
        ));
    }

    let mut seen: HashSet<Node> = HashSet::new();
    for (agent, &start) in starts.iter().enumerate() {
        if !map.contains(start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfBounds,
                format!(
                    "Agent {agent} starts at {start}, outside the {}x{} grid",
                    map.width(),
                    map.height()
                ),
            ));
        } else if map.is_obstacle(start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlockedStart,
                format!("Agent {agent} starts on obstacle {start}"),
            ));
        }
        if !seen.insert(start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStart,
                format!("Agent {agent} shares start {start} with another agent"),
            ));
        }
    }

    let free = map.free_count();
    if free < starts.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NotEnoughFreeCells,
            format!("{} agents but only {free} free cells", starts.len()),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
