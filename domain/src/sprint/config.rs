//! Sprint configuration and its documented defaults.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::termination::DEFAULT_COMPLETION_MARKER;

/// Tunable bounds for one sprint.
///
/// Defaults: a two-week sprint with a 40-point capacity, at most 10
/// execution iterations, phase round budgets of 15 (planning), 10
/// (execution) and 8 (retrospective), and one retry per work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintConfig {
    pub duration_days: u32,
    pub capacity_points: u32,
    /// Hard ceiling across execution runs
    pub max_iterations: u32,
    pub planning_rounds: u32,
    pub execution_rounds: u32,
    pub retrospective_rounds: u32,
    /// Marker that completes a run, matched case-insensitively
    pub completion_marker: String,
    /// Failed execution runs tolerated per item beyond the first attempt
    pub item_retry_limit: u32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            duration_days: 14,
            capacity_points: 40,
            max_iterations: 10,
            planning_rounds: 15,
            execution_rounds: 10,
            retrospective_rounds: 8,
            completion_marker: DEFAULT_COMPLETION_MARKER.to_string(),
            item_retry_limit: 1,
        }
    }
}

impl SprintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    pub fn with_capacity_points(mut self, points: u32) -> Self {
        self.capacity_points = points;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_item_retry_limit(mut self, limit: u32) -> Self {
        self.item_retry_limit = limit;
        self
    }

    pub fn with_completion_marker(mut self, marker: impl Into<String>) -> Self {
        self.completion_marker = marker.into();
        self
    }

    pub fn with_execution_rounds(mut self, rounds: u32) -> Self {
        self.execution_rounds = rounds;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_iterations == 0 {
            return Err(DomainError::InvalidSprintConfig(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if self.capacity_points == 0 {
            return Err(DomainError::InvalidSprintConfig(
                "capacity_points must be greater than zero".to_string(),
            ));
        }
        if self.planning_rounds == 0 || self.execution_rounds == 0 || self.retrospective_rounds == 0
        {
            return Err(DomainError::InvalidSprintConfig(
                "phase round budgets must be greater than zero".to_string(),
            ));
        }
        if self.completion_marker.is_empty() {
            return Err(DomainError::InvalidSprintConfig(
                "completion_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let config = SprintConfig::default();
        assert_eq!(config.duration_days, 14);
        assert_eq!(config.capacity_points, 40);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.planning_rounds, 15);
        assert_eq!(config.execution_rounds, 10);
        assert_eq!(config.retrospective_rounds, 8);
        assert_eq!(config.completion_marker, "SPRINT_COMPLETE!");
        assert_eq!(config.item_retry_limit, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = SprintConfig::new()
            .with_duration_days(7)
            .with_capacity_points(30)
            .with_max_iterations(15);
        assert_eq!(config.duration_days, 7);
        assert_eq!(config.capacity_points, 30);
        assert_eq!(config.max_iterations, 15);
    }

    #[test]
    fn test_degenerate_configs_rejected() {
        assert!(SprintConfig::new().with_max_iterations(0).validate().is_err());
        assert!(SprintConfig::new().with_capacity_points(0).validate().is_err());
        assert!(SprintConfig::new().with_completion_marker("").validate().is_err());
        assert!(SprintConfig::new().with_execution_rounds(0).validate().is_err());
    }
}
