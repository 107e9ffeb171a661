//! Metrics presentation configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Length of the muscle-group ranking returned with metrics
    #[serde(default = "default_top_muscle_groups")]
    pub top_muscle_groups: usize,

    /// Label for exercises whose catalog entry has no muscle group
    #[serde(default = "default_unresolved_label")]
    pub unresolved_muscle_group_label: String,
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_muscle_groups == 0 {
            return Err(ValidationError::InvalidTopMuscleGroups);
        }
        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_muscle_groups: default_top_muscle_groups(),
            unresolved_muscle_group_label: default_unresolved_label(),
        }
    }
}

fn default_top_muscle_groups() -> usize {
    6
}

fn default_unresolved_label() -> String {
    "Sin grupo".to_string()
}
