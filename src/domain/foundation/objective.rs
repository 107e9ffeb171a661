//! TrainingObjective enum shared by macrocycles and mesocycles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Primary adaptation a training block is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingObjective {
    Hypertrophy,
    Strength,
    Endurance,
    FatLoss,
    #[default]
    General,
}

impl TrainingObjective {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingObjective::Hypertrophy => "hypertrophy",
            TrainingObjective::Strength => "strength",
            TrainingObjective::Endurance => "endurance",
            TrainingObjective::FatLoss => "fat_loss",
            TrainingObjective::General => "general",
        }
    }
}

impl fmt::Display for TrainingObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrainingObjective {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hypertrophy" => Ok(TrainingObjective::Hypertrophy),
            "strength" => Ok(TrainingObjective::Strength),
            "endurance" => Ok(TrainingObjective::Endurance),
            "fat_loss" => Ok(TrainingObjective::FatLoss),
            "general" => Ok(TrainingObjective::General),
            other => Err(ValidationError::invalid_format(
                "objective",
                format!("unknown training objective '{}'", other),
            )),
        }
    }
}
