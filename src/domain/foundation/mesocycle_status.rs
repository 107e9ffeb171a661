//! MesocycleStatus enum governing which plan a student currently sees.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Lifecycle status of a mesocycle.
///
/// A mesocycle superseded by another activation drops back to `Published`;
/// there is no separate completed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MesocycleStatus {
    #[default]
    Draft,
    Published,
    Active,
}

impl MesocycleStatus {
    /// All known statuses, in lifecycle order.
    pub const ALL: [MesocycleStatus; 3] = [
        MesocycleStatus::Draft,
        MesocycleStatus::Published,
        MesocycleStatus::Active,
    ];

    /// Returns true if a student may see a mesocycle in this status.
    ///
    /// Drafts are invisible to students regardless of query. Read paths
    /// outside the engine are responsible for applying this rule.
    pub fn is_visible_to_student(&self) -> bool {
        matches!(self, MesocycleStatus::Published | MesocycleStatus::Active)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MesocycleStatus::Active)
    }

    /// Status a mesocycle takes when another one is activated for the same student.
    pub fn superseded() -> Self {
        MesocycleStatus::Published
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MesocycleStatus::Draft => "draft",
            MesocycleStatus::Published => "published",
            MesocycleStatus::Active => "active",
        }
    }
}

impl StateMachine for MesocycleStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MesocycleStatus::*;
        matches!(
            (self, target),
            (Draft, Published)
                | (Draft, Active)
                | (Published, Active)
                | (Published, Draft)
                | (Active, Draft)
                | (Active, Published)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MesocycleStatus::*;
        match self {
            Draft => vec![Published, Active],
            Published => vec![Draft, Active],
            Active => vec![Draft, Published],
        }
    }
}

impl fmt::Display for MesocycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MesocycleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(MesocycleStatus::Draft),
            "published" => Ok(MesocycleStatus::Published),
            "active" => Ok(MesocycleStatus::Active),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown mesocycle status '{}'", other),
            )),
        }
    }
}
