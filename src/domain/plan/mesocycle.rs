//! Mesocycle aggregate - a training phase and the unit of activation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    MacrocycleId, MesocycleId, MesocycleStatus, StateMachine, Timestamp, TrainingObjective,
    ValidationError,
};

use super::PlanError;

/// A phase of N weeks with one objective and one status.
///
/// At most one mesocycle per student may be `Active`; that invariant spans
/// aggregates and is enforced by the status handler, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesocycle {
    id: MesocycleId,
    macrocycle_id: MacrocycleId,
    name: String,
    objective: TrainingObjective,
    status: MesocycleStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Outcome of a validated status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: MesocycleStatus,
    pub to: MesocycleStatus,
}

impl StatusTransition {
    /// True when this transition makes the mesocycle the student's live plan.
    pub fn is_activation(&self) -> bool {
        self.to.is_active() && !self.from.is_active()
    }
}

impl Mesocycle {
    /// Creates a new mesocycle in `Draft`.
    pub fn new(
        macrocycle_id: MacrocycleId,
        name: impl Into<String>,
        objective: TrainingObjective,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: MesocycleId::new(),
            macrocycle_id,
            name: name.trim().to_string(),
            objective,
            status: MesocycleStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitutes a mesocycle from persisted data.
    pub fn reconstitute(
        id: MesocycleId,
        macrocycle_id: MacrocycleId,
        name: String,
        objective: TrainingObjective,
        status: MesocycleStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            macrocycle_id,
            name,
            objective,
            status,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> MesocycleId {
        self.id
    }

    pub fn macrocycle_id(&self) -> MacrocycleId {
        self.macrocycle_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objective(&self) -> TrainingObjective {
        self.objective
    }

    pub fn status(&self) -> MesocycleStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Status transitions
    // ───────────────────────────────────────────────────────────────

    /// Checks a status change against the state machine without applying it.
    pub fn plan_transition(&self, target: MesocycleStatus) -> Result<StatusTransition, PlanError> {
        self.status
            .transition_to(target)
            .map(|to| StatusTransition {
                from: self.status,
                to,
            })
            .map_err(|_| PlanError::InvalidTransition {
                from: self.status,
                to: target,
            })
    }

    /// Applies a validated status change.
    pub fn change_status(&mut self, target: MesocycleStatus) -> Result<StatusTransition, PlanError> {
        let transition = self.plan_transition(target)?;
        self.status = transition.to;
        self.updated_at = Timestamp::now();
        Ok(transition)
    }

    /// Moves an active mesocycle out of `Active` because another one took over.
    pub fn supersede(&mut self) -> Result<StatusTransition, PlanError> {
        if !self.is_active() {
            return Err(PlanError::invariant(format!(
                "mesocycle {} is '{}' and cannot be superseded",
                self.id, self.status
            )));
        }
        self.change_status(MesocycleStatus::superseded())
    }
}
