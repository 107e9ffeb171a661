//! SetMesocycleStatusHandler - the lifecycle controller.
//!
//! Moves a mesocycle between `draft`, `published` and `active`. Activating
//! one mesocycle demotes every other active mesocycle of the same student
//! to `published`, and both writes go to the store as a single batch so a
//! student never observes zero-then-two or two active plans.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::handlers::access::{
    envelope_for, invalidate_student, load_mesocycle, publish_committed,
};
use crate::domain::foundation::{
    domain_event, CommandMetadata, EventEnvelope, EventId, MesocycleId, MesocycleStatus,
    Timestamp, UserId,
};
use crate::domain::plan::{active_count, Mesocycle, PlanError, StatusTransition};
use crate::ports::{
    EventPublisher, MacrocycleRepository, MesocycleRepository, PlanCache, StatusChange,
};

#[derive(Debug, Clone)]
pub struct SetMesocycleStatusCommand {
    pub mesocycle_id: MesocycleId,
    pub status: MesocycleStatus,
}

impl SetMesocycleStatusCommand {
    /// Builds the command from a raw status value as received from a caller.
    pub fn parse(mesocycle_id: MesocycleId, status: &str) -> Result<Self, PlanError> {
        let status = status.parse::<MesocycleStatus>()?;
        Ok(Self {
            mesocycle_id,
            status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SetMesocycleStatusResult {
    pub mesocycle: Mesocycle,
    /// `None` when the mesocycle already had the requested status.
    pub transition: Option<StatusTransition>,
    /// Mesocycles demoted from `active` by this activation.
    pub superseded: Vec<MesocycleId>,
}

impl SetMesocycleStatusResult {
    pub fn changed(&self) -> bool {
        self.transition.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesocycleStatusChangedEvent {
    pub event_id: EventId,
    pub mesocycle_id: MesocycleId,
    pub student_id: UserId,
    pub from: MesocycleStatus,
    pub to: MesocycleStatus,
    pub changed_at: Timestamp,
}

domain_event!(
    MesocycleStatusChangedEvent,
    event_type = "mesocycle.status_changed.v1",
    aggregate_id = mesocycle_id,
    aggregate_type = "Mesocycle",
    occurred_at = changed_at,
    event_id = event_id
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesocycleSupersededEvent {
    pub event_id: EventId,
    pub mesocycle_id: MesocycleId,
    pub superseded_by: MesocycleId,
    pub student_id: UserId,
    pub status: MesocycleStatus,
    pub superseded_at: Timestamp,
}

domain_event!(
    MesocycleSupersededEvent,
    event_type = "mesocycle.superseded.v1",
    aggregate_id = mesocycle_id,
    aggregate_type = "Mesocycle",
    occurred_at = superseded_at,
    event_id = event_id
);

pub struct SetMesocycleStatusHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    plan_cache: Arc<dyn PlanCache>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SetMesocycleStatusHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        mesocycle_repository: Arc<dyn MesocycleRepository>,
        plan_cache: Arc<dyn PlanCache>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            macrocycle_repository,
            mesocycle_repository,
            plan_cache,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetMesocycleStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<SetMesocycleStatusResult, PlanError> {
        let owned = load_mesocycle(
            &self.mesocycle_repository,
            &self.macrocycle_repository,
            &cmd.mesocycle_id,
        )
        .await?;
        owned.ensure_coach(&metadata)?;

        let mut mesocycle = owned.mesocycle.clone();
        let student_id = owned.student_id().clone();

        if mesocycle.status() == cmd.status {
            tracing::debug!(
                mesocycle_id = %mesocycle.id(),
                status = %cmd.status,
                "Mesocycle already has requested status"
            );
            return Ok(SetMesocycleStatusResult {
                mesocycle,
                transition: None,
                superseded: Vec::new(),
            });
        }

        let transition = mesocycle.plan_transition(cmd.status)?;

        let mut superseded: Vec<Mesocycle> = Vec::new();
        let mut changes: Vec<StatusChange> = Vec::new();

        if transition.is_activation() {
            // Read the current active set as late as possible; the store's
            // `expected` check catches anything that moves after this.
            let currently_active = self
                .mesocycle_repository
                .find_active_by_student(&student_id)
                .await?;

            for mut other in currently_active
                .into_iter()
                .filter(|m| m.id() != mesocycle.id())
            {
                let demotion = other.supersede()?;
                changes.push(StatusChange::new(other.id(), demotion.from, demotion.to));
                superseded.push(other);
            }
        }

        let mut after = mesocycle.clone();
        after.change_status(cmd.status)?;
        if active_count(superseded.iter().chain(std::iter::once(&after))) > 1 {
            return Err(PlanError::invariant(format!(
                "activating mesocycle {} would leave student {} with more than one active mesocycle",
                mesocycle.id(),
                student_id
            )));
        }
        changes.push(StatusChange::new(mesocycle.id(), transition.from, transition.to));

        self.mesocycle_repository
            .apply_status_changes(&changes)
            .await?;
        mesocycle = after;

        invalidate_student(&self.plan_cache, &student_id).await;

        let superseded_ids: Vec<MesocycleId> = superseded.iter().map(|m| m.id()).collect();
        tracing::info!(
            mesocycle_id = %mesocycle.id(),
            student_id = %student_id,
            from = %transition.from,
            to = %transition.to,
            superseded = superseded_ids.len(),
            "Mesocycle status changed"
        );

        let envelopes = self.build_envelopes(&mesocycle, &student_id, transition, &superseded, &metadata);
        publish_committed(&self.event_publisher, envelopes).await;

        Ok(SetMesocycleStatusResult {
            mesocycle,
            transition: Some(transition),
            superseded: superseded_ids,
        })
    }

    /// Supersession events come first so subscribers see the old plan end
    /// before the new one starts.
    fn build_envelopes(
        &self,
        mesocycle: &Mesocycle,
        student_id: &UserId,
        transition: StatusTransition,
        superseded: &[Mesocycle],
        metadata: &CommandMetadata,
    ) -> Vec<EventEnvelope> {
        let now = Timestamp::now();
        let mut envelopes = Vec::with_capacity(superseded.len() + 1);

        for other in superseded {
            let event = MesocycleSupersededEvent {
                event_id: EventId::new(),
                mesocycle_id: other.id(),
                superseded_by: mesocycle.id(),
                student_id: student_id.clone(),
                status: other.status(),
                superseded_at: now,
            };
            envelopes.extend(envelope_for(&event, metadata));
        }

        let event = MesocycleStatusChangedEvent {
            event_id: EventId::new(),
            mesocycle_id: mesocycle.id(),
            student_id: student_id.clone(),
            from: transition.from,
            to: transition.to,
            changed_at: mesocycle.updated_at(),
        };
        envelopes.extend(envelope_for(&event, metadata));
        envelopes
    }
}
