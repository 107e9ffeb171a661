//! Loading helpers and actor checks shared by the plan handlers.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, EventEnvelope, MesocycleId, MicrocycleId, SerializableDomainEvent, UserId,
};
use crate::domain::plan::{Macrocycle, Mesocycle, Microcycle, PlanEntity, PlanError};
use crate::ports::{
    EventPublisher, MacrocycleRepository, MesocycleRepository, MicrocycleRepository, PlanCache,
};

/// A mesocycle together with the macrocycle that owns it.
#[derive(Debug, Clone)]
pub(crate) struct OwnedMesocycle {
    pub mesocycle: Mesocycle,
    pub macrocycle: Macrocycle,
}

impl OwnedMesocycle {
    pub fn student_id(&self) -> &UserId {
        self.macrocycle.student_id()
    }

    /// Only the macrocycle's coach may change plan structure or status.
    pub fn ensure_coach(&self, metadata: &CommandMetadata) -> Result<(), PlanError> {
        if self.macrocycle.is_coached_by(&metadata.user_id) {
            Ok(())
        } else {
            Err(PlanError::Forbidden)
        }
    }

    /// The coach may read the plan at any status. The student may read it
    /// once the mesocycle is published.
    pub fn ensure_reader(&self, metadata: &CommandMetadata) -> Result<(), PlanError> {
        if self.macrocycle.is_coached_by(&metadata.user_id) {
            return Ok(());
        }
        if self.macrocycle.belongs_to_student(&metadata.user_id)
            && self.mesocycle.status().is_visible_to_student()
        {
            Ok(())
        } else {
            Err(PlanError::Forbidden)
        }
    }
}

pub(crate) async fn load_mesocycle(
    mesocycles: &Arc<dyn MesocycleRepository>,
    macrocycles: &Arc<dyn MacrocycleRepository>,
    id: &MesocycleId,
) -> Result<OwnedMesocycle, PlanError> {
    let mesocycle = mesocycles
        .find_by_id(id)
        .await?
        .ok_or_else(|| PlanError::not_found(PlanEntity::Mesocycle, id))?;
    let macrocycle = macrocycles
        .find_by_id(&mesocycle.macrocycle_id())
        .await?
        .ok_or_else(|| PlanError::not_found(PlanEntity::Macrocycle, mesocycle.macrocycle_id()))?;
    Ok(OwnedMesocycle {
        mesocycle,
        macrocycle,
    })
}

pub(crate) async fn load_microcycle(
    microcycles: &Arc<dyn MicrocycleRepository>,
    id: &MicrocycleId,
) -> Result<Microcycle, PlanError> {
    microcycles
        .find_by_id(id)
        .await?
        .ok_or_else(|| PlanError::not_found(PlanEntity::Microcycle, id))
}

/// Publishes after a committed write. Failures are logged, never returned:
/// the write already happened and cannot be undone from here.
pub(crate) async fn publish_committed(
    publisher: &Arc<dyn EventPublisher>,
    envelopes: Vec<EventEnvelope>,
) {
    if envelopes.is_empty() {
        return;
    }
    let types: Vec<String> = envelopes.iter().map(|e| e.event_type.clone()).collect();
    if let Err(e) = publisher.publish_all(envelopes).await {
        tracing::warn!(error = %e, events = ?types, "Failed to publish plan events");
    }
}

/// Drops cached read models for the student after a write.
pub(crate) async fn invalidate_student(cache: &Arc<dyn PlanCache>, student_id: &UserId) {
    if let Err(e) = cache.invalidate_student(student_id).await {
        tracing::warn!(error = %e, student_id = %student_id, "Failed to invalidate plan cache");
    }
}

/// Wraps an event for publishing, stamped with the actor and correlation id.
/// An event that cannot be serialized is logged and dropped.
pub(crate) fn envelope_for<E>(event: &E, metadata: &CommandMetadata) -> Option<EventEnvelope>
where
    E: SerializableDomainEvent,
{
    match event.to_envelope() {
        Ok(envelope) => Some(
            envelope
                .with_correlation_id(metadata.correlation_id())
                .with_user_id(metadata.user_id.to_string()),
        ),
        Err(e) => {
            tracing::warn!(error = %e, event_type = event.event_type(), "Failed to build event envelope");
            None
        }
    }
}
