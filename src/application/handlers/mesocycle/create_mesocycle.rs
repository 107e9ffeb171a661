//! CreateMesocycleHandler - adds a draft mesocycle to a macrocycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::handlers::access::{envelope_for, invalidate_student, publish_committed};
use crate::domain::foundation::{
    domain_event, CommandMetadata, EventId, MacrocycleId, MesocycleId, Timestamp,
    TrainingObjective, UserId,
};
use crate::domain::plan::{Mesocycle, PlanEntity, PlanError};
use crate::ports::{EventPublisher, MacrocycleRepository, MesocycleRepository, PlanCache};

#[derive(Debug, Clone)]
pub struct CreateMesocycleCommand {
    pub macrocycle_id: MacrocycleId,
    pub name: String,
    pub objective: TrainingObjective,
}

#[derive(Debug, Clone)]
pub struct CreateMesocycleResult {
    pub mesocycle: Mesocycle,
    pub event: MesocycleCreatedEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesocycleCreatedEvent {
    pub event_id: EventId,
    pub mesocycle_id: MesocycleId,
    pub macrocycle_id: MacrocycleId,
    pub student_id: UserId,
    pub name: String,
    pub created_at: Timestamp,
}

domain_event!(
    MesocycleCreatedEvent,
    event_type = "mesocycle.created.v1",
    aggregate_id = mesocycle_id,
    aggregate_type = "Mesocycle",
    occurred_at = created_at,
    event_id = event_id
);

pub struct CreateMesocycleHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    plan_cache: Arc<dyn PlanCache>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateMesocycleHandler {
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
        cmd: CreateMesocycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateMesocycleResult, PlanError> {
        let macrocycle = self
            .macrocycle_repository
            .find_by_id(&cmd.macrocycle_id)
            .await?
            .ok_or_else(|| PlanError::not_found(PlanEntity::Macrocycle, cmd.macrocycle_id))?;

        if !macrocycle.is_coached_by(&metadata.user_id) {
            return Err(PlanError::Forbidden);
        }

        let mesocycle = Mesocycle::new(macrocycle.id(), cmd.name, cmd.objective)?;
        self.mesocycle_repository.save(&mesocycle).await?;

        invalidate_student(&self.plan_cache, macrocycle.student_id()).await;

        let event = MesocycleCreatedEvent {
            event_id: EventId::new(),
            mesocycle_id: mesocycle.id(),
            macrocycle_id: macrocycle.id(),
            student_id: macrocycle.student_id().clone(),
            name: mesocycle.name().to_string(),
            created_at: mesocycle.created_at(),
        };
        tracing::info!(
            mesocycle_id = %mesocycle.id(),
            macrocycle_id = %macrocycle.id(),
            "Mesocycle created as draft"
        );
        publish_committed(
            &self.event_publisher,
            envelope_for(&event, &metadata).into_iter().collect(),
        )
        .await;

        Ok(CreateMesocycleResult { mesocycle, event })
    }
}
