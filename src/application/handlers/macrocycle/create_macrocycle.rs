//! CreateMacrocycleHandler - a coach opens a new top-level plan for a student.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::access::{envelope_for, publish_committed};
use crate::domain::foundation::{
    domain_event, CommandMetadata, EventId, MacrocycleId, Timestamp, TrainingObjective, UserId,
};
use crate::domain::plan::{Macrocycle, PlanError};
use crate::ports::{EventPublisher, MacrocycleRepository};

/// Command to create a macrocycle. The acting user becomes its coach.
#[derive(Debug, Clone)]
pub struct CreateMacrocycleCommand {
    pub student_id: UserId,
    pub name: String,
    pub objective: TrainingObjective,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CreateMacrocycleResult {
    pub macrocycle: Macrocycle,
    pub event: MacrocycleCreatedEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacrocycleCreatedEvent {
    pub event_id: EventId,
    pub macrocycle_id: MacrocycleId,
    pub student_id: UserId,
    pub coach_id: UserId,
    pub objective: TrainingObjective,
    pub created_at: Timestamp,
}

domain_event!(
    MacrocycleCreatedEvent,
    event_type = "macrocycle.created.v1",
    aggregate_id = macrocycle_id,
    aggregate_type = "Macrocycle",
    occurred_at = created_at,
    event_id = event_id
);

pub struct CreateMacrocycleHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateMacrocycleHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            macrocycle_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateMacrocycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateMacrocycleResult, PlanError> {
        if cmd.student_id == metadata.user_id {
            return Err(PlanError::invalid_argument(
                "student_id",
                "a coach cannot be their own student",
            ));
        }

        let macrocycle = Macrocycle::new(
            cmd.student_id,
            metadata.user_id.clone(),
            cmd.name,
            cmd.objective,
            cmd.start_date,
        )?;

        self.macrocycle_repository.save(&macrocycle).await?;

        let event = MacrocycleCreatedEvent {
            event_id: EventId::new(),
            macrocycle_id: macrocycle.id(),
            student_id: macrocycle.student_id().clone(),
            coach_id: macrocycle.coach_id().clone(),
            objective: macrocycle.objective(),
            created_at: macrocycle.created_at(),
        };
        tracing::info!(
            macrocycle_id = %macrocycle.id(),
            student_id = %macrocycle.student_id(),
            "Macrocycle created"
        );
        publish_committed(
            &self.event_publisher,
            envelope_for(&event, &metadata).into_iter().collect(),
        )
        .await;

        Ok(CreateMacrocycleResult { macrocycle, event })
    }
}
