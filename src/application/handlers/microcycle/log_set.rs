//! LogSetHandler - a student records what they actually did in a set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::handlers::access::{
    envelope_for, invalidate_student, load_mesocycle, load_microcycle, publish_committed,
};
use crate::domain::foundation::{
    domain_event, CommandMetadata, EventId, MicrocycleId, SetId, Timestamp, UserId,
};
use crate::domain::plan::{PlanEntity, PlanError, TrainingSet};
use crate::ports::{
    EventPublisher, MacrocycleRepository, MesocycleRepository, MicrocycleRepository, PlanCache,
};

#[derive(Debug, Clone)]
pub struct LogSetCommand {
    pub microcycle_id: MicrocycleId,
    pub set_id: SetId,
    pub actual_rir: Option<f64>,
    pub actual_reps: Option<u32>,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct LogSetResult {
    pub set: TrainingSet,
    pub event: SetLoggedEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLoggedEvent {
    pub event_id: EventId,
    pub set_id: SetId,
    pub microcycle_id: MicrocycleId,
    pub student_id: UserId,
    pub actual_rir: Option<f64>,
    pub actual_reps: Option<u32>,
    pub completed: bool,
    pub logged_at: Timestamp,
}

domain_event!(
    SetLoggedEvent,
    event_type = "set.logged.v1",
    aggregate_id = set_id,
    aggregate_type = "TrainingSet",
    occurred_at = logged_at,
    event_id = event_id
);

pub struct LogSetHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    microcycle_repository: Arc<dyn MicrocycleRepository>,
    plan_cache: Arc<dyn PlanCache>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl LogSetHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        mesocycle_repository: Arc<dyn MesocycleRepository>,
        microcycle_repository: Arc<dyn MicrocycleRepository>,
        plan_cache: Arc<dyn PlanCache>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            macrocycle_repository,
            mesocycle_repository,
            microcycle_repository,
            plan_cache,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: LogSetCommand,
        metadata: CommandMetadata,
    ) -> Result<LogSetResult, PlanError> {
        let mut microcycle = load_microcycle(&self.microcycle_repository, &cmd.microcycle_id).await?;
        let owned = load_mesocycle(
            &self.mesocycle_repository,
            &self.macrocycle_repository,
            &microcycle.mesocycle_id,
        )
        .await?;

        // Students log; a draft is not theirs to see yet.
        if !owned.macrocycle.belongs_to_student(&metadata.user_id)
            || !owned.mesocycle.status().is_visible_to_student()
        {
            return Err(PlanError::Forbidden);
        }

        let set = microcycle
            .find_set_mut(&cmd.set_id)
            .ok_or_else(|| PlanError::not_found(PlanEntity::Set, cmd.set_id))?;
        set.record_log(cmd.actual_rir, cmd.actual_reps, cmd.completed)?;
        let set = set.clone();

        self.microcycle_repository
            .save_set_log(&microcycle.id, &set)
            .await?;

        let student_id = owned.student_id().clone();
        invalidate_student(&self.plan_cache, &student_id).await;

        let event = SetLoggedEvent {
            event_id: EventId::new(),
            set_id: set.id,
            microcycle_id: microcycle.id,
            student_id,
            actual_rir: set.actual_rir,
            actual_reps: set.actual_reps,
            completed: set.is_completed(),
            logged_at: Timestamp::now(),
        };
        tracing::debug!(set_id = %set.id, microcycle_id = %microcycle.id, "Set logged");
        publish_committed(
            &self.event_publisher,
            envelope_for(&event, &metadata).into_iter().collect(),
        )
        .await;

        Ok(LogSetResult { set, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::foundation::{ExerciseCatalogId, MesocycleStatus};
    use crate::domain::plan::{Day, Exercise, Microcycle, Prescription};
    use crate::ports::PlanCacheKey;

    fn handler(fx: &Fixture) -> LogSetHandler {
        LogSetHandler::new(
            fx.macrocycles(),
            fx.mesocycles(),
            fx.microcycles(),
            fx.plan_cache(),
            fx.publisher(),
        )
    }

    async fn week(fx: &Fixture, status: MesocycleStatus) -> Microcycle {
        let macrocycle = fx.macrocycle().await;
        let mesocycle = fx.mesocycle(&macrocycle, status).await;
        let mut day = Day::new(1, "Día 1", false).unwrap();
        day.add_exercise(
            Exercise::new(
                ExerciseCatalogId::new("squat").unwrap(),
                1,
                Prescription::default(),
            )
            .with_set(TrainingSet::prescribed(1, "5", "2", false))
            .with_set(TrainingSet::prescribed(2, "5", "2", true)),
        )
        .unwrap();
        let microcycle = Microcycle::new(mesocycle.id(), "Semana 1", 1, false, vec![day]);
        fx.microcycles().create(&microcycle).await.unwrap();
        microcycle
    }

    fn log(microcycle: &Microcycle, rir: f64) -> LogSetCommand {
        let set = microcycle.sets().next().unwrap();
        LogSetCommand {
            microcycle_id: microcycle.id,
            set_id: set.id,
            actual_rir: Some(rir),
            actual_reps: Some(5),
            completed: true,
        }
    }

    #[tokio::test]
    async fn student_logs_completed_set() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Active).await;
        let cmd = log(&microcycle, 1.5);
        let set_id = cmd.set_id;

        let result = handler(&fx).handle(cmd, student_metadata()).await.unwrap();

        assert!(result.set.is_completed());
        let stored = fx.microcycles().find_by_id(&microcycle.id).await.unwrap().unwrap();
        let stored_set = stored.find_set(&set_id).unwrap();
        assert_eq!(stored_set.actual_rir, Some(1.5));
        assert!(stored_set.is_completed());
        assert!(fx.bus.has_event("set.logged.v1"));
    }

    #[tokio::test]
    async fn rir_out_of_range_is_invalid_argument() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Active).await;

        let err = handler(&fx)
            .handle(log(&microcycle, 11.0), student_metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::InvalidArgument { ref field, .. } if field == "actual_rir"));
    }

    #[tokio::test]
    async fn coach_cannot_log_for_student() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Active).await;

        let err = handler(&fx)
            .handle(log(&microcycle, 2.0), coach_metadata())
            .await
            .unwrap_err();

        assert_eq!(err, PlanError::Forbidden);
    }

    #[tokio::test]
    async fn draft_weeks_cannot_be_logged() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Draft).await;

        let err = handler(&fx)
            .handle(log(&microcycle, 2.0), student_metadata())
            .await
            .unwrap_err();

        assert_eq!(err, PlanError::Forbidden);
    }

    #[tokio::test]
    async fn unknown_set_is_not_found() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Published).await;
        let mut cmd = log(&microcycle, 2.0);
        cmd.set_id = SetId::new();

        let err = handler(&fx).handle(cmd, student_metadata()).await.unwrap_err();

        assert!(matches!(
            err,
            PlanError::NotFound {
                entity: PlanEntity::Set,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn logging_drops_cached_metrics() {
        let fx = Fixture::new();
        let microcycle = week(&fx, MesocycleStatus::Active).await;
        let key = PlanCacheKey::microcycle_metrics(student(), microcycle.id);
        fx.plan_cache()
            .put(key.clone(), serde_json::json!({}))
            .await
            .unwrap();

        handler(&fx)
            .handle(log(&microcycle, 2.0), student_metadata())
            .await
            .unwrap();

        assert!(fx.plan_cache().get(&key).await.unwrap().is_none());
    }
}
