//! CreateMicrocycleHandler - appends a week to a mesocycle.
//!
//! The new tree is built entirely in memory by `domain::cloning` and then
//! persisted with a single `create` call, so a failed write never leaves a
//! half-copied week behind.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::handlers::access::{
    envelope_for, invalidate_student, load_mesocycle, publish_committed,
};
use crate::config::CloningConfig;
use crate::domain::cloning::{build_microcycle, CloneDefaults, CloneSource, NewMicrocycle};
use crate::domain::foundation::{
    domain_event, CommandMetadata, EventId, ExerciseCatalogId, ExerciseId, MesocycleId,
    MicrocycleId, Timestamp, UserId,
};
use crate::domain::plan::{Microcycle, PlanError};
use crate::ports::{
    EventPublisher, ExerciseCatalog, MacrocycleRepository, MesocycleRepository,
    MicrocycleRepository, PlanCache,
};

#[derive(Debug, Clone)]
pub struct CreateMicrocycleCommand {
    pub mesocycle_id: MesocycleId,
    pub name: String,
    pub is_deload: bool,
    pub copy_from_last: bool,
    pub days_per_week: u8,
}

/// How the week was built, for the coach.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneReport {
    pub source: CloneSource,
    /// Exercises that had no sets in the source and received defaults.
    pub synthesized_sets: Vec<ExerciseId>,
    /// Catalog ids copied verbatim although the catalog no longer knows them.
    pub dangling_references: Vec<ExerciseCatalogId>,
}

impl CloneReport {
    /// Human-readable notes for anything the coach did not explicitly ask for.
    pub fn notices(&self) -> Vec<String> {
        let mut notices = Vec::new();
        match self.source {
            CloneSource::SkeletonNoPreviousMicrocycle => notices.push(
                "No previous microcycle to copy from; an empty week was created instead"
                    .to_string(),
            ),
            CloneSource::SkeletonEmptySource(id) => notices.push(format!(
                "Microcycle {} has no days to copy; an empty week was created instead",
                id
            )),
            CloneSource::Skeleton | CloneSource::CopiedFrom(_) => {}
        }
        if !self.synthesized_sets.is_empty() {
            notices.push(format!(
                "{} exercise(s) had no sets and received default sets",
                self.synthesized_sets.len()
            ));
        }
        notices.extend(
            self.dangling_references
                .iter()
                .map(|id| PlanError::DanglingReference(id.clone()).message()),
        );
        notices
    }
}

#[derive(Debug, Clone)]
pub struct CreateMicrocycleResult {
    pub microcycle: Microcycle,
    pub report: CloneReport,
    pub event: MicrocycleCreatedEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrocycleCreatedEvent {
    pub event_id: EventId,
    pub microcycle_id: MicrocycleId,
    pub mesocycle_id: MesocycleId,
    pub student_id: UserId,
    pub order: u32,
    pub is_deload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied_from: Option<MicrocycleId>,
    pub created_at: Timestamp,
}

domain_event!(
    MicrocycleCreatedEvent,
    event_type = "microcycle.created.v1",
    aggregate_id = microcycle_id,
    aggregate_type = "Microcycle",
    occurred_at = created_at,
    event_id = event_id
);

pub struct CreateMicrocycleHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    microcycle_repository: Arc<dyn MicrocycleRepository>,
    exercise_catalog: Arc<dyn ExerciseCatalog>,
    plan_cache: Arc<dyn PlanCache>,
    event_publisher: Arc<dyn EventPublisher>,
    defaults: CloneDefaults,
    verify_catalog: bool,
}

impl CreateMicrocycleHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        mesocycle_repository: Arc<dyn MesocycleRepository>,
        microcycle_repository: Arc<dyn MicrocycleRepository>,
        exercise_catalog: Arc<dyn ExerciseCatalog>,
        plan_cache: Arc<dyn PlanCache>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let config = CloningConfig::default();
        Self {
            macrocycle_repository,
            mesocycle_repository,
            microcycle_repository,
            exercise_catalog,
            plan_cache,
            event_publisher,
            defaults: config.clone_defaults(),
            verify_catalog: config.verify_catalog_on_clone,
        }
    }

    /// Replaces the built-in defaults with configured ones.
    pub fn with_config(mut self, config: &CloningConfig) -> Self {
        self.defaults = config.clone_defaults();
        self.verify_catalog = config.verify_catalog_on_clone;
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateMicrocycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateMicrocycleResult, PlanError> {
        let (owned, existing) = futures::try_join!(
            load_mesocycle(
                &self.mesocycle_repository,
                &self.macrocycle_repository,
                &cmd.mesocycle_id,
            ),
            async {
                self.microcycle_repository
                    .list_by_mesocycle(&cmd.mesocycle_id)
                    .await
                    .map_err(PlanError::from)
            }
        )?;
        owned.ensure_coach(&metadata)?;

        let request = NewMicrocycle {
            name: cmd.name,
            is_deload: cmd.is_deload,
            copy_from_last: cmd.copy_from_last,
            days_per_week: cmd.days_per_week,
        };
        let outcome = build_microcycle(cmd.mesocycle_id, &request, &existing, &self.defaults)?;

        let dangling_references = if self.verify_catalog && outcome.source.is_copy() {
            self.unresolved_catalog_ids(&outcome.microcycle).await
        } else {
            Vec::new()
        };

        self.microcycle_repository
            .create(&outcome.microcycle)
            .await?;

        let microcycle = outcome.microcycle;
        let report = CloneReport {
            source: outcome.source,
            synthesized_sets: outcome.synthesized_sets,
            dangling_references,
        };
        let student_id = owned.student_id().clone();

        invalidate_student(&self.plan_cache, &student_id).await;

        if let CloneSource::SkeletonNoPreviousMicrocycle = report.source {
            tracing::info!(
                mesocycle_id = %cmd.mesocycle_id,
                "Copy requested with no previous microcycle, created skeleton"
            );
        }
        if !report.synthesized_sets.is_empty() {
            tracing::warn!(
                microcycle_id = %microcycle.id,
                exercises = report.synthesized_sets.len(),
                set_count = self.defaults.set_count,
                "Synthesized default sets for exercises without sets"
            );
        }
        tracing::info!(
            microcycle_id = %microcycle.id,
            mesocycle_id = %microcycle.mesocycle_id,
            order = microcycle.order,
            source = ?report.source,
            "Microcycle created"
        );

        let event = MicrocycleCreatedEvent {
            event_id: EventId::new(),
            microcycle_id: microcycle.id,
            mesocycle_id: microcycle.mesocycle_id,
            student_id,
            order: microcycle.order,
            is_deload: microcycle.is_deload,
            copied_from: match report.source {
                CloneSource::CopiedFrom(id) => Some(id),
                _ => None,
            },
            created_at: microcycle.created_at,
        };
        publish_committed(
            &self.event_publisher,
            envelope_for(&event, &metadata).into_iter().collect(),
        )
        .await;

        Ok(CreateMicrocycleResult {
            microcycle,
            report,
            event,
        })
    }

    /// Catalog ids in the new week that the catalog does not resolve.
    ///
    /// The catalog is outside the plan store's transaction, so an outage here
    /// only costs the report, never the week.
    async fn unresolved_catalog_ids(&self, microcycle: &Microcycle) -> Vec<ExerciseCatalogId> {
        let ids = microcycle.catalog_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        match self.exercise_catalog.find_many(&ids).await {
            Ok(found) => {
                let missing: Vec<ExerciseCatalogId> =
                    ids.into_iter().filter(|id| !found.contains_key(id)).collect();
                for id in &missing {
                    tracing::warn!(
                        catalog_id = %id,
                        microcycle_id = %microcycle.id,
                        "Copied exercise references a missing catalog entry"
                    );
                }
                missing
            }
            Err(e) => {
                tracing::warn!(error = %e, "Exercise catalog unavailable, skipping reference check");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::foundation::MesocycleStatus;
    use crate::domain::plan::{Day, Exercise, Mesocycle, Prescription, TrainingSet};

    fn handler(fx: &Fixture) -> CreateMicrocycleHandler {
        CreateMicrocycleHandler::new(
            fx.macrocycles(),
            fx.mesocycles(),
            fx.microcycles(),
            fx.exercise_catalog(),
            fx.plan_cache(),
            fx.publisher(),
        )
    }

    fn command(mesocycle_id: MesocycleId, copy_from_last: bool) -> CreateMicrocycleCommand {
        CreateMicrocycleCommand {
            mesocycle_id,
            name: String::new(),
            is_deload: false,
            copy_from_last,
            days_per_week: 4,
        }
    }

    async fn seeded(fx: &Fixture) -> Mesocycle {
        let macrocycle = fx.macrocycle().await;
        fx.mesocycle(&macrocycle, MesocycleStatus::Active).await
    }

    fn exercise(catalog: &str, sets: u32) -> Exercise {
        let mut exercise = Exercise::new(
            ExerciseCatalogId::new(catalog).unwrap(),
            1,
            Prescription::default(),
        );
        for order in 1..=sets {
            exercise = exercise.with_set(TrainingSet::prescribed(order, "6", "1", false));
        }
        exercise
    }

    async fn store_week(fx: &Fixture, mesocycle: &Mesocycle, exercises: Vec<Exercise>) -> Microcycle {
        let mut day = Day::new(1, "Pierna", false).unwrap();
        for (i, mut e) in exercises.into_iter().enumerate() {
            e.order = i as u32 + 1;
            day.add_exercise(e).unwrap();
        }
        let week = Microcycle::new(mesocycle.id(), "Semana 1", 1, false, vec![day]);
        fx.microcycles().create(&week).await.unwrap();
        week
    }

    #[tokio::test]
    async fn first_week_gets_order_one_and_default_name() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;

        let result = handler(&fx)
            .handle(command(mesocycle.id(), false), coach_metadata())
            .await
            .unwrap();

        assert_eq!(result.microcycle.order, 1);
        assert_eq!(result.microcycle.name, "Semana 1");
        assert_eq!(result.microcycle.days.len(), 4);
        assert_eq!(result.report.source, CloneSource::Skeleton);
        assert!(result.report.notices().is_empty());
        assert_eq!(fx.store.microcycle_count().await, 1);
    }

    #[tokio::test]
    async fn copy_without_previous_week_reports_skeleton_fallback() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;

        let result = handler(&fx)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap();

        assert_eq!(result.report.source, CloneSource::SkeletonNoPreviousMicrocycle);
        let notices = result.report.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("No previous microcycle"));
    }

    #[tokio::test]
    async fn copy_reports_synthesized_sets() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        let source = store_week(&fx, &mesocycle, vec![exercise("squat", 0), exercise("bench", 2)]).await;

        let result = handler(&fx)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap();

        assert_eq!(result.report.source, CloneSource::CopiedFrom(source.id));
        assert_eq!(result.report.synthesized_sets.len(), 1);
        assert_eq!(result.microcycle.order, 2);
        assert_eq!(result.microcycle.set_count(), 5);
    }

    #[tokio::test]
    async fn dangling_catalog_reference_is_kept_and_reported() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        store_week(&fx, &mesocycle, vec![exercise("squat", 3), exercise("deadlift", 3)]).await;

        let result = handler(&fx)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap();

        let deadlift = ExerciseCatalogId::new("deadlift").unwrap();
        assert_eq!(result.report.dangling_references, vec![deadlift.clone()]);
        assert!(result.microcycle.catalog_ids().contains(&deadlift));
    }

    #[tokio::test]
    async fn reference_check_can_be_disabled() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        store_week(&fx, &mesocycle, vec![exercise("deadlift", 3)]).await;
        let config = CloningConfig {
            verify_catalog_on_clone: false,
            ..CloningConfig::default()
        };

        let result = handler(&fx)
            .with_config(&config)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap();

        assert!(result.report.dangling_references.is_empty());
    }

    #[tokio::test]
    async fn failed_create_leaves_no_week_and_no_event() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        store_week(&fx, &mesocycle, vec![exercise("squat", 3)]).await;
        fx.store.set_fail_writes(true);

        let err = handler(&fx)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::PersistenceFailure(_)));
        assert_eq!(fx.store.microcycle_count().await, 1);
        assert!(!fx.bus.has_event("microcycle.created.v1"));
    }

    #[tokio::test]
    async fn student_cannot_create_weeks() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;

        let err = handler(&fx)
            .handle(command(mesocycle.id(), false), student_metadata())
            .await
            .unwrap_err();

        assert_eq!(err, PlanError::Forbidden);
    }

    #[tokio::test]
    async fn days_per_week_out_of_range_is_invalid_argument() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        let mut cmd = command(mesocycle.id(), false);
        cmd.days_per_week = 8;

        let err = handler(&fx).handle(cmd, coach_metadata()).await.unwrap_err();

        assert!(matches!(err, PlanError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn publishes_created_event_with_copy_source() {
        let fx = Fixture::new();
        let mesocycle = seeded(&fx).await;
        let source = store_week(&fx, &mesocycle, vec![exercise("row", 3)]).await;

        let result = handler(&fx)
            .handle(command(mesocycle.id(), true), coach_metadata())
            .await
            .unwrap();

        assert_eq!(result.event.copied_from, Some(source.id));
        let events = fx.bus.events_of_type("microcycle.created.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, result.microcycle.id.to_string());
    }
}
