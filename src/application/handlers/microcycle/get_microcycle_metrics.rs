//! GetMicrocycleMetricsHandler - progress and volume for one week.

use std::sync::Arc;

use crate::application::handlers::access::{load_mesocycle, load_microcycle};
use crate::config::MetricsConfig;
use crate::domain::foundation::{CommandMetadata, MicrocycleId};
use crate::domain::metrics::{
    compute_microcycle_metrics, MicrocycleMetrics, MuscleGroupIndex, MuscleGroupVolume,
};
use crate::domain::plan::{Microcycle, PlanError};
use crate::ports::{
    ExerciseCatalog, MacrocycleRepository, MesocycleRepository, MicrocycleRepository, PlanCache,
    PlanCacheKey,
};

#[derive(Debug, Clone)]
pub struct GetMicrocycleMetricsQuery {
    pub microcycle_id: MicrocycleId,
}

#[derive(Debug, Clone)]
pub struct GetMicrocycleMetricsResult {
    pub metrics: MicrocycleMetrics,
    pub top_muscle_groups: Vec<MuscleGroupVolume>,
    pub from_cache: bool,
}

pub struct GetMicrocycleMetricsHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    microcycle_repository: Arc<dyn MicrocycleRepository>,
    exercise_catalog: Arc<dyn ExerciseCatalog>,
    plan_cache: Arc<dyn PlanCache>,
    config: MetricsConfig,
}

impl GetMicrocycleMetricsHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        mesocycle_repository: Arc<dyn MesocycleRepository>,
        microcycle_repository: Arc<dyn MicrocycleRepository>,
        exercise_catalog: Arc<dyn ExerciseCatalog>,
        plan_cache: Arc<dyn PlanCache>,
    ) -> Self {
        Self {
            macrocycle_repository,
            mesocycle_repository,
            microcycle_repository,
            exercise_catalog,
            plan_cache,
            config: MetricsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: &MetricsConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub async fn handle(
        &self,
        query: GetMicrocycleMetricsQuery,
        metadata: CommandMetadata,
    ) -> Result<GetMicrocycleMetricsResult, PlanError> {
        let microcycle = load_microcycle(&self.microcycle_repository, &query.microcycle_id).await?;
        let owned = load_mesocycle(
            &self.mesocycle_repository,
            &self.macrocycle_repository,
            &microcycle.mesocycle_id,
        )
        .await?;
        owned.ensure_reader(&metadata)?;

        let key = PlanCacheKey::microcycle_metrics(owned.student_id().clone(), microcycle.id);
        if let Some(metrics) = self.cached(&key).await {
            return Ok(self.result(metrics, true));
        }

        let (index, complete) = self.muscle_groups(&microcycle).await;
        let metrics = compute_microcycle_metrics(&microcycle, &index);

        if complete {
            match serde_json::to_value(&metrics) {
                Ok(value) => {
                    if let Err(e) = self.plan_cache.put(key, value).await {
                        tracing::warn!(error = %e, "Failed to cache microcycle metrics");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Failed to serialize microcycle metrics"),
            }
        }

        Ok(self.result(metrics, false))
    }

    fn result(&self, metrics: MicrocycleMetrics, from_cache: bool) -> GetMicrocycleMetricsResult {
        let top_muscle_groups = metrics.top_muscle_groups(self.config.top_muscle_groups);
        GetMicrocycleMetricsResult {
            metrics,
            top_muscle_groups,
            from_cache,
        }
    }

    /// Resolves every catalog id of the week in one batch. The flag is false
    /// when the catalog could not be reached and every group fell back.
    async fn muscle_groups(&self, microcycle: &Microcycle) -> (MuscleGroupIndex, bool) {
        let mut index = MuscleGroupIndex::new(self.config.unresolved_muscle_group_label.clone());
        let ids = microcycle.catalog_ids();
        if ids.is_empty() {
            return (index, true);
        }
        match self.exercise_catalog.find_many(&ids).await {
            Ok(entries) => {
                for (id, entry) in entries {
                    index.insert(id, entry.muscle_group);
                }
                (index, true)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    microcycle_id = %microcycle.id,
                    "Exercise catalog unavailable, muscle groups left unresolved"
                );
                (index, false)
            }
        }
    }

    async fn cached(&self, key: &PlanCacheKey) -> Option<MicrocycleMetrics> {
        match self.plan_cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(metrics) => {
                    tracing::debug!(key = %key, "Plan cache hit");
                    Some(metrics)
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "Plan cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Plan cache read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::foundation::{
        DomainError, ErrorCode, ExerciseCatalogId, MesocycleStatus,
    };
    use crate::domain::plan::{Day, Exercise, Mesocycle, Prescription, TrainingSet};
    use crate::ports::CatalogEntry;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct OfflineCatalog;

    #[async_trait]
    impl ExerciseCatalog for OfflineCatalog {
        async fn find(&self, _id: &ExerciseCatalogId) -> Result<Option<CatalogEntry>, DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "catalog offline"))
        }

        async fn find_many(
            &self,
            _ids: &[ExerciseCatalogId],
        ) -> Result<HashMap<ExerciseCatalogId, CatalogEntry>, DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "catalog offline"))
        }
    }

    fn handler(fx: &Fixture) -> GetMicrocycleMetricsHandler {
        GetMicrocycleMetricsHandler::new(
            fx.macrocycles(),
            fx.mesocycles(),
            fx.microcycles(),
            fx.exercise_catalog(),
            fx.plan_cache(),
        )
    }

    fn exercise(catalog: &str, order: u32, sets: u32, completed: u32) -> Exercise {
        let mut exercise = Exercise::new(
            ExerciseCatalogId::new(catalog).unwrap(),
            order,
            Prescription::default(),
        );
        for i in 1..=sets {
            let mut set = TrainingSet::prescribed(i, "8", "2", false);
            if i <= completed {
                set.record_log(Some(2.0), Some(8), true).unwrap();
            }
            exercise = exercise.with_set(set);
        }
        exercise
    }

    async fn week(fx: &Fixture) -> (Mesocycle, Microcycle) {
        week_with_status(fx, MesocycleStatus::Active).await
    }

    async fn week_with_status(fx: &Fixture, status: MesocycleStatus) -> (Mesocycle, Microcycle) {
        let macrocycle = fx.macrocycle().await;
        let mesocycle = fx.mesocycle(&macrocycle, status).await;
        let mut day = Day::new(1, "Día 1", false).unwrap();
        day.add_exercise(exercise("squat", 1, 4, 4)).unwrap();
        day.add_exercise(exercise("bench", 2, 3, 2)).unwrap();
        day.add_exercise(exercise("unknown", 3, 3, 0)).unwrap();
        let microcycle = Microcycle::new(mesocycle.id(), "Semana 1", 1, false, vec![day]);
        fx.microcycles().create(&microcycle).await.unwrap();
        (mesocycle, microcycle)
    }

    fn query(microcycle: &Microcycle) -> GetMicrocycleMetricsQuery {
        GetMicrocycleMetricsQuery {
            microcycle_id: microcycle.id,
        }
    }

    #[tokio::test]
    async fn computes_progress_and_groups() {
        let fx = Fixture::new();
        let (_, microcycle) = week(&fx).await;

        let result = handler(&fx)
            .handle(query(&microcycle), student_metadata())
            .await
            .unwrap();

        assert_eq!(result.metrics.total_series, 10);
        assert_eq!(result.metrics.completed_series, 6);
        assert_eq!(result.metrics.progress_percent, 60);
        assert_eq!(result.metrics.series_by_muscle_group["Cuádriceps"], 4);
        assert_eq!(result.metrics.series_by_muscle_group["Sin grupo"], 3);
        assert_eq!(result.top_muscle_groups[0].muscle_group, "Cuádriceps");
        assert!(!result.from_cache);
    }

    #[tokio::test]
    async fn second_read_hits_cache() {
        let fx = Fixture::new();
        let (_, microcycle) = week(&fx).await;
        let handler = handler(&fx);

        handler.handle(query(&microcycle), coach_metadata()).await.unwrap();
        let again = handler.handle(query(&microcycle), coach_metadata()).await.unwrap();

        assert!(again.from_cache);
        assert_eq!(again.metrics.progress_percent, 60);
    }

    #[tokio::test]
    async fn ranking_length_follows_config() {
        let fx = Fixture::new();
        let (_, microcycle) = week(&fx).await;
        let config = MetricsConfig {
            top_muscle_groups: 2,
            ..MetricsConfig::default()
        };

        let result = handler(&fx)
            .with_config(&config)
            .handle(query(&microcycle), student_metadata())
            .await
            .unwrap();

        assert_eq!(result.top_muscle_groups.len(), 2);
    }

    #[tokio::test]
    async fn catalog_outage_degrades_labels_and_skips_cache() {
        let fx = Fixture::new();
        let (_, microcycle) = week(&fx).await;
        let handler = GetMicrocycleMetricsHandler::new(
            fx.macrocycles(),
            fx.mesocycles(),
            fx.microcycles(),
            Arc::new(OfflineCatalog),
            fx.plan_cache(),
        );

        let result = handler
            .handle(query(&microcycle), student_metadata())
            .await
            .unwrap();

        assert_eq!(result.metrics.series_by_muscle_group.len(), 1);
        assert_eq!(result.metrics.series_by_muscle_group["Sin grupo"], 10);
        assert!(fx.cache.is_empty().await);
    }

    #[tokio::test]
    async fn strangers_cannot_read_metrics() {
        let fx = Fixture::new();
        let (_, microcycle) = week(&fx).await;

        let err = handler(&fx)
            .handle(query(&microcycle), stranger_metadata())
            .await
            .unwrap_err();

        assert_eq!(err, PlanError::Forbidden);
    }

    #[tokio::test]
    async fn student_cannot_read_metrics_of_a_draft_week() {
        let fx = Fixture::new();
        let (_, microcycle) = week_with_status(&fx, MesocycleStatus::Draft).await;

        let err = handler(&fx)
            .handle(query(&microcycle), student_metadata())
            .await
            .unwrap_err();

        assert_eq!(err, PlanError::Forbidden);
        assert!(fx.cache.is_empty().await);
    }

    #[tokio::test]
    async fn coach_reads_metrics_of_a_draft_week() {
        let fx = Fixture::new();
        let (_, microcycle) = week_with_status(&fx, MesocycleStatus::Draft).await;

        let result = handler(&fx)
            .handle(query(&microcycle), coach_metadata())
            .await
            .unwrap();

        assert_eq!(result.metrics.progress_percent, 60);
    }

    #[tokio::test]
    async fn unknown_microcycle_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(
                GetMicrocycleMetricsQuery {
                    microcycle_id: MicrocycleId::new(),
                },
                student_metadata(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::NotFound { .. }));
    }
}
