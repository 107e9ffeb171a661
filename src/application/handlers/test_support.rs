//! Shared fixtures for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::adapters::{InMemoryEventBus, InMemoryExerciseCatalog, InMemoryPlanCache, InMemoryPlanStore};
use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, ExerciseCatalogId, MesocycleStatus,
    TrainingObjective, UserId,
};
use crate::domain::plan::{Macrocycle, Mesocycle};
use crate::ports::{
    CatalogEntry, EventPublisher, ExerciseCatalog, MacrocycleRepository, MesocycleRepository,
    MicrocycleRepository, PlanCache, PlanCacheKey,
};

pub fn coach() -> UserId {
    UserId::new("coach-1").unwrap()
}

pub fn student() -> UserId {
    UserId::new("student-1").unwrap()
}

pub fn coach_metadata() -> CommandMetadata {
    CommandMetadata::new(coach()).with_correlation_id("corr-1")
}

pub fn student_metadata() -> CommandMetadata {
    CommandMetadata::new(student())
}

pub fn stranger_metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("someone-else").unwrap())
}

pub fn catalog_entry(id: &str, group: &str) -> CatalogEntry {
    CatalogEntry {
        id: ExerciseCatalogId::new(id).unwrap(),
        name: id.to_string(),
        muscle_group: group.to_string(),
    }
}

/// Wiring of every in-memory adapter behind the port trait objects.
pub struct Fixture {
    pub store: Arc<InMemoryPlanStore>,
    pub catalog: Arc<InMemoryExerciseCatalog>,
    pub cache: Arc<InMemoryPlanCache>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryPlanStore::new()),
            catalog: Arc::new(InMemoryExerciseCatalog::with_entries(vec![
                catalog_entry("squat", "Cuádriceps"),
                catalog_entry("bench", "Pecho"),
                catalog_entry("row", "Espalda"),
            ])),
            cache: Arc::new(InMemoryPlanCache::new(std::time::Duration::from_secs(60), 100)),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub fn macrocycles(&self) -> Arc<dyn MacrocycleRepository> {
        self.store.clone()
    }

    pub fn mesocycles(&self) -> Arc<dyn MesocycleRepository> {
        self.store.clone()
    }

    pub fn microcycles(&self) -> Arc<dyn MicrocycleRepository> {
        self.store.clone()
    }

    pub fn exercise_catalog(&self) -> Arc<dyn ExerciseCatalog> {
        self.catalog.clone()
    }

    pub fn plan_cache(&self) -> Arc<dyn PlanCache> {
        self.cache.clone()
    }

    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.bus.clone()
    }

    pub async fn macrocycle(&self) -> Macrocycle {
        let macrocycle = Macrocycle::new(
            student(),
            coach(),
            "Temporada 2026",
            TrainingObjective::Hypertrophy,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        )
        .unwrap();
        MacrocycleRepository::save(self.store.as_ref(), &macrocycle)
            .await
            .unwrap();
        macrocycle
    }

    pub async fn mesocycle(&self, macrocycle: &Macrocycle, status: MesocycleStatus) -> Mesocycle {
        let mut mesocycle =
            Mesocycle::new(macrocycle.id(), "Acumulación", TrainingObjective::Hypertrophy).unwrap();
        if status != MesocycleStatus::Draft {
            mesocycle.change_status(status).unwrap();
        }
        MesocycleRepository::save(self.store.as_ref(), &mesocycle)
            .await
            .unwrap();
        mesocycle
    }
}

/// Cache whose every operation fails.
pub struct BrokenCache;

#[async_trait]
impl PlanCache for BrokenCache {
    async fn get(&self, _key: &PlanCacheKey) -> Result<Option<JsonValue>, DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache offline"))
    }

    async fn put(&self, _key: PlanCacheKey, _value: JsonValue) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache offline"))
    }

    async fn invalidate_student(&self, _student_id: &UserId) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache offline"))
    }
}
