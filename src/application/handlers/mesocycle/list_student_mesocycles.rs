//! ListStudentMesocyclesHandler - the student-facing plan list.
//!
//! Drafts never leave this handler: the store returns every mesocycle and
//! the visibility filter is applied before anything is cached or returned.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::plan::{visible_to_student, Mesocycle, PlanError};
use crate::ports::{MacrocycleRepository, MesocycleRepository, PlanCache, PlanCacheKey};

#[derive(Debug, Clone)]
pub struct ListStudentMesocyclesQuery {
    pub student_id: UserId,
}

#[derive(Debug, Clone)]
pub struct ListStudentMesocyclesResult {
    pub mesocycles: Vec<Mesocycle>,
    pub from_cache: bool,
}

pub struct ListStudentMesocyclesHandler {
    macrocycle_repository: Arc<dyn MacrocycleRepository>,
    mesocycle_repository: Arc<dyn MesocycleRepository>,
    plan_cache: Arc<dyn PlanCache>,
}

impl ListStudentMesocyclesHandler {
    pub fn new(
        macrocycle_repository: Arc<dyn MacrocycleRepository>,
        mesocycle_repository: Arc<dyn MesocycleRepository>,
        plan_cache: Arc<dyn PlanCache>,
    ) -> Self {
        Self {
            macrocycle_repository,
            mesocycle_repository,
            plan_cache,
        }
    }

    pub async fn handle(
        &self,
        query: ListStudentMesocyclesQuery,
        metadata: CommandMetadata,
    ) -> Result<ListStudentMesocyclesResult, PlanError> {
        self.ensure_can_read(&query.student_id, &metadata).await?;

        let key = PlanCacheKey::visible_mesocycles(query.student_id.clone());
        if let Some(mesocycles) = self.cached(&key).await {
            return Ok(ListStudentMesocyclesResult {
                mesocycles,
                from_cache: true,
            });
        }

        let all = self
            .mesocycle_repository
            .find_by_student(&query.student_id)
            .await?;
        let mesocycles = visible_to_student(&all);

        match serde_json::to_value(&mesocycles) {
            Ok(value) => {
                if let Err(e) = self.plan_cache.put(key, value).await {
                    tracing::warn!(error = %e, "Failed to cache visible mesocycles");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize visible mesocycles"),
        }

        Ok(ListStudentMesocyclesResult {
            mesocycles,
            from_cache: false,
        })
    }

    async fn ensure_can_read(
        &self,
        student_id: &UserId,
        metadata: &CommandMetadata,
    ) -> Result<(), PlanError> {
        if &metadata.user_id == student_id {
            return Ok(());
        }
        let macrocycles = self.macrocycle_repository.find_by_student(student_id).await?;
        if macrocycles.iter().any(|m| m.is_coached_by(&metadata.user_id)) {
            Ok(())
        } else {
            Err(PlanError::Forbidden)
        }
    }

    /// A cache error or an undecodable entry counts as a miss.
    async fn cached(&self, key: &PlanCacheKey) -> Option<Vec<Mesocycle>> {
        match self.plan_cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(mesocycles) => {
                    tracing::debug!(key = %key, "Plan cache hit");
                    Some(mesocycles)
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
