//! PlanCache port - explicit, injected cache for student read paths.
//!
//! Keys are declared up front and always scoped to one student, so a write
//! to that student's plan can drop everything derived from it in one call.
//! Values are stored as JSON so adapters need not know the cached types.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::fmt;

use crate::domain::foundation::{DomainError, MicrocycleId, UserId};

/// What a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheResource {
    /// Output of the student's visibility-filtered mesocycle list.
    VisibleMesocycles,
    MicrocycleMetrics(MicrocycleId),
}

impl fmt::Display for CacheResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheResource::VisibleMesocycles => write!(f, "visible_mesocycles"),
            CacheResource::MicrocycleMetrics(id) => write!(f, "microcycle_metrics:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanCacheKey {
    pub student_id: UserId,
    pub resource: CacheResource,
}

impl PlanCacheKey {
    pub fn visible_mesocycles(student_id: UserId) -> Self {
        Self {
            student_id,
            resource: CacheResource::VisibleMesocycles,
        }
    }

    pub fn microcycle_metrics(student_id: UserId, microcycle_id: MicrocycleId) -> Self {
        Self {
            student_id,
            resource: CacheResource::MicrocycleMetrics(microcycle_id),
        }
    }
}

impl fmt::Display for PlanCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student:{}:{}", self.student_id, self.resource)
    }
}

/// Cache failures are never fatal to callers; handlers log and fall
/// through to the store.
#[async_trait]
pub trait PlanCache: Send + Sync {
    /// Returns `None` on a miss or an expired entry.
    async fn get(&self, key: &PlanCacheKey) -> Result<Option<JsonValue>, DomainError>;

    async fn put(&self, key: PlanCacheKey, value: JsonValue) -> Result<(), DomainError>;

    /// Drop every entry belonging to the student.
    async fn invalidate_student(&self, student_id: &UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_cache_is_object_safe() {
        fn _accepts_dyn(_cache: &dyn PlanCache) {}
    }

    #[test]
    fn key_display_is_scoped_by_student() {
        let student = UserId::new("student-7").unwrap();
        let key = PlanCacheKey::visible_mesocycles(student);
        assert_eq!(key.to_string(), "student:student-7:visible_mesocycles");
    }
}
