//! ExerciseCatalog port - read-only lookups into the external exercise catalog.
//!
//! The catalog is outside the plan's transactional control: entries can
//! disappear after an exercise was prescribed. Callers treat a missing entry
//! as a dangling reference, never as a hard failure.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ExerciseCatalogId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: ExerciseCatalogId,
    pub name: String,
    /// Blank when the catalog has no group for this movement.
    #[serde(default)]
    pub muscle_group: String,
}

#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Returns `None` if the id no longer resolves.
    async fn find(&self, id: &ExerciseCatalogId) -> Result<Option<CatalogEntry>, DomainError>;

    /// Batch lookup. Ids that do not resolve are simply absent from the map.
    async fn find_many(
        &self,
        ids: &[ExerciseCatalogId],
    ) -> Result<HashMap<ExerciseCatalogId, CatalogEntry>, DomainError>;
}
