//! In-memory exercise catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ExerciseCatalogId};
use crate::ports::{CatalogEntry, ExerciseCatalog};

#[derive(Debug, Default)]
pub struct InMemoryExerciseCatalog {
    entries: RwLock<HashMap<ExerciseCatalogId, CatalogEntry>>,
}

impl InMemoryExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().map(|e| (e.id.clone(), e)).collect()),
        }
    }

    pub async fn insert(&self, entry: CatalogEntry) {
        self.entries.write().await.insert(entry.id.clone(), entry);
    }

    /// Simulates the catalog deleting a movement.
    pub async fn remove(&self, id: &ExerciseCatalogId) {
        self.entries.write().await.remove(id);
    }
}

#[async_trait]
impl ExerciseCatalog for InMemoryExerciseCatalog {
    async fn find(&self, id: &ExerciseCatalogId) -> Result<Option<CatalogEntry>, DomainError> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn find_many(
        &self,
        ids: &[ExerciseCatalogId],
    ) -> Result<HashMap<ExerciseCatalogId, CatalogEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| entries.get(id).map(|e| (id.clone(), e.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, group: &str) -> CatalogEntry {
        CatalogEntry {
            id: ExerciseCatalogId::new(id).unwrap(),
            name: id.to_uppercase(),
            muscle_group: group.to_string(),
        }
    }

    #[tokio::test]
    async fn find_many_skips_unknown_ids() {
        let catalog = InMemoryExerciseCatalog::with_entries(vec![entry("squat", "Cuádriceps")]);
        let ids = vec![
            ExerciseCatalogId::new("squat").unwrap(),
            ExerciseCatalogId::new("gone").unwrap(),
        ];

        let found = catalog.find_many(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&ids[0]].muscle_group, "Cuádriceps");
    }

    #[tokio::test]
    async fn removed_entry_no_longer_resolves() {
        let catalog = InMemoryExerciseCatalog::new();
        catalog.insert(entry("row", "Espalda")).await;
        let id = ExerciseCatalogId::new("row").unwrap();
        assert!(catalog.find(&id).await.unwrap().is_some());

        catalog.remove(&id).await;
        assert!(catalog.find(&id).await.unwrap().is_none());
    }
}
