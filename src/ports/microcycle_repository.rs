//! Microcycle repository port.
//!
//! A microcycle is stored and loaded as its whole Day → Exercise → Set tree.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MesocycleId, MicrocycleId};
use crate::domain::plan::{Microcycle, TrainingSet};

#[async_trait]
pub trait MicrocycleRepository: Send + Sync {
    /// Insert a microcycle together with its full tree.
    ///
    /// On failure nothing of the microcycle is visible to readers.
    ///
    /// # Errors
    ///
    /// - `MesocycleNotFound` if the parent does not exist
    /// - `PersistenceFailure` on storage failure
    async fn create(&self, microcycle: &Microcycle) -> Result<(), DomainError>;

    /// Loads the fully nested tree. Returns `None` if not found.
    async fn find_by_id(&self, id: &MicrocycleId) -> Result<Option<Microcycle>, DomainError>;

    /// All microcycles of a mesocycle with their trees, in no particular order.
    async fn list_by_mesocycle(
        &self,
        mesocycle_id: &MesocycleId,
    ) -> Result<Vec<Microcycle>, DomainError>;

    /// Overwrite the logged fields of one set.
    ///
    /// # Errors
    ///
    /// - `MicrocycleNotFound` / `SetNotFound` if either id does not resolve
    /// - `PersistenceFailure` on storage failure
    async fn save_set_log(
        &self,
        microcycle_id: &MicrocycleId,
        set: &TrainingSet,
    ) -> Result<(), DomainError>;
}
