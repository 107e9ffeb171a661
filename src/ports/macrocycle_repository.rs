//! Macrocycle repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MacrocycleId, UserId};
use crate::domain::plan::Macrocycle;

/// Persistence for Macrocycle aggregates.
#[async_trait]
pub trait MacrocycleRepository: Send + Sync {
    /// Insert a new macrocycle.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailure` on storage failure
    async fn save(&self, macrocycle: &Macrocycle) -> Result<(), DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MacrocycleId) -> Result<Option<Macrocycle>, DomainError>;

    /// All macrocycles of a student, oldest first.
    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Macrocycle>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macrocycle_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MacrocycleRepository) {}
    }
}
