//! Mesocycle repository port.
//!
//! Status changes go through [`MesocycleRepository::apply_status_changes`]
//! so an activation and the supersession it causes land in one transaction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MacrocycleId, MesocycleId, MesocycleStatus, UserId};
use crate::domain::plan::Mesocycle;

/// One status write inside a batch.
///
/// `expected` is the status the caller read. A store rejects the whole
/// batch if the current status differs, which is how a concurrent writer
/// is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub mesocycle_id: MesocycleId,
    pub expected: MesocycleStatus,
    pub status: MesocycleStatus,
}

impl StatusChange {
    pub fn new(mesocycle_id: MesocycleId, expected: MesocycleStatus, status: MesocycleStatus) -> Self {
        Self {
            mesocycle_id,
            expected,
            status,
        }
    }
}

/// Persistence for Mesocycle aggregates.
///
/// Implementations must ensure:
/// - `apply_status_changes` is all-or-nothing
/// - a batch that would leave a student with two active mesocycles is
///   rejected with `InvariantViolation`
#[async_trait]
pub trait MesocycleRepository: Send + Sync {
    /// Insert a new mesocycle.
    ///
    /// # Errors
    ///
    /// - `MacrocycleNotFound` if the parent does not exist
    /// - `PersistenceFailure` on storage failure
    async fn save(&self, mesocycle: &Mesocycle) -> Result<(), DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MesocycleId) -> Result<Option<Mesocycle>, DomainError>;

    async fn find_by_macrocycle(
        &self,
        macrocycle_id: &MacrocycleId,
    ) -> Result<Vec<Mesocycle>, DomainError>;

    /// Every mesocycle of every macrocycle of the student, any status.
    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Mesocycle>, DomainError>;

    /// Mesocycles of the student currently `active`. More than one entry
    /// means the store is already corrupt.
    async fn find_active_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Mesocycle>, DomainError>;

    /// Apply several status writes atomically.
    ///
    /// # Errors
    ///
    /// - `MesocycleNotFound` if any id does not resolve
    /// - `InvariantViolation` if an `expected` status is stale, or the batch
    ///   would leave two active mesocycles for one student
    /// - `PersistenceFailure` on storage failure; nothing is applied
    async fn apply_status_changes(&self, changes: &[StatusChange]) -> Result<(), DomainError>;
}
