//! In-memory plan store.
//!
//! One store backs all three plan repositories so multi-aggregate writes
//! (status batches) run under a single lock, the way a database
//! transaction would. A batch stages copies of the mesocycles it touches and
//! writes them back only when every check passes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, ErrorCode, MacrocycleId, MesocycleId, MicrocycleId, UserId,
};
use crate::domain::plan::{Macrocycle, Mesocycle, Microcycle, TrainingSet};
use crate::ports::{MacrocycleRepository, MesocycleRepository, MicrocycleRepository, StatusChange};

#[derive(Debug, Default)]
struct PlanState {
    macrocycles: HashMap<MacrocycleId, Macrocycle>,
    mesocycles: HashMap<MesocycleId, Mesocycle>,
    microcycles: HashMap<MicrocycleId, Microcycle>,
}

impl PlanState {
    fn student_of(&self, mesocycle: &Mesocycle) -> Option<&UserId> {
        self.macrocycles
            .get(&mesocycle.macrocycle_id())
            .map(|m| m.student_id())
    }

    fn mesocycles_of_student<'a>(
        &'a self,
        student_id: &'a UserId,
    ) -> impl Iterator<Item = &'a Mesocycle> + 'a {
        self.mesocycles
            .values()
            .filter(move |m| self.student_of(m) == Some(student_id))
    }

    /// Active mesocycles of the student once `staged` replaces the stored copies.
    fn active_count_with(
        &self,
        student_id: &UserId,
        staged: &HashMap<MesocycleId, Mesocycle>,
    ) -> usize {
        let stored = self
            .mesocycles_of_student(student_id)
            .filter(|m| !staged.contains_key(&m.id()))
            .filter(|m| m.is_active())
            .count();
        let pending = staged
            .values()
            .filter(|m| self.student_of(m) == Some(student_id))
            .filter(|m| m.is_active())
            .count();
        stored + pending
    }
}

fn mesocycle_not_found(id: &MesocycleId) -> DomainError {
    DomainError::new(ErrorCode::MesocycleNotFound, format!("Mesocycle not found: {}", id))
        .with_detail("id", id.to_string())
}

fn too_many_active(student_id: &UserId, active: usize) -> DomainError {
    DomainError::new(
        ErrorCode::InvariantViolation,
        format!(
            "write would leave student {} with {} active mesocycles",
            student_id, active
        ),
    )
}

/// Switches for simulating storage failures in tests.
#[derive(Debug, Default)]
struct FaultInjection {
    fail_writes: AtomicBool,
    /// Fails a status batch after its first change has been staged.
    fail_mid_batch: AtomicBool,
}

#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    state: RwLock<PlanState>,
    faults: FaultInjection,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails with `PersistenceFailure` while set.
    pub fn set_fail_writes(&self, fail: bool) {
        self.faults.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_mid_batch(&self, fail: bool) {
        self.faults.fail_mid_batch.store(fail, Ordering::SeqCst);
    }

    /// Inserts a microcycle bypassing validation, for seeding legacy data.
    pub async fn insert_microcycle_unchecked(&self, microcycle: Microcycle) {
        self.state
            .write()
            .await
            .microcycles
            .insert(microcycle.id, microcycle);
    }

    pub async fn microcycle_count(&self) -> usize {
        self.state.read().await.microcycles.len()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.faults.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("plan store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MacrocycleRepository for InMemoryPlanStore {
    async fn save(&self, macrocycle: &Macrocycle) -> Result<(), DomainError> {
        self.check_writable()?;
        self.state
            .write()
            .await
            .macrocycles
            .insert(macrocycle.id(), macrocycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MacrocycleId) -> Result<Option<Macrocycle>, DomainError> {
        Ok(self.state.read().await.macrocycles.get(id).cloned())
    }

    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Macrocycle>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<Macrocycle> = state
            .macrocycles
            .values()
            .filter(|m| m.belongs_to_student(student_id))
            .cloned()
            .collect();
        found.sort_by_key(|m| m.created_at());
        Ok(found)
    }
}

#[async_trait]
impl MesocycleRepository for InMemoryPlanStore {
    async fn save(&self, mesocycle: &Mesocycle) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        if !state.macrocycles.contains_key(&mesocycle.macrocycle_id()) {
            return Err(DomainError::new(
                ErrorCode::MacrocycleNotFound,
                format!("Macrocycle not found: {}", mesocycle.macrocycle_id()),
            )
            .with_detail("id", mesocycle.macrocycle_id().to_string()));
        }
        if mesocycle.is_active() {
            let staged = HashMap::from([(mesocycle.id(), mesocycle.clone())]);
            if let Some(student_id) = state.student_of(mesocycle) {
                let active = state.active_count_with(student_id, &staged);
                if active > 1 {
                    return Err(too_many_active(student_id, active));
                }
            }
        }
        state.mesocycles.insert(mesocycle.id(), mesocycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MesocycleId) -> Result<Option<Mesocycle>, DomainError> {
        Ok(self.state.read().await.mesocycles.get(id).cloned())
    }

    async fn find_by_macrocycle(
        &self,
        macrocycle_id: &MacrocycleId,
    ) -> Result<Vec<Mesocycle>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<Mesocycle> = state
            .mesocycles
            .values()
            .filter(|m| m.macrocycle_id() == *macrocycle_id)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.created_at());
        Ok(found)
    }

    async fn find_by_student(&self, student_id: &UserId) -> Result<Vec<Mesocycle>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<Mesocycle> = state.mesocycles_of_student(student_id).cloned().collect();
        found.sort_by_key(|m| m.created_at());
        Ok(found)
    }

    async fn find_active_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Mesocycle>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .mesocycles_of_student(student_id)
            .filter(|m| m.is_active())
            .cloned()
            .collect())
    }

    async fn apply_status_changes(&self, changes: &[StatusChange]) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let mut staged: HashMap<MesocycleId, Mesocycle> = HashMap::new();
        let mut students: HashSet<UserId> = HashSet::new();

        for (i, change) in changes.iter().enumerate() {
            if i == 1 && self.faults.fail_mid_batch.load(Ordering::SeqCst) {
                return Err(DomainError::persistence(
                    "plan store connection lost during status batch",
                ));
            }

            let mesocycle = match staged.entry(change.mesocycle_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let stored = state
                        .mesocycles
                        .get(&change.mesocycle_id)
                        .cloned()
                        .ok_or_else(|| mesocycle_not_found(&change.mesocycle_id))?;
                    entry.insert(stored)
                }
            };

            if mesocycle.status() != change.expected {
                return Err(DomainError::new(
                    ErrorCode::InvariantViolation,
                    format!(
                        "mesocycle {} changed concurrently: expected '{}', found '{}'",
                        change.mesocycle_id,
                        change.expected,
                        mesocycle.status()
                    ),
                ));
            }
            if change.status != change.expected {
                mesocycle.change_status(change.status).map_err(|e| {
                    DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                })?;
            }

            if let Some(student) = state.student_of(mesocycle) {
                students.insert(student.clone());
            }
        }

        for student in &students {
            let active = state.active_count_with(student, &staged);
            if active > 1 {
                return Err(too_many_active(student, active));
            }
        }

        state.mesocycles.extend(staged);
        Ok(())
    }
}

#[async_trait]
impl MicrocycleRepository for InMemoryPlanStore {
    async fn create(&self, microcycle: &Microcycle) -> Result<(), DomainError> {
        self.check_writable()?;
        microcycle.validate()?;
        let mut state = self.state.write().await;
        if !state.mesocycles.contains_key(&microcycle.mesocycle_id) {
            return Err(mesocycle_not_found(&microcycle.mesocycle_id));
        }
        state.microcycles.insert(microcycle.id, microcycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MicrocycleId) -> Result<Option<Microcycle>, DomainError> {
        Ok(self.state.read().await.microcycles.get(id).cloned())
    }

    async fn list_by_mesocycle(
        &self,
        mesocycle_id: &MesocycleId,
    ) -> Result<Vec<Microcycle>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .microcycles
            .values()
            .filter(|m| m.mesocycle_id == *mesocycle_id)
            .cloned()
            .collect())
    }

    async fn save_set_log(
        &self,
        microcycle_id: &MicrocycleId,
        set: &TrainingSet,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let microcycle = state.microcycles.get_mut(microcycle_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::MicrocycleNotFound,
                format!("Microcycle not found: {}", microcycle_id),
            )
            .with_detail("id", microcycle_id.to_string())
        })?;
        let stored = microcycle.find_set_mut(&set.id).ok_or_else(|| {
            DomainError::new(ErrorCode::SetNotFound, format!("Set not found: {}", set.id))
                .with_detail("id", set.id.to_string())
        })?;
        stored.actual_rir = set.actual_rir;
        stored.actual_reps = set.actual_reps;
        stored.completed_at = set.completed_at;
        Ok(())
    }
}
