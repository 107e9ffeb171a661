//! Macrocycle aggregate - a student's top-level training plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    MacrocycleId, Timestamp, TrainingObjective, UserId, ValidationError,
};

/// Top-level training block for one student, authored by their coach.
///
/// Owns the student's mesocycles. Never deleted while mesocycles exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macrocycle {
    id: MacrocycleId,
    student_id: UserId,
    coach_id: UserId,
    name: String,
    objective: TrainingObjective,
    start_date: NaiveDate,
    created_at: Timestamp,
}

impl Macrocycle {
    /// Creates a new macrocycle for a student.
    pub fn new(
        student_id: UserId,
        coach_id: UserId,
        name: impl Into<String>,
        objective: TrainingObjective,
        start_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: MacrocycleId::new(),
            student_id,
            coach_id,
            name: name.trim().to_string(),
            objective,
            start_date,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitutes a macrocycle from persisted data.
    pub fn reconstitute(
        id: MacrocycleId,
        student_id: UserId,
        coach_id: UserId,
        name: String,
        objective: TrainingObjective,
        start_date: NaiveDate,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            student_id,
            coach_id,
            name,
            objective,
            start_date,
            created_at,
        }
    }

    pub fn id(&self) -> MacrocycleId {
        self.id
    }

    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    pub fn coach_id(&self) -> &UserId {
        &self.coach_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objective(&self) -> TrainingObjective {
        self.objective
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true if `user` is the coach who owns this plan.
    pub fn is_coached_by(&self, user: &UserId) -> bool {
        &self.coach_id == user
    }

    /// Returns true if `user` is the student this plan is for.
    pub fn belongs_to_student(&self, user: &UserId) -> bool {
        &self.student_id == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[test]
    fn new_trims_name_and_records_owners() {
        let macro_ = Macrocycle::new(
            UserId::new("student-1").unwrap(),
            UserId::new("coach-1").unwrap(),
            "  Temporada 2025 ",
            TrainingObjective::Strength,
            date(),
        )
        .unwrap();

        assert_eq!(macro_.name(), "Temporada 2025");
        assert!(macro_.is_coached_by(&UserId::new("coach-1").unwrap()));
        assert!(macro_.belongs_to_student(&UserId::new("student-1").unwrap()));
        assert!(!macro_.is_coached_by(&UserId::new("student-1").unwrap()));
    }

    #[test]
    fn new_rejects_blank_name() {
        let result = Macrocycle::new(
            UserId::new("student-1").unwrap(),
            UserId::new("coach-1").unwrap(),
            "   ",
            TrainingObjective::General,
            date(),
        );
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }
}
