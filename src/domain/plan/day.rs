//! Day - one calendar slot within a training week.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DayId, ValidationError};

use super::Exercise;

pub const DAYS_PER_WEEK_MAX: u8 = 7;

/// How a day reads to the coach and the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Rest,
    /// Not a rest day, but no exercises assigned yet.
    Unconfigured,
    Training,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    /// 1..=7 within the week.
    pub day_number: u8,
    pub name: String,
    pub is_rest_day: bool,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Day {
    /// Creates an empty day.
    pub fn new(
        day_number: u8,
        name: impl Into<String>,
        is_rest_day: bool,
    ) -> Result<Self, ValidationError> {
        if !(1..=DAYS_PER_WEEK_MAX).contains(&day_number) {
            return Err(ValidationError::out_of_range(
                "day_number",
                1,
                DAYS_PER_WEEK_MAX as i64,
                day_number as i64,
            ));
        }
        Ok(Self {
            id: DayId::new(),
            day_number,
            name: name.into(),
            is_rest_day,
            exercises: Vec::new(),
        })
    }

    pub fn kind(&self) -> DayKind {
        if self.is_rest_day {
            DayKind::Rest
        } else if self.exercises.is_empty() {
            DayKind::Unconfigured
        } else {
            DayKind::Training
        }
    }

    /// Adds an exercise. Rest days cannot hold exercises.
    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<(), ValidationError> {
        if self.is_rest_day {
            return Err(ValidationError::invalid_format(
                "exercises",
                format!("day {} is a rest day", self.day_number),
            ));
        }
        self.exercises.push(exercise);
        self.exercises.sort_by_key(|e| e.order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ExerciseCatalogId;
    use crate::domain::plan::Prescription;

    fn exercise() -> Exercise {
        Exercise::new(
            ExerciseCatalogId::new("row").unwrap(),
            1,
            Prescription::default(),
        )
    }

    #[test]
    fn rejects_day_number_outside_week() {
        assert!(Day::new(0, "x", false).is_err());
        assert!(Day::new(8, "x", false).is_err());
        assert!(Day::new(7, "x", false).is_ok());
    }

    #[test]
    fn empty_non_rest_day_is_unconfigured_not_rest() {
        let day = Day::new(1, "Día 1", false).unwrap();
        assert_eq!(day.kind(), DayKind::Unconfigured);

        let rest = Day::new(2, "Descanso", true).unwrap();
        assert_eq!(rest.kind(), DayKind::Rest);
    }

    #[test]
    fn rest_day_refuses_exercises() {
        let mut rest = Day::new(3, "Descanso", true).unwrap();
        assert!(rest.add_exercise(exercise()).is_err());
        assert!(rest.exercises.is_empty());
    }

    #[test]
    fn training_day_accepts_exercises() {
        let mut day = Day::new(1, "Empuje", false).unwrap();
        day.add_exercise(exercise()).unwrap();
        assert_eq!(day.kind(), DayKind::Training);
    }
}
