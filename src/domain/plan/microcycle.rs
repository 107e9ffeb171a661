//! Microcycle - one training week and its Day → Exercise → Set tree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ExerciseCatalogId, MesocycleId, MicrocycleId, SetId, Timestamp, ValidationError,
};

use super::{Day, Exercise, TrainingSet, DAYS_PER_WEEK_MAX};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microcycle {
    pub id: MicrocycleId,
    pub mesocycle_id: MesocycleId,
    pub name: String,
    /// 1-based position within the mesocycle.
    pub order: u32,
    pub is_deload: bool,
    #[serde(default)]
    pub days: Vec<Day>,
    pub created_at: Timestamp,
}

impl Microcycle {
    pub fn new(
        mesocycle_id: MesocycleId,
        name: impl Into<String>,
        order: u32,
        is_deload: bool,
        days: Vec<Day>,
    ) -> Self {
        let mut days = days;
        days.sort_by_key(|d| d.day_number);
        Self {
            id: MicrocycleId::new(),
            mesocycle_id,
            name: name.into(),
            order,
            is_deload,
            days,
            created_at: Timestamp::now(),
        }
    }

    /// Checks the structural invariants of the whole tree.
    ///
    /// - `order` is 1-based
    /// - 1..=7 days, unique `day_number`s
    /// - rest days hold no exercises
    /// - exercise orders unique per day, set orders unique per exercise
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.order == 0 {
            return Err(ValidationError::out_of_range("order", 1, u32::MAX as i64, 0));
        }
        if self.days.is_empty() || self.days.len() > DAYS_PER_WEEK_MAX as usize {
            return Err(ValidationError::out_of_range(
                "days",
                1,
                DAYS_PER_WEEK_MAX as i64,
                self.days.len() as i64,
            ));
        }

        let mut day_numbers = HashSet::new();
        for day in &self.days {
            if !day_numbers.insert(day.day_number) {
                return Err(ValidationError::invalid_format(
                    "day_number",
                    format!("day {} appears more than once", day.day_number),
                ));
            }
            if day.is_rest_day && !day.exercises.is_empty() {
                return Err(ValidationError::invalid_format(
                    "exercises",
                    format!("rest day {} has exercises", day.day_number),
                ));
            }

            let mut exercise_orders = HashSet::new();
            for exercise in &day.exercises {
                if !exercise_orders.insert(exercise.order) {
                    return Err(ValidationError::invalid_format(
                        "exercise.order",
                        format!(
                            "order {} repeated on day {}",
                            exercise.order, day.day_number
                        ),
                    ));
                }
                let mut set_orders = HashSet::new();
                for set in &exercise.sets {
                    if !set_orders.insert(set.order) {
                        return Err(ValidationError::invalid_format(
                            "set.order",
                            format!("order {} repeated in exercise {}", set.order, exercise.id),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.days.iter().flat_map(|d| d.exercises.iter())
    }

    pub fn sets(&self) -> impl Iterator<Item = &TrainingSet> {
        self.exercises().flat_map(|e| e.sets.iter())
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises().count()
    }

    pub fn set_count(&self) -> usize {
        self.sets().count()
    }

    /// Distinct catalog references used in this week, sorted.
    pub fn catalog_ids(&self) -> Vec<ExerciseCatalogId> {
        let mut ids: Vec<ExerciseCatalogId> = self
            .exercises()
            .map(|e| e.catalog_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort();
        ids
    }

    pub fn find_set(&self, set_id: &SetId) -> Option<&TrainingSet> {
        self.sets().find(|s| &s.id == set_id)
    }

    pub fn find_set_mut(&mut self, set_id: &SetId) -> Option<&mut TrainingSet> {
        self.days
            .iter_mut()
            .flat_map(|d| d.exercises.iter_mut())
            .flat_map(|e| e.sets.iter_mut())
            .find(|s| &s.id == set_id)
    }
}
