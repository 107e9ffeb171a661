//! Exercise - a day's instance of a catalog movement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExerciseCatalogId, ExerciseId};

use super::TrainingSet;

/// Coach-authored prescription. Values are free text so ranges like
/// "8-12" or "90-120s" survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prescription {
    pub series: String,
    pub reps: String,
    pub rest: String,
    pub expected_rir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub catalog_id: ExerciseCatalogId,
    pub order: u32,
    pub prescription: Prescription,
    #[serde(default)]
    pub sets: Vec<TrainingSet>,
}

impl Exercise {
    pub fn new(catalog_id: ExerciseCatalogId, order: u32, prescription: Prescription) -> Self {
        Self {
            id: ExerciseId::new(),
            catalog_id,
            order,
            prescription,
            sets: Vec::new(),
        }
    }

    /// Adds a set, keeping the list sorted by `order`.
    pub fn with_set(mut self, set: TrainingSet) -> Self {
        self.sets.push(set);
        self.sets.sort_by_key(|s| s.order);
        self
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.is_completed()).count()
    }
}
