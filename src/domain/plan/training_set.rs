//! TrainingSet - one prescribed unit of work and, once trained, its log.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SetId, Timestamp, ValidationError};

/// Highest accepted reps-in-reserve value when a student logs a set.
pub const MAX_RIR: f64 = 10.0;

/// A prescribed set.
///
/// `actual_rir`, `actual_reps` and `completed_at` stay `None` until the
/// student logs the set. Coach-side creation and cloning never fill them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub id: SetId,
    pub order: u32,
    /// Prescribed reps; may be a range such as "8-12".
    pub reps: String,
    pub expected_rir: String,
    pub is_amrap: bool,
    #[serde(default)]
    pub actual_rir: Option<f64>,
    #[serde(default)]
    pub actual_reps: Option<u32>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

impl TrainingSet {
    /// Creates an unlogged set with the given prescription.
    pub fn prescribed(
        order: u32,
        reps: impl Into<String>,
        expected_rir: impl Into<String>,
        is_amrap: bool,
    ) -> Self {
        Self {
            id: SetId::new(),
            order,
            reps: reps.into(),
            expected_rir: expected_rir.into(),
            is_amrap,
            actual_rir: None,
            actual_reps: None,
            completed_at: None,
        }
    }

    /// Copies the prescription into a fresh, unlogged set.
    pub fn copy_prescription(&self) -> Self {
        Self::prescribed(
            self.order,
            self.reps.clone(),
            self.expected_rir.clone(),
            self.is_amrap,
        )
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// True if any student-logged field is present.
    pub fn has_logged_data(&self) -> bool {
        self.actual_rir.is_some() || self.actual_reps.is_some() || self.completed_at.is_some()
    }

    /// Records what the student actually did.
    ///
    /// Passing `completed = false` clears the completion marker, which lets
    /// a student undo an accidental tick without losing the RIR entry.
    pub fn record_log(
        &mut self,
        actual_rir: Option<f64>,
        actual_reps: Option<u32>,
        completed: bool,
    ) -> Result<(), ValidationError> {
        if let Some(rir) = actual_rir {
            if !rir.is_finite() || !(0.0..=MAX_RIR).contains(&rir) {
                return Err(ValidationError::invalid_format(
                    "actual_rir",
                    format!("must be between 0 and {}, got {}", MAX_RIR, rir),
                ));
            }
        }
        self.actual_rir = actual_rir;
        self.actual_reps = actual_reps;
        self.completed_at = if completed {
            self.completed_at.or_else(|| Some(Timestamp::now()))
        } else {
            None
        };
        Ok(())
    }
}
