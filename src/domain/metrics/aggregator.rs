use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ExerciseCatalogId;
use crate::domain::plan::Microcycle;

/// Catalog muscle groups keyed by exercise, plus the label for unresolved ones.
#[derive(Debug, Clone, Default)]
pub struct MuscleGroupIndex {
    groups: HashMap<ExerciseCatalogId, String>,
    fallback_label: String,
}

impl MuscleGroupIndex {
    pub fn new(fallback_label: impl Into<String>) -> Self {
        Self {
            groups: HashMap::new(),
            fallback_label: fallback_label.into(),
        }
    }

    pub fn insert(&mut self, id: ExerciseCatalogId, muscle_group: impl Into<String>) {
        self.groups.insert(id, muscle_group.into());
    }

    pub fn with_group(mut self, id: ExerciseCatalogId, muscle_group: impl Into<String>) -> Self {
        self.insert(id, muscle_group);
        self
    }

    /// Muscle group for the exercise, or the fallback label when the catalog
    /// entry is missing or has a blank group.
    pub fn resolve(&self, id: &ExerciseCatalogId) -> &str {
        match self.groups.get(id) {
            Some(group) if !group.trim().is_empty() => group.as_str(),
            _ => self.fallback_label.as_str(),
        }
    }
}

/// One row of the muscle-group ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroupVolume {
    pub muscle_group: String,
    pub series: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrocycleMetrics {
    pub total_series: usize,
    pub completed_series: usize,
    /// round(completed / total * 100); 0 for an empty week.
    pub progress_percent: u8,
    /// Mean of every logged `actual_rir`, `None` when nothing is logged.
    pub average_rir: Option<f64>,
    pub series_by_muscle_group: HashMap<String, usize>,
}

impl MicrocycleMetrics {
    /// The `n` muscle groups with the most series, ties ordered by label.
    pub fn top_muscle_groups(&self, n: usize) -> Vec<MuscleGroupVolume> {
        let mut ranked: Vec<MuscleGroupVolume> = self
            .series_by_muscle_group
            .iter()
            .map(|(group, series)| MuscleGroupVolume {
                muscle_group: group.clone(),
                series: *series,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.series
                .cmp(&a.series)
                .then_with(|| a.muscle_group.cmp(&b.muscle_group))
        });
        ranked.truncate(n);
        ranked
    }

    pub fn is_empty(&self) -> bool {
        self.total_series == 0
    }
}

/// Aggregates set counts, completion and RIR over every set in the week.
///
/// Pure and total: any well-formed microcycle yields a result.
pub fn compute_microcycle_metrics(
    microcycle: &Microcycle,
    muscle_groups: &MuscleGroupIndex,
) -> MicrocycleMetrics {
    let mut total_series = 0usize;
    let mut completed_series = 0usize;
    let mut rir_sum = 0.0f64;
    let mut rir_count = 0usize;
    let mut series_by_muscle_group: HashMap<String, usize> = HashMap::new();

    for exercise in microcycle.exercises() {
        let set_count = exercise.sets.len();
        if set_count > 0 {
            *series_by_muscle_group
                .entry(muscle_groups.resolve(&exercise.catalog_id).to_string())
                .or_insert(0) += set_count;
        }

        for set in &exercise.sets {
            total_series += 1;
            if set.is_completed() {
                completed_series += 1;
            }
            if let Some(rir) = set.actual_rir {
                rir_sum += rir;
                rir_count += 1;
            }
        }
    }

    MicrocycleMetrics {
        total_series,
        completed_series,
        progress_percent: progress_percent(completed_series, total_series),
        average_rir: (rir_count > 0).then(|| rir_sum / rir_count as f64),
        series_by_muscle_group,
    }
}

fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
}
