use crate::domain::foundation::{ExerciseId, MesocycleId, MicrocycleId, ValidationError};
use crate::domain::plan::{
    latest_microcycle, next_order, Day, Exercise, Microcycle, PlanError, TrainingSet,
    DAYS_PER_WEEK_MAX,
};

/// Prescription and naming used when the engine has to make something up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneDefaults {
    /// Sets synthesized for a source exercise that has none recorded.
    pub set_count: u32,
    pub reps: String,
    pub expected_rir: String,
    pub deload_suffix: String,
    pub day_name_prefix: String,
    pub week_name_prefix: String,
}

impl Default for CloneDefaults {
    fn default() -> Self {
        Self {
            set_count: 3,
            reps: "8-12".to_string(),
            expected_rir: "2".to_string(),
            deload_suffix: "(Descarga)".to_string(),
            day_name_prefix: "Día".to_string(),
            week_name_prefix: "Semana".to_string(),
        }
    }
}

/// Coach request for a new week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMicrocycle {
    pub name: String,
    pub is_deload: bool,
    pub copy_from_last: bool,
    /// Used for the skeleton, including the fallback when there is nothing to copy.
    pub days_per_week: u8,
}

/// Where the new week's structure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneSource {
    /// Empty skeleton, as requested.
    Skeleton,
    /// Copy requested, but the mesocycle had no microcycles yet.
    SkeletonNoPreviousMicrocycle,
    /// Copy requested, but the latest microcycle had no days.
    SkeletonEmptySource(MicrocycleId),
    CopiedFrom(MicrocycleId),
}

impl CloneSource {
    pub fn is_copy(&self) -> bool {
        matches!(self, CloneSource::CopiedFrom(_))
    }
}

/// The built week plus what the coach should know about how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneOutcome {
    pub microcycle: Microcycle,
    pub source: CloneSource,
    /// New exercises whose sets were synthesized from `CloneDefaults`.
    pub synthesized_sets: Vec<ExerciseId>,
}

/// Builds the tree for a new microcycle appended to `existing`.
///
/// # Errors
///
/// - `InvalidArgument` if `days_per_week` is outside 1..=7
/// - `InvariantViolation` if the copied tree breaks structural invariants
///   (only reachable with corrupt source data)
pub fn build_microcycle(
    mesocycle_id: MesocycleId,
    request: &NewMicrocycle,
    existing: &[Microcycle],
    defaults: &CloneDefaults,
) -> Result<CloneOutcome, PlanError> {
    if !(1..=DAYS_PER_WEEK_MAX).contains(&request.days_per_week) {
        return Err(ValidationError::out_of_range(
            "days_per_week",
            1,
            DAYS_PER_WEEK_MAX as i64,
            request.days_per_week as i64,
        )
        .into());
    }
    if defaults.set_count == 0 {
        return Err(PlanError::invalid_argument(
            "default_set_count",
            "at least one default set is required",
        ));
    }

    let order = next_order(existing).ok_or_else(|| {
        PlanError::invalid_argument("order", "mesocycle has no room for another microcycle")
    })?;
    let name = display_name(request, order, defaults);

    let (days, source, synthesized_sets) = if request.copy_from_last {
        match latest_microcycle(existing) {
            None => (
                skeleton_days(request.days_per_week, defaults)?,
                CloneSource::SkeletonNoPreviousMicrocycle,
                Vec::new(),
            ),
            Some(last) if last.days.is_empty() => (
                skeleton_days(request.days_per_week, defaults)?,
                CloneSource::SkeletonEmptySource(last.id),
                Vec::new(),
            ),
            Some(last) => {
                let (days, synthesized) = copy_days(last, defaults);
                (days, CloneSource::CopiedFrom(last.id), synthesized)
            }
        }
    } else {
        (
            skeleton_days(request.days_per_week, defaults)?,
            CloneSource::Skeleton,
            Vec::new(),
        )
    };

    let microcycle = Microcycle::new(mesocycle_id, name, order, request.is_deload, days);
    microcycle.validate().map_err(|e| {
        PlanError::invariant(format!("new microcycle would be malformed: {}", e))
    })?;

    Ok(CloneOutcome {
        microcycle,
        source,
        synthesized_sets,
    })
}

fn display_name(request: &NewMicrocycle, order: u32, defaults: &CloneDefaults) -> String {
    let base = match request.name.trim() {
        "" => format!("{} {}", defaults.week_name_prefix, order),
        given => given.to_string(),
    };
    if request.is_deload && !base.ends_with(defaults.deload_suffix.as_str()) {
        format!("{} {}", base, defaults.deload_suffix)
    } else {
        base
    }
}

fn skeleton_days(days_per_week: u8, defaults: &CloneDefaults) -> Result<Vec<Day>, PlanError> {
    (1..=days_per_week)
        .map(|n| Day::new(n, format!("{} {}", defaults.day_name_prefix, n), false))
        .collect::<Result<Vec<_>, _>>()
        .map_err(PlanError::from)
}

fn copy_days(source: &Microcycle, defaults: &CloneDefaults) -> (Vec<Day>, Vec<ExerciseId>) {
    let mut synthesized = Vec::new();
    let days = source
        .days
        .iter()
        .map(|day| {
            let exercises = if day.is_rest_day {
                Vec::new()
            } else {
                day.exercises
                    .iter()
                    .map(|exercise| {
                        let copy = copy_exercise(exercise, defaults);
                        if exercise.sets.is_empty() {
                            synthesized.push(copy.id);
                        }
                        copy
                    })
                    .collect()
            };
            Day {
                id: Default::default(),
                day_number: day.day_number,
                name: day.name.clone(),
                is_rest_day: day.is_rest_day,
                exercises,
            }
        })
        .collect();
    (days, synthesized)
}

fn copy_exercise(source: &Exercise, defaults: &CloneDefaults) -> Exercise {
    let mut copy = Exercise::new(
        source.catalog_id.clone(),
        source.order,
        source.prescription.clone(),
    );
    copy.sets = if source.sets.is_empty() {
        (1..=defaults.set_count)
            .map(|order| {
                TrainingSet::prescribed(
                    order,
                    defaults.reps.clone(),
                    defaults.expected_rir.clone(),
                    false,
                )
            })
            .collect()
    } else {
        source.sets.iter().map(TrainingSet::copy_prescription).collect()
    };
    copy
}
