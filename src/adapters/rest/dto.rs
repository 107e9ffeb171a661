//! Wire representations of the plan API.
//!
//! The API speaks camelCase JSON. Conversions into domain types are
//! fallible because the API is outside the engine's control.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DayId, DomainError, ExerciseCatalogId, ExerciseId, MacrocycleId, MesocycleId,
    MesocycleStatus, MicrocycleId, SetId, Timestamp, TrainingObjective, UserId,
};
use crate::domain::plan::{
    Day, Exercise, Macrocycle, Mesocycle, Microcycle, Prescription, TrainingSet,
};
use crate::ports::{CatalogEntry, StatusChange};

fn malformed(what: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::persistence(format!("malformed {} from plan API: {}", what, err))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacrocycleDto {
    pub id: MacrocycleId,
    pub student_id: String,
    pub coach_id: String,
    pub name: String,
    pub objective: TrainingObjective,
    pub start_date: NaiveDate,
    pub created_at: Timestamp,
}

impl From<&Macrocycle> for MacrocycleDto {
    fn from(m: &Macrocycle) -> Self {
        Self {
            id: m.id(),
            student_id: m.student_id().to_string(),
            coach_id: m.coach_id().to_string(),
            name: m.name().to_string(),
            objective: m.objective(),
            start_date: m.start_date(),
            created_at: m.created_at(),
        }
    }
}

impl TryFrom<MacrocycleDto> for Macrocycle {
    type Error = DomainError;

    fn try_from(dto: MacrocycleDto) -> Result<Self, Self::Error> {
        Ok(Macrocycle::reconstitute(
            dto.id,
            UserId::new(dto.student_id).map_err(|e| malformed("macrocycle", e))?,
            UserId::new(dto.coach_id).map_err(|e| malformed("macrocycle", e))?,
            dto.name,
            dto.objective,
            dto.start_date,
            dto.created_at,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MesocycleDto {
    pub id: MesocycleId,
    pub macrocycle_id: MacrocycleId,
    pub name: String,
    pub objective: TrainingObjective,
    pub status: MesocycleStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Mesocycle> for MesocycleDto {
    fn from(m: &Mesocycle) -> Self {
        Self {
            id: m.id(),
            macrocycle_id: m.macrocycle_id(),
            name: m.name().to_string(),
            objective: m.objective(),
            status: m.status(),
            created_at: m.created_at(),
            updated_at: m.updated_at(),
        }
    }
}

impl From<MesocycleDto> for Mesocycle {
    fn from(dto: MesocycleDto) -> Self {
        Mesocycle::reconstitute(
            dto.id,
            dto.macrocycle_id,
            dto.name,
            dto.objective,
            dto.status,
            dto.created_at,
            dto.updated_at,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDto {
    pub id: SetId,
    pub order: u32,
    pub reps: String,
    pub expected_rir: String,
    #[serde(default)]
    pub is_amrap: bool,
    #[serde(default)]
    pub actual_rir: Option<f64>,
    #[serde(default)]
    pub actual_reps: Option<u32>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

impl From<&TrainingSet> for SetDto {
    fn from(s: &TrainingSet) -> Self {
        Self {
            id: s.id,
            order: s.order,
            reps: s.reps.clone(),
            expected_rir: s.expected_rir.clone(),
            is_amrap: s.is_amrap,
            actual_rir: s.actual_rir,
            actual_reps: s.actual_reps,
            completed_at: s.completed_at,
        }
    }
}

impl From<SetDto> for TrainingSet {
    fn from(dto: SetDto) -> Self {
        TrainingSet {
            id: dto.id,
            order: dto.order,
            reps: dto.reps,
            expected_rir: dto.expected_rir,
            is_amrap: dto.is_amrap,
            actual_rir: dto.actual_rir,
            actual_reps: dto.actual_reps,
            completed_at: dto.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDto {
    pub id: ExerciseId,
    pub exercise_catalog_id: String,
    pub order: u32,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub rest: String,
    #[serde(default)]
    pub expected_rir: String,
    #[serde(default)]
    pub sets: Vec<SetDto>,
}

impl From<&Exercise> for ExerciseDto {
    fn from(e: &Exercise) -> Self {
        Self {
            id: e.id,
            exercise_catalog_id: e.catalog_id.to_string(),
            order: e.order,
            series: e.prescription.series.clone(),
            reps: e.prescription.reps.clone(),
            rest: e.prescription.rest.clone(),
            expected_rir: e.prescription.expected_rir.clone(),
            sets: e.sets.iter().map(SetDto::from).collect(),
        }
    }
}

impl TryFrom<ExerciseDto> for Exercise {
    type Error = DomainError;

    fn try_from(dto: ExerciseDto) -> Result<Self, Self::Error> {
        let mut sets: Vec<TrainingSet> = dto.sets.into_iter().map(TrainingSet::from).collect();
        sets.sort_by_key(|s| s.order);
        Ok(Exercise {
            id: dto.id,
            catalog_id: ExerciseCatalogId::new(dto.exercise_catalog_id)
                .map_err(|e| malformed("exercise", e))?,
            order: dto.order,
            prescription: Prescription {
                series: dto.series,
                reps: dto.reps,
                rest: dto.rest,
                expected_rir: dto.expected_rir,
            },
            sets,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDto {
    pub id: DayId,
    pub day_number: u8,
    pub name: String,
    #[serde(default)]
    pub is_rest_day: bool,
    #[serde(default)]
    pub exercises: Vec<ExerciseDto>,
}

impl From<&Day> for DayDto {
    fn from(d: &Day) -> Self {
        Self {
            id: d.id,
            day_number: d.day_number,
            name: d.name.clone(),
            is_rest_day: d.is_rest_day,
            exercises: d.exercises.iter().map(ExerciseDto::from).collect(),
        }
    }
}

impl TryFrom<DayDto> for Day {
    type Error = DomainError;

    fn try_from(dto: DayDto) -> Result<Self, Self::Error> {
        let mut exercises = dto
            .exercises
            .into_iter()
            .map(Exercise::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        exercises.sort_by_key(|e| e.order);
        Ok(Day {
            id: dto.id,
            day_number: dto.day_number,
            name: dto.name,
            is_rest_day: dto.is_rest_day,
            exercises,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrocycleDto {
    pub id: MicrocycleId,
    pub mesocycle_id: MesocycleId,
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub is_deload: bool,
    #[serde(default)]
    pub days: Vec<DayDto>,
    pub created_at: Timestamp,
}

impl From<&Microcycle> for MicrocycleDto {
    fn from(m: &Microcycle) -> Self {
        Self {
            id: m.id,
            mesocycle_id: m.mesocycle_id,
            name: m.name.clone(),
            order: m.order,
            is_deload: m.is_deload,
            days: m.days.iter().map(DayDto::from).collect(),
            created_at: m.created_at,
        }
    }
}

impl TryFrom<MicrocycleDto> for Microcycle {
    type Error = DomainError;

    fn try_from(dto: MicrocycleDto) -> Result<Self, Self::Error> {
        let mut days = dto
            .days
            .into_iter()
            .map(Day::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        days.sort_by_key(|d| d.day_number);
        Ok(Microcycle {
            id: dto.id,
            mesocycle_id: dto.mesocycle_id,
            name: dto.name,
            order: dto.order,
            is_deload: dto.is_deload,
            days,
            created_at: dto.created_at,
        })
    }
}

/// Body of `PATCH /microcycles/{id}/sets/{set_id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLogDto {
    pub actual_rir: Option<f64>,
    pub actual_reps: Option<u32>,
    pub completed_at: Option<Timestamp>,
}

impl From<&TrainingSet> for SetLogDto {
    fn from(s: &TrainingSet) -> Self {
        Self {
            actual_rir: s.actual_rir,
            actual_reps: s.actual_reps,
            completed_at: s.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeDto {
    pub mesocycle_id: MesocycleId,
    pub expected_status: MesocycleStatus,
    pub status: MesocycleStatus,
}

/// Body of `POST /mesocycles/status-batch`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBatchDto {
    pub changes: Vec<StatusChangeDto>,
}

impl From<&[StatusChange]> for StatusBatchDto {
    fn from(changes: &[StatusChange]) -> Self {
        Self {
            changes: changes
                .iter()
                .map(|c| StatusChangeDto {
                    mesocycle_id: c.mesocycle_id,
                    expected_status: c.expected,
                    status: c.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
}

impl TryFrom<CatalogEntryDto> for CatalogEntry {
    type Error = DomainError;

    fn try_from(dto: CatalogEntryDto) -> Result<Self, Self::Error> {
        Ok(CatalogEntry {
            id: ExerciseCatalogId::new(dto.id).map_err(|e| malformed("catalog entry", e))?,
            name: dto.name,
            muscle_group: dto.muscle_group.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn microcycle_tree_parses_from_camel_case() {
        let body = json!({
            "id": "0190f0a0-0000-7000-8000-000000000001",
            "mesocycleId": "6a1b2c3d-0000-4000-8000-000000000002",
            "name": "Semana 1",
            "order": 1,
            "isDeload": false,
            "createdAt": "2026-01-05T08:00:00Z",
            "days": [{
                "id": "6a1b2c3d-0000-4000-8000-000000000003",
                "dayNumber": 2,
                "name": "Tirón",
                "exercises": [{
                    "id": "6a1b2c3d-0000-4000-8000-000000000004",
                    "exerciseCatalogId": "row",
                    "order": 1,
                    "reps": "8-12",
                    "sets": [
                        {"id": "6a1b2c3d-0000-4000-8000-000000000006", "order": 2, "reps": "10", "expectedRir": "1"},
                        {"id": "6a1b2c3d-0000-4000-8000-000000000005", "order": 1, "reps": "10", "expectedRir": "2", "actualRir": 2.0}
                    ]
                }]
            }]
        });

        let dto: MicrocycleDto = serde_json::from_value(body).unwrap();
        let week = Microcycle::try_from(dto).unwrap();

        assert_eq!(week.days[0].day_number, 2);
        let sets = &week.days[0].exercises[0].sets;
        assert_eq!(sets[0].order, 1);
        assert_eq!(sets[0].actual_rir, Some(2.0));
        assert!(!sets[1].is_amrap);
    }

    #[test]
    fn blank_catalog_id_is_malformed() {
        let dto = CatalogEntryDto {
            id: " ".into(),
            name: "?".into(),
            muscle_group: None,
        };
        let err = CatalogEntry::try_from(dto).unwrap_err();
        assert!(err.message.contains("malformed catalog entry"));
    }

    #[test]
    fn status_batch_serializes_every_change() {
        let id = MesocycleId::new();
        let changes = [StatusChange::new(id, MesocycleStatus::Active, MesocycleStatus::Published)];
        let body = serde_json::to_value(StatusBatchDto::from(&changes[..])).unwrap();

        assert_eq!(body["changes"][0]["expectedStatus"], "active");
        assert_eq!(body["changes"][0]["status"], "published");
        assert_eq!(body["changes"][0]["mesocycleId"], id.to_string());
    }
}
