//! Engine-level error taxonomy returned by plan handlers.

use crate::domain::foundation::{
    DomainError, ErrorCode, ExerciseCatalogId, MesocycleStatus, ValidationError,
};

/// Kind of entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanEntity {
    Macrocycle,
    Mesocycle,
    Microcycle,
    Set,
}

impl std::fmt::Display for PlanEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanEntity::Macrocycle => "Macrocycle",
            PlanEntity::Mesocycle => "Mesocycle",
            PlanEntity::Microcycle => "Microcycle",
            PlanEntity::Set => "Set",
        };
        write!(f, "{}", s)
    }
}

/// Plan-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Referenced entity id does not resolve.
    NotFound { entity: PlanEntity, id: String },
    /// Malformed input (unknown status, days per week out of range, ...).
    InvalidArgument { field: String, message: String },
    /// The status state machine forbids this move.
    InvalidTransition {
        from: MesocycleStatus,
        to: MesocycleStatus,
    },
    /// A write would break a business invariant (e.g. two active mesocycles).
    InvariantViolation(String),
    /// A catalog reference did not resolve. Non-fatal for cloning.
    DanglingReference(ExerciseCatalogId),
    /// Actor does not own the plan.
    Forbidden,
    /// Opaque failure from the storage boundary.
    PersistenceFailure(String),
}

impl PlanError {
    pub fn not_found(entity: PlanEntity, id: impl ToString) -> Self {
        PlanError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        PlanError::InvariantViolation(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::NotFound { entity, .. } => match entity {
                PlanEntity::Macrocycle => ErrorCode::MacrocycleNotFound,
                PlanEntity::Mesocycle => ErrorCode::MesocycleNotFound,
                PlanEntity::Microcycle => ErrorCode::MicrocycleNotFound,
                PlanEntity::Set => ErrorCode::SetNotFound,
            },
            PlanError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            PlanError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            PlanError::InvariantViolation(_) => ErrorCode::InvariantViolation,
            PlanError::DanglingReference(_) => ErrorCode::DanglingReference,
            PlanError::Forbidden => ErrorCode::Forbidden,
            PlanError::PersistenceFailure(_) => ErrorCode::PersistenceFailure,
        }
    }

    /// User-facing message; names the failed precondition where one is known.
    pub fn message(&self) -> String {
        match self {
            PlanError::NotFound { entity, id } => format!("{} not found: {}", entity, id),
            PlanError::InvalidArgument { field, message } => {
                format!("Invalid value for '{}': {}", field, message)
            }
            PlanError::InvalidTransition { from, to } => {
                format!("A mesocycle cannot move from '{}' to '{}'", from, to)
            }
            PlanError::InvariantViolation(msg) => format!("Plan invariant violated: {}", msg),
            PlanError::DanglingReference(id) => {
                format!("Exercise catalog entry no longer exists: {}", id)
            }
            PlanError::Forbidden => "You do not have access to this plan".to_string(),
            PlanError::PersistenceFailure(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PlanError {}

impl From<ValidationError> for PlanError {
    fn from(err: ValidationError) -> Self {
        PlanError::InvalidArgument {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PlanError {
    fn from(err: DomainError) -> Self {
        let id = err.details.get("id").cloned().unwrap_or_default();
        match err.code {
            ErrorCode::MacrocycleNotFound => PlanError::not_found(PlanEntity::Macrocycle, id),
            ErrorCode::MesocycleNotFound => PlanError::not_found(PlanEntity::Mesocycle, id),
            ErrorCode::MicrocycleNotFound => PlanError::not_found(PlanEntity::Microcycle, id),
            ErrorCode::SetNotFound => PlanError::not_found(PlanEntity::Set, id),
            ErrorCode::InvalidArgument => PlanError::InvalidArgument {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::InvariantViolation | ErrorCode::InvalidStateTransition => {
                PlanError::InvariantViolation(err.message)
            }
            ErrorCode::Forbidden => PlanError::Forbidden,
            ErrorCode::DanglingReference
            | ErrorCode::PersistenceFailure
            | ErrorCode::CacheError
            | ErrorCode::InternalError => PlanError::PersistenceFailure(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_entity_specific_code() {
        let err = PlanError::not_found(PlanEntity::Mesocycle, "abc");
        assert_eq!(err.code(), ErrorCode::MesocycleNotFound);
        assert_eq!(err.to_string(), "Mesocycle not found: abc");
    }

    #[test]
    fn persistence_failure_passes_message_through_unmodified() {
        let err: PlanError = DomainError::persistence("connection reset by peer").into();
        assert_eq!(err, PlanError::PersistenceFailure("connection reset by peer".into()));
        assert_eq!(err.to_string(), "connection reset by peer");
    }

    #[test]
    fn domain_not_found_keeps_id_detail() {
        let err: PlanError = DomainError::new(ErrorCode::MicrocycleNotFound, "missing")
            .with_detail("id", "m-1")
            .into();
        assert_eq!(err, PlanError::not_found(PlanEntity::Microcycle, "m-1"));
    }

    #[test]
    fn validation_error_becomes_invalid_argument() {
        let err: PlanError = ValidationError::out_of_range("days_per_week", 1, 7, 9).into();
        match err {
            PlanError::InvalidArgument { field, .. } => assert_eq!(field, "days_per_week"),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = PlanError::InvalidTransition {
            from: MesocycleStatus::Active,
            to: MesocycleStatus::Active,
        };
        assert!(err.to_string().contains("'active'"));
    }
}
