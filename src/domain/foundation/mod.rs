//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the periodization domain.

mod command;
mod errors;
mod events;
mod ids;
mod mesocycle_status;
mod objective;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{
    DayId, ExerciseCatalogId, ExerciseId, MacrocycleId, MesocycleId, MicrocycleId, SetId, UserId,
};
pub use mesocycle_status::MesocycleStatus;
pub use objective::TrainingObjective;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
