//! Mesocycle command and query handlers.

mod create_mesocycle;
mod list_student_mesocycles;
mod set_mesocycle_status;

pub use create_mesocycle::{
    CreateMesocycleCommand, CreateMesocycleHandler, CreateMesocycleResult, MesocycleCreatedEvent,
};
pub use list_student_mesocycles::{
    ListStudentMesocyclesHandler, ListStudentMesocyclesQuery, ListStudentMesocyclesResult,
};
pub use set_mesocycle_status::{
    MesocycleStatusChangedEvent, MesocycleSupersededEvent, SetMesocycleStatusCommand,
    SetMesocycleStatusHandler, SetMesocycleStatusResult,
};
