//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler holds its ports as trait objects and exposes a single
//! `handle(cmd, metadata)`.

mod access;
pub mod macrocycle;
pub mod mesocycle;
pub mod microcycle;

#[cfg(test)]
mod test_support;

pub use macrocycle::{
    CreateMacrocycleCommand, CreateMacrocycleHandler, CreateMacrocycleResult,
    MacrocycleCreatedEvent,
};
pub use mesocycle::{
    CreateMesocycleCommand, CreateMesocycleHandler, CreateMesocycleResult,
    ListStudentMesocyclesHandler, ListStudentMesocyclesQuery, ListStudentMesocyclesResult,
    MesocycleCreatedEvent, MesocycleStatusChangedEvent, MesocycleSupersededEvent,
    SetMesocycleStatusCommand, SetMesocycleStatusHandler, SetMesocycleStatusResult,
};
pub use microcycle::{
    CloneReport, CreateMicrocycleCommand, CreateMicrocycleHandler, CreateMicrocycleResult,
    GetMicrocycleMetricsHandler, GetMicrocycleMetricsQuery, GetMicrocycleMetricsResult,
    LogSetCommand, LogSetHandler, LogSetResult, MicrocycleCreatedEvent, SetLoggedEvent,
};
