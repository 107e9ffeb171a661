//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Write handlers commit through the plan store first, then invalidate the
//! student's cache and publish events; read handlers go through the cache.

pub mod handlers;

pub use handlers::{
    // Plan creation
    CreateMacrocycleCommand, CreateMacrocycleHandler, CreateMacrocycleResult,
    CreateMesocycleCommand, CreateMesocycleHandler, CreateMesocycleResult,
    // Lifecycle
    SetMesocycleStatusCommand, SetMesocycleStatusHandler, SetMesocycleStatusResult,
    // Weeks
    CloneReport, CreateMicrocycleCommand, CreateMicrocycleHandler, CreateMicrocycleResult,
    LogSetCommand, LogSetHandler, LogSetResult,
    // Student read path
    GetMicrocycleMetricsHandler, GetMicrocycleMetricsQuery, GetMicrocycleMetricsResult,
    ListStudentMesocyclesHandler, ListStudentMesocyclesQuery, ListStudentMesocyclesResult,
};
