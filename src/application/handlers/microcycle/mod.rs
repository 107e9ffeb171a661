//! Microcycle command and query handlers.

mod create_microcycle;
mod get_microcycle_metrics;
mod log_set;

pub use create_microcycle::{
    CloneReport, CreateMicrocycleCommand, CreateMicrocycleHandler, CreateMicrocycleResult,
    MicrocycleCreatedEvent,
};
pub use get_microcycle_metrics::{
    GetMicrocycleMetricsHandler, GetMicrocycleMetricsQuery, GetMicrocycleMetricsResult,
};
pub use log_set::{LogSetCommand, LogSetHandler, LogSetResult, SetLoggedEvent};
