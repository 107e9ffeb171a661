//! Metrics module - read-only aggregates over one microcycle.

mod aggregator;

pub use aggregator::{
    compute_microcycle_metrics, MicrocycleMetrics, MuscleGroupIndex, MuscleGroupVolume,
};
