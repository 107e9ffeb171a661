//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `plan` - Macrocycle / Mesocycle / Microcycle tree and its invariants
//! - `cloning` - Pure construction of a new week, as a skeleton or a copy
//! - `metrics` - Pure aggregates over one week

pub mod cloning;
pub mod foundation;
pub mod metrics;
pub mod plan;
