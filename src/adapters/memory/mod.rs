//! In-memory implementations of the plan store and exercise catalog.

mod exercise_catalog;
mod plan_store;

pub use exercise_catalog::InMemoryExerciseCatalog;
pub use plan_store::InMemoryPlanStore;
