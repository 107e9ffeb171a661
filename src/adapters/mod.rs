//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - in-process plan store and exercise catalog
//! - `rest` - typed HTTP client for the external plan API
//! - `cache` - TTL plan cache
//! - `events` - in-process event bus

pub mod cache;
pub mod events;
pub mod memory;
pub mod rest;

pub use cache::InMemoryPlanCache;
pub use events::InMemoryEventBus;
pub use memory::{InMemoryExerciseCatalog, InMemoryPlanStore};
pub use rest::RestPlanApi;
