//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! ## Plan store
//!
//! - `MacrocycleRepository`, `MesocycleRepository`, `MicrocycleRepository` -
//!   the external persistence/API boundary, transactional per call
//!
//! ## Collaborators
//!
//! - `ExerciseCatalog` - read-only exercise lookups (name, muscle group)
//! - `PlanCache` - per-student cache for read paths
//! - `EventPublisher` / `EventSubscriber` - domain event transport

mod event_publisher;
mod event_subscriber;
mod exercise_catalog;
mod macrocycle_repository;
mod mesocycle_repository;
mod microcycle_repository;
mod plan_cache;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use exercise_catalog::{CatalogEntry, ExerciseCatalog};
pub use macrocycle_repository::MacrocycleRepository;
pub use mesocycle_repository::{MesocycleRepository, StatusChange};
pub use microcycle_repository::MicrocycleRepository;
pub use plan_cache::{CacheResource, PlanCache, PlanCacheKey};
