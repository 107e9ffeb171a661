//! Plan module - the hierarchical training plan model.
//!
//! Macrocycle → Mesocycle → Microcycle → Day → Exercise → Set. Macrocycles
//! and mesocycles are aggregates with guarded state; the microcycle tree is
//! plain data validated as a whole before it is persisted.

mod day;
mod errors;
mod exercise;
mod macrocycle;
mod mesocycle;
mod microcycle;
mod ordering;
mod training_set;
mod visibility;

pub use day::{Day, DayKind, DAYS_PER_WEEK_MAX};
pub use errors::{PlanEntity, PlanError};
pub use exercise::{Exercise, Prescription};
pub use macrocycle::Macrocycle;
pub use mesocycle::{Mesocycle, StatusTransition};
pub use microcycle::Microcycle;
pub use ordering::{latest_microcycle, next_order, recency_cmp};
pub use training_set::{TrainingSet, MAX_RIR};
pub use visibility::{active_count, visible_to_student};
