//! Periodization Engine - training plan lifecycle for coaches and students
//!
//! A coach builds a Macrocycle → Mesocycle → Microcycle → Day → Exercise →
//! Set plan for a student. This crate owns the rules around that tree:
//! which mesocycle is active, how a new week is cloned from the last one,
//! and how a week's progress is measured. Storage, the exercise catalog
//! and event transport sit behind ports in [`ports`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
