//! Student visibility rule for mesocycles.
//!
//! The engine exposes status but does not gate reads by itself. Any read
//! path that renders plans to a student must pass them through
//! [`visible_to_student`] first; drafts are never shown to students.

use super::Mesocycle;

/// Keeps only mesocycles a student may see (`published` or `active`).
pub fn visible_to_student<'a, I>(mesocycles: I) -> Vec<Mesocycle>
where
    I: IntoIterator<Item = &'a Mesocycle>,
{
    mesocycles
        .into_iter()
        .filter(|m| m.status().is_visible_to_student())
        .cloned()
        .collect()
}

/// Number of mesocycles in the slice that are currently active.
pub fn active_count<'a, I>(mesocycles: I) -> usize
where
    I: IntoIterator<Item = &'a Mesocycle>,
{
    mesocycles.into_iter().filter(|m| m.is_active()).count()
}
