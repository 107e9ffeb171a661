//! Cloning module - builds the Day → Exercise → Set tree of a new week.
//!
//! Pure construction only: the caller supplies the mesocycle's existing
//! microcycles and persists the returned tree in one write. A new week is
//! either an empty skeleton or a copy of the latest week's structure with
//! every student-logged field dropped.
//!
//! Deload is a label and an intent flag. The copy step is identical; the
//! coach reduces intensity by editing the new week afterwards.

mod builder;

pub use builder::{build_microcycle, CloneDefaults, CloneOutcome, CloneSource, NewMicrocycle};
