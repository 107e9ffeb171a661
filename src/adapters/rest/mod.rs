//! HTTP adapter for the external plan API.

mod client;
mod dto;

pub use client::RestPlanApi;
pub use dto::{
    CatalogEntryDto, DayDto, ExerciseDto, MacrocycleDto, MesocycleDto, MicrocycleDto, SetDto,
};
