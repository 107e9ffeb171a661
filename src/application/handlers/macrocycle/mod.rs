//! Macrocycle command handlers.

mod create_macrocycle;

pub use create_macrocycle::{
    CreateMacrocycleCommand, CreateMacrocycleHandler, CreateMacrocycleResult,
    MacrocycleCreatedEvent,
};
