//! Request lifecycle: the state machine and the engine facade that drives it.

pub mod engine;
pub mod state_machine;

pub use engine::DispatchEngine;
pub use state_machine::Transition;
