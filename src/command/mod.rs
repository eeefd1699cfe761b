//! Command execution pipeline
//!
//! Drives instruction text through the full chain:
//! instruction -> splitter -> Inference -> parse_actions -> ActionExecutor
//! -> aggregated per-action results.

pub mod executor;
pub mod orchestrator;
pub mod splitter;

pub use executor::{ActionExecutor, ActionKind, ActionResult};
pub use orchestrator::{CommandOrchestrator, CommandOutcome};
pub use splitter::split_instruction;
