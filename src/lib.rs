//! Taskpilot - natural-language command engine for a personal task tracker
//!
//! Free-form text goes in; a structured action list comes back from an
//! external text-completion service, is defensively parsed, and is applied
//! against the task store with one result record per action.

pub mod command;
pub mod core;
pub mod llm;
pub mod store;
