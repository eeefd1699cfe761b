//! Command orchestration
//!
//! The only component exposed to callers. Splits an instruction into
//! sub-instructions, drives each through inference -> parse -> execute, and
//! aggregates per-action results. Failures local to one sub-instruction
//! become result records; the call itself only fails when the instruction
//! is empty or inference failed for every sub-instruction.

use crate::command::executor::{ActionExecutor, ActionResult};
use crate::command::splitter::split_instruction;
use crate::core::error::{CommandError, Result};
use crate::core::types::UserId;
use crate::llm::client::Inference;
use crate::llm::parser::parse_actions;
use crate::llm::prompt::build_system_prompt;
use crate::store::TaskStore;
use chrono::NaiveDate;
use serde::Serialize;

/// Aggregated outcome of one orchestrated call
#[derive(Debug, Serialize)]
pub struct CommandOutcome {
    /// One record per action (or failed sub-instruction), in input order
    pub results: Vec<ActionResult>,
    /// True when some add/edit/delete went through; a hint that cached
    /// views are stale, nothing more
    pub mutated: bool,
}

/// Drives the full instruction pipeline
pub struct CommandOrchestrator<I> {
    inference: I,
}

impl<I: Inference> CommandOrchestrator<I> {
    pub fn new(inference: I) -> Self {
        Self { inference }
    }

    /// Run one free-form instruction for `user`
    ///
    /// Sub-instructions are processed sequentially so store writes within
    /// one call never race each other.
    pub async fn run_command(
        &self,
        store: &mut dyn TaskStore,
        user: UserId,
        instruction: &str,
        today: NaiveDate,
    ) -> Result<CommandOutcome> {
        let trimmed = instruction.trim();
        if trimmed.is_empty() {
            return Err(CommandError::EmptyInstruction);
        }

        let sub_instructions = split_instruction(trimmed);
        let system = build_system_prompt(today);

        let mut results = Vec::new();
        let mut inference_errors = Vec::new();

        for sub in &sub_instructions {
            tracing::debug!(sub_instruction = %sub, "dispatching");
            let raw = match self.inference.complete(&system, sub).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(sub_instruction = %sub, error = %e, "inference failed");
                    results.push(ActionResult::instruction_error(sub, e.to_string()));
                    inference_errors.push(e);
                    continue;
                }
            };

            let batch = match parse_actions(&raw) {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(sub_instruction = %sub, error = %e, "unparseable output");
                    results.push(ActionResult::instruction_error(sub, e.to_string()));
                    continue;
                }
            };

            for action in &batch.actions {
                results.push(ActionExecutor::execute(store, user, action, today));
            }
            for tag in &batch.unrecognized {
                results.push(ActionResult::unrecognized(tag));
            }
        }

        // Transport failure across the board is a call-level failure
        if inference_errors.len() == sub_instructions.len() {
            return Err(inference_errors.remove(0));
        }

        let mutated = results.iter().any(ActionResult::is_mutation);
        Ok(CommandOutcome { results, mutated })
    }
}
