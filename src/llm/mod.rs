//! Inference boundary
//!
//! Everything that talks to or interprets the external text-completion
//! service: the transport client, prompt construction, and the defensive
//! decoding of raw model output into typed actions.

pub mod client;
pub mod parser;
pub mod prompt;

pub use client::{Inference, InferenceClient};
pub use parser::{parse_actions, Action, ParsedBatch};
