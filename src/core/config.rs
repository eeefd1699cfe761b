//! Inference configuration with documented constants
//!
//! The values that shape every completion request are collected here with
//! explanations of their purpose and how they interact.

use std::time::Duration;

/// Configuration for the inference transport
///
/// These values keep model output small, near-deterministic, and bounded
/// in time. Changing them affects how tolerant the parser has to be.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Model identifier sent with every completion request
    pub model: String,

    /// Upper bound on generated tokens per request
    ///
    /// One sub-instruction produces one single-line JSON array; 512 tokens
    /// covers a dozen actions with headroom.
    pub max_output_tokens: u32,

    /// Sampling temperature
    ///
    /// Near-zero so the same instruction reliably yields the same action
    /// array. Higher values make the parser's job harder for no benefit.
    pub temperature: f32,

    /// Per-request deadline
    ///
    /// A request still in flight past this point fails with
    /// `InferenceTimeout` for that sub-instruction only.
    pub request_timeout: Duration,

    /// Sequences at which the service must stop generating
    ///
    /// The array is requested on a single line, so stopping at the first
    /// newline bounds output to one logical record per sub-instruction.
    pub stop_sequences: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-haiku-20240307".into(),
            max_output_tokens: 512,
            temperature: 0.1,
            request_timeout: Duration::from_secs(20),
            stop_sequences: vec!["\n".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_bounded() {
        let config = InferenceConfig::default();
        assert!(config.max_output_tokens <= 1024);
        assert!(config.temperature < 0.5);
        assert_eq!(config.stop_sequences, vec!["\n".to_string()]);
    }
}
