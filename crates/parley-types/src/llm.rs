//! LLM request/response types for Parley.
//!
//! Provider adapters take a [`GenerationRequest`] and answer with
//! `Result<Completion, LlmError>`. Safety-filter rejections are a distinct
//! variant so callers never have to sniff raw provider text.

use serde::{Deserialize, Serialize};

/// Marker the provider uses when a response was blocked for reciting
/// training data.
pub const RECITATION_MARKER: &str = "RECITATION";

/// Sampling parameters sent with every generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// A single-prompt generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

/// Successful generation from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text. May be empty if the provider returned no text parts.
    pub text: String,
    /// Name of the provider that produced the completion (e.g., "gemini").
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{message}")]
    Provider { message: String },

    #[error("response blocked: {reason}")]
    Filtered { reason: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// `message` carries the provider's own error text.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_ms: Option<u64>,
    },

    #[error("{message}")]
    AuthenticationFailed { message: String },

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl LlmError {
    /// Whether this error is a safety-filter rejection.
    ///
    /// True for [`LlmError::Filtered`] and for any error whose text carries
    /// the [`RECITATION_MARKER`].
    pub fn is_filtered(&self) -> bool {
        matches!(self, LlmError::Filtered { .. }) || self.to_string().contains(RECITATION_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_defaults() {
        let params = SamplingParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.9);
    }

    #[test]
    fn test_filtered_variant_is_filtered() {
        let err = LlmError::Filtered {
            reason: "SAFETY".to_string(),
        };
        assert!(err.is_filtered());
        assert_eq!(err.to_string(), "response blocked: SAFETY");
    }

    #[test]
    fn test_recitation_marker_anywhere_is_filtered() {
        let err = LlmError::Provider {
            message: "candidate finished with reason RECITATION".to_string(),
        };
        assert!(err.is_filtered());
    }

    #[test]
    fn test_plain_provider_error_is_not_filtered() {
        let err = LlmError::Provider {
            message: "HTTP 500: upstream exploded".to_string(),
        };
        assert!(!err.is_filtered());
        assert_eq!(err.to_string(), "HTTP 500: upstream exploded");
        assert!(
            !LlmError::AuthenticationFailed {
                message: "HTTP 401: API key expired".to_string()
            }
            .is_filtered()
        );
    }

    #[test]
    fn test_rate_limited_displays_provider_text() {
        let err = LlmError::RateLimited {
            message: "HTTP 429: quota exhausted".to_string(),
            retry_after_ms: None,
        };
        assert_eq!(err.to_string(), "HTTP 429: quota exhausted");
    }

    #[test]
    fn test_generation_request_flattens_sampling() {
        let req = GenerationRequest {
            model: "gemini-2.0-flash".to_string(),
            prompt: "hi".to_string(),
            sampling: SamplingParams::default(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["top_p"], 0.9);
    }
}
