//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `parley-core`, a rate-limiting wrapper, and a factory
//! ([`create_provider`]) that wires them from a [`ServerConfig`].

pub mod gemini;
pub mod rate_limit;

use std::time::Duration;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_core::llm::provider::LlmProvider;
use parley_types::config::ServerConfig;
use parley_types::llm::{Completion, GenerationRequest, LlmError};

use self::gemini::GeminiProvider;
use self::rate_limit::RateLimitedProvider;

/// Stand-in used when no API key is available.
///
/// The server still starts; every chat turn fails with a provider error.
pub struct UnconfiguredProvider {
    reason: String,
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<Completion, LlmError> {
        Err(LlmError::NotConfigured(self.reason.clone()))
    }
}

/// Build the provider for the server: Gemini behind the rate limiter.
///
/// Without an API key, returns an [`UnconfiguredProvider`].
pub fn create_provider(
    config: &ServerConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let Some(api_key) = api_key else {
        tracing::warn!("GEMINI_API_KEY is not set; chat requests will fail");
        return Ok(BoxLlmProvider::new(UnconfiguredProvider {
            reason: "GEMINI_API_KEY is not set".to_string(),
        }));
    };

    let gemini = GeminiProvider::new(api_key, Duration::from_secs(config.request_timeout_secs))?
        .with_base_url(config.gemini_base_url.clone());

    let interval = Duration::try_from_secs_f64(config.rate_limit_secs).map_err(|e| {
        LlmError::NotConfigured(format!(
            "invalid rate limit {}: {e}",
            config.rate_limit_secs
        ))
    })?;
    Ok(BoxLlmProvider::new(RateLimitedProvider::new(gemini, interval)))
}
