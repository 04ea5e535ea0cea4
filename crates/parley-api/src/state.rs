//! Application state wiring the chat service to its infra implementations.

use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_infra::config::resolve_api_key;
use parley_infra::llm::create_provider;
use parley_infra::store::InMemoryChatStore;
use parley_infra::tokenizer::TiktokenCounter;
use parley_types::config::ServerConfig;

pub type ConcreteChatService = ChatService<InMemoryChatStore, TiktokenCounter>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the provider from config and the environment's API key, then wire
    /// the service.
    pub fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let provider = create_provider(&config, resolve_api_key())?;
        Self::with_provider(config, provider)
    }

    /// Wire the service around an already-built provider.
    pub fn with_provider(config: ServerConfig, provider: BoxLlmProvider) -> anyhow::Result<Self> {
        let counter = TiktokenCounter::cl100k()?;
        let chat_service = ChatService::new(InMemoryChatStore::new(), counter, provider)
            .with_default_model(config.default_model.clone());

        tracing::info!(
            provider = chat_service.provider_name(),
            default_model = chat_service.default_model(),
            "Chat service ready"
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
        })
    }
}
