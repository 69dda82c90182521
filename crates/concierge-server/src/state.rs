use std::sync::Arc;

use concierge::providers::configs::{
    OllamaProviderConfig, OpenAiProviderConfig, ProviderConfig,
};
use concierge::sources::ProductStore;

use crate::configuration::SourceSettings;

/// Shared application state. The catalog is loaded once and shared read-only;
/// everything else is cheap configuration that each request clones.
pub struct AppState {
    pub provider_config: ProviderConfig,
    pub sources: SourceSettings,
    pub store: Arc<ProductStore>,
}

// Manual Clone implementation since we know ProviderConfig variants can be cloned
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            provider_config: match &self.provider_config {
                ProviderConfig::OpenAi(config) => ProviderConfig::OpenAi(OpenAiProviderConfig {
                    host: config.host.clone(),
                    api_key: config.api_key.clone(),
                    model: config.model.clone(),
                    temperature: config.temperature,
                    max_tokens: config.max_tokens,
                }),
                ProviderConfig::Ollama(config) => ProviderConfig::Ollama(OllamaProviderConfig {
                    host: config.host.clone(),
                    model: config.model.clone(),
                    temperature: config.temperature,
                    max_tokens: config.max_tokens,
                }),
            },
            sources: self.sources.clone(),
            store: Arc::clone(&self.store),
        }
    }
}
