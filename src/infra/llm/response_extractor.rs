use std::sync::Arc;

use serde_json::Value;

use crate::domain::{GenerationResult, Provider, SuggestionError};

use super::ProviderRegistry;

#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    registry: Arc<ProviderRegistry>,
}

impl ResponseExtractor {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Maps a raw provider body to a result. Output filters are not applied
    /// here; see [`ProviderEndpoint::apply_output_filters`](super::ProviderEndpoint::apply_output_filters).
    pub fn extract(&self, provider: Provider, raw_body: &Value) -> GenerationResult {
        let endpoint = match self.registry.lookup(provider) {
            Ok(endpoint) => endpoint,
            Err(_) => {
                return GenerationResult::from(SuggestionError::unsupported_provider(
                    provider.id(),
                ));
            }
        };

        match endpoint.extract_text(raw_body) {
            Ok(Some(text)) => GenerationResult::success(text),
            Ok(None) => GenerationResult::empty(no_suggestion_reason(provider)),
            Err(error) => GenerationResult::from(error),
        }
    }
}

pub fn no_suggestion_reason(provider: Provider) -> String {
    format!("no suggestion from {provider}")
}
