use std::sync::Arc;

use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::ProviderRegistry;

/// A provider request ready to be sent. Authorization is attached at send
/// time so the credential never lives in this value.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub url: String,
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl WireRequest {
    pub fn json(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            body,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RequestAdapter {
    registry: Arc<ProviderRegistry>,
}

impl RequestAdapter {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn build(
        &self,
        provider: Provider,
        request: &GenerationRequest,
    ) -> Result<WireRequest, SuggestionError> {
        let endpoint = self
            .registry
            .lookup(provider)
            .map_err(|_| SuggestionError::unsupported_provider(provider.id()))?;
        endpoint.build_request(request)
    }
}
