use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::app::config::{DEFAULT_TIMEOUT, SuggestionConfig};
use crate::domain::{GenerationRequest, GenerationResult, Provider, SuggestionError};
use crate::infra::llm::response_parsing::{extract_error_message, truncate_message};
use crate::infra::llm::{
    ProviderRegistry, RequestAdapter, ResponseExtractor, WireRequest, no_suggestion_reason,
};

/// Turns a snippet into one provider call and a [`GenerationResult`].
///
/// Every failure is folded into [`GenerationResult::Failure`]; nothing is
/// retried.
#[derive(Clone)]
pub struct SuggestionService {
    registry: Arc<ProviderRegistry>,
    requests: RequestAdapter,
    extractor: ResponseExtractor,
    client: Client,
}

impl SuggestionService {
    pub fn new(registry: ProviderRegistry) -> Result<Self, SuggestionError> {
        Self::with_timeout(registry, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        registry: ProviderRegistry,
        timeout: Duration,
    ) -> Result<Self, SuggestionError> {
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            SuggestionError::internal(format!("failed to build HTTP client: {err}"))
        })?;
        let registry = Arc::new(registry);

        Ok(Self {
            requests: RequestAdapter::new(Arc::clone(&registry)),
            extractor: ResponseExtractor::new(Arc::clone(&registry)),
            registry,
            client,
        })
    }

    pub fn from_config(config: &SuggestionConfig) -> Result<Self, SuggestionError> {
        Self::with_timeout(config.registry()?, config.timeout)
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn generate(
        &self,
        provider: Provider,
        credential: &SecretString,
        request: GenerationRequest,
    ) -> GenerationResult {
        match self.try_generate(provider, credential, &request) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(
                    provider = provider.id(),
                    kind = ?error.kind(),
                    error = %error,
                    "suggestion failed"
                );
                GenerationResult::from(error)
            }
        }
    }

    fn try_generate(
        &self,
        provider: Provider,
        credential: &SecretString,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, SuggestionError> {
        request.validate()?;
        if credential.expose_secret().trim().is_empty() {
            return Err(SuggestionError::MissingCredential {
                provider: provider.to_string(),
            });
        }

        let endpoint = self.registry.lookup(provider)?;
        let wire = self.requests.build(provider, request)?;
        let raw_body = self.send(provider, endpoint.auth_header_name(), credential, &wire)?;

        let value = serde_json::from_str::<Value>(&raw_body).map_err(|err| {
            SuggestionError::malformed(format!("{provider} response is not JSON: {err}"))
        })?;

        Ok(match self.extractor.extract(provider, &value) {
            GenerationResult::Success { text } => {
                let filtered = endpoint.apply_output_filters(text);
                if filtered.trim().is_empty() {
                    GenerationResult::empty(no_suggestion_reason(provider))
                } else {
                    GenerationResult::success(filtered)
                }
            }
            other => other,
        })
    }

    fn send(
        &self,
        provider: Provider,
        auth_header_name: &str,
        credential: &SecretString,
        wire: &WireRequest,
    ) -> Result<String, SuggestionError> {
        let body = serde_json::to_vec(&wire.body).map_err(|err| {
            SuggestionError::internal(format!("failed to encode request body: {err}"))
        })?;

        let mut builder = self.client.post(&wire.url);
        for (name, value) in &wire.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.header(
            auth_header_name,
            format!("Bearer {}", credential.expose_secret()),
        );

        tracing::debug!(
            provider = provider.id(),
            url = %wire.url,
            "dispatching suggestion request"
        );
        let started = Instant::now();
        let response = builder
            .body(body)
            .send()
            .map_err(|err| map_transport_error(provider, err))?;

        let status = response.status();
        let response_body = response
            .text()
            .map_err(|err| map_transport_error(provider, err))?;
        tracing::debug!(
            provider = provider.id(),
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "provider responded"
        );

        if !status.is_success() {
            return Err(map_http_error(provider, status, &response_body));
        }
        Ok(response_body)
    }
}

fn map_http_error(provider: Provider, status: StatusCode, body: &str) -> SuggestionError {
    let message = extract_error_message(body).unwrap_or_else(|| truncate_message(body));
    if message.is_empty() {
        return SuggestionError::network(format!("{provider} returned HTTP {status}"));
    }
    SuggestionError::network(format!("{provider} returned HTTP {status}: {message}"))
}

fn map_transport_error(provider: Provider, error: reqwest::Error) -> SuggestionError {
    if error.is_timeout() {
        return SuggestionError::network(format!("{provider} request timed out"));
    }
    SuggestionError::network(format!("{provider} transport error: {error}"))
}
