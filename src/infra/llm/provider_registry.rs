use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::request_adapter::WireRequest;
use super::response_parsing::OutputFilter;
use super::schema_validator::ResponseSchemaValidator;
use super::{
    AwsLlamaAdapter, AzureAiAdapter, CohereAdapter, HuggingFaceAdapter, OpenAiAdapter,
    PromptBuilder, ProviderAdapter, aws_llama, azure, cohere, huggingface, openai,
};

pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Everything needed to talk to one provider: where, how to authorize, how
/// to shape the body and how to read the answer back.
#[derive(Clone)]
pub struct ProviderEndpoint {
    provider: Provider,
    url: String,
    auth_header_name: String,
    adapter: Arc<dyn ProviderAdapter>,
    schema: Arc<ResponseSchemaValidator>,
    output_filters: Vec<OutputFilter>,
}

impl ProviderEndpoint {
    pub fn new<A>(url: impl Into<String>, adapter: A) -> Result<Self, SuggestionError>
    where
        A: ProviderAdapter + 'static,
    {
        Self::from_shared(url, Arc::new(adapter))
    }

    pub fn from_shared(
        url: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Result<Self, SuggestionError> {
        let url = url.into();
        let provider = adapter.provider();
        if url.trim().is_empty() {
            return Err(SuggestionError::internal(format!(
                "endpoint URL for {provider} must not be empty"
            )));
        }
        let schema = ResponseSchemaValidator::new(adapter.response_schema())?;

        Ok(Self {
            provider,
            url: url.trim().to_string(),
            auth_header_name: AUTHORIZATION_HEADER.to_string(),
            adapter,
            schema: Arc::new(schema),
            output_filters: Vec::new(),
        })
    }

    /// The built-in endpoint for `provider`.
    pub fn default_for(provider: Provider) -> Result<Self, SuggestionError> {
        match provider {
            Provider::HuggingFace => Ok(Self::new(huggingface::DEFAULT_URL, HuggingFaceAdapter)?
                .with_output_filter(OutputFilter::TruncateAtCommentOpen)),
            Provider::Cohere => Self::new(cohere::DEFAULT_URL, CohereAdapter::new()),
            Provider::OpenAi => Self::new(openai::DEFAULT_URL, OpenAiAdapter::new()),
            Provider::AwsLlama => Self::new(aws_llama::DEFAULT_URL, AwsLlamaAdapter),
            Provider::AzureAi => Self::new(azure::DEFAULT_URL, AzureAiAdapter),
        }
    }

    pub fn with_auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self
    }

    pub fn with_output_filter(mut self, filter: OutputFilter) -> Self {
        if !self.output_filters.contains(&filter) {
            self.output_filters.push(filter);
        }
        self
    }

    pub fn without_output_filters(mut self) -> Self {
        self.output_filters.clear();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth_header_name(&self) -> &str {
        &self.auth_header_name
    }

    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    pub fn output_filters(&self) -> &[OutputFilter] {
        &self.output_filters
    }

    pub fn build_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<WireRequest, SuggestionError> {
        let prompt = PromptBuilder::build(self.adapter.prompt_template(), &request.snippet);
        let body = self.adapter.build_body(prompt, request)?;
        Ok(WireRequest::json(self.url.clone(), body))
    }

    pub fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError> {
        self.schema.validate(response)?;
        self.adapter.extract_text(response)
    }

    pub fn apply_output_filters(&self, text: String) -> String {
        self.output_filters
            .iter()
            .fold(text, |text, filter| filter.apply(&text))
    }
}

impl fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("provider", &self.provider)
            .field("url", &self.url)
            .field("auth_header_name", &self.auth_header_name)
            .field("token_limit", &self.adapter.token_limit())
            .field("output_filters", &self.output_filters)
            .finish_non_exhaustive()
    }
}

/// Provider-to-endpoint table. Built once at startup and shared read-only.
#[derive(Debug, Default, Clone)]
pub struct ProviderRegistry {
    endpoints: HashMap<Provider, ProviderEndpoint>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in endpoint for every known provider.
    pub fn with_defaults() -> Result<Self, SuggestionError> {
        let mut registry = Self::new();
        for provider in Provider::ALL {
            registry.register(ProviderEndpoint::default_for(provider)?)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, endpoint: ProviderEndpoint) -> Result<(), SuggestionError> {
        let provider = endpoint.provider();
        if self.endpoints.contains_key(&provider) {
            return Err(SuggestionError::internal(format!(
                "provider '{}' is already registered",
                provider.id()
            )));
        }

        self.endpoints.insert(provider, endpoint);
        Ok(())
    }

    /// Points a registered provider at a different base URL, keeping its
    /// adapter and filters.
    pub fn set_url(
        &mut self,
        provider: Provider,
        url: impl Into<String>,
    ) -> Result<(), SuggestionError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(SuggestionError::internal(format!(
                "endpoint URL for {provider} must not be empty"
            )));
        }
        let endpoint = self
            .endpoints
            .get_mut(&provider)
            .ok_or_else(|| SuggestionError::unknown_provider(provider.id()))?;
        endpoint.url = url.trim().to_string();
        Ok(())
    }

    pub fn lookup(&self, provider: Provider) -> Result<&ProviderEndpoint, SuggestionError> {
        self.endpoints
            .get(&provider)
            .ok_or_else(|| SuggestionError::unknown_provider(provider.id()))
    }

    /// Resolves a free-form provider name, as typed by a user.
    pub fn lookup_name(&self, name: &str) -> Result<&ProviderEndpoint, SuggestionError> {
        let provider = name.parse::<Provider>()?;
        self.lookup(provider)
    }

    pub fn providers(&self) -> Vec<Provider> {
        let mut providers = self.endpoints.keys().copied().collect::<Vec<_>>();
        providers.sort();
        providers
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
