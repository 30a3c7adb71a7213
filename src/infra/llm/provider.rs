use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::PromptTemplate;

/// How a provider treats the requested token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimit {
    /// The request's `max_tokens` is sent as-is.
    Configured,
    /// The provider always receives this limit; the request's value is ignored.
    Fixed(u32),
}

impl TokenLimit {
    pub fn resolve(self, requested: u32) -> u32 {
        match self {
            Self::Configured => requested,
            Self::Fixed(limit) => limit,
        }
    }

    pub fn honors_request(self) -> bool {
        matches!(self, Self::Configured)
    }
}

/// Request body builder and response-text extractor for one provider.
/// Both halves live on the same type so every provider that can be asked
/// for a suggestion can also have its answer read back.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    fn token_limit(&self) -> TokenLimit {
        TokenLimit::Configured
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::Raw
    }

    /// JSON Schema the raw response must satisfy before extraction.
    fn response_schema(&self) -> &'static str;

    fn build_body(
        &self,
        prompt: String,
        request: &GenerationRequest,
    ) -> Result<Value, SuggestionError>;

    /// Returns `Ok(None)` when the response is well formed but carries no
    /// generated text.
    fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError>;
}

pub(crate) fn to_body<T: serde::Serialize>(
    provider: Provider,
    payload: &T,
) -> Result<Value, SuggestionError> {
    serde_json::to_value(payload).map_err(|err| {
        SuggestionError::internal(format!("failed to serialize {provider} request body: {err}"))
    })
}

pub(crate) fn decode_response<'a, T: serde::Deserialize<'a>>(
    provider: Provider,
    response: &'a Value,
) -> Result<T, SuggestionError> {
    T::deserialize(response).map_err(|err| {
        SuggestionError::malformed(format!("{provider} response decode failed: {err}"))
    })
}
