use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::PromptTemplate;
use super::provider::{ProviderAdapter, decode_response, to_body};
use super::response_parsing::non_blank;
use super::schema_validator::COMPLETION_CHOICES_RESPONSE_SCHEMA;

pub const DEFAULT_URL: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    model: String,
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::EditorInstruction
    }

    fn response_schema(&self) -> &'static str {
        COMPLETION_CHOICES_RESPONSE_SCHEMA
    }

    fn build_body(
        &self,
        prompt: String,
        request: &GenerationRequest,
    ) -> Result<Value, SuggestionError> {
        to_body(
            self.provider(),
            &OpenAiCompletionsRequest {
                model: &self.model,
                prompt,
                max_tokens: self.token_limit().resolve(request.max_tokens),
                temperature: request.temperature,
            },
        )
    }

    fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError> {
        extract_first_choice_text(self.provider(), response)
    }
}

#[derive(Debug, Serialize)]
struct OpenAiCompletionsRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: Option<String>,
}

/// Reads `choices[0].text` from an OpenAI-style completions response.
pub(super) fn extract_first_choice_text(
    provider: Provider,
    response: &Value,
) -> Result<Option<String>, SuggestionError> {
    let response: CompletionsResponse = decode_response(provider, response)?;
    Ok(response
        .choices
        .first()
        .and_then(|choice| choice.text.as_deref())
        .and_then(non_blank))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::OpenAiAdapter;
    use crate::domain::{ErrorKind, GenerationRequest};
    use crate::infra::llm::ProviderAdapter;

    #[test]
    fn build_body_carries_model_and_sampling_parameters() {
        let request = GenerationRequest::new("reverse a string in go");
        let body = OpenAiAdapter::new()
            .build_body("PROMPT".to_string(), &request)
            .expect("body should serialize");

        assert_eq!(
            body,
            json!({
                "model": "gpt-4",
                "prompt": "PROMPT",
                "max_tokens": 3000,
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn extract_text_reads_first_choice() {
        let response = json!({
            "id": "cmpl-1",
            "choices": [{ "index": 0, "text": "func reverse(s string) string {}", "finish_reason": "stop" }]
        });

        assert_eq!(
            OpenAiAdapter::new().extract_text(&response),
            Ok(Some("func reverse(s string) string {}".to_string()))
        );
    }

    #[test]
    fn extract_text_treats_missing_text_as_empty() {
        assert_eq!(
            OpenAiAdapter::new().extract_text(&json!({ "choices": [{ "index": 0 }] })),
            Ok(None)
        );
        assert_eq!(
            OpenAiAdapter::new().extract_text(&json!({ "choices": [] })),
            Ok(None)
        );
    }

    #[test]
    fn extract_text_rejects_undecodable_choices() {
        let error = OpenAiAdapter::new()
            .extract_text(&json!({ "choices": "nope" }))
            .expect_err("choices must be an array");

        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }
}
