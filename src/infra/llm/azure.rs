use serde::Serialize;
use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::PromptTemplate;
use super::openai::extract_first_choice_text;
use super::provider::{ProviderAdapter, to_body};
use super::schema_validator::COMPLETION_CHOICES_RESPONSE_SCHEMA;

/// Deployment-specific; override with `CODEGINI_AZURE_AI_URL`.
pub const DEFAULT_URL: &str = "https://deepsolv.openai.azure.com";

#[derive(Debug, Default)]
pub struct AzureAiAdapter;

impl ProviderAdapter for AzureAiAdapter {
    fn provider(&self) -> Provider {
        Provider::AzureAi
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::CodeOnly
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
            &AzureCompletionsRequest {
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
struct AzureCompletionsRequest {
    prompt: String,
    max_tokens: u32,
    temperature: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AzureAiAdapter;
    use crate::domain::GenerationRequest;
    use crate::infra::llm::{PromptTemplate, ProviderAdapter};

    #[test]
    fn uses_code_only_template_and_user_parameters() {
        let request = GenerationRequest::new("x")
            .with_max_tokens(256)
            .with_temperature(1.5);
        let body = AzureAiAdapter
            .build_body("PROMPT".to_string(), &request)
            .expect("body should serialize");

        assert_eq!(AzureAiAdapter.prompt_template(), PromptTemplate::CodeOnly);
        assert_eq!(
            body,
            json!({ "prompt": "PROMPT", "max_tokens": 256, "temperature": 1.5 })
        );
    }

    #[test]
    fn extract_text_reads_first_choice() {
        let response = json!({ "choices": [{ "text": "SELECT 1;" }] });

        assert_eq!(
            AzureAiAdapter.extract_text(&response),
            Ok(Some("SELECT 1;".to_string()))
        );
    }
}
