use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::provider::{ProviderAdapter, decode_response, to_body};
use super::response_parsing::non_blank;
use super::schema_validator::AWS_LLAMA_RESPONSE_SCHEMA;

pub const DEFAULT_URL: &str = "https://api.aws.com/v1/generate";

#[derive(Debug, Default)]
pub struct AwsLlamaAdapter;

impl ProviderAdapter for AwsLlamaAdapter {
    fn provider(&self) -> Provider {
        Provider::AwsLlama
    }

    fn response_schema(&self) -> &'static str {
        AWS_LLAMA_RESPONSE_SCHEMA
    }

    fn build_body(
        &self,
        prompt: String,
        request: &GenerationRequest,
    ) -> Result<Value, SuggestionError> {
        to_body(
            self.provider(),
            &AwsLlamaRequest {
                prompt,
                max_tokens: self.token_limit().resolve(request.max_tokens),
                temperature: request.temperature,
            },
        )
    }

    fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError> {
        let response: AwsLlamaResponse = decode_response(self.provider(), response)?;
        Ok(response.output.as_deref().and_then(non_blank))
    }
}

#[derive(Debug, Serialize)]
struct AwsLlamaRequest {
    prompt: String,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct AwsLlamaResponse {
    #[serde(default)]
    output: Option<String>,
}
