use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::provider::{ProviderAdapter, TokenLimit, decode_response, to_body};
use super::response_parsing::non_blank;
use super::schema_validator::HUGGING_FACE_RESPONSE_SCHEMA;

pub const DEFAULT_URL: &str = "https://api-inference.huggingface.co/models/bigcode/starcoder";

/// Inference API generations are capped by the hosted model, not the caller.
pub const MAX_NEW_TOKENS: u32 = 5120;

#[derive(Debug, Default)]
pub struct HuggingFaceAdapter;

impl ProviderAdapter for HuggingFaceAdapter {
    fn provider(&self) -> Provider {
        Provider::HuggingFace
    }

    fn token_limit(&self) -> TokenLimit {
        TokenLimit::Fixed(MAX_NEW_TOKENS)
    }

    fn response_schema(&self) -> &'static str {
        HUGGING_FACE_RESPONSE_SCHEMA
    }

    fn build_body(
        &self,
        prompt: String,
        request: &GenerationRequest,
    ) -> Result<Value, SuggestionError> {
        to_body(
            self.provider(),
            &HuggingFaceRequest {
                inputs: prompt,
                parameters: HuggingFaceParameters {
                    max_new_tokens: self.token_limit().resolve(request.max_tokens),
                },
            },
        )
    }

    fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError> {
        let generations: Vec<HuggingFaceGeneration> = decode_response(self.provider(), response)?;
        Ok(generations
            .first()
            .and_then(|generation| generation.generated_text.as_deref())
            .and_then(non_blank))
    }
}

#[derive(Debug, Serialize)]
struct HuggingFaceRequest {
    inputs: String,
    parameters: HuggingFaceParameters,
}

#[derive(Debug, Serialize)]
struct HuggingFaceParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct HuggingFaceGeneration {
    #[serde(default)]
    generated_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{HuggingFaceAdapter, MAX_NEW_TOKENS};
    use crate::domain::GenerationRequest;
    use crate::infra::llm::ProviderAdapter;

    #[test]
    fn build_body_uses_fixed_token_limit() {
        let request = GenerationRequest::new("def add(a, b):").with_max_tokens(64);
        let body = HuggingFaceAdapter
            .build_body(request.snippet.clone(), &request)
            .expect("body should serialize");

        assert_eq!(
            body,
            json!({
                "inputs": "def add(a, b):",
                "parameters": { "max_new_tokens": MAX_NEW_TOKENS }
            })
        );
    }

    #[test]
    fn extract_text_reads_first_generation() {
        let response = json!([
            { "generated_text": "def add(a, b):\n    return a + b" },
            { "generated_text": "ignored" }
        ]);

        let text = HuggingFaceAdapter
            .extract_text(&response)
            .expect("well-formed response should decode");

        assert_eq!(text.as_deref(), Some("def add(a, b):\n    return a + b"));
    }

    #[test]
    fn extract_text_returns_none_for_empty_array_or_missing_field() {
        assert_eq!(HuggingFaceAdapter.extract_text(&json!([])), Ok(None));
        assert_eq!(
            HuggingFaceAdapter.extract_text(&json!([{ "score": 0.4 }])),
            Ok(None)
        );
    }
}
