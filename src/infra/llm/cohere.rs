use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GenerationRequest, Provider, SuggestionError};

use super::provider::{ProviderAdapter, decode_response, to_body};
use super::response_parsing::non_blank;
use super::schema_validator::COHERE_RESPONSE_SCHEMA;
use super::PromptTemplate;

pub const DEFAULT_URL: &str = "https://api.cohere.ai/v1/generate";
pub const DEFAULT_MODEL: &str = "command-r-08-2024";

const TOP_K: u32 = 5;
const TOP_P: f64 = 0.7;
const CITATION_QUALITY: &str = "low";

#[derive(Debug, Clone)]
pub struct CohereAdapter {
    model: String,
    citation_controls: bool,
}

impl Default for CohereAdapter {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            citation_controls: true,
        }
    }
}

impl CohereAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Omits `citation_quality`/`search_queries_only` from the request body.
    pub fn without_citation_controls(mut self) -> Self {
        self.citation_controls = false;
        self
    }
}

impl ProviderAdapter for CohereAdapter {
    fn provider(&self) -> Provider {
        Provider::Cohere
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::EditorInstruction
    }

    fn response_schema(&self) -> &'static str {
        COHERE_RESPONSE_SCHEMA
    }

    fn build_body(
        &self,
        prompt: String,
        request: &GenerationRequest,
    ) -> Result<Value, SuggestionError> {
        let payload = CohereGenerateRequest {
            model: &self.model,
            prompt,
            max_tokens: self.token_limit().resolve(request.max_tokens),
            temperature: request.temperature,
            k: TOP_K,
            p: TOP_P,
            citation_quality: self.citation_controls.then_some(CITATION_QUALITY),
            search_queries_only: self.citation_controls.then_some(false),
        };
        to_body(self.provider(), &payload)
    }

    fn extract_text(&self, response: &Value) -> Result<Option<String>, SuggestionError> {
        let response: CohereGenerateResponse = decode_response(self.provider(), response)?;
        Ok(response
            .generations
            .first()
            .and_then(|generation| generation.text.as_deref())
            .and_then(non_blank))
    }
}

#[derive(Debug, Serialize)]
struct CohereGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f64,
    k: u32,
    p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    citation_quality: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_queries_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CohereGenerateResponse {
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::CohereAdapter;
    use crate::domain::GenerationRequest;
    use crate::infra::llm::ProviderAdapter;

    fn request() -> GenerationRequest {
        GenerationRequest::new("write a haskell fib")
            .with_max_tokens(800)
            .with_temperature(0.4)
    }

    #[test]
    fn build_body_maps_sampling_and_citation_controls() {
        let body = CohereAdapter::new()
            .build_body("PROMPT".to_string(), &request())
            .expect("body should serialize");

        assert_eq!(
            body,
            json!({
                "model": "command-r-08-2024",
                "prompt": "PROMPT",
                "max_tokens": 800,
                "temperature": 0.4,
                "k": 5,
                "p": 0.7,
                "citation_quality": "low",
                "search_queries_only": false
            })
        );
    }

    #[test]
    fn build_body_can_drop_citation_controls() {
        let body = CohereAdapter::new()
            .without_citation_controls()
            .with_model("command-light")
            .build_body("PROMPT".to_string(), &request())
            .expect("body should serialize");

        assert_eq!(body["model"], "command-light");
        assert!(body.get("citation_quality").is_none());
        assert!(body.get("search_queries_only").is_none());
    }

    #[test]
    fn extract_text_reads_first_generation() {
        let response = json!({
            "id": "gen-1",
            "generations": [{ "id": "g-0", "text": "fib :: Int -> Int" }]
        });

        assert_eq!(
            CohereAdapter::new().extract_text(&response),
            Ok(Some("fib :: Int -> Int".to_string()))
        );
        assert_eq!(
            CohereAdapter::new().extract_text(&json!({ "generations": [] })),
            Ok(None)
        );
    }
}
