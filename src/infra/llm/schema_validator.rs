use jsonschema::JSONSchema;
use serde_json::Value;

use crate::domain::SuggestionError;

pub const HUGGING_FACE_RESPONSE_SCHEMA: &str = r#"
{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "array",
  "items": {
    "type": "object",
    "properties": {
      "generated_text": { "type": ["string", "null"] }
    }
  }
}
"#;

pub const COHERE_RESPONSE_SCHEMA: &str = r#"
{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["generations"],
  "properties": {
    "generations": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "text": { "type": ["string", "null"] }
        }
      }
    }
  }
}
"#;

/// Shared by OpenAI-style completion APIs (OpenAI, Azure AI).
pub const COMPLETION_CHOICES_RESPONSE_SCHEMA: &str = r#"
{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["choices"],
  "properties": {
    "choices": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "text": { "type": ["string", "null"] }
        }
      }
    }
  }
}
"#;

pub const AWS_LLAMA_RESPONSE_SCHEMA: &str = r#"
{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["output"],
  "properties": {
    "output": { "type": ["string", "null"] }
  }
}
"#;

/// Checks the top-level shape of a provider response before it is decoded.
/// Shape violations surface as `MalformedResponse`, never as an empty result.
pub struct ResponseSchemaValidator {
    compiled_schema: JSONSchema,
}

impl ResponseSchemaValidator {
    pub fn new(schema: &str) -> Result<Self, SuggestionError> {
        let schema: Value = serde_json::from_str(schema).map_err(|err| {
            SuggestionError::internal(format!("invalid built-in response schema: {err}"))
        })?;
        let compiled_schema = JSONSchema::compile(&schema).map_err(|err| {
            SuggestionError::internal(format!("failed to compile response schema: {err}"))
        })?;
        Ok(Self { compiled_schema })
    }

    pub fn validate(&self, response: &Value) -> Result<(), SuggestionError> {
        self.compiled_schema
            .validate(response)
            .map_err(schema_validation_error)
    }
}

fn schema_validation_error<'a, I>(errors: I) -> SuggestionError
where
    I: IntoIterator<Item = jsonschema::ValidationError<'a>>,
{
    let details = errors
        .into_iter()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    SuggestionError::malformed(format!("response schema validation failed: {details}"))
}
