use super::{ErrorKind, SuggestionError};

pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const MAX_TEMPERATURE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub snippet: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl GenerationRequest {
    pub fn new(snippet: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn validate(&self) -> Result<(), SuggestionError> {
        if self.snippet.trim().is_empty() {
            return Err(SuggestionError::EmptyInput);
        }
        if self.max_tokens == 0 {
            return Err(SuggestionError::invalid_request(
                "max_tokens must be greater than 0",
            ));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(SuggestionError::invalid_request(format!(
                "temperature must be in 0.0..=2.0 (got {})",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Outcome of a single suggestion attempt. Either a full suggestion is
/// returned or none is.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success { text: String },
    Empty { reason: String },
    Failure { kind: ErrorKind, message: String },
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn empty(reason: impl Into<String>) -> Self {
        Self::Empty {
            reason: reason.into(),
        }
    }

    /// Carries the error's user-facing message; the technical form is logged
    /// by the service.
    pub fn failure(error: &SuggestionError) -> Self {
        Self::Failure {
            kind: error.kind(),
            message: error.user_message(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<SuggestionError> for GenerationResult {
    fn from(error: SuggestionError) -> Self {
        Self::failure(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationRequest, GenerationResult};
    use crate::domain::{ErrorKind, SuggestionError};

    #[test]
    fn new_request_uses_documented_defaults() {
        let request = GenerationRequest::new("fn main() {}");

        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_snippet() {
        let error = GenerationRequest::new(" \n\t ")
            .validate()
            .expect_err("blank snippet should fail");

        assert_eq!(error, SuggestionError::EmptyInput);
    }

    #[test]
    fn validate_rejects_out_of_range_parameters() {
        let zero_tokens = GenerationRequest::new("x")
            .with_max_tokens(0)
            .validate()
            .expect_err("zero max_tokens should fail");
        assert!(matches!(
            zero_tokens,
            SuggestionError::InvalidRequest { message } if message == "max_tokens must be greater than 0"
        ));

        let too_hot = GenerationRequest::new("x")
            .with_temperature(2.5)
            .validate()
            .expect_err("temperature above 2.0 should fail");
        assert_eq!(too_hot.kind(), ErrorKind::InvalidRequest);

        let negative = GenerationRequest::new("x")
            .with_temperature(-0.1)
            .validate()
            .expect_err("negative temperature should fail");
        assert_eq!(negative.kind(), ErrorKind::InvalidRequest);

        assert!(GenerationRequest::new("x").with_temperature(2.0).validate().is_ok());
    }

    #[test]
    fn failure_result_carries_error_kind_and_message() {
        let result = GenerationResult::from(SuggestionError::network("connection refused"));

        assert_eq!(result.failure_kind(), Some(ErrorKind::NetworkError));
        assert!(result.text().is_none());
        assert!(matches!(
            result,
            GenerationResult::Failure { message, .. }
            if message == "Error fetching code suggestion: connection refused"
        ));

        let empty = GenerationResult::from(SuggestionError::EmptyInput);
        assert!(matches!(
            empty,
            GenerationResult::Failure { kind: ErrorKind::EmptyInput, message }
            if message == "No code selected."
        ));
    }
}
