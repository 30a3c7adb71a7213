use thiserror::Error;

/// Stable classification of a failed suggestion, carried by
/// [`GenerationResult::Failure`](super::GenerationResult::Failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownProvider,
    UnsupportedProvider,
    EmptyInput,
    InvalidRequest,
    MissingCredential,
    NetworkError,
    MalformedResponse,
    Internal,
}

impl ErrorKind {
    /// Whether a caller-driven retry could plausibly succeed. The service
    /// itself never retries.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("unknown provider '{name}'")]
    UnknownProvider { name: String },
    #[error("provider '{name}' has no request/response adapter")]
    UnsupportedProvider { name: String },
    #[error("snippet must not be empty")]
    EmptyInput,
    #[error("invalid generation request: {message}")]
    InvalidRequest { message: String },
    #[error("no API key available for {provider}")]
    MissingCredential { provider: String },
    #[error("provider request failed: {message}")]
    Network { message: String },
    #[error("provider returned a malformed response: {message}")]
    MalformedResponse { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl SuggestionError {
    pub fn unknown_provider(name: impl Into<String>) -> Self {
        Self::UnknownProvider { name: name.into() }
    }

    pub fn unsupported_provider(name: impl Into<String>) -> Self {
        Self::UnsupportedProvider { name: name.into() }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownProvider { .. } => ErrorKind::UnknownProvider,
            Self::UnsupportedProvider { .. } => ErrorKind::UnsupportedProvider,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::MissingCredential { .. } => ErrorKind::MissingCredential,
            Self::Network { .. } => ErrorKind::NetworkError,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Text shown to the person who asked for the suggestion.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownProvider { name } | Self::UnsupportedProvider { name } => {
                format!("'{name}' is not a supported LLM provider.")
            }
            Self::EmptyInput => "No code selected.".to_string(),
            Self::InvalidRequest { message } => {
                format!("Please review the generation settings: {message}")
            }
            Self::MissingCredential { provider } => {
                format!("No API key provided for {provider}.")
            }
            Self::Network { message } => {
                format!("Error fetching code suggestion: {message}")
            }
            Self::MalformedResponse { message } => {
                format!("The provider returned an unexpected response: {message}")
            }
            Self::Internal { message } => {
                format!("An internal error occurred while generating: {message}")
            }
        }
    }
}
