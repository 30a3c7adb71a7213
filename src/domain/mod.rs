mod errors;
mod generation_contract;
mod provider;

pub use errors::{ErrorKind, SuggestionError};
pub use generation_contract::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationRequest, GenerationResult, MAX_TEMPERATURE,
};
pub use provider::Provider;
