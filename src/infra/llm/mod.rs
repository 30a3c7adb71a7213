pub mod aws_llama;
pub mod azure;
pub mod cohere;
pub mod huggingface;
pub mod openai;
mod prompt_builder;
mod provider;
mod provider_registry;
mod request_adapter;
mod response_extractor;
pub mod response_parsing;
pub mod schema_validator;

pub use aws_llama::AwsLlamaAdapter;
pub use azure::AzureAiAdapter;
pub use cohere::CohereAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use openai::OpenAiAdapter;
pub use prompt_builder::{PromptBuilder, PromptTemplate};
pub use provider::{ProviderAdapter, TokenLimit};
pub use provider_registry::{AUTHORIZATION_HEADER, ProviderEndpoint, ProviderRegistry};
pub use request_adapter::{RequestAdapter, WireRequest};
pub use response_extractor::{ResponseExtractor, no_suggestion_reason};
pub use response_parsing::{OutputFilter, truncate_at_comment_open};
