use std::fmt;
use std::str::FromStr;

use super::SuggestionError;

/// A third-party LLM HTTP API that can produce suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    HuggingFace,
    Cohere,
    OpenAi,
    AwsLlama,
    AzureAi,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Self::HuggingFace,
        Self::Cohere,
        Self::OpenAi,
        Self::AwsLlama,
        Self::AzureAi,
    ];

    /// Stable identifier used for secret keys, env vars and CLI arguments.
    pub fn id(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Cohere => "cohere",
            Self::OpenAi => "openai",
            Self::AwsLlama => "aws_llama",
            Self::AzureAi => "azure_ai",
        }
    }

    /// Human-facing name shown in provider pickers and messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::HuggingFace => "Hugging Face",
            Self::Cohere => "Cohere",
            Self::OpenAi => "OpenAI GPT-4",
            Self::AwsLlama => "AWS Llama",
            Self::AzureAi => "Azure AI",
        }
    }

    /// Upper-case id for environment variable names, e.g. `AWS_LLAMA`.
    pub fn env_token(self) -> String {
        self.id().to_ascii_uppercase()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Provider {
    type Err = SuggestionError;

    /// Accepts the id, the display label, or a common alias, ignoring case
    /// and separators.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "cohere" => Ok(Self::Cohere),
            "openai" | "openaigpt4" | "gpt4" => Ok(Self::OpenAi),
            "awsllama" | "aws" | "llama" => Ok(Self::AwsLlama),
            "azureai" | "azure" => Ok(Self::AzureAi),
            _ => Err(SuggestionError::unknown_provider(value.trim())),
        }
    }
}
