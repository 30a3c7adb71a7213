use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationRequest, Provider, SuggestionError,
};
use crate::infra::env::{
    ConfigError, parse_max_tokens, parse_temperature, parse_timeout_seconds, read_env_var,
};
use crate::infra::llm::ProviderRegistry;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_MAX_TOKENS: &str = "CODEGINI_MAX_TOKENS";
pub const ENV_TEMPERATURE: &str = "CODEGINI_TEMPERATURE";
pub const ENV_TIMEOUT_SECS: &str = "CODEGINI_TIMEOUT_SECS";
pub const ENV_SECRETS_FILE: &str = "CODEGINI_SECRETS_FILE";

/// `CODEGINI_<PROVIDER>_URL`, e.g. `CODEGINI_AZURE_AI_URL`.
pub fn endpoint_url_env_var(provider: Provider) -> String {
    format!("CODEGINI_{}_URL", provider.env_token())
}

/// Settings read once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionConfig {
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
    pub endpoint_overrides: BTreeMap<Provider, String>,
    pub secrets_file: Option<PathBuf>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            endpoint_overrides: BTreeMap::new(),
            secrets_file: None,
        }
    }
}

impl SuggestionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(read_env_var)
    }

    /// Builds the config from an arbitrary variable source; unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MAX_TOKENS)? {
            config.max_tokens = parse_max_tokens(ENV_MAX_TOKENS, &value)?;
        }
        if let Some(value) = lookup(ENV_TEMPERATURE)? {
            config.temperature = parse_temperature(ENV_TEMPERATURE, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS)? {
            config.timeout = parse_timeout_seconds(ENV_TIMEOUT_SECS, &value)?;
        }
        for provider in Provider::ALL {
            let name = endpoint_url_env_var(provider);
            if let Some(url) = lookup(&name)?
                && !url.trim().is_empty()
            {
                config.endpoint_overrides.insert(provider, url.trim().to_string());
            }
        }
        config.secrets_file = lookup(ENV_SECRETS_FILE)?
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn request(&self, snippet: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(snippet)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    /// Default registry with any endpoint URL overrides applied.
    pub fn registry(&self) -> Result<ProviderRegistry, SuggestionError> {
        let mut registry = ProviderRegistry::with_defaults()?;
        for (provider, url) in &self.endpoint_overrides {
            registry.set_url(*provider, url.clone())?;
        }
        Ok(registry)
    }
}
