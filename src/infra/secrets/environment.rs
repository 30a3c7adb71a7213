use secrecy::SecretString;

use crate::domain::Provider;

use super::{SecretStore, SecretStoreError};

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Read-only store backed by `CODEGINI_<PROVIDER>_API_KEY` variables.
pub struct EnvSecretStore {
    lookup: Lookup,
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

pub fn api_key_env_var(provider: Provider) -> String {
    format!("CODEGINI_{}_API_KEY", provider.env_token())
}

impl SecretStore for EnvSecretStore {
    fn get(&self, provider: Provider) -> Result<Option<SecretString>, SecretStoreError> {
        Ok((self.lookup)(&api_key_env_var(provider))
            .filter(|value| !value.trim().is_empty())
            .map(SecretString::from))
    }

    fn store(&self, _provider: Provider, _credential: SecretString) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::ReadOnly)
    }

    fn delete(&self, _provider: Provider) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::{EnvSecretStore, api_key_env_var};
    use crate::domain::Provider;
    use crate::infra::secrets::{SecretStore, SecretStoreError};

    #[test]
    fn api_key_env_var_uses_provider_token() {
        assert_eq!(
            api_key_env_var(Provider::HuggingFace),
            "CODEGINI_HUGGINGFACE_API_KEY"
        );
        assert_eq!(api_key_env_var(Provider::AzureAi), "CODEGINI_AZURE_AI_API_KEY");
    }

    #[test]
    fn blank_values_are_treated_as_absent() {
        let store = EnvSecretStore::with_lookup(|_| Some("  ".to_string()));
        assert!(store.get(Provider::OpenAi).expect("lookup").is_none());
    }

    #[test]
    fn writes_are_rejected() {
        let store = EnvSecretStore::with_lookup(|_| None);

        assert!(matches!(
            store.store(Provider::OpenAi, SecretString::from("k".to_string())),
            Err(SecretStoreError::ReadOnly)
        ));
        assert!(matches!(
            store.delete(Provider::OpenAi),
            Err(SecretStoreError::ReadOnly)
        ));
    }
}
