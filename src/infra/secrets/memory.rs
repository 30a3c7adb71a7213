use std::collections::HashMap;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};

use crate::domain::Provider;

use super::{SecretStore, SecretStoreError, ensure_not_blank};

/// Process-lifetime store for tests and embedding hosts that own persistence.
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<HashMap<Provider, SecretString>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for InMemorySecretStore {
    fn get(&self, provider: Provider) -> Result<Option<SecretString>, SecretStoreError> {
        let secrets = self.secrets.lock().map_err(|_| SecretStoreError::Poisoned)?;
        Ok(secrets
            .get(&provider)
            .map(|secret| SecretString::from(secret.expose_secret().to_owned())))
    }

    fn store(&self, provider: Provider, credential: SecretString) -> Result<(), SecretStoreError> {
        ensure_not_blank(provider, &credential)?;
        self.secrets
            .lock()
            .map_err(|_| SecretStoreError::Poisoned)?
            .insert(provider, credential);
        Ok(())
    }

    fn delete(&self, provider: Provider) -> Result<(), SecretStoreError> {
        self.secrets
            .lock()
            .map_err(|_| SecretStoreError::Poisoned)?
            .remove(&provider);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};

    use super::InMemorySecretStore;
    use crate::domain::Provider;
    use crate::infra::secrets::{SecretStore, SecretStoreError};

    #[test]
    fn store_get_and_delete_round_trip() {
        let store = InMemorySecretStore::new();
        store
            .store(Provider::Cohere, SecretString::from("co-key".to_string()))
            .expect("store should succeed");

        let loaded = store
            .get(Provider::Cohere)
            .expect("get should succeed")
            .expect("key should be present");
        assert_eq!(loaded.expose_secret(), "co-key");

        store.delete(Provider::Cohere).expect("delete should succeed");
        assert!(store.get(Provider::Cohere).expect("get").is_none());
    }

    #[test]
    fn store_overwrites_existing_key() {
        let store = InMemorySecretStore::new();
        store
            .store(Provider::OpenAi, SecretString::from("old".to_string()))
            .expect("store should succeed");
        store
            .store(Provider::OpenAi, SecretString::from("new".to_string()))
            .expect("store should succeed");

        let loaded = store.get(Provider::OpenAi).expect("get").expect("present");
        assert_eq!(loaded.expose_secret(), "new");
    }

    #[test]
    fn store_rejects_blank_credential() {
        let store = InMemorySecretStore::new();
        let error = store
            .store(Provider::AzureAi, SecretString::from("   ".to_string()))
            .expect_err("blank key should fail");

        assert!(matches!(
            error,
            SecretStoreError::EmptyCredential {
                provider: Provider::AzureAi
            }
        ));
    }

    #[test]
    fn delete_missing_key_is_a_no_op() {
        let store = InMemorySecretStore::new();
        assert!(store.delete(Provider::HuggingFace).is_ok());
    }
}
