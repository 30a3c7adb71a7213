//! Per-provider API key storage.
//!
//! The suggestion core only ever calls [`SecretStore::get`] right before a
//! request; storing and deleting keys is driven by the host.

mod environment;
mod file;
mod memory;

use secrecy::SecretString;
use thiserror::Error;

use crate::domain::Provider;

pub use environment::{EnvSecretStore, api_key_env_var};
pub use file::FileSecretStore;
pub use memory::InMemorySecretStore;

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("secret store is read-only")]
    ReadOnly,
    #[error("secret store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("secret store file {path} is corrupt: {message}")]
    Corrupt { path: String, message: String },
    #[error("API key for {provider} must not be empty")]
    EmptyCredential { provider: Provider },
    #[error("secret store lock poisoned")]
    Poisoned,
}

/// One opaque credential per provider.
pub trait SecretStore: Send + Sync {
    fn get(&self, provider: Provider) -> Result<Option<SecretString>, SecretStoreError>;

    fn store(&self, provider: Provider, credential: SecretString) -> Result<(), SecretStoreError>;

    fn delete(&self, provider: Provider) -> Result<(), SecretStoreError>;
}

/// Looks `provider` up in each store in order and returns the first hit.
pub fn first_available(
    stores: &[&dyn SecretStore],
    provider: Provider,
) -> Result<Option<SecretString>, SecretStoreError> {
    for store in stores {
        if let Some(credential) = store.get(provider)? {
            return Ok(Some(credential));
        }
    }
    Ok(None)
}

fn ensure_not_blank(provider: Provider, credential: &SecretString) -> Result<(), SecretStoreError> {
    use secrecy::ExposeSecret;

    if credential.expose_secret().trim().is_empty() {
        return Err(SecretStoreError::EmptyCredential { provider });
    }
    Ok(())
}
