use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

use crate::domain::Provider;
use crate::infra::secrets::{SecretStore, SecretStoreError, api_key_env_var, first_available};

/// Where the host reads the snippet from.
///
/// Interactive prompts read the terminal through stdin, so they are only
/// offered when the snippet comes from a file. With stdin input everything
/// must be resolvable from flags and stored keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetSource {
    File(PathBuf),
    Stdin,
}

/// A value that is either known already or has to be asked for.
#[derive(Debug)]
pub enum Resolved<T> {
    Ready(T),
    NeedsPrompt,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("--provider is required when reading the snippet from stdin")]
    ProviderRequired,
    #[error("no API key for {provider}; run `codegini set-key {provider_id}` or set {env_var}")]
    MissingKey {
        provider: Provider,
        provider_id: &'static str,
        env_var: String,
    },
    #[error(transparent)]
    Store(#[from] SecretStoreError),
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },
}

impl SnippetSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdin,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    pub fn allows_prompts(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn resolve_provider(
        &self,
        requested: Option<Provider>,
    ) -> Result<Resolved<Provider>, InputError> {
        match requested {
            Some(provider) => Ok(Resolved::Ready(provider)),
            None if self.allows_prompts() => Ok(Resolved::NeedsPrompt),
            None => Err(InputError::ProviderRequired),
        }
    }

    /// Looks the key up in `stores` in order. A miss falls back to a prompt
    /// only when prompts are available.
    pub fn resolve_credential(
        &self,
        stores: &[&dyn SecretStore],
        provider: Provider,
    ) -> Result<Resolved<SecretString>, InputError> {
        if let Some(credential) = first_available(stores, provider)? {
            return Ok(Resolved::Ready(credential));
        }
        if self.allows_prompts() {
            return Ok(Resolved::NeedsPrompt);
        }
        Err(InputError::MissingKey {
            provider,
            provider_id: provider.id(),
            env_var: api_key_env_var(provider),
        })
    }

    pub fn read(&self) -> Result<String, InputError> {
        self.read_with(io::stdin().lock())
    }

    /// Reads the file, or all of `stdin` for [`SnippetSource::Stdin`].
    pub fn read_with<R: Read>(&self, mut stdin: R) -> Result<String, InputError> {
        match self {
            Self::File(path) => fs::read_to_string(path).map_err(|source| InputError::Read {
                origin: path.display().to_string(),
                source,
            }),
            Self::Stdin => {
                let mut source = String::new();
                stdin
                    .read_to_string(&mut source)
                    .map_err(|source| InputError::Read {
                        origin: "stdin".to_string(),
                        source,
                    })?;
                Ok(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use secrecy::{ExposeSecret, SecretString};

    use super::{InputError, Resolved, SnippetSource};
    use crate::domain::Provider;
    use crate::infra::secrets::{InMemorySecretStore, SecretStore};

    fn file_source() -> SnippetSource {
        SnippetSource::from_path(Some(PathBuf::from("src/lib.rs")))
    }

    #[test]
    fn stdin_input_requires_provider_flag() {
        let error = SnippetSource::Stdin
            .resolve_provider(None)
            .expect_err("stdin without --provider should fail");

        assert!(matches!(error, InputError::ProviderRequired));
        assert_eq!(
            error.to_string(),
            "--provider is required when reading the snippet from stdin"
        );
    }

    #[test]
    fn file_input_prompts_for_missing_provider() {
        assert!(matches!(
            file_source().resolve_provider(None),
            Ok(Resolved::NeedsPrompt)
        ));
        assert!(matches!(
            SnippetSource::Stdin.resolve_provider(Some(Provider::Cohere)),
            Ok(Resolved::Ready(Provider::Cohere))
        ));
    }

    #[test]
    fn stdin_input_without_stored_key_names_the_fix() {
        let empty = InMemorySecretStore::new();
        let stores: [&dyn SecretStore; 1] = [&empty];

        let error = SnippetSource::Stdin
            .resolve_credential(&stores, Provider::AzureAi)
            .expect_err("stdin without a stored key should fail");

        let message = error.to_string();
        assert!(message.starts_with("no API key for Azure AI"));
        assert!(message.contains("codegini set-key azure_ai"));
        assert!(message.contains("CODEGINI_AZURE_AI_API_KEY"));
    }

    #[test]
    fn stored_key_is_used_for_stdin_input() {
        let store = InMemorySecretStore::new();
        store
            .store(Provider::OpenAi, SecretString::from("stored-key".to_string()))
            .expect("store should succeed");
        let stores: [&dyn SecretStore; 1] = [&store];

        match SnippetSource::Stdin.resolve_credential(&stores, Provider::OpenAi) {
            Ok(Resolved::Ready(credential)) => {
                assert_eq!(credential.expose_secret(), "stored-key")
            }
            other => panic!("expected stored key, got {other:?}"),
        }
    }

    #[test]
    fn file_input_prompts_for_missing_key() {
        let empty = InMemorySecretStore::new();
        let stores: [&dyn SecretStore; 1] = [&empty];

        assert!(matches!(
            file_source().resolve_credential(&stores, Provider::Cohere),
            Ok(Resolved::NeedsPrompt)
        ));
    }

    #[test]
    fn read_with_takes_whole_stdin_or_the_file() {
        let piped = SnippetSource::Stdin
            .read_with(Cursor::new("fn main() {}\n"))
            .expect("stdin should be readable");
        assert_eq!(piped, "fn main() {}\n");

        let missing = SnippetSource::File(PathBuf::from("does/not/exist.rs"))
            .read_with(Cursor::new("ignored"))
            .expect_err("missing file should fail");
        assert!(missing.to_string().starts_with("failed to read does/not/exist.rs"));
    }
}
