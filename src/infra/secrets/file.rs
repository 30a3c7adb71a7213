use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};

use crate::domain::Provider;

use super::{SecretStore, SecretStoreError, ensure_not_blank};

const DEFAULT_DIR: &str = ".codegini";
const DEFAULT_FILE: &str = "secrets.json";

/// JSON file of `{ "<provider id>": "<api key>" }`, owner-readable only on
/// Unix. A missing file is an empty store.
pub struct FileSecretStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `~/.codegini/secrets.json`, or `None` when no home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_DIR).join(DEFAULT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SecretStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(self.io_error(error)),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|err| SecretStoreError::Corrupt {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn write_all(&self, secrets: &BTreeMap<String, String>) -> Result<(), SecretStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }

        let encoded = serde_json::to_vec_pretty(secrets).map_err(|err| SecretStoreError::Corrupt {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|error| self.io_error(error))?;
        restrict_permissions(&staging).map_err(|error| self.io_error(error))?;
        fs::rename(&staging, &self.path).map_err(|error| self.io_error(error))
    }

    fn io_error(&self, source: std::io::Error) -> SecretStoreError {
        SecretStoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, provider: Provider) -> Result<Option<SecretString>, SecretStoreError> {
        let _guard = self.lock.lock().map_err(|_| SecretStoreError::Poisoned)?;
        let mut secrets = self.read_all()?;
        Ok(secrets.remove(provider.id()).map(SecretString::from))
    }

    fn store(&self, provider: Provider, credential: SecretString) -> Result<(), SecretStoreError> {
        ensure_not_blank(provider, &credential)?;
        let _guard = self.lock.lock().map_err(|_| SecretStoreError::Poisoned)?;
        let mut secrets = self.read_all()?;
        secrets.insert(
            provider.id().to_string(),
            credential.expose_secret().to_owned(),
        );
        self.write_all(&secrets)
    }

    fn delete(&self, provider: Provider) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock().map_err(|_| SecretStoreError::Poisoned)?;
        let mut secrets = self.read_all()?;
        if secrets.remove(provider.id()).is_none() {
            return Ok(());
        }
        self.write_all(&secrets)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
