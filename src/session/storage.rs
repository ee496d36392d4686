//! Durable session state.
//!
//! Exactly two keys survive a process restart: the bearer token and the
//! active role. The token lives in the OS keychain; the role lives in the
//! preferences file alongside the rest of the client settings. Identity is
//! never persisted -- it is re-established by the next login.

use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use tracing::{debug, warn};

use crate::error::SkillWalletError;

use super::types::Role;

const KEYCHAIN_SERVICE: &str = "skillwallet";
const KEYCHAIN_USER: &str = "bearer-token";
const ROLE_KEY: &str = "active_role";

/// Durable key-value backend for the two persisted session fields.
pub trait SessionStorage: Send + Sync {
    fn load_token(&self) -> Result<Option<String>, SkillWalletError>;
    fn store_token(&self, token: &str) -> Result<(), SkillWalletError>;
    fn clear_token(&self) -> Result<(), SkillWalletError>;

    fn load_role(&self) -> Result<Option<Role>, SkillWalletError>;
    fn store_role(&self, role: &Role) -> Result<(), SkillWalletError>;
    fn clear_role(&self) -> Result<(), SkillWalletError>;
}

/// Production storage: token in the OS keychain, role in the preferences
/// JSON file.
pub struct KeychainStorage {
    preferences_path: PathBuf,
}

impl KeychainStorage {
    pub fn new(preferences_path: PathBuf) -> Self {
        Self { preferences_path }
    }

    fn token_entry() -> Result<Entry, SkillWalletError> {
        Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_USER).map_err(|e| {
            warn!("Failed to create keyring entry: {}", e);
            SkillWalletError::Storage(e.to_string())
        })
    }

    /// Read the preferences file, tolerating a missing or unparseable one.
    fn read_preferences(&self) -> serde_json::Map<String, serde_json::Value> {
        let content = match std::fs::read_to_string(&self.preferences_path) {
            Ok(c) => c,
            Err(e) => {
                debug!(
                    "Could not read preferences at {:?}: {}",
                    self.preferences_path, e
                );
                return serde_json::Map::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(
                    "Preferences at {:?} are not a JSON object, starting fresh",
                    self.preferences_path
                );
                serde_json::Map::new()
            }
        }
    }

    fn write_preferences(
        &self,
        preferences: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), SkillWalletError> {
        if let Some(parent) = self.preferences_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SkillWalletError::Storage(format!("Failed to create preferences dir: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| SkillWalletError::Storage(format!("Failed to serialize preferences: {}", e)))?;
        std::fs::write(&self.preferences_path, json).map_err(|e| {
            SkillWalletError::Storage(format!(
                "Failed to write preferences to {:?}: {}",
                self.preferences_path, e
            ))
        })
    }
}

impl SessionStorage for KeychainStorage {
    fn load_token(&self) -> Result<Option<String>, SkillWalletError> {
        match Self::token_entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!("Failed to read token from keychain: {}", e);
                Err(SkillWalletError::Storage(e.to_string()))
            }
        }
    }

    fn store_token(&self, token: &str) -> Result<(), SkillWalletError> {
        Self::token_entry()?.set_password(token).map_err(|e| {
            warn!("Failed to store token in keychain: {}", e);
            SkillWalletError::Storage(e.to_string())
        })
    }

    fn clear_token(&self) -> Result<(), SkillWalletError> {
        match Self::token_entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!("Failed to delete token from keychain: {}", e);
                Err(SkillWalletError::Storage(e.to_string()))
            }
        }
    }

    fn load_role(&self) -> Result<Option<Role>, SkillWalletError> {
        let preferences = self.read_preferences();
        let role = preferences
            .get(ROLE_KEY)
            .and_then(|v| v.as_str())
            .map(|s| Role::from(s.to_string()));
        Ok(role)
    }

    fn store_role(&self, role: &Role) -> Result<(), SkillWalletError> {
        let mut preferences = self.read_preferences();
        preferences.insert(
            ROLE_KEY.to_string(),
            serde_json::Value::String(role.as_str().to_string()),
        );
        self.write_preferences(&preferences)
    }

    fn clear_role(&self) -> Result<(), SkillWalletError> {
        let mut preferences = self.read_preferences();
        if preferences.remove(ROLE_KEY).is_some() {
            self.write_preferences(&preferences)?;
        }
        Ok(())
    }
}

/// Storage that keeps both keys in memory. Used by tests and by shells
/// that manage persistence themselves.
#[derive(Default)]
pub struct InMemoryStorage {
    token: Mutex<Option<String>>,
    role: Mutex<Option<Role>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemoryStorage {
    fn load_token(&self) -> Result<Option<String>, SkillWalletError> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn store_token(&self, token: &str) -> Result<(), SkillWalletError> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SkillWalletError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }

    fn load_role(&self) -> Result<Option<Role>, SkillWalletError> {
        Ok(self.role.lock().unwrap().clone())
    }

    fn store_role(&self, role: &Role) -> Result<(), SkillWalletError> {
        *self.role.lock().unwrap() = Some(role.clone());
        Ok(())
    }

    fn clear_role(&self) -> Result<(), SkillWalletError> {
        *self.role.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_role_round_trip_through_preferences_file() {
        let dir = TempDir::new().unwrap();
        let storage = KeychainStorage::new(dir.path().join("preferences.json"));

        assert_eq!(storage.load_role().unwrap(), None);
        storage.store_role(&Role::Parent).unwrap();
        assert_eq!(storage.load_role().unwrap(), Some(Role::Parent));

        storage.clear_role().unwrap();
        assert_eq!(storage.load_role().unwrap(), None);
    }

    #[test]
    fn test_store_role_preserves_other_preferences() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();

        let storage = KeychainStorage::new(path.clone());
        storage.store_role(&Role::Student).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["active_role"], "Student");
    }

    #[test]
    fn test_corrupt_preferences_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = KeychainStorage::new(path);
        assert_eq!(storage.load_role().unwrap(), None);
        storage.store_role(&Role::Student).unwrap();
        assert_eq!(storage.load_role().unwrap(), Some(Role::Student));
    }

    #[test]
    fn test_in_memory_storage_round_trip() {
        let storage = InMemoryStorage::new();
        storage.store_token("tok-123").unwrap();
        storage.store_role(&Role::Student).unwrap();

        assert_eq!(storage.load_token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(storage.load_role().unwrap(), Some(Role::Student));

        storage.clear_token().unwrap();
        storage.clear_role().unwrap();
        assert_eq!(storage.load_token().unwrap(), None);
        assert_eq!(storage.load_role().unwrap(), None);
    }
}
