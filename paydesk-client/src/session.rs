//! Session persistence
//!
//! The session is two keys in a key/value store: `auth_token` (opaque bearer
//! string) and `user` (JSON profile). A session counts as authenticated
//! whenever a token is stored.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use shared::models::{Role, User};

use crate::ClientResult;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";

/// Backing store for the session keys
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// One file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ensure the data directory exists
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        if !path.exists() {
            return None;
        }
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.ensure_dir()?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store (tests, ephemeral runs)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Raw view of the stored keys; either may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Session service shared (via `Arc`) by the HTTP client and the views
pub struct SessionStore {
    store: RwLock<Box<dyn KeyValueStore>>,
}

impl SessionStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: RwLock::new(Box::new(store)),
        }
    }

    /// Session persisted under `dir`
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(dir))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Both stored keys, each parsed independently
    pub fn get_auth(&self) -> AuthSnapshot {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let token = store.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = store.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .inspect_err(|e| tracing::warn!(error = %e, "Stored user profile is unreadable"))
                .ok()
        });
        AuthSnapshot { token, user }
    }

    /// Persist token and profile together
    pub fn set_auth(&self, token: &str, user: &User) -> ClientResult<()> {
        let profile = serde_json::to_string(user)?;
        let store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        store.set(TOKEN_KEY, token)?;
        store.set(USER_KEY, &profile)?;
        tracing::debug!(user_id = user.id, role = %user.role, "Session stored");
        Ok(())
    }

    /// Remove both keys
    pub fn clear_auth(&self) -> ClientResult<()> {
        let store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        store.remove(TOKEN_KEY)?;
        store.remove(USER_KEY)?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        self.get_auth().user
    }

    /// True when a profile is stored and its role is one of `roles`
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.user().is_some_and(|u| roles.contains(&u.role))
    }

    /// Complete session, if both keys are present
    pub fn load(&self) -> Option<Session> {
        let AuthSnapshot { token, user } = self.get_auth();
        Some(Session {
            token: token?,
            user: user?,
        })
    }

    pub fn save(&self, session: &Session) -> ClientResult<()> {
        self.set_auth(&session.token, &session.user)
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.clear_auth()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
