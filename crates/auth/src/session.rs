//! Session and token store.
//!
//! [`SessionStore`] is the single owner of the persisted auth keys. Everything
//! else reads the session through it instead of poking at storage directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::{Role, TokenClaims, UserProfile, peek_claims};

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("storage file {0} is not a JSON object")]
    Corrupt(PathBuf),

    #[error("failed to serialize value: {0}")]
    Serialize(String),
}

/// Persistent string key/value storage with a change feed.
///
/// The change feed is a revision counter bumped on every write; subscribers
/// use it the way a browser tab listens for storage events.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn changes(&self) -> watch::Receiver<u64>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        (**self).changes()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<HashMap<String, String>>,
    revision: watch::Sender<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            revision: watch::Sender::new(0),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), value.to_string());
        }
        self.revision.send_modify(|r| *r += 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = match self.inner.write() {
            Ok(mut map) => map.remove(key).is_some(),
            Err(_) => false,
        };
        if removed {
            self.revision.send_modify(|r| *r += 1);
        }
        Ok(())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

/// JSON-file-backed store (one object of string values).
///
/// Writes go through to disk immediately. Writes made by another process are
/// picked up by [`FileStore::reload`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: RwLock<HashMap<String, String>>,
    revision: watch::Sender<u64>,
}

impl FileStore {
    /// Default location: `<data dir>/landacq/storage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("landacq").join("storage.json"))
    }

    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let map = read_map(&path)?;
        Ok(Self {
            path,
            inner: RwLock::new(map),
            revision: watch::Sender::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file; bumps the revision when the contents changed.
    pub fn reload(&self) -> Result<bool, StoreError> {
        let fresh = read_map(&self.path)?;
        let changed = match self.inner.write() {
            Ok(mut map) if *map != fresh => {
                *map = fresh;
                true
            }
            _ => false,
        };
        if changed {
            self.revision.send_modify(|r| *r += 1);
        }
        Ok(changed)
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let body = serde_json::to_string_pretty(map).map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, body).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Apply `f` to a copy of the map and swap it in only once it is on disk.
    fn mutate(&self, f: impl FnOnce(&mut HashMap<String, String>) -> bool) -> Result<(), StoreError> {
        {
            let mut map = match self.inner.write() {
                Ok(m) => m,
                Err(poisoned) => poisoned.into_inner(),
            };
            let mut next = map.clone();
            if !f(&mut next) {
                return Ok(());
            }
            self.persist(&next)?;
            *map = next;
        }
        self.revision.send_modify(|r| *r += 1);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.mutate(|map| {
            map.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.mutate(|map| map.remove(key).is_some())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

fn read_map(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let body = match std::fs::read_to_string(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };
    if body.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(&body).map_err(|_| StoreError::Corrupt(path.to_path_buf()))
}

/// Successful login payload as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A decoded bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub claims: TokenClaims,
}

impl Session {
    /// Decode a stored token; `None` when it carries no usable claims.
    pub fn from_token(token: &str) -> Option<Self> {
        peek_claims(token).map(|claims| Self {
            token: token.to_string(),
            claims,
        })
    }

    pub fn role(&self) -> Option<Role> {
        self.claims.role
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.claims.is_expired(now)
    }
}

/// Owner of the persisted session keys (`token`, `role`, `user`).
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a login response. Last writer wins.
    ///
    /// A failed write clears the session keys so no half-written session
    /// is left behind.
    pub fn establish(&self, grant: &LoginGrant) -> Result<(), StoreError> {
        if let Err(e) = self.write_grant(grant) {
            tracing::warn!(error = %e, "failed to persist session; clearing partial state");
            for key in [TOKEN_KEY, ROLE_KEY, USER_KEY] {
                let _ = self.store.remove(key);
            }
            return Err(e);
        }
        tracing::info!(role = grant.role.as_deref().unwrap_or("<none>"), "session established");
        Ok(())
    }

    fn write_grant(&self, grant: &LoginGrant) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, &grant.token)?;
        match grant.role.as_deref() {
            Some(role) => self.store.set(ROLE_KEY, role)?,
            None => self.store.remove(ROLE_KEY)?,
        }
        match &grant.user {
            Some(user) => {
                let body = serde_json::to_string(user).map_err(|e| StoreError::Serialize(e.to_string()))?;
                self.store.set(USER_KEY, &body)?;
            }
            None => self.store.remove(USER_KEY)?,
        }
        Ok(())
    }

    /// Remove every session key.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(ROLE_KEY)?;
        self.store.remove(USER_KEY)?;
        tracing::info!("session cleared");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Decoded session, expired or not; the guard decides what expiry means.
    pub fn current(&self) -> Option<Session> {
        self.token().and_then(|t| Session::from_token(&t))
    }

    /// Whether a token is stored at all (no decoding, no expiry check).
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Cached profile; an unparsable entry is logged and treated as absent.
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "cached user profile is not valid JSON");
                None
            }
        }
    }

    /// Role written at login (not decoded from the token).
    pub fn stored_role(&self) -> Option<String> {
        self.store.get(ROLE_KEY)
    }

    /// Chief-engineer check across the stored role and cached profile.
    pub fn is_admin(&self) -> bool {
        if self.stored_role().as_deref() == Some(Role::ChiefEngineer.as_str()) {
            return true;
        }
        self.profile().is_some_and(|p| p.is_admin())
    }

    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token(role: &str, exp: i64) -> String {
        let body = URL_SAFE_NO_PAD.encode(serde_json::json!({ "id": 1, "role": role, "exp": exp }).to_string());
        format!("h.{body}.s")
    }

    fn grant(role: &str) -> LoginGrant {
        LoginGrant {
            token: token(role, Utc::now().timestamp() + 3600),
            role: Some(role.to_string()),
            user: Some(UserProfile {
                first_name: Some("Ruwan".to_string()),
                role: Some(role.to_string()),
                ..Default::default()
            }),
            message: Some("Login successful".to_string()),
        }
    }

    #[test]
    fn establish_then_logout() {
        let sessions = SessionStore::new(InMemoryStore::new());
        assert!(sessions.current().is_none());

        sessions.establish(&grant("land_officer")).unwrap();
        let session = sessions.current().unwrap();
        assert_eq!(session.role(), Some(Role::LandOfficer));
        assert_eq!(sessions.profile().unwrap().display_name(), "Ruwan");
        assert!(!sessions.is_admin());

        sessions.logout().unwrap();
        assert!(!sessions.is_logged_in());
        assert!(sessions.profile().is_none());
        assert!(sessions.stored_role().is_none());
    }

    #[test]
    fn garbage_token_has_no_session() {
        let store = InMemoryStore::new();
        store.set(TOKEN_KEY, "garbage").unwrap();
        let sessions = SessionStore::new(store);
        assert!(sessions.is_logged_in());
        assert!(sessions.current().is_none());
    }

    #[test]
    fn corrupt_profile_reads_as_absent() {
        let store = InMemoryStore::new();
        store.set(USER_KEY, "{not json").unwrap();
        assert!(SessionStore::new(store).profile().is_none());
    }

    #[test]
    fn writes_bump_the_change_feed() {
        let sessions = SessionStore::new(InMemoryStore::new());
        let rx = sessions.changes();
        let before = *rx.borrow();
        sessions.establish(&grant("chief_engineer")).unwrap();
        assert!(*rx.borrow() > before);
        assert!(sessions.is_admin());
    }

    #[test]
    fn file_store_persists_and_reloads() {
        let dir = std::env::temp_dir().join(format!("landacq-store-{}", std::process::id()));
        let path = dir.join("storage.json");
        let _ = std::fs::remove_file(&path);

        let first = FileStore::open(&path).unwrap();
        first.set(TOKEN_KEY, "abc").unwrap();

        let second = FileStore::open(&path).unwrap();
        assert_eq!(second.get(TOKEN_KEY).as_deref(), Some("abc"));

        first.remove(TOKEN_KEY).unwrap();
        assert!(second.reload().unwrap());
        assert!(second.get(TOKEN_KEY).is_none());
        assert!(!second.reload().unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("landacq-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storage.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_file_write_leaves_memory_untouched() {
        let dir = std::env::temp_dir().join(format!("landacq-blocked-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let parent = dir.join("state");
        let store = FileStore::open(parent.join("storage.json")).unwrap();
        let rx = store.changes();

        // A plain file where the parent directory should be.
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&parent, "blocked").unwrap();

        assert!(matches!(store.set(TOKEN_KEY, "abc"), Err(StoreError::Io { .. })));
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(!rx.has_changed().unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Store that refuses writes to one key.
    struct RejectingStore {
        inner: InMemoryStore,
        reject: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.reject {
                return Err(StoreError::Io {
                    path: PathBuf::from("/dev/full"),
                    message: "no space left on device".to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }

        fn changes(&self) -> watch::Receiver<u64> {
            self.inner.changes()
        }
    }

    #[test]
    fn failed_establish_leaves_no_partial_session() {
        let sessions = SessionStore::new(RejectingStore {
            inner: InMemoryStore::new(),
            reject: ROLE_KEY,
        });
        assert!(sessions.establish(&grant("chief_engineer")).is_err());
        assert!(!sessions.is_logged_in());
        assert!(sessions.current().is_none());
        assert!(sessions.profile().is_none());
    }
}
