// core/src/session.rs

//! The session store: the authentication token and the user's contact email,
//! kept in memory and mirrored to a durable backend on every change.
//!
//! A `SessionStore` is built once at start-up and handed to the
//! [`ApiClient`](crate::client::ApiClient); nothing reads the token from a
//! global.

use crate::error::{StoreError, StoreResult};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Authenticated identity context. No token means unauthenticated.
///
/// Serialized with the fixed key names `token` and `user_email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub token: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_email: Option<String>,
}

impl Session {
  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }
}

/// Durable storage for the session.
pub trait SessionBackend: Debug + Send + Sync {
  /// Reads the persisted session; an absent record is an empty session.
  fn load(&self) -> StoreResult<Session>;

  fn save(&self, session: &Session) -> StoreResult<()>;
}

/// Keeps the session as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
  path: PathBuf,
}

impl FileBackend {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn io_error(&self, source: std::io::Error) -> StoreError {
    StoreError::SessionStorage {
      path: self.path.clone(),
      source,
    }
  }
}

impl SessionBackend for FileBackend {
  fn load(&self) -> StoreResult<Session> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "No persisted session found.");
        return Ok(Session::default());
      }
      Err(e) => return Err(self.io_error(e)),
    };
    serde_json::from_str(&raw).map_err(|source| StoreError::SessionFormat {
      path: self.path.clone(),
      source,
    })
  }

  fn save(&self, session: &Session) -> StoreResult<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
    }
    let body = serde_json::to_vec_pretty(session).map_err(|source| StoreError::SessionFormat {
      path: self.path.clone(),
      source,
    })?;
    std::fs::write(&self.path, body).map_err(|e| self.io_error(e))
  }
}

/// Process-local backend; whatever was last saved is kept until drop.
#[derive(Debug, Default)]
pub struct MemoryBackend {
  saved: Mutex<Session>,
}

impl MemoryBackend {
  pub fn with_session(session: Session) -> Self {
    Self {
      saved: Mutex::new(session),
    }
  }

  /// The last session written through this backend.
  pub fn saved(&self) -> Session {
    self.saved.lock().clone()
  }
}

impl SessionBackend for MemoryBackend {
  fn load(&self) -> StoreResult<Session> {
    Ok(self.saved.lock().clone())
  }

  fn save(&self, session: &Session) -> StoreResult<()> {
    *self.saved.lock() = session.clone();
    Ok(())
  }
}

impl<B: SessionBackend + ?Sized> SessionBackend for Arc<B> {
  fn load(&self) -> StoreResult<Session> {
    (**self).load()
  }

  fn save(&self, session: &Session) -> StoreResult<()> {
    (**self).save(session)
  }
}

#[derive(Debug)]
pub struct SessionStore {
  state: RwLock<Session>,
  backend: Box<dyn SessionBackend>,
}

impl SessionStore {
  /// Restores the persisted session from `backend`.
  pub fn open(backend: impl SessionBackend + 'static) -> StoreResult<Self> {
    let restored = backend.load()?;
    info!(authenticated = restored.is_authenticated(), "Session restored.");
    Ok(Self {
      state: RwLock::new(restored),
      backend: Box::new(backend),
    })
  }

  pub fn in_memory() -> Self {
    Self {
      state: RwLock::new(Session::default()),
      backend: Box::new(MemoryBackend::default()),
    }
  }

  /// Stores `token` and marks the session authenticated.
  #[instrument(name = "SessionStore::login", skip_all)]
  pub fn login(&self, token: impl Into<String>) -> StoreResult<()> {
    self.update(|s| s.token = Some(token.into()))?;
    info!("Session authenticated.");
    Ok(())
  }

  /// Stores the token and the user email together, in a single durable write.
  #[instrument(name = "SessionStore::sign_in", skip_all)]
  pub fn sign_in(&self, token: impl Into<String>, email: impl Into<String>) -> StoreResult<()> {
    self.update(|s| {
      s.token = Some(token.into());
      s.user_email = Some(email.into());
    })?;
    info!("Session authenticated.");
    Ok(())
  }

  /// Clears the token. The stored user email is left in place.
  #[instrument(name = "SessionStore::logout", skip_all)]
  pub fn logout(&self) -> StoreResult<()> {
    self.update(|s| s.token = None)?;
    info!("Session token cleared.");
    Ok(())
  }

  /// Records the contact email used on order requests. Not validated.
  pub fn set_user_identity(&self, email: impl Into<String>) -> StoreResult<()> {
    self.update(|s| s.user_email = Some(email.into()))
  }

  pub fn token(&self) -> Option<String> {
    self.state.read().token.clone()
  }

  pub fn user_email(&self) -> Option<String> {
    self.state.read().user_email.clone()
  }

  pub fn is_authenticated(&self) -> bool {
    self.state.read().is_authenticated()
  }

  pub fn snapshot(&self) -> Session {
    self.state.read().clone()
  }

  // Memory first, then the durable write; a failed write leaves memory updated.
  fn update(&self, change: impl FnOnce(&mut Session)) -> StoreResult<()> {
    let persisted = {
      let mut guard = self.state.write();
      change(&mut guard);
      guard.clone()
    };
    self.backend.save(&persisted)
  }
}
