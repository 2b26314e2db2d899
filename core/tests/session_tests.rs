// tests/session_tests.rs
mod common;

use common::*;
use parking_lot::Mutex;
use serial_test::serial;
use std::sync::Arc;
use storefront::{FileBackend, MemoryBackend, MergePolicy, Session, SessionBackend, SessionStore, StoreError};

#[tokio::test]
#[serial]
async fn login_and_logout_are_written_through() {
  setup_tracing();
  let backend = Arc::new(MemoryBackend::default());
  let store = SessionStore::open(Arc::clone(&backend)).unwrap();
  assert!(!store.is_authenticated());

  store.set_user_identity("a@b.com").unwrap();
  store.login("T1").unwrap();
  assert!(store.is_authenticated());
  assert_eq!(store.token().as_deref(), Some("T1"));
  assert_eq!(
    backend.saved(),
    Session {
      token: Some("T1".to_string()),
      user_email: Some("a@b.com".to_string()),
    }
  );

  store.logout().unwrap();
  assert!(!store.is_authenticated());
  assert_eq!(store.token(), None);
  // The contact identity outlives the token.
  assert_eq!(store.user_email().as_deref(), Some("a@b.com"));
  assert_eq!(backend.saved().token, None);
}

#[tokio::test]
#[serial]
async fn file_backend_restores_session_across_restarts() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("session.json");

  {
    let store = SessionStore::open(FileBackend::new(&path)).unwrap();
    store.set_user_identity("a@b.com").unwrap();
    store.login("T1").unwrap();
  }

  let restored = SessionStore::open(FileBackend::new(&path)).unwrap();
  assert_eq!(restored.token().as_deref(), Some("T1"));
  assert_eq!(restored.user_email().as_deref(), Some("a@b.com"));

  restored.logout().unwrap();
  let after_logout = SessionStore::open(FileBackend::new(&path)).unwrap();
  assert!(!after_logout.is_authenticated());
  assert_eq!(after_logout.user_email().as_deref(), Some("a@b.com"));
}

#[tokio::test]
#[serial]
async fn file_backend_uses_fixed_key_names() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("session.json");

  let store = SessionStore::open(FileBackend::new(&path)).unwrap();
  store.set_user_identity("someone@example.com").unwrap();
  store.login("abc").unwrap();

  let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
  assert_eq!(raw["token"], "abc");
  assert_eq!(raw["user_email"], "someone@example.com");
}

#[tokio::test]
#[serial]
async fn missing_file_is_an_empty_session() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let backend = FileBackend::new(dir.path().join("never-written.json"));

  assert_eq!(backend.load().unwrap(), Session::default());
  let store = SessionStore::open(backend).unwrap();
  assert!(!store.is_authenticated());
  assert_eq!(store.user_email(), None);
}

#[tokio::test]
#[serial]
async fn corrupt_file_is_reported() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("session.json");
  std::fs::write(&path, "{ not json").unwrap();

  let err = SessionStore::open(FileBackend::new(&path)).unwrap_err();
  assert!(matches!(err, StoreError::SessionFormat { path: ref p, .. } if p == &path));
}

#[tokio::test]
#[serial]
async fn failed_durable_write_still_updates_memory() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  // A directory where the file should be.
  let path = dir.path().join("occupied");
  std::fs::create_dir(&path).unwrap();

  let failing = SessionStore::open(FileBackend::new(&path));
  // Reading a directory is an I/O error too.
  assert!(matches!(failing, Err(StoreError::SessionStorage { .. })));

  let writer = Arc::new(FailingBackend);
  let store = SessionStore::open(Arc::clone(&writer)).unwrap();
  let err = store.login("T9").unwrap_err();
  assert!(matches!(err, StoreError::SessionStorage { .. }));
  assert_eq!(store.token().as_deref(), Some("T9"));
}

#[tokio::test]
#[serial]
async fn sign_in_stores_token_and_email_in_one_write() {
  setup_tracing();
  let mock = MockApi::start(MockBehaviour {
    login_token: Some("T1".to_string()),
    ..MockBehaviour::default()
  })
  .await;
  let backend = Arc::new(RecordingBackend::default());
  let session = Arc::new(SessionStore::open(Arc::clone(&backend)).unwrap());
  let storefront = mock.storefront_with_session(MergePolicy::default(), session);

  storefront.login("a@b.com", "x").await.unwrap();

  let writes = backend.writes.lock().clone();
  assert_eq!(
    writes,
    vec![Session {
      token: Some("T1".to_string()),
      user_email: Some("a@b.com".to_string()),
    }]
  );
}

#[tokio::test]
#[serial]
async fn sign_in_with_unwritable_storage_reports_a_storage_error() {
  setup_tracing();
  let mock = MockApi::start(MockBehaviour {
    login_token: Some("T1".to_string()),
    ..MockBehaviour::default()
  })
  .await;
  let session = Arc::new(SessionStore::open(FailingBackend).unwrap());
  let storefront = mock.storefront_with_session(MergePolicy::default(), session);

  let err = storefront.login("a@b.com", "x").await.unwrap_err();
  assert!(matches!(err, StoreError::SessionStorage { .. }), "{err}");
  // Memory holds the whole identity, never a token without its email.
  assert_eq!(storefront.session().token().as_deref(), Some("T1"));
  assert_eq!(storefront.session().user_email().as_deref(), Some("a@b.com"));
}

#[tokio::test]
#[serial]
async fn memory_backend_restores_a_seeded_session() {
  setup_tracing();
  let seeded = Session {
    token: Some("T0".to_string()),
    user_email: Some("seed@b.com".to_string()),
  };
  let store = SessionStore::open(MemoryBackend::with_session(seeded.clone())).unwrap();

  assert!(store.is_authenticated());
  assert_eq!(store.snapshot(), seeded);
}

#[derive(Debug, Default)]
struct RecordingBackend {
  writes: Mutex<Vec<Session>>,
}

impl SessionBackend for RecordingBackend {
  fn load(&self) -> storefront::StoreResult<Session> {
    Ok(Session::default())
  }

  fn save(&self, session: &Session) -> storefront::StoreResult<()> {
    self.writes.lock().push(session.clone());
    Ok(())
  }
}

#[derive(Debug)]
struct FailingBackend;

impl SessionBackend for FailingBackend {
  fn load(&self) -> storefront::StoreResult<Session> {
    Ok(Session::default())
  }

  fn save(&self, _session: &Session) -> storefront::StoreResult<()> {
    Err(StoreError::SessionStorage {
      path: "unwritable".into(),
      source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
    })
  }
}
