//! The user directory seam.
//!
//! Token verification only ever *reads* identities; credential checking is
//! used once, at issuance. Implementations typically wrap a database or a
//! remote identity service. Active status must be looked up fresh on every
//! call so that deactivation takes effect on the next request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Failure of the directory itself (connection lost, backend down).
/// Not-found and inactive are expressed in-band, not as errors.
pub type DirectoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read-only view of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub active: bool,
}

/// Lookup and credential-check capability backing authentication.
///
/// Futures are `Send` so handlers built on this trait can run on the
/// multi-threaded runtime.
pub trait UserDirectory: Send + Sync {
    /// Look up an identity by id. Returns `None` when no such user exists.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Identity>, DirectoryError>> + Send;

    /// Verify a username/password pair. Returns the identity when the
    /// password matches, regardless of active status; the caller decides
    /// how to surface an inactive account.
    fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<Identity>, DirectoryError>> + Send;
}

struct StoredUser {
    identity: Identity,
    password: String,
}

/// In-memory directory for tests and the demo server.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    users: Arc<Mutex<HashMap<i64, StoredUser>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user. Passwords are held verbatim; this type is
    /// not meant for production storage.
    pub fn insert(&self, identity: Identity, password: &str) {
        self.users.lock().expect("directory lock poisoned").insert(
            identity.id,
            StoredUser {
                identity,
                password: password.to_string(),
            },
        );
    }

    /// Flip a user's active flag. Returns false when the user is unknown.
    pub fn set_active(&self, id: i64, active: bool) -> bool {
        match self
            .users
            .lock()
            .expect("directory lock poisoned")
            .get_mut(&id)
        {
            Some(user) => {
                user.identity.active = active;
                true
            }
            None => false,
        }
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Identity>, DirectoryError>> + Send {
        let users = self.users.clone();
        async move {
            Ok(users
                .lock()
                .expect("directory lock poisoned")
                .get(&id)
                .map(|user| user.identity.clone()))
        }
    }

    fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<Identity>, DirectoryError>> + Send {
        let users = self.users.clone();
        let username = username.to_string();
        let password = password.to_string();
        async move {
            Ok(users
                .lock()
                .expect("directory lock poisoned")
                .values()
                .find(|user| user.identity.username == username && user.password == password)
                .map(|user| user.identity.clone()))
        }
    }
}
