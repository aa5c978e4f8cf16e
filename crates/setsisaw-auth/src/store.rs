//! Credential store abstraction.
//!
//! The session manager reads accounts only through [`CredentialStore`].
//! Relational persistence lives outside this crate; [`InMemoryCredentialStore`]
//! backs the API binary and the tests.

use async_trait::async_trait;
use setsisaw_core::UserId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

/// Stored account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// PHC-formatted Argon2id hash.
    pub password_hash: String,
    /// Role name as persisted. Parsed by the caller, may be unrecognized.
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Account to be created. The password is already hashed.
#[derive(Clone)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Credential store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend could not be reached or answered with an error.
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    /// Username or email already belongs to another account.
    #[error("Username or email is already taken")]
    Conflict,
}

/// Read and create access to stored credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by username.
    ///
    /// Returns `Ok(None)` when no such account exists.
    async fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Create an account, assigning it a fresh identifier.
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` if the username or email is taken.
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError>;
}

/// Process-local credential store.
///
/// Identifiers are assigned from an increasing counter starting at 1.
#[derive(Debug)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    ///
    /// Simulates a backend outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store marked unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError> {
        self.check_available()?;

        let mut records = self.records.write().await;
        let taken = records.contains_key(&credential.username)
            || records.values().any(|r| r.email == credential.email);
        if taken {
            return Err(StoreError::Conflict);
        }

        let record = CredentialRecord {
            user_id: UserId::from(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: credential.username,
            email: credential.email,
            password_hash: credential.password_hash,
            role: credential.role,
            first_name: credential.first_name,
            last_name: credential.last_name,
        };
        records.insert(record.username.clone(), record.clone());

        Ok(record)
    }
}
