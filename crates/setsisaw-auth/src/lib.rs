//! Authentication and authorization library for setsisaw.
//!
//! This crate provides:
//! - HS256 token encoding and decoding with username, id and role claims
//! - Argon2id password hashing with OWASP-recommended parameters
//! - A credential store abstraction with an in-memory implementation
//! - A session manager that issues, validates and refreshes tokens
//! - Role entitlement checks over the `USER < EDITOR < ADMIN` hierarchy
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use setsisaw_auth::{InMemoryCredentialStore, SessionConfig, SessionManager, SigningSecret};
//! use setsisaw_core::{Role, UserId};
//!
//! let manager = SessionManager::new(
//!     SigningSecret::new("change-me").unwrap(),
//!     SessionConfig::default(),
//!     Arc::new(InMemoryCredentialStore::new()),
//! );
//!
//! let token = manager.issue_token("alice", &UserId::from("1"), Role::User).unwrap();
//! let claims = manager.get_claims(&token).unwrap();
//!
//! assert_eq!(claims.username, "alice");
//! assert!(manager.is_entitled(&claims, Role::User));
//! assert!(!manager.is_entitled(&claims, Role::Editor));
//! ```

mod claims;
mod entitlement;
mod error;
mod jwt;
mod password;
mod session;
mod store;

// Re-export public API
pub use claims::{Claims, ClaimsBuilder};
pub use entitlement::{is_entitled, is_role_name_entitled};
pub use error::{AuthError, AuthErrorKind, RegistrationError, TokenError};
pub use jwt::{decode_token, decode_token_at, encode_token, SigningSecret, ValidationConfig};
pub use password::{hash_password, verify_password, PasswordHasher};
pub use session::{
    NewAccount, SessionConfig, SessionManager, DEFAULT_REFRESH_WINDOW_SECS,
    DEFAULT_TOKEN_LIFETIME_SECS,
};
pub use store::{
    CredentialRecord, CredentialStore, InMemoryCredentialStore, NewCredential, StoreError,
};
