//! Session manager.
//!
//! Issues, validates and refreshes tokens, and checks credentials against a
//! [`CredentialStore`]. Holds no per-session state: every token is verified
//! from its signature and expiry alone.
//!
//! Token lifecycle: issued, valid, refreshable once at most
//! [`SessionConfig::refresh_window`] remains, expired. There is no revoked
//! state.

use crate::claims::Claims;
use crate::entitlement;
use crate::error::{AuthError, RegistrationError};
use crate::jwt::{decode_token_at, encode_token, SigningSecret, ValidationConfig};
use crate::password::PasswordHasher;
use crate::store::{CredentialRecord, CredentialStore, NewCredential, StoreError};
use chrono::{DateTime, Duration, Utc};
use setsisaw_core::{Role, UserId};
use std::sync::Arc;

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 300;

/// Default refresh window in seconds.
pub const DEFAULT_REFRESH_WINDOW_SECS: i64 = 60;

/// Token timing settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Validity of a freshly issued token.
    pub lifetime: Duration,
    /// A token may be refreshed once its remaining lifetime is at most this.
    pub refresh_window: Duration,
    /// Clock skew tolerance applied when validating expiry, in seconds.
    pub leeway: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
            refresh_window: Duration::seconds(DEFAULT_REFRESH_WINDOW_SECS),
            leeway: 0,
        }
    }
}

/// Account details supplied at sign-up.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Why a credential check failed. Logged, never returned to callers.
#[derive(Debug)]
enum CredentialFailure {
    UnknownUser,
    WrongPassword { user_id: UserId },
    StoreFault(StoreError),
}

/// Token issuance and verification for route handlers.
pub struct SessionManager {
    secret: SigningSecret,
    config: SessionConfig,
    validation: ValidationConfig,
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl SessionManager {
    /// Create a session manager.
    #[must_use]
    pub fn new(
        secret: SigningSecret,
        config: SessionConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let validation = ValidationConfig::with_leeway(config.leeway);
        let hasher = PasswordHasher::new();
        hasher.prepare_decoy();
        Self {
            secret,
            config,
            validation,
            store,
            hasher,
        }
    }

    /// Replace the password hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        hasher.prepare_decoy();
        self.hasher = hasher;
        self
    }

    /// Check a username and password.
    ///
    /// Returns `false` alike for an unknown user, a wrong password and a store
    /// fault. The cause is logged.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.check_credentials(username, password).await {
            Ok(_) => true,
            Err(failure) => {
                log_failure(username, &failure);
                false
            }
        }
    }

    /// Authenticate and issue a token for the account.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.sign_in_at(username, password, Utc::now()).await
    }

    /// [`Self::sign_in`] as of `now`.
    ///
    /// # Errors
    ///
    /// - `AuthError::AuthenticationFailed` - Credentials were not accepted
    /// - `AuthError::RoleUnavailable` - Stored role is not a known role
    /// - `AuthError::Internal` - Token could not be signed
    pub async fn sign_in_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let record = match self.check_credentials(username, password).await {
            Ok(record) => record,
            Err(failure) => {
                log_failure(username, &failure);
                return Err(AuthError::AuthenticationFailed);
            }
        };

        let role: Role = record.role.parse().map_err(|_| {
            tracing::warn!(
                user_id = %record.user_id,
                role = %record.role,
                "Stored role is not a known role"
            );
            AuthError::RoleUnavailable
        })?;

        let token = self.issue_token_at(&record.username, &record.user_id, role, now)?;
        tracing::info!(user_id = %record.user_id, "User signed in");

        Ok(token)
    }

    /// Issue a signed token valid for the configured lifetime.
    pub fn issue_token(
        &self,
        username: &str,
        user_id: &UserId,
        role: Role,
    ) -> Result<String, AuthError> {
        self.issue_token_at(username, user_id, role, Utc::now())
    }

    /// [`Self::issue_token`] as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` on a signing-key fault or when the
    /// configured lifetime pushes the expiry out of range.
    pub fn issue_token_at(
        &self,
        username: &str,
        user_id: &UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims::issue(username, user_id.clone(), role, now, self.config.lifetime)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to build token claims"))?;
        self.sign(&claims)
    }

    /// Validate a token and return its claims.
    pub fn get_claims(&self, token: &str) -> Result<Claims, AuthError> {
        self.get_claims_at(token, Utc::now())
    }

    /// [`Self::get_claims`] as of `now`.
    pub fn get_claims_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        decode_token_at(token, &self.secret, now, &self.validation)
            .map_err(AuthError::from_validation)
    }

    /// Exchange a token close to expiry for a fresh one.
    pub fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
        self.refresh_token_at(token, Utc::now())
    }

    /// [`Self::refresh_token`] as of `now`.
    ///
    /// The new token carries the same identity and role, expiring one full
    /// lifetime after `now`.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidSignature` - Signature verification failed
    /// - `AuthError::MalformedToken` - Token is structurally invalid
    /// - `AuthError::RefreshExpired` - Token has already expired
    /// - `AuthError::TooEarly` - More than the refresh window remains
    /// - `AuthError::Internal` - New expiry out of range or signing fault
    pub fn refresh_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = decode_token_at(token, &self.secret, now, &self.validation)
            .map_err(AuthError::from_refresh_validation)?;

        // Leeway tolerates skew on validation, never on refresh.
        if claims.is_expired_at(now) {
            return Err(AuthError::RefreshExpired);
        }

        let remaining = claims.remaining_at(now);
        if remaining > self.config.refresh_window {
            tracing::debug!(
                user_id = %claims.id,
                remaining_secs = remaining.num_seconds(),
                "Refresh requested before window"
            );
            return Err(AuthError::TooEarly {
                remaining_secs: remaining.num_seconds(),
                window_secs: self.config.refresh_window.num_seconds(),
            });
        }

        let renewed = claims
            .renewed_at(now, self.config.lifetime)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to renew token claims"))?;
        self.sign(&renewed)
    }

    /// Check whether the token holder's role meets `required`.
    #[must_use]
    pub fn is_entitled(&self, claims: &Claims, required: Role) -> bool {
        entitlement::is_entitled(claims, required)
    }

    /// Create an account with role `USER`.
    ///
    /// # Errors
    ///
    /// - `RegistrationError::MissingField` - Username, email or password is empty
    ///
    /// An empty password is refused even though only username and email are
    /// mandatory profile fields: an account must be able to sign in.
    /// - `RegistrationError::Conflict` - Username or email is taken
    /// - `RegistrationError::Internal` - Hashing or store fault
    pub async fn sign_up(&self, account: NewAccount) -> Result<CredentialRecord, RegistrationError> {
        if account.username.trim().is_empty() {
            return Err(RegistrationError::MissingField("username"));
        }
        if account.email.trim().is_empty() {
            return Err(RegistrationError::MissingField("email"));
        }
        if account.password.is_empty() {
            return Err(RegistrationError::MissingField("password"));
        }

        let password_hash = self.hasher.hash(&account.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            RegistrationError::Internal(e.to_string())
        })?;

        let record = self
            .store
            .insert(NewCredential {
                username: account.username,
                email: account.email,
                password_hash,
                role: Role::User.to_string(),
                first_name: account.first_name,
                last_name: account.last_name,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict => RegistrationError::Conflict,
                StoreError::Unavailable(detail) => {
                    tracing::error!(error = %detail, "Credential store insert failed");
                    RegistrationError::Internal(detail)
                }
            })?;

        tracing::info!(user_id = %record.user_id, "User signed up");
        Ok(record)
    }

    /// Fetch the stored account for a username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` on a store fault.
    pub async fn account(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        self.store.lookup(username).await.map_err(|e| {
            tracing::error!(error = %e, "Credential lookup failed");
            AuthError::Internal(e.to_string())
        })
    }

    async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialRecord, CredentialFailure> {
        match self.store.lookup(username).await {
            Ok(Some(record)) => {
                if self.hasher.verify(password, &record.password_hash) {
                    Ok(record)
                } else {
                    Err(CredentialFailure::WrongPassword {
                        user_id: record.user_id,
                    })
                }
            }
            Ok(None) => {
                self.hasher.verify_decoy(password);
                Err(CredentialFailure::UnknownUser)
            }
            Err(e) => {
                self.hasher.verify_decoy(password);
                Err(CredentialFailure::StoreFault(e))
            }
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode_token(claims, &self.secret).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            AuthError::from_validation(e)
        })
    }
}

fn log_failure(username: &str, failure: &CredentialFailure) {
    match failure {
        CredentialFailure::UnknownUser => {
            tracing::debug!(username = %username, "Sign-in attempt for unknown user");
        }
        CredentialFailure::WrongPassword { user_id } => {
            tracing::debug!(user_id = %user_id, "Invalid password attempt");
        }
        CredentialFailure::StoreFault(e) => {
            tracing::error!(error = %e, "Credential lookup failed during sign-in");
        }
    }
}
