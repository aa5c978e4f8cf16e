//! Token claims.
//!
//! Provides the [`Claims`] struct carried inside every signed token: who the
//! caller is (`username`, `id`), what they may do (`role`) and how long the
//! token is good for (`iat`, `exp`).

use crate::error::AuthError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use setsisaw_core::{Role, UserId};

/// Claims carried by a signed token.
///
/// Claims are immutable once issued. Refreshing derives a new value through
/// [`Claims::renewed_at`] instead of changing an existing one.
///
/// # Wire format
///
/// - `username`: account name
/// - `id`: account identifier
/// - `role`: `"USER"`, `"EDITOR"` or `"ADMIN"`
/// - `iat`: issued at (Unix seconds)
/// - `exp`: expiration time (Unix seconds)
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use setsisaw_auth::Claims;
/// use setsisaw_core::{Role, UserId};
///
/// let claims = Claims::builder()
///     .username("alice")
///     .user_id(UserId::from("1"))
///     .role(Role::User)
///     .expires_in(Duration::minutes(5))
///     .build();
///
/// assert_eq!(claims.exp - claims.iat, 300);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Account name.
    pub username: String,

    /// Account identifier.
    pub id: UserId,

    /// Account role at issuance.
    pub role: Role,

    /// Issued at as Unix timestamp.
    pub iat: i64,

    /// Expiration time as Unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// Create a new builder for constructing claims.
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// Claims for `username` issued at `now`, valid for `lifetime`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if `now + lifetime` is out of range.
    pub fn issue(
        username: impl Into<String>,
        id: UserId,
        role: Role,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, AuthError> {
        let exp = now.checked_add_signed(lifetime).ok_or_else(|| {
            AuthError::Internal(format!(
                "Token lifetime of {}s overflows the expiry timestamp",
                lifetime.num_seconds()
            ))
        })?;

        Ok(Self {
            username: username.into(),
            id,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Same identity and role, re-issued at `now` with a fresh `lifetime`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if `now + lifetime` is out of range.
    pub fn renewed_at(&self, now: DateTime<Utc>, lifetime: Duration) -> Result<Self, AuthError> {
        Self::issue(self.username.clone(), self.id.clone(), self.role, now, lifetime)
    }

    /// Expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time left before expiry, negative once expired.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        let secs = self.exp.saturating_sub(now.timestamp());
        Duration::try_seconds(secs).unwrap_or(if secs < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }

    /// Check whether the token is expired at `now`.
    ///
    /// A token whose expiry equals `now` is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Builder for constructing claims.
#[derive(Debug, Default)]
pub struct ClaimsBuilder {
    username: Option<String>,
    id: Option<UserId>,
    role: Option<Role>,
    iat: Option<i64>,
    exp: Option<i64>,
    lifetime: Option<Duration>,
}

impl ClaimsBuilder {
    /// Set the account name.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the account identifier.
    #[must_use]
    pub fn user_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the issued-at time.
    #[must_use]
    pub fn issued_at(mut self, iat: DateTime<Utc>) -> Self {
        self.iat = Some(iat.timestamp());
        self
    }

    /// Set expiration time as Unix timestamp. Overrides [`Self::expires_in`].
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration relative to the issued-at time.
    #[must_use]
    pub fn expires_in(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Build the claims.
    ///
    /// # Defaults
    ///
    /// - `username`: empty string
    /// - `id`: new random ID
    /// - `role`: `USER`
    /// - `iat`: current time
    /// - `exp`: `iat` + 5 minutes
    #[must_use]
    pub fn build(self) -> Claims {
        let iat = self.iat.unwrap_or_else(|| Utc::now().timestamp());
        let lifetime = self.lifetime.unwrap_or_else(|| Duration::minutes(5));

        Claims {
            username: self.username.unwrap_or_default(),
            id: self.id.unwrap_or_else(UserId::generate),
            role: self.role.unwrap_or_default(),
            iat,
            exp: self.exp.unwrap_or(iat.saturating_add(lifetime.num_seconds())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    #[test]
    fn test_issue_sets_expiry_from_lifetime() {
        let now = at(1_700_000_000);
        let claims =
            Claims::issue("alice", UserId::from("1"), Role::User, now, Duration::minutes(5))
                .unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_300);
        assert_eq!(claims.expires_at(), at(1_700_000_300));
    }

    #[test]
    fn test_renewed_keeps_identity_and_resets_expiry() {
        let original = Claims::issue(
            "alice",
            UserId::from("1"),
            Role::Editor,
            at(1_000),
            Duration::minutes(5),
        )
        .unwrap();
        let renewed = original.renewed_at(at(1_250), Duration::minutes(5)).unwrap();

        assert_eq!(renewed.username, original.username);
        assert_eq!(renewed.id, original.id);
        assert_eq!(renewed.role, original.role);
        assert_eq!(renewed.iat, 1_250);
        assert_eq!(renewed.exp, 1_550);
        // Original untouched
        assert_eq!(original.exp, 1_300);
    }

    #[test]
    fn test_issue_with_out_of_range_lifetime() {
        let err = Claims::issue(
            "alice",
            UserId::from("1"),
            Role::User,
            at(1_700_000_000),
            Duration::seconds(10_000_000_000_000),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));

        let claims = Claims::builder().issued_at(at(0)).expiration(100).build();
        assert!(claims.renewed_at(at(50), Duration::MAX).is_err());
    }

    #[test]
    fn test_remaining_saturates_on_extreme_expiry() {
        let claims = Claims::builder().issued_at(at(0)).expiration(i64::MAX).build();
        assert_eq!(claims.remaining_at(at(0)), Duration::MAX);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let claims = Claims::builder().issued_at(at(0)).expiration(100).build();

        assert!(!claims.is_expired_at(at(99)));
        assert!(!claims.is_expired_at(at(100)));
        assert!(claims.is_expired_at(at(101)));
    }

    #[test]
    fn test_remaining() {
        let claims = Claims::builder().issued_at(at(0)).expiration(100).build();

        assert_eq!(claims.remaining_at(at(40)), Duration::seconds(60));
        assert_eq!(claims.remaining_at(at(100)), Duration::zero());
        assert_eq!(claims.remaining_at(at(130)), Duration::seconds(-30));
    }

    #[test]
    fn test_builder_defaults() {
        let claims = Claims::builder().username("bob").build();

        assert_eq!(claims.username, "bob");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(!claims.id.as_str().is_empty());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wire_format() {
        let claims = Claims::builder()
            .username("alice")
            .user_id(UserId::from("17"))
            .role(Role::Admin)
            .issued_at(at(10))
            .expiration(20)
            .build();

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["username"], "alice");
        assert_eq!(value["id"], "17");
        assert_eq!(value["role"], "ADMIN");
        assert_eq!(value["iat"], 10);
        assert_eq!(value["exp"], 20);
    }
}
