//! Error types for authentication operations.
//!
//! Two layers:
//! - [`TokenError`] is what the token codec reports.
//! - [`AuthError`] is what the session manager hands to route handlers. Each
//!   variant belongs to exactly one [`AuthErrorKind`], and callers branch on
//!   the kind to pick a transport status.

use thiserror::Error;

/// Token codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature does not match the payload under the server key.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is structurally invalid (segments, base64, JSON, claim types).
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Signature is valid but the token is past its expiry.
    #[error("Token has expired")]
    Expired,

    /// Signing key is unusable. Never caused by client input.
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Check if this error indicates an expired token.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }

    /// Check if this error indicates an invalid signature.
    #[must_use]
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, TokenError::InvalidSignature)
    }
}

/// Abstract classification of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// Caller is not authenticated (bad credentials, bad or expired token).
    Unauthorized,
    /// The request itself is invalid (malformed token, expired refresh).
    BadRequest,
    /// Refresh attempted before the refresh window opened.
    TooEarly,
    /// Server-side fault (signing key, credential store).
    InternalError,
}

impl AuthErrorKind {
    /// Suggested HTTP status code for this kind.
    ///
    /// `TooEarly` is surfaced as 400 rather than 425: clients treat it as an
    /// ordinary bad request that carries an explanation.
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            AuthErrorKind::Unauthorized => 401,
            AuthErrorKind::BadRequest | AuthErrorKind::TooEarly => 400,
            AuthErrorKind::InternalError => 500,
        }
    }
}

/// Errors returned by the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token signature does not match.
    #[error("user unauthorized: invalid token signature")]
    InvalidSignature,

    /// Token payload is structurally invalid.
    #[error("invalid token")]
    MalformedToken,

    /// Token is past its expiry.
    #[error("user unauthorized: token has expired")]
    Expired,

    /// An expired token was presented for refresh. Expired tokens cannot be
    /// refreshed; the client has to sign in again.
    #[error("token has expired and can no longer be refreshed")]
    RefreshExpired,

    /// Refresh attempted while more than the refresh window remains.
    #[error("token can only be refreshed within {window_secs} seconds of expiry ({remaining_secs} seconds remaining)")]
    TooEarly {
        /// Seconds until the presented token expires.
        remaining_secs: i64,
        /// Width of the refresh window in seconds.
        window_secs: i64,
    },

    /// Wrong credentials or unknown user. Deliberately carries no detail.
    #[error("login incorrect")]
    AuthenticationFailed,

    /// Stored role of an authenticated account is not a known role.
    #[error("could not determine user role")]
    RoleUnavailable,

    /// Server-side fault. The detail is for logs; [`AuthError::description`]
    /// hides it from clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Abstract kind callers branch on.
    #[must_use]
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidSignature | AuthError::Expired | AuthError::AuthenticationFailed => {
                AuthErrorKind::Unauthorized
            }
            AuthError::MalformedToken | AuthError::RefreshExpired => AuthErrorKind::BadRequest,
            AuthError::TooEarly { .. } => AuthErrorKind::TooEarly,
            AuthError::RoleUnavailable | AuthError::Internal(_) => AuthErrorKind::InternalError,
        }
    }

    /// Suggested HTTP status code, see [`AuthErrorKind::status_code`].
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Client-safe description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            AuthError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Map a codec failure seen while validating a presented token.
    #[must_use]
    pub fn from_validation(err: TokenError) -> Self {
        match err {
            TokenError::InvalidSignature => AuthError::InvalidSignature,
            TokenError::MalformedToken(_) => AuthError::MalformedToken,
            TokenError::Expired => AuthError::Expired,
            TokenError::Signing(detail) => AuthError::Internal(detail),
        }
    }

    /// Map a codec failure seen while validating a token presented for refresh.
    ///
    /// Identical to [`AuthError::from_validation`] except that expiry is a
    /// bad request rather than an authentication failure.
    #[must_use]
    pub fn from_refresh_validation(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::RefreshExpired,
            other => AuthError::from_validation(other),
        }
    }
}

/// Account creation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A required field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Username or email already belongs to another account.
    #[error("Username or email is already taken")]
    Conflict,

    /// Hashing or store fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// Suggested HTTP status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RegistrationError::MissingField(_) | RegistrationError::Conflict => 400,
            RegistrationError::Internal(_) => 500,
        }
    }
}
