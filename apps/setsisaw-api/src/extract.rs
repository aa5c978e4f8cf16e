//! Request authentication.
//!
//! Tokens travel in the `Authorization` header as `Bearer <token>`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use setsisaw_auth::{is_entitled, Claims};
use setsisaw_core::Role;

const BAD_HEADER_FORMAT: &str = "bad authentication header format";

/// Pull the token out of the `Authorization` header.
///
/// The header must split on whitespace into exactly a `Bearer` scheme and a
/// token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(BAD_HEADER_FORMAT.to_string()))?;

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ApiError::BadRequest(BAD_HEADER_FORMAT.to_string())),
    }
}

/// Verified claims of the caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    /// Require at least `role`; `action` names what was attempted.
    ///
    /// # Errors
    ///
    /// `ApiError::Forbidden` naming the user and the action.
    pub fn require(&self, role: Role, action: &str) -> Result<(), ApiError> {
        if is_entitled(&self.0, role) {
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.0.id,
            role = %self.0.role,
            required = %role,
            "Entitlement check failed"
        );
        Err(ApiError::Forbidden(format!(
            "User {} is not entitled to {action}",
            self.0.username
        )))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers).map_err(|e| {
            tracing::warn!("Rejected authorization header: {}", e);
            e
        })?;

        let claims = state.sessions.get_claims(token).map_err(|e| {
            tracing::warn!("Token validation failed: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthenticatedUser(claims))
    }
}
