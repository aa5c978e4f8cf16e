//! Authentication endpoint handlers.

use crate::error::ApiError;
use crate::extract::{bearer_token, AuthenticatedUser};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use setsisaw_auth::{Claims, NewAccount};
use setsisaw_core::Role;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Account view of the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// POST /signup
pub async fn signup_handler(
    State(state): State<AppState>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    let Json(request) = body?;

    let record = state
        .sessions
        .sign_up(NewAccount {
            username: request.username,
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            username: record.username,
            email: record.email,
        }),
    ))
}

/// POST /signin
pub async fn signin_handler(
    State(state): State<AppState>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body?;

    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username or Password is empty".to_string(),
        ));
    }

    let token = state
        .sessions
        .sign_in(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// GET /refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = bearer_token(&headers)?;

    let token = state.sessions.refresh_token(token).map_err(|e| {
        tracing::debug!("Token refresh refused: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(TokenResponse { token }))
}

/// GET /authcheck
pub async fn authcheck_handler(user: AuthenticatedUser) -> Json<Claims> {
    Json(user.0)
}

/// GET /user/current
pub async fn current_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    user.require(Role::User, "view their account")?;

    let record = state
        .sessions
        .account(&user.claims().username)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(CurrentUserResponse {
        id: record.user_id.into_inner(),
        username: record.username,
        email: record.email,
        role: record.role,
    }))
}
