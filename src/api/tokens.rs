//! Token issuance and refresh endpoints.
//!
//! - POST `/token` - Exchange username/password for a signed token
//! - POST `/refresh` - Re-issue from an existing token within its lineage window
//!
//! Both routes are public: mount them outside any required gate, or list
//! their paths in the gate's exempt paths.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::auth::{AuthErrorKind, verify};
use crate::directory::UserDirectory;
use crate::jwt::{IssuedToken, JwtConfig};

#[derive(Clone)]
pub struct TokensState<D> {
    pub jwt: Arc<JwtConfig>,
    pub directory: D,
}

pub fn router<D>(state: TokensState<D>) -> Router
where
    D: UserDirectory + Clone + 'static,
{
    Router::new()
        .route("/token", post(obtain_token))
        .route("/refresh", post(refresh_token))
        .with_state(state)
}

#[derive(Deserialize)]
struct ObtainRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct RefreshRequest {
    token: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
    expires_in: u64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_in: issued.expires_in,
        }
    }
}

/// Issue a token from submitted credentials.
///
/// An inactive account is reported as disabled only here, after the
/// password check succeeded; verification never makes that distinction.
async fn obtain_token<D: UserDirectory>(
    State(state): State<TokensState<D>>,
    body: Result<Json<ObtainRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::validation("Improperly formatted request"))?;

    let (username, password) = match (request.username.as_deref(), request.password.as_deref()) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => {
            return Err(ApiError::validation(
                "Must include \"username\" and \"password\".",
            ));
        }
    };

    let user = state
        .directory
        .check_credentials(username, password)
        .await
        .map_err(|e| ApiError::internal("Credential check failed", e))?
        .ok_or_else(|| ApiError::validation("Unable to log in with provided credentials."))?;

    if !user.active {
        return Err(ApiError::validation("User account is disabled."));
    }

    let issued = state
        .jwt
        .issue(&user, None)
        .map_err(|e| ApiError::internal("Failed to issue token", e))?;

    Ok(Json(issued.into()))
}

/// Re-issue a presented token, carrying its lineage anchor forward.
async fn refresh_token<D: UserDirectory>(
    State(state): State<TokensState<D>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::validation("Improperly formatted request"))?;

    let token = request
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::validation("Must include \"token\"."))?;

    let issued = verify::refresh(&state.jwt, &state.directory, &token)
        .await
        .map_err(|kind| match kind {
            AuthErrorKind::Internal => ApiError::Internal,
            other => ApiError::validation(other.message()),
        })?;

    Ok(Json(issued.into()))
}
