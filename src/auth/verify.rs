//! Core verification and refresh logic shared by every enforcement surface.

use axum::http::HeaderMap;
use tracing::{debug, error};

use super::errors::AuthErrorKind;
use super::header::bearer_credential;
use super::types::AuthenticatedUser;
use crate::config::AuthConfig;
use crate::directory::{Identity, UserDirectory};
use crate::jwt::{self, IssuedToken, JwtConfig, JwtError};

/// Resolve the request's bearer token into an authenticated user.
///
/// Checks run in order and short-circuit on the first failure: header
/// scheme, credential shape, signature and expiry, `user_id` claim, then a
/// fresh active-status lookup in the directory. The lookup is never cached;
/// deactivation takes effect on the next request.
pub async fn authenticate<D: UserDirectory>(
    jwt: &JwtConfig,
    directory: &D,
    config: &AuthConfig,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthErrorKind> {
    let credential = bearer_credential(headers, &config.header_prefix)?;

    let claims = jwt.decode(credential).map_err(|e| match e {
        JwtError::Expired => AuthErrorKind::TokenExpired,
        JwtError::Decoding(_) => AuthErrorKind::TokenInvalid,
        other => {
            error!(error = %other, "Token decode failed");
            AuthErrorKind::Internal
        }
    })?;

    let user_id = claims.user_id().ok_or(AuthErrorKind::MissingUserId)?;
    let identity = lookup_active(directory, user_id).await?;

    Ok(AuthenticatedUser {
        identity,
        claims,
        token: credential.to_string(),
    })
}

/// Re-issue a token from an existing one, keeping the lineage anchor.
///
/// The presented token may already be expired; only its signature must
/// verify. Renewal is bounded by `orig_iat + refresh window`, inclusive:
/// refresh succeeds at the boundary instant and fails after it.
pub async fn refresh<D: UserDirectory>(
    jwt: &JwtConfig,
    directory: &D,
    token: &str,
) -> Result<IssuedToken, AuthErrorKind> {
    let claims = jwt.decode_allow_expired(token).map_err(|e| match e {
        JwtError::Decoding(_) => AuthErrorKind::TokenInvalid,
        other => {
            error!(error = %other, "Token decode failed");
            AuthErrorKind::Internal
        }
    })?;

    let user_id = claims.user_id().ok_or(AuthErrorKind::MissingUserId)?;
    let identity = lookup_active(directory, user_id).await?;

    let orig_iat = claims.orig_iat.ok_or(AuthErrorKind::MissingOrigIat)?;

    let expiration_timestamp = orig_iat.saturating_add(jwt.refresh_expiration_secs());
    let now = jwt::unix_now().map_err(|e| {
        error!(error = %e, "Clock failure");
        AuthErrorKind::Internal
    })?;
    if now > expiration_timestamp {
        return Err(AuthErrorKind::RefreshExpired);
    }

    jwt.issue(&identity, Some(orig_iat)).map_err(|e| {
        error!(error = %e, "Failed to issue refreshed token");
        AuthErrorKind::Internal
    })
}

/// Look up an identity by id, requiring active status. Unknown and inactive
/// collapse into one failure kind so clients cannot enumerate accounts.
async fn lookup_active<D: UserDirectory>(
    directory: &D,
    user_id: i64,
) -> Result<Identity, AuthErrorKind> {
    let identity = directory.find_by_id(user_id).await.map_err(|e| {
        error!(error = %e, "User directory lookup failed");
        AuthErrorKind::Internal
    })?;

    match identity {
        Some(identity) if identity.active => Ok(identity),
        Some(_) | None => {
            debug!(user_id, "No active user for presented token");
            Err(AuthErrorKind::UnknownUser)
        }
    }
}
