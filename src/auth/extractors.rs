//! Axum extractors for authentication.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::AuthRejection;
use super::state::HasAuthBackend;
use super::types::{AuthenticatedUser, CurrentUser};
use super::verify;

/// Extractor for handlers that require an authenticated caller.
///
/// Reuses the gate's result when one already ran on this request;
/// otherwise verifies the `Authorization` header itself. Rejections are
/// JSON with a `WWW-Authenticate` challenge.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(Some(user))) = parts.extensions.get::<CurrentUser>() {
            return Ok(Auth(user.clone()));
        }

        verify::authenticate(
            state.jwt(),
            state.directory(),
            state.auth_config(),
            &parts.headers,
        )
        .await
        .map(Auth)
        .map_err(|kind| AuthRejection::new(kind, state.auth_config()))
    }
}

/// Optional authentication extractor - never fails, returns
/// `None` for anonymous requests. Useful for endpoints that work both
/// authenticated and unauthenticated.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(user)) = parts.extensions.get::<CurrentUser>() {
            return Ok(OptionalAuth(user.clone()));
        }

        Ok(OptionalAuth(
            verify::authenticate(
                state.jwt(),
                state.directory(),
                state.auth_config(),
                &parts.headers,
            )
            .await
            .ok(),
        ))
    }
}
