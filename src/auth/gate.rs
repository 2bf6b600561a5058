//! App-wide enforcement middleware.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::errors::AuthErrorKind;
use super::state::{AuthState, HasAuthBackend};
use super::types::CurrentUser;
use super::verify;
use crate::directory::UserDirectory;

/// Enforcement policy for [`authentication_gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    /// Attach the verification result when it succeeds; continue
    /// anonymously on any failure. Never blocks a request.
    Optional,
    /// Reject unauthenticated requests with 401, except on exempt paths.
    Required,
}

/// State for the gate middleware: the auth backend plus the policy.
#[derive(Clone)]
pub struct GateState<D> {
    state: AuthState<D>,
    policy: GatePolicy,
}

impl<D> GateState<D> {
    pub fn new(state: AuthState<D>, policy: GatePolicy) -> Self {
        Self { state, policy }
    }

    pub fn required(state: AuthState<D>) -> Self {
        Self::new(state, GatePolicy::Required)
    }

    pub fn optional(state: AuthState<D>) -> Self {
        Self::new(state, GatePolicy::Optional)
    }
}

/// Middleware enforcing the configured policy on every request.
///
/// Install with `middleware::from_fn_with_state(gate_state,
/// authentication_gate)`. On success the resolved user is attached to the
/// request as a [`CurrentUser`] extension for downstream handlers and
/// extractors.
pub async fn authentication_gate<D>(
    State(gate): State<GateState<D>>,
    mut request: Request,
    next: Next,
) -> Response
where
    D: UserDirectory + Clone,
{
    let config = gate.state.auth_config();

    if gate.policy == GatePolicy::Required
        && config
            .exempt_paths
            .iter()
            .any(|path| path == request.uri().path())
    {
        return next.run(request).await;
    }

    let outcome = verify::authenticate(
        gate.state.jwt(),
        gate.state.directory(),
        config,
        request.headers(),
    )
    .await;

    match outcome {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(Some(user)));
            next.run(request).await
        }
        Err(kind) => match gate.policy {
            GatePolicy::Optional => {
                request.extensions_mut().insert(CurrentUser(None));
                next.run(request).await
            }
            GatePolicy::Required => {
                debug!(path = %request.uri().path(), error = %kind, "Rejected unauthenticated request");
                challenge_response(kind, &config.challenge())
            }
        },
    }
}

fn challenge_response(kind: AuthErrorKind, challenge: &str) -> Response {
    let status = kind.status_code();
    let body = Json(serde_json::json!({ "error": kind.message() }));

    if status == StatusCode::UNAUTHORIZED {
        (
            status,
            [(header::WWW_AUTHENTICATE, challenge.to_string())],
            body,
        )
            .into_response()
    } else {
        (status, body).into_response()
    }
}
