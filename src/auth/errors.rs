//! Authentication error taxonomy.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::AuthConfig;

/// Classified authentication failure.
///
/// Every branch of verification and refresh terminates in exactly one of
/// these kinds; nothing escapes as an unclassified error. Each kind maps to
/// a fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Header absent, empty, or scheme prefix does not match
    WrongScheme,
    /// Scheme present but no credential followed it
    NoCredentials,
    /// Credential string contains embedded whitespace
    MalformedHeader,
    /// Signature valid but `exp` has passed
    TokenExpired,
    /// Structurally invalid or signature-invalid token
    TokenInvalid,
    /// Payload lacks the `user_id` claim
    MissingUserId,
    /// No active user matches the token. Unknown and inactive accounts are
    /// indistinguishable to the client.
    UnknownUser,
    /// Refresh requires `orig_iat` and the token carries none
    MissingOrigIat,
    /// The lineage's refresh window has closed
    RefreshExpired,
    /// Directory or codec infrastructure failure; details stay in the log
    Internal,
}

impl AuthErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::WrongScheme => "Incorrect authentication credentials.",
            AuthErrorKind::NoCredentials => {
                "Invalid Authorization header. No credentials provided."
            }
            AuthErrorKind::MalformedHeader => {
                "Invalid Authorization header. Credentials string should not contain spaces."
            }
            AuthErrorKind::TokenExpired => "Signature has expired.",
            AuthErrorKind::TokenInvalid => "Error decoding signature.",
            AuthErrorKind::MissingUserId => "Invalid payload.",
            AuthErrorKind::UnknownUser => "Unable to log in with provided credentials.",
            AuthErrorKind::MissingOrigIat => "orig_iat field is required.",
            AuthErrorKind::RefreshExpired => "Refresh has expired.",
            AuthErrorKind::Internal => "Internal authentication error.",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Extractor rejection: JSON error body plus a `WWW-Authenticate` challenge
/// on 401 responses. The challenge is captured from configuration when the
/// rejection is built.
#[derive(Debug)]
pub struct AuthRejection {
    pub kind: AuthErrorKind,
    www_authenticate: String,
}

impl AuthRejection {
    pub(super) fn new(kind: AuthErrorKind, config: &AuthConfig) -> Self {
        Self {
            kind,
            www_authenticate: config.challenge(),
        }
    }
}

#[derive(Serialize)]
struct ErrorsResponse {
    errors: Vec<&'static str>,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let body = Json(ErrorsResponse {
            errors: vec![self.kind.message()],
        });

        if status == StatusCode::UNAUTHORIZED {
            (
                status,
                [(header::WWW_AUTHENTICATE, self.www_authenticate)],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}
