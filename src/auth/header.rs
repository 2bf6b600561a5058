//! Authorization header parsing.

use axum::http::{HeaderMap, header};

use super::errors::AuthErrorKind;

/// Extract the credential from the `Authorization` header.
///
/// The header value is split on whitespace: the first token must equal the
/// configured scheme prefix (case-insensitively), and exactly one credential
/// token must follow. A missing header, a header that is not valid UTF-8,
/// and a wrong scheme all classify the same way.
pub fn bearer_credential<'a>(
    headers: &'a HeaderMap,
    prefix: &str,
) -> Result<&'a str, AuthErrorKind> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(prefix) => {}
        _ => return Err(AuthErrorKind::WrongScheme),
    }

    let credential = parts.next().ok_or(AuthErrorKind::NoCredentials)?;
    if parts.next().is_some() {
        return Err(AuthErrorKind::MalformedHeader);
    }

    Ok(credential)
}
