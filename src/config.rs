//! Request-facing authentication settings.
//!
//! These values are read-only for the process lifetime and are injected
//! wherever they are needed; token lifetimes live on [`crate::jwt::JwtConfig`].

/// Default scheme prefix expected in the `Authorization` header.
pub const DEFAULT_HEADER_PREFIX: &str = "Bearer";

/// Default realm advertised in `WWW-Authenticate` challenges.
pub const DEFAULT_REALM: &str = "api";

/// Settings for header parsing and gate enforcement.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Scheme prefix expected in the `Authorization` header (matched
    /// case-insensitively), e.g. "Bearer" or "JWT".
    pub header_prefix: String,
    /// Realm emitted in `WWW-Authenticate` challenges.
    pub realm: String,
    /// Paths the required gate lets through without authentication,
    /// compared by exact match (e.g. the token-obtain endpoint).
    pub exempt_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            realm: DEFAULT_REALM.to_string(),
            exempt_paths: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// The full `WWW-Authenticate` challenge value for this configuration.
    pub fn challenge(&self) -> String {
        format!("{} realm=\"{}\"", self.header_prefix, self.realm)
    }
}
