//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::directory::Identity;

/// Default access-token lifetime: 5 minutes.
pub const DEFAULT_EXPIRATION_SECS: u64 = 5 * 60;

/// Default refresh window measured from the original issuance: 7 days.
pub const DEFAULT_REFRESH_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Claim set embedded in every token.
///
/// `user_id` and `exp` are always written at issuance. `orig_iat` is written
/// only when refresh is enabled: it is anchored at the first issuance of a
/// token lineage and copied verbatim on every refresh, never advanced.
/// `user_id` deserializes as optional so a token that omits it is a
/// classified payload failure rather than a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Original issuance time (Unix timestamp), stable across refreshes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_iat: Option<u64>,
}

impl Claims {
    /// The id of the identity this token represents, if the claim is present.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}

/// A freshly signed token together with its lifetime restated in seconds.
/// `expires_in` comes from configuration, not from re-parsing the token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Signing configuration: key material plus token lifetimes.
/// Established once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: u64,
    refresh_expiration_secs: u64,
    allow_refresh: bool,
}

impl JwtConfig {
    /// Create a configuration with the given secret and default lifetimes.
    /// Refresh is enabled; use [`JwtConfig::without_refresh`] to opt out.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            refresh_expiration_secs: DEFAULT_REFRESH_EXPIRATION_SECS,
            allow_refresh: true,
        }
    }

    /// Set the access-token lifetime in seconds.
    pub fn with_expiration(mut self, secs: u64) -> Self {
        self.expiration_secs = secs;
        self
    }

    /// Set the refresh window in seconds, measured from `orig_iat`.
    pub fn with_refresh_expiration(mut self, secs: u64) -> Self {
        self.refresh_expiration_secs = secs;
        self
    }

    /// Disable refresh. New tokens then carry no `orig_iat` and cannot be
    /// refreshed.
    pub fn without_refresh(mut self) -> Self {
        self.allow_refresh = false;
        self
    }

    pub fn expiration_secs(&self) -> u64 {
        self.expiration_secs
    }

    pub fn refresh_expiration_secs(&self) -> u64 {
        self.refresh_expiration_secs
    }

    pub fn refresh_enabled(&self) -> bool {
        self.allow_refresh
    }

    /// Sign a token for an identity.
    ///
    /// Pass `orig_iat` to continue an existing lineage (refresh); leave it
    /// `None` for a first issuance, which anchors a new lineage at the
    /// current time when refresh is enabled.
    pub fn issue(&self, identity: &Identity, orig_iat: Option<u64>) -> Result<IssuedToken, JwtError> {
        let now = unix_now()?;

        let orig_iat = match orig_iat {
            Some(anchor) => Some(anchor),
            None if self.allow_refresh => Some(now),
            None => None,
        };

        let claims = Claims {
            user_id: Some(identity.id),
            username: Some(identity.username.clone()),
            exp: now + self.expiration_secs,
            orig_iat,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            expires_in: self.expiration_secs,
        })
    }

    /// Validate signature and expiry, returning the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        self.decode_with(token, &validation)
    }

    /// Validate the signature but accept an expired `exp`.
    /// Used by refresh, which must work on expired tokens.
    pub fn decode_allow_expired(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        self.decode_with(token, &validation)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims, JwtError> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Decoding(e),
            })?;

        Ok(token_data.claims)
    }
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::Time)?
        .as_secs())
}

/// Errors from token signing and decoding.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Signature valid but `exp` has passed
    Expired,
    /// Structurally invalid or signature-invalid token
    Decoding(jsonwebtoken::errors::Error),
    /// System time error
    Time,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::Time => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
