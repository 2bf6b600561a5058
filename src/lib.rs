//! Bearer-token (JWT) authentication add-on for axum services.
//!
//! Tokens are stateless: validity is determined solely by the signature and
//! the embedded claims, with no server-side session table. A token can be
//! refreshed without re-submitting credentials for as long as its lineage
//! anchor (`orig_iat`) stays within the configured refresh window.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod directory;
pub mod jwt;

pub use api::TokensState;
pub use auth::{
    Auth, AuthErrorKind, AuthState, AuthenticatedUser, CurrentUser, GatePolicy, GateState,
    HasAuthBackend, OptionalAuth, authentication_gate,
};
pub use config::AuthConfig;
pub use directory::{Identity, MemoryDirectory, UserDirectory};
pub use jwt::{Claims, IssuedToken, JwtConfig};
