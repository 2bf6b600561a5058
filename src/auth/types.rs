//! Authentication result types.

use crate::directory::Identity;
use crate::jwt::Claims;

/// An identity resolved from a presented token, together with the claims
/// and the raw token string for callers that need to echo it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    pub claims: Claims,
    pub token: String,
}

/// Request extension attached by the gate middleware: the authenticated
/// user, or `None` when the optional gate let an anonymous request through.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);
