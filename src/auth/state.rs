//! Authentication state traits and macro.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::directory::UserDirectory;
use crate::jwt::JwtConfig;

/// Trait for state types that provide the signing config, the user
/// directory, and the request-facing settings for authentication.
pub trait HasAuthBackend {
    type Directory: UserDirectory;

    fn jwt(&self) -> &JwtConfig;
    fn directory(&self) -> &Self::Directory;
    fn auth_config(&self) -> &AuthConfig;
}

/// Ready-made state bundle for applications that do not carry their own
/// state struct. Cheap to clone; the shared pieces sit behind `Arc`.
#[derive(Clone)]
pub struct AuthState<D> {
    pub jwt: Arc<JwtConfig>,
    pub directory: D,
    pub config: Arc<AuthConfig>,
}

impl<D> AuthState<D> {
    pub fn new(jwt: Arc<JwtConfig>, directory: D, config: Arc<AuthConfig>) -> Self {
        Self {
            jwt,
            directory,
            config,
        }
    }
}

impl<D: UserDirectory> HasAuthBackend for AuthState<D> {
    type Directory = D;

    fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    fn directory(&self) -> &Self::Directory {
        &self.directory
    }

    fn auth_config(&self) -> &AuthConfig {
        &self.config
    }
}

/// Implement `HasAuthBackend` for a state struct with the standard fields.
///
/// The struct must have these fields:
/// - `jwt: Arc<JwtConfig>`
/// - `directory: <directory type>`
/// - `config: Arc<AuthConfig>`
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct MyState {
///     pub jwt: Arc<JwtConfig>,
///     pub directory: MyDirectory,
///     pub config: Arc<AuthConfig>,
///     // ... other fields
/// }
///
/// impl_has_auth_backend!(MyState, MyDirectory);
/// ```
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty, $directory_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            type Directory = $directory_type;

            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn directory(&self) -> &Self::Directory {
                &self.directory
            }
            fn auth_config(&self) -> &$crate::config::AuthConfig {
                &self.config
            }
        }
    };
}
