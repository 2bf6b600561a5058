mod error;
mod tokens;

pub use error::ApiError;
pub use tokens::TokensState;

use axum::Router;

use crate::directory::UserDirectory;

/// Create the token-endpoint router (`POST /token`, `POST /refresh`).
pub fn create_token_router<D>(state: TokensState<D>) -> Router
where
    D: UserDirectory + Clone + 'static,
{
    tokens::router(state)
}
