use std::sync::Arc;

use axum::{Json, Router, middleware, routing::get};
use clap::Parser;
use tokengate::api::{self, TokensState};
use tokengate::auth::{Auth, AuthState, GateState, authentication_gate};
use tokengate::cli::{Args, init_logging, load_jwt_secret, seed_demo_directory};
use tokengate::config::AuthConfig;
use tokengate::jwt::JwtConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let mut jwt = JwtConfig::new(jwt_secret.as_bytes())
        .with_expiration(args.expiration)
        .with_refresh_expiration(args.refresh_expiration);
    if args.no_refresh {
        jwt = jwt.without_refresh();
    }
    let jwt = Arc::new(jwt);

    let directory = seed_demo_directory();

    let config = Arc::new(AuthConfig {
        header_prefix: args.auth_prefix,
        exempt_paths: vec!["/health".to_string()],
        ..AuthConfig::default()
    });

    let auth_state = AuthState::new(jwt.clone(), directory.clone(), config);

    // /me and /health sit behind the required gate; /health passes because
    // it is on the exempt list. The token endpoints are mounted outside.
    let protected = Router::new()
        .route("/me", get(me))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            GateState::required(auth_state.clone()),
            authentication_gate,
        ))
        .with_state(auth_state);

    let tokens = api::create_token_router(TokensState { jwt, directory });

    let app = Router::new().nest("/auth", tokens).merge(protected);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener
        .local_addr()
        .expect("Failed to get local address");
    info!(address = %local_addr, "Listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn me(Auth(user): Auth) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": user.identity.id,
        "username": user.identity.username,
    }))
}
