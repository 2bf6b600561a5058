#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response, StatusCode},
    middleware,
    routing::get,
};
use tower::ServiceExt;

use tokengate::api::{self, TokensState};
use tokengate::auth::{Auth, AuthState, GatePolicy, GateState, OptionalAuth, authentication_gate};
use tokengate::config::AuthConfig;
use tokengate::directory::{Identity, MemoryDirectory};
use tokengate::jwt::JwtConfig;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-testing";

pub const TEST_USER_ID: i64 = 7;
pub const TEST_USERNAME: &str = "jpueblo";
pub const TEST_PASSWORD: &str = "password";

/// Seconds since the Unix epoch.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn test_jwt() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

/// Directory seeded with one active user.
pub fn seeded_directory() -> MemoryDirectory {
    let directory = MemoryDirectory::new();
    directory.insert(
        Identity {
            id: TEST_USER_ID,
            username: TEST_USERNAME.to_string(),
            active: true,
        },
        TEST_PASSWORD,
    );
    directory
}

pub struct TestApp {
    pub app: Router,
    pub jwt: Arc<JwtConfig>,
    pub directory: MemoryDirectory,
}

/// Build the standard test application:
///
/// - POST `/auth/token`, POST `/auth/refresh` (public, exempt from the gate)
/// - GET `/protected` - requires authentication via the `Auth` extractor
/// - GET `/plain` - reports the caller's username or null via `OptionalAuth`
///
/// When `policy` is set, the whole router sits behind the authentication
/// gate with the token endpoints on the exempt list.
pub fn build_app(jwt: JwtConfig, policy: Option<GatePolicy>) -> TestApp {
    let jwt = Arc::new(jwt);
    let directory = seeded_directory();
    let config = Arc::new(AuthConfig {
        exempt_paths: vec!["/auth/token".to_string(), "/auth/refresh".to_string()],
        ..AuthConfig::default()
    });

    let auth_state = AuthState::new(jwt.clone(), directory.clone(), config);

    let tokens = api::create_token_router(TokensState {
        jwt: jwt.clone(),
        directory: directory.clone(),
    });

    let mut app = Router::new()
        .route("/protected", get(protected))
        .route("/plain", get(plain))
        .with_state(auth_state.clone())
        .nest("/auth", tokens);

    if let Some(policy) = policy {
        app = app.layer(middleware::from_fn_with_state(
            GateState::new(auth_state, policy),
            authentication_gate,
        ));
    }

    TestApp {
        app,
        jwt,
        directory,
    }
}

async fn protected(Auth(user): Auth) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "username": user.identity.username }))
}

async fn plain(OptionalAuth(user): OptionalAuth) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "username": user.map(|u| u.identity.username) }))
}

pub async fn get_with_auth(
    app: &Router,
    uri: &str,
    auth_header: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth_header {
        builder = builder.header("authorization", value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in through the token endpoint and return the issued token string.
pub async fn obtain_token(app: &Router) -> String {
    let response = post_json(
        app,
        "/auth/token",
        serde_json::json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["token"]
        .as_str()
        .expect("token missing from response")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Encode arbitrary claims with the test secret, for crafting expired or
/// incomplete tokens.
pub fn encode_claims(claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

/// Decode a token's claims without verification, for asserting on payload
/// contents in tests.
pub fn decode_claims(jwt: &JwtConfig, token: &str) -> tokengate::jwt::Claims {
    jwt.decode_allow_expired(token).unwrap()
}
