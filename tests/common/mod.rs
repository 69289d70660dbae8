// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use redirect_signin::config::Config;
use redirect_signin::db::FirestoreDb;
use redirect_signin::pages::Pages;
use redirect_signin::routes::create_router;
use redirect_signin::services::{GoogleAuthService, GoogleIdTokenVerifier};
use redirect_signin::AppState;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_KID: &str = "test-kid";
const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/test_rsa_private.pem");
const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../fixtures/test_rsa_public.pem");

/// Authorization code the fake token endpoint accepts.
pub const GOOD_CODE: &str = "4/good-code";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique uid for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

/// Verifier that trusts the fixture RSA key.
#[allow(dead_code)]
pub fn test_verifier(config: &Config) -> GoogleIdTokenVerifier {
    GoogleIdTokenVerifier::new_with_static_key(
        &config.google_client_id,
        TEST_KID,
        DecodingKey::from_rsa_pem(PUBLIC_KEY_PEM).unwrap(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn test_auth_service(config: &Config) -> GoogleAuthService {
    GoogleAuthService::new(config, test_verifier(config)).unwrap()
}

/// Create a test app with an offline database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        auth: test_auth_service(&config),
        db: FirestoreDb::new_mock(),
        pages: Pages::new().unwrap(),
        config,
    });

    (create_router(state.clone()), state)
}

/// Claims for a Google-style ID token.
#[allow(dead_code)]
pub fn id_token_claims(client_id: &str, sub: &str, name: Option<&str>) -> serde_json::Value {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    serde_json::json!({
        "iss": "https://accounts.google.com",
        "aud": client_id,
        "sub": sub,
        "iat": now,
        "exp": now + 3600,
        "email": format!("{sub}@example.com"),
        "email_verified": true,
        "name": name,
        "picture": "https://lh3.googleusercontent.com/a/photo",
    })
}

/// Sign claims with the fixture RSA key.
#[allow(dead_code)]
pub fn sign_id_token(claims: &serde_json::Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());
    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).unwrap(),
    )
    .unwrap()
}

#[derive(Deserialize)]
struct TokenRequest {
    code: String,
    grant_type: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// Start a fake Google token endpoint. `GOOD_CODE` is exchanged for
/// `id_token`; any other code gets an `invalid_grant` error.
///
/// Returns the token endpoint URL.
#[allow(dead_code)]
pub async fn spawn_fake_google(config: &Config, id_token: String) -> String {
    let expected = (
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.redirect_uri(),
    );

    let app = Router::new().route(
        "/token",
        post(move |Form(req): Form<TokenRequest>| {
            let id_token = id_token.clone();
            let expected = expected.clone();
            async move { token_response(req, &expected, id_token) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/token")
}

fn token_response(
    req: TokenRequest,
    expected: &(String, String, String),
    id_token: String,
) -> Response {
    let client_ok = req.client_id == expected.0 && req.client_secret == expected.1;
    if !client_ok || req.redirect_uri != expected.2 {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "The OAuth client was not found."
            })),
        )
            .into_response();
    }

    if req.grant_type != "authorization_code" || req.code != GOOD_CODE {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Malformed auth code."
            })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "access_token": "ya29.test",
        "expires_in": 3599,
        "token_type": "Bearer",
        "scope": "openid email profile",
        "id_token": id_token,
    }))
    .into_response()
}

/// All Set-Cookie header values of a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The Set-Cookie header for `name`, if present.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// `name=value` pair from a Set-Cookie header, usable in a Cookie header.
#[allow(dead_code)]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

/// Query parameters of a URL.
#[allow(dead_code)]
pub fn query_params(url: &str) -> HashMap<String, String> {
    url.split_once('?')
        .map(|(_, query)| query)
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), urlencoding::decode(v).unwrap().into_owned()))
        .collect()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
