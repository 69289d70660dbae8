// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests of the sign-in pages.
//!
//! The database is offline in these tests, so every successful sign-in
//! also exercises the "provisioning failed but sign-in succeeds" path.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use redirect_signin::config::Config;
use tower::ServiceExt;

mod common;
use common::{
    body_string, cookie_pair, create_test_app, find_cookie, id_token_claims, query_params,
    set_cookie_headers, sign_id_token, spawn_fake_google, GOOD_CODE,
};

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Configure the app against a fake Google that signs in "ada".
async fn app_with_fake_google() -> Router {
    let mut config = Config::test_default();
    let id_token = sign_id_token(&id_token_claims(
        &config.google_client_id,
        "ada",
        Some("Ada Lovelace"),
    ));
    config.google_token_url = spawn_fake_google(&config, id_token).await;
    create_test_app(config).0
}

/// Start sign-in; returns the signed state and the nonce cookie pair.
async fn start_sign_in(app: &Router) -> (String, String) {
    let response = get(app, "/auth/google", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let params = query_params(&location(&response));
    let state = params.get("state").expect("missing state").clone();

    let cookies = set_cookie_headers(&response);
    let nonce = find_cookie(&cookies, "signin_oauth_nonce").expect("missing nonce cookie");
    (state, cookie_pair(&nonce))
}

#[tokio::test]
async fn test_login_page_without_redirect_result() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/login", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie_headers(&response).is_empty());
    let body = body_string(response).await;
    assert!(body.contains("Continue with Google"));
    assert!(!body.contains("class=\"toast "));
}

#[tokio::test]
async fn test_begin_redirects_to_google() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/auth/google", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = location(&response);
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));

    let params = query_params(&location);
    assert_eq!(params["scope"], "openid email profile");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://localhost:8080/login");

    let cookies = set_cookie_headers(&response);
    let nonce = find_cookie(&cookies, "signin_oauth_nonce").unwrap();
    assert!(nonce.contains("Path=/login"));
    assert!(nonce.contains("HttpOnly"));
    assert!(nonce.contains("SameSite=Lax"));
    assert!(!nonce.contains("Secure"));
}

#[tokio::test]
async fn test_begin_failure_renders_error_toast() {
    let mut config = Config::test_default();
    config.google_client_id = String::new();
    let (app, _) = create_test_app(config);

    let response = get(&app, "/auth/google", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let body = body_string(response).await;
    assert!(body.contains("toast-error toast-bottom-center"));
    assert!(body.contains("Google sign-in is not configured."));
}

#[tokio::test]
async fn test_cancelled_redirect_is_silent() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(
        &app,
        "/login?error=access_denied&state=abc",
        Some("signin_oauth_nonce=n"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookie_headers(&response);
    assert!(find_cookie(&cookies, "signin_session").is_none());
    let nonce = find_cookie(&cookies, "signin_oauth_nonce").unwrap();
    assert!(nonce.contains("Max-Age=0"));

    let body = body_string(response).await;
    assert!(!body.contains("class=\"toast "));
}

#[tokio::test]
async fn test_provider_error_for_started_sign_in_shows_description() {
    let (app, _) = create_test_app(Config::test_default());
    let (state, nonce) = start_sign_in(&app).await;

    let uri = format!(
        "/login?error=server_error&error_description=Google%20is%20unavailable&state={}",
        state
    );
    let response = get(&app, &uri, Some(&nonce)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("toast-error toast-bottom-center"));
    assert!(body.contains("Google is unavailable"));
    assert!(body.contains("Continue with Google"));
}

#[tokio::test]
async fn test_unsigned_error_description_is_not_shown() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(
        &app,
        "/login?error=server_error&error_description=Account%20suspended.%20Call%20%2B1-555-0100",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(!body.contains("Account suspended"));
    assert!(!body.contains("555-0100"));
    assert!(body.contains("toast-error toast-bottom-center"));
    assert!(body.contains("Your sign-in session expired. Please try again."));
    assert!(body.contains("Continue with Google"));
}

#[tokio::test]
async fn test_unreadable_redirect_query_renders_login_page() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/login?code=a&code=b", Some("signin_oauth_nonce=n")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookie_headers(&response);
    assert!(find_cookie(&cookies, "signin_session").is_none());
    assert!(find_cookie(&cookies, "signin_oauth_nonce")
        .unwrap()
        .contains("Max-Age=0"));

    let body = body_string(response).await;
    assert!(body.contains("Continue with Google"));
    assert!(body.contains("toast-error toast-bottom-center"));
    assert!(body.contains("Google sign-in failed. Please try again."));
}

#[tokio::test]
async fn test_successful_sign_in_survives_offline_database() {
    let app = app_with_fake_google().await;
    let (state, nonce) = start_sign_in(&app).await;

    let uri = format!("/login?code={}&state={}", urlencoding::encode(GOOD_CODE), state);
    let response = get(&app, &uri, Some(&nonce)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cookies = set_cookie_headers(&response);
    let session = find_cookie(&cookies, "signin_session").expect("missing session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("Path=/"));
    let flash = find_cookie(&cookies, "signin_flash").expect("missing flash cookie");
    let removed_nonce = find_cookie(&cookies, "signin_oauth_nonce").unwrap();
    assert!(removed_nonce.contains("Max-Age=0"));

    // The home page shows the flashed success toast exactly once.
    let cookie_header = format!("{}; {}", cookie_pair(&flash), cookie_pair(&session));
    let home = get(&app, "/", Some(&cookie_header)).await;
    assert_eq!(home.status(), StatusCode::OK);
    let home_cookies = set_cookie_headers(&home);
    assert!(find_cookie(&home_cookies, "signin_flash")
        .unwrap()
        .contains("Max-Age=0"));

    let body = body_string(home).await;
    assert_eq!(body.matches("Successfully signed in with Google!").count(), 1);
    assert!(body.contains("toast-success toast-top-center"));
    assert!(body.contains("You are signed in."));
}

#[tokio::test]
async fn test_rejected_code_shows_provider_message() {
    let app = app_with_fake_google().await;
    let (state, nonce) = start_sign_in(&app).await;

    let uri = format!("/login?code=4%2Fbad&state={}", state);
    let response = get(&app, &uri, Some(&nonce)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "signin_session").is_none());
    let body = body_string(response).await;
    assert!(body.contains("Malformed auth code."));
    assert!(body.contains("toast-error toast-bottom-center"));
}

#[tokio::test]
async fn test_state_from_another_browser_is_rejected() {
    let app = app_with_fake_google().await;
    let (state, _) = start_sign_in(&app).await;

    let uri = format!("/login?code={}&state={}", urlencoding::encode(GOOD_CODE), state);
    let response = get(&app, &uri, Some("signin_oauth_nonce=someone-else")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "signin_session").is_none());
    let body = body_string(response).await;
    assert!(body.contains("Your sign-in session expired. Please try again."));
}

#[tokio::test]
async fn test_home_without_session() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("You are not signed in."));
    assert!(!body.contains("class=\"toast "));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/auth/logout", Some("signin_session=abc")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookies = set_cookie_headers(&response);
    let session = find_cookie(&cookies, "signin_session").unwrap();
    assert!(session.contains("Max-Age=0"));
    assert!(session.contains("Path=/"));
}

#[tokio::test]
async fn test_secure_cookies_on_https() {
    let mut config = Config::test_default();
    config.public_url = "https://signin.example.com".to_string();
    let (app, _) = create_test_app(config);

    let response = get(&app, "/auth/google", None).await;

    let params = query_params(&location(&response));
    assert_eq!(params["redirect_uri"], "https://signin.example.com/login");
    let nonce = find_cookie(&set_cookie_headers(&response), "signin_oauth_nonce").unwrap();
    assert!(nonce.contains("Secure"));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app(Config::test_default());

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}
