//! HTTP surface tests: route wiring, status codes, and response shapes.
//!
//! The app under test mirrors the production route table but runs over the
//! in-memory store with email delivery disabled.

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use actix_middleware::{JwtAuthMiddleware, RequireAdmin};
use auth_service::config::EmailSettings;
use auth_service::db::memory::MemoryAccountStore;
use auth_service::db::AccountStore;
use auth_service::handlers;
use auth_service::services::{AuthService, EmailService};
use auth_service::AppState;
use crypto_core::jwt;

const TEST_PRIVATE_KEY: &str = include_str!("../testdata/jwt_test_key.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../testdata/jwt_test_key.pub.pem");

const EMAIL: &str = "alice@college.edu";
const PASSWORD: &str = "Passw0rd!";

fn state() -> (AppState, Arc<MemoryAccountStore>) {
    let _ = jwt::initialize_jwt_keys(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY);
    let store = Arc::new(MemoryAccountStore::new());
    let mailer = EmailService::new(&EmailSettings {
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_address: "CampusHub <no-reply@campushub.app>".to_string(),
    })
    .unwrap();
    let auth = AuthService::new(store.clone(), mailer, None);
    (AppState { auth }, store)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .route("/health", web::get().to(handlers::health))
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(handlers::auth::signup))
                        .route("/send-otp", web::post().to(handlers::auth::send_otp))
                        .route("/verify-otp", web::post().to(handlers::auth::verify_otp))
                        .route("/signin", web::post().to(handlers::auth::signin))
                        .route(
                            "/refresh-token",
                            web::post().to(handlers::auth::refresh_token),
                        )
                        .route(
                            "/forgot-password",
                            web::post().to(handlers::auth::forgot_password),
                        )
                        .route(
                            "/reset-password",
                            web::post().to(handlers::auth::reset_password),
                        )
                        .service(
                            web::resource("/signout")
                                .wrap(JwtAuthMiddleware)
                                .route(web::post().to(handlers::auth::signout)),
                        )
                        .service(
                            web::resource("/current-user")
                                .wrap(JwtAuthMiddleware)
                                .route(web::get().to(handlers::auth::current_user)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .wrap(RequireAdmin)
                        .wrap(JwtAuthMiddleware)
                        .route("/analytics", web::get().to(handlers::admin::analytics)),
                ),
        )
        .await
    };
}

macro_rules! post_json {
    ($srv:expr, $path:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($path)
            .set_json(&$body)
            .to_request();
        test::call_service($srv, req).await
    }};
}

/// Drive an account through signup and OTP verification.
macro_rules! signup_and_verify {
    ($srv:expr, $store:expr, $email:expr) => {{
        let resp = post_json!(
            $srv,
            "/auth/signup",
            json!({ "email": $email, "password": PASSWORD })
        );
        assert_eq!(resp.status(), 201);

        let code = $store
            .find_by_email($email)
            .await
            .unwrap()
            .unwrap()
            .otp_code
            .unwrap();
        let resp = post_json!(
            $srv,
            "/auth/verify-otp",
            json!({ "email": $email, "code": code })
        );
        assert_eq!(resp.status(), 200);
    }};
}

macro_rules! signin_tokens {
    ($srv:expr, $email:expr) => {{
        let resp = post_json!(
            $srv,
            "/auth/signin",
            json!({ "email": $email, "password": PASSWORD })
        );
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (state, _store) = state();
    let srv = app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&srv, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_signup_then_signin_flow() {
    let (state, store) = state();
    let srv = app!(state);

    signup_and_verify!(&srv, store, EMAIL);

    let tokens = signin_tokens!(&srv, EMAIL);
    assert!(!tokens["access_token"].as_str().unwrap().is_empty());
    assert_eq!(tokens["refresh_token"].as_str().unwrap().len(), 48);
    assert_eq!(tokens["role"], "member");
}

#[actix_web::test]
async fn test_signin_before_verification_is_forbidden() {
    let (state, _store) = state();
    let srv = app!(state);

    let resp = post_json!(
        &srv,
        "/auth/signup",
        json!({ "email": EMAIL, "password": PASSWORD })
    );
    assert_eq!(resp.status(), 201);

    let resp = post_json!(
        &srv,
        "/auth/signin",
        json!({ "email": EMAIL, "password": PASSWORD })
    );
    assert_eq!(resp.status(), 403);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_verified");
}

#[actix_web::test]
async fn test_duplicate_signup_conflicts() {
    let (state, _store) = state();
    let srv = app!(state);

    post_json!(
        &srv,
        "/auth/signup",
        json!({ "email": EMAIL, "password": PASSWORD })
    );
    let resp = post_json!(
        &srv,
        "/auth/signup",
        json!({ "email": EMAIL, "password": PASSWORD })
    );
    assert_eq!(resp.status(), 409);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "duplicate_identity");
}

#[actix_web::test]
async fn test_weak_password_is_bad_request() {
    let (state, _store) = state();
    let srv = app!(state);

    let resp = post_json!(
        &srv,
        "/auth/signup",
        json!({ "email": EMAIL, "password": "weak" })
    );
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "weak_password");
}

#[actix_web::test]
async fn test_refresh_rotation_over_http() {
    let (state, store) = state();
    let srv = app!(state);

    signup_and_verify!(&srv, store, EMAIL);
    let tokens = signin_tokens!(&srv, EMAIL);
    let refresh = tokens["refresh_token"].as_str().unwrap().to_string();

    let resp = post_json!(&srv, "/auth/refresh-token", json!({ "refresh_token": refresh }));
    assert_eq!(resp.status(), 200);
    let rotated: Value = test::read_body_json(resp).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // The consumed token is rejected on replay.
    let resp = post_json!(&srv, "/auth/refresh-token", json!({ "refresh_token": refresh }));
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_protected_routes_require_bearer_token() {
    let (state, _store) = state();
    let srv = app!(state);

    let req = test::TestRequest::get().uri("/auth/current-user").to_request();
    let resp = test::try_call_service(&srv, req).await;
    let err = resp.expect_err("missing token should be rejected");
    assert_eq!(err.as_response_error().status_code(), 401);

    // Middleware rejections carry the same machine-readable body as
    // handler errors.
    let resp = err.error_response();
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("rejection body should be JSON");
    assert_eq!(body["error"], "unauthenticated");
    assert_eq!(body["status"], 401);
}

#[actix_web::test]
async fn test_current_user_and_signout() {
    let (state, store) = state();
    let srv = app!(state);

    signup_and_verify!(&srv, store, EMAIL);
    let tokens = signin_tokens!(&srv, EMAIL);
    let bearer = format!("Bearer {}", tokens["access_token"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri("/auth/current-user")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let resp = test::call_service(&srv, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], EMAIL);
    assert_eq!(body["verified"], true);

    let req = test::TestRequest::post()
        .uri("/auth/signout")
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::call_service(&srv, req).await;
    assert_eq!(resp.status(), 200);

    // The refresh session died with the sign-out.
    let refresh = tokens["refresh_token"].as_str().unwrap();
    let resp = post_json!(&srv, "/auth/refresh-token", json!({ "refresh_token": refresh }));
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_admin_gate_rejects_members() {
    let (state, store) = state();
    let srv = app!(state);

    signup_and_verify!(&srv, store, EMAIL);
    let tokens = signin_tokens!(&srv, EMAIL);
    let bearer = format!("Bearer {}", tokens["access_token"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri("/admin/analytics")
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::try_call_service(&srv, req).await;
    let err = resp.expect_err("member role should be rejected");
    assert_eq!(err.as_response_error().status_code(), 403);

    let resp = err.error_response();
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("rejection body should be JSON");
    assert_eq!(body["error"], "forbidden");
}

#[actix_web::test]
async fn test_forgot_password_is_silent_for_unknown_address() {
    let (state, _store) = state();
    let srv = app!(state);

    let resp = post_json!(
        &srv,
        "/auth/forgot-password",
        json!({ "email": "ghost@college.edu" })
    );
    assert_eq!(resp.status(), 200);
}
