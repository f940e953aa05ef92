use actix_web::{http::StatusCode, web, web::ServiceConfig};
use market_engine::{helpers::passwords::hash_password, traits::AccountApiError, AuthApi};
use serde_json::json;

use super::{
    helpers::{customer, post_request, TEST_TOKEN},
    mocks::MockBackend,
};
use crate::{
    config::ProxyConfig,
    data_objects::LoginResponse,
    routes::{LoginRoute, LogoutRoute, RegisterRoute},
};

#[actix_web::test]
async fn register_new_customer() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "test_email1@oknhwe.com", "password": "12345asdf"});
    let (status, body) = post_request("", "/auth/register", &body, configure_register).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("test_email1@oknhwe.com"));
    assert!(!body.contains("password"), "the password hash must never appear in a response");
}

#[actix_web::test]
async fn register_duplicate_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "test_email1@oknhwe.com", "password": "12345asdf"});
    let (status, body) =
        post_request("", "/auth/register", &body, configure_register_conflict).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already exists"));
}

#[actix_web::test]
async fn register_validation_failures() {
    let _ = env_logger::try_init().ok();
    // Neither request may reach the backend, so a mock with no expectations suffices
    let body = json!({"email": "test_email3@oknhwe.com", "password": "short"});
    let (status, body) = post_request("", "/auth/register", &body, configure_no_backend_calls)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("too short"));

    let body = json!({"email": "invalid_email_format", "password": "12345asdf"});
    let (status, body) = post_request("", "/auth/register", &body, configure_no_backend_calls)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("valid email"));
}

#[actix_web::test]
async fn login_issues_a_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "alice@example.com", "password": "12345asdf"});
    let (status, body) = post_request("", "/auth/login", &body, configure_login).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: LoginResponse = serde_json::from_str(&body).expect("login response should parse");
    assert_eq!(response.token.len(), 64);
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "alice@example.com", "password": "not-the-password"});
    let (status, body) = post_request("", "/auth/login", &body, configure_login).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid email or password"));
}

#[actix_web::test]
async fn logout_revokes_the_presented_token() {
    let _ = env_logger::try_init().ok();
    let (status, _) =
        post_request(TEST_TOKEN, "/auth/logout", &json!({}), configure_logout).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);

    // Without a token there is nothing to revoke
    let (status, _) = post_request("", "/auth/logout", &json!({}), configure_no_backend_calls)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn register_common(cfg: &mut ServiceConfig, backend: MockBackend) {
    let auth_api = AuthApi::new(backend);
    cfg.service(RegisterRoute::<MockBackend>::new())
        .service(LoginRoute::<MockBackend>::new())
        .service(LogoutRoute::<MockBackend>::new())
        .app_data(web::Data::new(auth_api))
        .app_data(web::Data::new(ProxyConfig::default()));
}

fn configure_register(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_create_user().returning(|new_user| {
        let mut user = customer();
        user.email = new_user.email;
        Ok(user)
    });
    register_common(cfg, backend);
}

fn configure_register_conflict(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_create_user().returning(|_| Err(AccountApiError::EmailAlreadyExists));
    register_common(cfg, backend);
}

fn configure_no_backend_calls(cfg: &mut ServiceConfig) {
    register_common(cfg, MockBackend::new());
}

fn configure_login(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    let stored_hash = hash_password("12345asdf").unwrap();
    backend
        .expect_fetch_credentials()
        .returning(move |_| Ok(Some((customer(), stored_hash.clone()))));
    backend.expect_store_token().returning(|_, _| Ok(()));
    register_common(cfg, backend);
}

fn configure_logout(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_revoke_token().returning(|_| Ok(()));
    register_common(cfg, backend);
}
