use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use market_common::Money;
use market_engine::{
    db_types::{Order, OrderStatusType, Product, Role, User},
    AuthApi,
};
use serde::Serialize;

use super::mocks::MockBackend;
use crate::middleware::TokenAuthMiddlewareFactory;

/// Any string works as a token in the endpoint tests; the mocked backend accepts whatever digest it is handed.
pub const TEST_TOKEN: &str = "cafe0000deadbeefcafe0000deadbeefcafe0000deadbeefcafe0000deadbeef";

pub fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap()
}

pub fn customer() -> User {
    User {
        id: 1,
        email: "alice@example.com".to_string(),
        address: Some("Moscow, Tverskaya 1".to_string()),
        role: Role::Customer,
        shop_id: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn customer_without_address() -> User {
    User { address: None, ..customer() }
}

pub fn shop_user() -> User {
    User {
        id: 2,
        email: "partner@svyaznoy.example".to_string(),
        address: None,
        role: Role::Shop,
        shop_id: Some(1),
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn admin() -> User {
    User {
        id: 3,
        email: "root@example.com".to_string(),
        address: None,
        role: Role::Admin,
        shop_id: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn product(id: i64) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        model: Some(format!("acme/model-{id}")),
        price: Money::from_rubles(1_000),
        quantity: 10,
        category_id: Some(224),
        shop_id: 1,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn order(id: i64, user_id: i64) -> Order {
    Order {
        id,
        user_id,
        status: OrderStatusType::Active,
        delivery_address: "Moscow, Tverskaya 1".to_string(),
        total_price: Money::from_rubles(3_000),
        created_at: ts(),
        updated_at: ts(),
    }
}

/// A token middleware whose backend resolves every token to the given user.
pub fn token_middleware(user: User) -> TokenAuthMiddlewareFactory<MockBackend> {
    let mut backend = MockBackend::new();
    backend.expect_fetch_user_by_token().returning(move |_| Ok(user.clone()));
    TokenAuthMiddlewareFactory::new(AuthApi::new(backend))
}

pub async fn get_request(
    auth_token: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::get().uri(path), auth_token, configure).await
}

pub async fn post_request<T: Serialize>(
    auth_token: &str,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::post().uri(path).set_json(body), auth_token, configure).await
}

/// POST with a raw (non-JSON) payload, as the price-list upload uses.
pub async fn post_raw(
    auth_token: &str,
    path: &str,
    body: Vec<u8>,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::post().uri(path).set_payload(body), auth_token, configure).await
}

pub async fn patch_request<T: Serialize>(
    auth_token: &str,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::patch().uri(path).set_json(body), auth_token, configure).await
}

pub async fn delete_request(
    auth_token: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::delete().uri(path), auth_token, configure).await
}

async fn run_request(
    mut req: TestRequest,
    auth_token: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    if !auth_token.is_empty() {
        req = req.insert_header(("Authorization", format!("Token {auth_token}")));
    }
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
