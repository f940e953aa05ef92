use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use market_engine::{
    db_types::Shop,
    traits::AccountApiError,
    AccountApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{customer, shop_user, token_middleware, ts, get_request, patch_request, post_request, TEST_TOKEN},
    mocks::MockBackend,
};
use crate::routes::{MyAccountRoute, PartnerRegisterRoute, UpdateAddressRoute};

fn shop() -> Shop {
    Shop {
        id: 1,
        name: "Svyaznoy".to_string(),
        url: Some("https://svyaznoy.example".to_string()),
        accepting_orders: true,
        created_at: ts(),
    }
}

#[actix_web::test]
async fn profile_for_a_customer() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(TEST_TOKEN, "/api/account", configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let profile: Value = serde_json::from_str(&body).expect("profile should parse");
    assert_eq!(profile["email"], "alice@example.com");
    assert_eq!(profile["role"], "Customer");
    assert!(profile["shop"].is_null());
}

#[actix_web::test]
async fn profile_for_a_partner_embeds_the_shop() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(TEST_TOKEN, "/api/account", configure_shop).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let profile: Value = serde_json::from_str(&body).expect("profile should parse");
    assert_eq!(profile["role"], "Shop");
    assert_eq!(profile["shop"]["name"], "Svyaznoy");
}

#[actix_web::test]
async fn update_the_delivery_address() {
    let _ = env_logger::try_init().ok();
    let body = json!({"address": "Spb, Nevsky 12"});
    let (status, body) =
        patch_request(TEST_TOKEN, "/api/account/address", &body, configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let user: Value = serde_json::from_str(&body).expect("user should parse");
    assert_eq!(user["address"], "Spb, Nevsky 12");

    let (status, body) = patch_request(TEST_TOKEN, "/api/account/address", &json!({"address": "  "}), configure_customer)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("must not be empty"));
}

#[actix_web::test]
async fn partner_registration() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": "Svyaznoy", "url": "https://svyaznoy.example"});
    let (status, body) =
        post_request(TEST_TOKEN, "/api/partner/register", &body, configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).expect("shop should parse");
    assert_eq!(created["name"], "Svyaznoy");

    // A user owns at most one shop
    let body = json!({"name": "Another one"});
    let (status, body) =
        post_request(TEST_TOKEN, "/api/partner/register", &body, configure_second_shop).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already owns a shop"));
}

fn register_routes(cfg: &mut ServiceConfig, backend: MockBackend, user: market_engine::db_types::User) {
    let accounts_api = AccountApi::new(backend);
    cfg.service(
        web::scope("/api")
            .wrap(token_middleware(user))
            .service(MyAccountRoute::<MockBackend>::new())
            .service(UpdateAddressRoute::<MockBackend>::new())
            .service(PartnerRegisterRoute::<MockBackend>::new())
            .app_data(web::Data::new(accounts_api)),
    );
}

fn configure_customer(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_user_by_id().returning(|_| Ok(Some(customer())));
    backend.expect_update_address().returning(|_, address| {
        let mut user = customer();
        user.address = Some(address.to_string());
        user.updated_at = Utc::now();
        Ok(user)
    });
    backend.expect_create_shop_for_user().returning(|_, new_shop| {
        let mut shop = shop();
        shop.name = new_shop.name;
        shop.url = new_shop.url;
        Ok(shop)
    });
    register_routes(cfg, backend, customer());
}

fn configure_shop(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_user_by_id().returning(|_| Ok(Some(shop_user())));
    backend.expect_fetch_shop().returning(|_| Ok(Some(shop())));
    register_routes(cfg, backend, shop_user());
}

fn configure_second_shop(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_create_shop_for_user().returning(|_, _| Err(AccountApiError::ShopAlreadyExists));
    register_routes(cfg, backend, customer());
}
