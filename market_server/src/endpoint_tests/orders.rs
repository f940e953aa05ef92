use actix_web::{http::StatusCode, web, web::ServiceConfig};
use market_common::Money;
use market_engine::{
    events::EventProducers,
    order_objects::{CheckoutSummary, OrderLine, SupplierNotice},
    traits::OrderApiError,
    OrderFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{admin, customer, customer_without_address, get_request, order, post_request, token_middleware, TEST_TOKEN},
    mocks::MockBackend,
};
use crate::routes::{AllOrdersRoute, MyOrdersRoute, OrderByIdRoute, OrdersCreateRoute};

#[actix_web::test]
async fn checkout_creates_an_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(TEST_TOKEN, "/api/orders", &json!({}), configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let response: Value = serde_json::from_str(&body).expect("checkout response should parse");
    assert_eq!(response["message"], "Order #10 successfully created");
    assert_eq!(response["order"]["total_price"], 300_000);
}

#[actix_web::test]
async fn checkout_with_explicit_address() {
    let _ = env_logger::try_init().ok();
    let body = json!({"delivery_address": "Pickup point 7"});
    let (status, _) =
        post_request(TEST_TOKEN, "/api/orders", &body, configure_customer_pickup).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn checkout_without_any_address_fails() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(TEST_TOKEN, "/api/orders", &json!({}), configure_no_address)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No delivery address"));
}

#[actix_web::test]
async fn checkout_of_an_empty_basket_fails() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(TEST_TOKEN, "/api/orders", &json!({}), configure_empty_basket).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("basket is empty"));
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(TEST_TOKEN, "/api/orders", configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Value> = serde_json::from_str(&body).expect("orders should parse");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["user_id"], 1);
}

#[actix_web::test]
async fn fetch_own_order_detail() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(TEST_TOKEN, "/api/orders/10", configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let detail: Value = serde_json::from_str(&body).expect("order detail should parse");
    assert_eq!(detail["id"], 10);
    assert_eq!(detail["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn foreign_orders_read_as_missing() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request(TEST_TOKEN, "/api/orders/66", configure_customer).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admins_can_read_any_order() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request(TEST_TOKEN, "/api/orders/66", configure_admin).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn order_admin_listing_requires_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let err = get_request(TEST_TOKEN, "/api/orders/all", configure_customer).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");

    let (status, body) = get_request(TEST_TOKEN, "/api/orders/all", configure_admin).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Value> = serde_json::from_str(&body).expect("orders should parse");
    assert_eq!(orders.len(), 2);
}

fn checkout_summary() -> CheckoutSummary {
    CheckoutSummary {
        order: order(10, 1),
        lines: vec![OrderLine {
            product_id: 100,
            product_name: "Product 100".into(),
            quantity: 3,
            unit_price: Money::from_rubles(1_000),
            total: Money::from_rubles(3_000),
        }],
        suppliers: vec![SupplierNotice {
            shop: "Svyaznoy".into(),
            email: "partner@svyaznoy.example".into(),
            products: vec!["Product 100".into()],
        }],
    }
}

fn backend_with_orders() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_fetch_orders_for_user().returning(|user_id| Ok(vec![order(11, user_id), order(10, user_id)]));
    backend.expect_fetch_all_orders().returning(|| Ok(vec![order(66, 5), order(10, 1)]));
    backend.expect_fetch_order().returning(|order_id| match order_id {
        10 => Ok(Some((order(10, 1), checkout_summary().lines))),
        66 => Ok(Some((order(66, 5), vec![]))),
        _ => Ok(None),
    });
    backend
}

fn register_routes(cfg: &mut ServiceConfig, backend: MockBackend, user: market_engine::db_types::User) {
    let orders_api = OrderFlowApi::new(backend, EventProducers::default());
    cfg.service(
        web::scope("/api")
            .wrap(token_middleware(user))
            .service(OrdersCreateRoute::<MockBackend>::new())
            .service(MyOrdersRoute::<MockBackend>::new())
            // `/orders/all` must be registered ahead of `/orders/{id}`
            .service(AllOrdersRoute::<MockBackend>::new())
            .service(OrderByIdRoute::<MockBackend>::new())
            .app_data(web::Data::new(orders_api)),
    );
}

fn configure_customer(cfg: &mut ServiceConfig) {
    let mut backend = backend_with_orders();
    // The profile address must flow into the checkout
    backend
        .expect_checkout_basket()
        .withf(|&user_id, address| user_id == 1 && address == "Moscow, Tverskaya 1")
        .returning(|_, _| Ok(checkout_summary()));
    register_routes(cfg, backend, customer());
}

fn configure_customer_pickup(cfg: &mut ServiceConfig) {
    let mut backend = backend_with_orders();
    backend
        .expect_checkout_basket()
        .withf(|_, address| address == "Pickup point 7")
        .returning(|_, _| Ok(checkout_summary()));
    register_routes(cfg, backend, customer());
}

fn configure_no_address(cfg: &mut ServiceConfig) {
    // checkout_basket must never be reached without an address
    register_routes(cfg, backend_with_orders(), customer_without_address());
}

fn configure_empty_basket(cfg: &mut ServiceConfig) {
    let mut backend = backend_with_orders();
    backend.expect_checkout_basket().returning(|_, _| Err(OrderApiError::EmptyBasket));
    register_routes(cfg, backend, customer());
}

fn configure_admin(cfg: &mut ServiceConfig) {
    register_routes(cfg, backend_with_orders(), admin());
}
