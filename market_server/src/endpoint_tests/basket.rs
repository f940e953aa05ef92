use actix_web::{http::StatusCode, web, web::ServiceConfig};
use market_common::Money;
use market_engine::{
    db_types::BasketItem,
    events::EventProducers,
    order_objects::{BasketLine, ProductSummary},
    traits::OrderApiError,
    OrderFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{customer, delete_request, get_request, patch_request, post_request, token_middleware, TEST_TOKEN},
    mocks::MockBackend,
};
use crate::routes::{BasketAddRoute, BasketRemoveRoute, BasketRoute, BasketUpdateRoute};

#[actix_web::test]
async fn basket_requires_authentication() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/api/basket", configure).await.expect_err("Expected error");
    assert!(err.contains("No access token was provided"));
}

#[actix_web::test]
async fn list_basket() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(TEST_TOKEN, "/api/basket", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let items: Vec<Value> = serde_json::from_str(&body).expect("basket should parse");
    assert_eq!(items.len(), 1);
    let item = &items[0];
    for key in ["id", "basket", "product", "total_price"] {
        assert!(item.get(key).is_some(), "basket line is missing '{key}'");
    }
    for key in ["id", "name", "price"] {
        assert!(item["product"].get(key).is_some(), "basket product is missing '{key}'");
    }
    // 2 × 1000.00 rubles
    assert_eq!(item["total_price"], 200_000);
}

#[actix_web::test]
async fn add_product_to_basket() {
    let _ = env_logger::try_init().ok();
    let body = json!({"product_id": 100, "quantity": 2});
    let (status, body) = post_request(TEST_TOKEN, "/api/basket", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let item: Value = serde_json::from_str(&body).expect("basket item should parse");
    assert_eq!(item["product_id"], 100);
    assert_eq!(item["quantity"], 2);
}

#[actix_web::test]
async fn zero_quantity_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = json!({"product_id": 100, "quantity": 0});
    let (status, body) = post_request(TEST_TOKEN, "/api/basket", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("at least 1"));
}

#[actix_web::test]
async fn update_basket_line() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        patch_request(TEST_TOKEN, "/api/basket/7", &json!({"quantity": 5}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let item: Value = serde_json::from_str(&body).expect("basket item should parse");
    assert_eq!(item["quantity"], 5);
}

#[actix_web::test]
async fn foreign_basket_line_reads_as_missing() {
    let _ = env_logger::try_init().ok();
    let (status, _) = patch_request(TEST_TOKEN, "/api/basket/13", &json!({"quantity": 5}), configure)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete_request(TEST_TOKEN, "/api/basket/13", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn remove_basket_line() {
    let _ = env_logger::try_init().ok();
    let (status, body) = delete_request(TEST_TOKEN, "/api/basket/7", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Item removed"));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_basket().returning(|_| {
        Ok(vec![BasketLine {
            id: 7,
            basket_id: 1,
            product: ProductSummary { id: 100, name: "Product 100".into(), price: Money::from_rubles(1_000) },
            quantity: 2,
            total_price: Money::from_rubles(2_000),
        }])
    });
    backend.expect_add_basket_item().returning(|_, product_id, quantity| {
        Ok(BasketItem { id: 7, basket_id: 1, product_id, quantity })
    });
    backend.expect_update_basket_item().returning(|_, item_id, quantity| {
        if item_id == 7 {
            Ok(BasketItem { id: 7, basket_id: 1, product_id: 100, quantity })
        } else {
            Err(OrderApiError::BasketItemNotFound(item_id))
        }
    });
    backend.expect_remove_basket_item().returning(|_, item_id| {
        if item_id == 7 {
            Ok(())
        } else {
            Err(OrderApiError::BasketItemNotFound(item_id))
        }
    });
    let orders_api = OrderFlowApi::new(backend, EventProducers::default());
    cfg.service(
        web::scope("/api")
            .wrap(token_middleware(customer()))
            .service(BasketRoute::<MockBackend>::new())
            .service(BasketAddRoute::<MockBackend>::new())
            .service(BasketUpdateRoute::<MockBackend>::new())
            .service(BasketRemoveRoute::<MockBackend>::new())
            .app_data(web::Data::new(orders_api)),
    );
}
