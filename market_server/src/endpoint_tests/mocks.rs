use market_engine::{
    db_types::{BasketItem, ExtraParameter, NewShop, NewUser, Order, Product, Shop, User},
    helpers::price_list::{PriceList, PriceListSummary},
    order_objects::{BasketLine, CheckoutSummary, OrderLine},
    traits::{
        AccountApiError,
        AuthApiError,
        AuthManagement,
        CatalogApiError,
        CatalogManagement,
        OrderApiError,
        OrderManagement,
        UserManagement,
    },
};
use mockall::mock;

mock! {
    pub Backend {}
    impl UserManagement for Backend {
        async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError>;
        async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;
        async fn fetch_credentials(&self, email: &str) -> Result<Option<(User, String)>, AccountApiError>;
        async fn update_address(&self, user_id: i64, address: &str) -> Result<User, AccountApiError>;
        async fn create_shop_for_user(&self, user_id: i64, shop: NewShop) -> Result<Shop, AccountApiError>;
        async fn fetch_shop(&self, shop_id: i64) -> Result<Option<Shop>, AccountApiError>;
    }
    impl AuthManagement for Backend {
        async fn store_token(&self, user_id: i64, token_digest: &str) -> Result<(), AuthApiError>;
        async fn fetch_user_by_token(&self, token_digest: &str) -> Result<User, AuthApiError>;
        async fn revoke_token(&self, token_digest: &str) -> Result<(), AuthApiError>;
    }
    impl CatalogManagement for Backend {
        async fn fetch_products_for_sale(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_extra_parameters(&self, product_id: i64) -> Result<Vec<ExtraParameter>, CatalogApiError>;
        async fn upsert_price_list(&self, shop_id: i64, price_list: &PriceList) -> Result<PriceListSummary, CatalogApiError>;
    }
    impl OrderManagement for Backend {
        async fn add_basket_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<BasketItem, OrderApiError>;
        async fn update_basket_item(&self, user_id: i64, item_id: i64, quantity: i64) -> Result<BasketItem, OrderApiError>;
        async fn remove_basket_item(&self, user_id: i64, item_id: i64) -> Result<(), OrderApiError>;
        async fn fetch_basket(&self, user_id: i64) -> Result<Vec<BasketLine>, OrderApiError>;
        async fn checkout_basket(&self, user_id: i64, delivery_address: &str) -> Result<CheckoutSummary, OrderApiError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<(Order, Vec<OrderLine>)>, OrderApiError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderApiError>;
    }
}
