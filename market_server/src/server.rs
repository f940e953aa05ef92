use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use market_engine::{
    events::{EventHandlers, EventProducers},
    AccountApi,
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    config::{ProxyConfig, ServerConfig},
    errors::ServerError,
    mailer::{order_notification_hooks, Mailer},
    middleware::TokenAuthMiddlewareFactory,
    routes::{
        health,
        AllOrdersRoute,
        BasketAddRoute,
        BasketRemoveRoute,
        BasketRoute,
        BasketUpdateRoute,
        LoginRoute,
        LogoutRoute,
        MyAccountRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        OrdersCreateRoute,
        PartnerRegisterRoute,
        PartnerUpdateRoute,
        ProductDetailRoute,
        ProductsRoute,
        RegisterRoute,
        UpdateAddressRoute,
    },
};

/// Events published between a checkout commit and the mail handler picking them up queue here.
const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let mailer = Mailer::new(&config.mail).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, order_notification_hooks(mailer));
    let producers = handlers.producers();
    handlers.start_handlers();
    info!("📬️ Order notification handlers are running");
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let proxy_config = ProxyConfig::from_config(&config);
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("mkt::access_log"))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(proxy_config));
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .wrap(TokenAuthMiddlewareFactory::new(AuthApi::new(db.clone())))
            .service(MyAccountRoute::<SqliteDatabase>::new())
            .service(UpdateAddressRoute::<SqliteDatabase>::new())
            .service(PartnerRegisterRoute::<SqliteDatabase>::new())
            .service(PartnerUpdateRoute::<SqliteDatabase>::new())
            .service(BasketRoute::<SqliteDatabase>::new())
            .service(BasketAddRoute::<SqliteDatabase>::new())
            .service(BasketUpdateRoute::<SqliteDatabase>::new())
            .service(BasketRemoveRoute::<SqliteDatabase>::new())
            .service(OrdersCreateRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            // `/orders/all` must be registered ahead of `/orders/{id}`
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(LogoutRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductDetailRoute::<SqliteDatabase>::new())
            .service(auth_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
