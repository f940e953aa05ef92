//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (I/O,
//! database calls, etc.) must be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use market_engine::{
    db_types::{NewShop, Role},
    traits::{AuthManagement, CatalogManagement, OrderManagement, UserManagement},
    AccountApi,
    AuthApi,
    CatalogApi,
    OrderFlowApi,
};

use crate::{
    auth::{extract_token, AuthenticatedUser},
    config::ProxyConfig,
    data_objects::{
        AddBasketItemRequest,
        CheckoutRequest,
        JsonResponse,
        LoginRequest,
        LoginResponse,
        OrderCreatedResponse,
        PartnerRegisterRequest,
        RegisterRequest,
        UpdateAddressRequest,
        UpdateBasketItemRequest,
    },
    errors::ServerError,
    helpers::get_remote_ip,
};

// Actix-web cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:tt),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:tt),+ where requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/auth/register" impl UserManagement, AuthManagement);
/// Route handler for the registration endpoint
///
/// Anyone can create a customer account with an email and a password. The email must be available and look like an
/// email; the password must meet the minimum length. Newly registered accounts carry the `Customer` role; shops are
/// minted through the partner registration endpoint.
pub async fn register<A>(
    api: web::Data<AuthApi<A>>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServerError>
where
    A: UserManagement + AuthManagement,
{
    trace!("💻️ Received registration request");
    let user = api.register(&body.email, &body.password).await?;
    Ok(HttpResponse::Created().json(user))
}

route!(login => Post "/auth/login" impl UserManagement, AuthManagement);
/// Route handler for the login endpoint
///
/// On success the response carries a fresh access token. Present it on subsequent requests in the `Authorization`
/// header, as `Token <hex>` or `Bearer <hex>`. Tokens stay valid until they are revoked via `/auth/logout`.
pub async fn login<A>(
    req: HttpRequest,
    api: web::Data<AuthApi<A>>,
    proxy: web::Data<ProxyConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServerError>
where
    A: UserManagement + AuthManagement,
{
    trace!("💻️ Received login request");
    let (user, token) = api.login(&body.email, &body.password).await.map_err(|e| {
        let ip = get_remote_ip(&req, proxy.use_x_forwarded_for, proxy.use_forwarded);
        warn!("🔑️ Failed login attempt for {} from {ip:?}. {e}", body.email);
        ServerError::from(e)
    })?;
    debug!("💻️ {} logged in", user.email);
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

route!(logout => Post "/auth/logout" impl UserManagement, AuthManagement);
/// Route handler for the logout endpoint
///
/// Revokes the access token presented in the `Authorization` header. Revoking an unknown token is a 401.
pub async fn logout<A>(req: HttpRequest, api: web::Data<AuthApi<A>>) -> Result<HttpResponse, ServerError>
where A: UserManagement + AuthManagement {
    let token = extract_token(&req)?;
    api.logout(&token).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Logged out")))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(products => Get "/products" impl CatalogManagement);
/// Route handler for the public product listing
///
/// Lists the products of every shop that is currently accepting orders. No authentication required.
pub async fn products<A: CatalogManagement>(api: web::Data<CatalogApi<A>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET product list");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_detail => Get "/products/{id}" impl CatalogManagement);
/// Route handler for the product detail view, including the product's extra parameters.
pub async fn product_detail<A: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET product {id}");
    let detail =
        api.product_detail(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Product {id}")))?;
    Ok(HttpResponse::Ok().json(detail))
}

//----------------------------------------------   Account  ----------------------------------------------------
route!(my_account => Get "/account" impl UserManagement);
/// Route handler for the profile endpoint. The profile embeds the owned shop for partner accounts.
pub async fn my_account<A: UserManagement>(
    claims: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET account for {}", claims.0.email);
    let profile = api
        .profile(claims.0.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("User account".to_string()))?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(update_address => Patch "/account/address" impl UserManagement);
/// Route handler for updating the delivery address on the profile.
pub async fn update_address<A: UserManagement>(
    claims: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
    body: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse, ServerError> {
    let address = body.address.trim();
    if address.is_empty() {
        return Err(ServerError::InvalidRequestBody("Address must not be empty".to_string()));
    }
    let user = api.update_address(claims.0.id, address).await?;
    debug!("💻️ {} updated their delivery address", user.email);
    Ok(HttpResponse::Ok().json(user))
}

//----------------------------------------------   Partner  ----------------------------------------------------
route!(partner_register => Post "/partner/register" impl UserManagement);
/// Route handler for the partner upgrade
///
/// Creates a shop owned by the caller and grants them the `Shop` role. A user can own at most one shop.
pub async fn partner_register<A: UserManagement>(
    claims: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
    body: web::Json<PartnerRegisterRequest>,
) -> Result<HttpResponse, ServerError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(ServerError::InvalidRequestBody("Shop name must not be empty".to_string()));
    }
    let shop = api.register_partner(claims.0.id, NewShop { name, url: body.url.clone() }).await?;
    Ok(HttpResponse::Created().json(shop))
}

route!(partner_update => Post "/partner/update" impl CatalogManagement);
/// Route handler for the partner price-list upload
///
/// The request body is the YAML price list itself. Only shop accounts may upload; the upload applies to the
/// caller's own shop and is rejected wholesale when it touches another shop's products.
pub async fn partner_update<A: CatalogManagement>(
    claims: AuthenticatedUser,
    api: web::Data<CatalogApi<A>>,
    body: web::Bytes,
) -> Result<HttpResponse, ServerError> {
    if claims.0.role != Role::Shop {
        return Err(ServerError::InsufficientPermissions("Shop only".to_string()));
    }
    let shop_id = claims
        .0
        .shop_id
        .ok_or_else(|| ServerError::BackendError("Shop account has no shop attached".to_string()))?;
    if body.is_empty() {
        return Err(ServerError::InvalidRequestBody("No file provided".to_string()));
    }
    debug!("💻️ Price list upload ({} bytes) from {}", body.len(), claims.0.email);
    let summary = api.process_price_list(shop_id, &body).await?;
    Ok(HttpResponse::Ok().json(summary))
}

//----------------------------------------------   Basket  ----------------------------------------------------
route!(basket => Get "/basket" impl OrderManagement);
/// Route handler for the basket listing. An account that never added anything reads as an empty basket.
pub async fn basket<A: OrderManagement>(
    claims: AuthenticatedUser,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let lines = api.basket(claims.0.id).await?;
    Ok(HttpResponse::Ok().json(lines))
}

route!(basket_add => Post "/basket" impl OrderManagement);
/// Route handler for adding a product to the basket. Re-adding a product accumulates its quantity.
pub async fn basket_add<A: OrderManagement>(
    claims: AuthenticatedUser,
    api: web::Data<OrderFlowApi<A>>,
    body: web::Json<AddBasketItemRequest>,
) -> Result<HttpResponse, ServerError> {
    let item = api.add_item(claims.0.id, body.product_id, body.quantity).await?;
    Ok(HttpResponse::Created().json(item))
}

route!(basket_update => Patch "/basket/{id}" impl OrderManagement);
/// Route handler for changing the quantity of one basket line.
pub async fn basket_update<A: OrderManagement>(
    claims: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
    body: web::Json<UpdateBasketItemRequest>,
) -> Result<HttpResponse, ServerError> {
    let item = api.update_item(claims.0.id, path.into_inner(), body.quantity).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(basket_remove => Delete "/basket/{id}" impl OrderManagement);
/// Route handler for removing one basket line.
pub async fn basket_remove<A: OrderManagement>(
    claims: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    api.remove_item(claims.0.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Item removed")))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders_create => Post "/orders" impl OrderManagement);
/// Route handler for checkout
///
/// Converts the caller's basket into an order. The body may carry a delivery address; without one the profile
/// address is used. The basket must not be empty. On success the basket is left empty, the order is returned, and
/// the confirmation and supplier notifications go out in the background.
pub async fn orders_create<A: OrderManagement>(
    claims: AuthenticatedUser,
    api: web::Data<OrderFlowApi<A>>,
    body: Option<web::Json<CheckoutRequest>>,
) -> Result<HttpResponse, ServerError> {
    let delivery_address = body.and_then(|b| b.into_inner().delivery_address);
    let summary = api.checkout(&claims.0, delivery_address).await?;
    let message = format!("Order #{} successfully created", summary.order.id);
    Ok(HttpResponse::Created().json(OrderCreatedResponse { message, order: summary.order }))
}

route!(my_orders => Get "/orders" impl OrderManagement);
/// Route handler for the caller's order history, newest first.
pub async fn my_orders<A: OrderManagement>(
    claims: AuthenticatedUser,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for {}", claims.0.email);
    let orders = api.orders_for_user(claims.0.id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/orders/all" impl OrderManagement where requires [Role::Admin]);
/// Route handler for the admin order listing. Requires the `Admin` role.
pub async fn all_orders<A: OrderManagement>(api: web::Data<OrderFlowApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all orders");
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl OrderManagement);
/// Route handler for one order with its lines
///
/// Users can only read their own orders; admins can read any. Foreign orders read as not found rather than
/// forbidden, so order ids don't leak.
pub async fn order_by_id<A: OrderManagement>(
    claims: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let not_found = || ServerError::NoRecordFound(format!("Order {id}"));
    let detail = api.order_detail(id).await?.ok_or_else(not_found)?;
    if detail.order.user_id != claims.0.id && claims.0.role != Role::Admin {
        return Err(not_found());
    }
    Ok(HttpResponse::Ok().json(detail))
}
