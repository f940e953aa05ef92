//! Token authentication middleware.
//!
//! Placed on the `/api` scope. It resolves the access token in the `Authorization` header to a user via
//! [`AuthApi::authenticate`] and parks an [`AuthenticatedUser`] in the request extensions for the extractor and the
//! ACL middleware downstream. Requests without a valid token are rejected with a 401 before they reach any handler.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::debug;
use market_engine::{
    traits::{AuthManagement, UserManagement},
    AuthApi,
};

use crate::{auth::AuthenticatedUser, errors::ServerError};

pub struct TokenAuthMiddlewareFactory<B> {
    api: Rc<AuthApi<B>>,
}

impl<B> TokenAuthMiddlewareFactory<B>
where B: UserManagement + AuthManagement
{
    pub fn new(api: AuthApi<B>) -> Self {
        Self { api: Rc::new(api) }
    }
}

impl<S, Body, B> Transform<S, ServiceRequest> for TokenAuthMiddlewareFactory<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: UserManagement + AuthManagement + 'static,
{
    type Response = ServiceResponse<Body>;
    type Error = Error;
    type Transform = TokenAuthMiddlewareService<S, B>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(TokenAuthMiddlewareService { api: Rc::clone(&self.api), service: Rc::new(service) })
    }
}

pub struct TokenAuthMiddlewareService<S, B> {
    api: Rc<AuthApi<B>>,
    service: Rc<S>,
}

impl<S, Body, B> Service<ServiceRequest> for TokenAuthMiddlewareService<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: UserManagement + AuthManagement + 'static,
{
    type Response = ServiceResponse<Body>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let api = Rc::clone(&self.api);
        Box::pin(async move {
            let token = crate::auth::extract_token(req.request()).map_err(ServerError::AuthenticationError)?;
            let user = api.authenticate(&token).await.map_err(|e| {
                debug!("🔒️ Rejecting request to {}: {e}", req.path());
                ServerError::from(e)
            })?;
            req.extensions_mut().insert(AuthenticatedUser(user));
            service.call(req).await
        })
    }
}
