//! Request-side authentication plumbing.
//!
//! The token middleware (see [`crate::middleware`]) resolves the `Authorization` header to a user and parks the
//! result in the request extensions; handlers pick it up through the [`AuthenticatedUser`] extractor.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use market_engine::db_types::User;

use crate::errors::{AuthError, ServerError};

/// The authenticated caller, as resolved by the token middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ServerError::AuthenticationError(AuthError::MissingToken));
        ready(user)
    }
}

/// Pulls the access token out of the `Authorization` header. Both the `Token` and `Bearer` schemes are accepted.
pub fn extract_token(req: &HttpRequest) -> Result<String, AuthError> {
    let header = req.headers().get("Authorization").ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MissingToken)?.trim();
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .unwrap_or(value)
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token.to_string())
}
