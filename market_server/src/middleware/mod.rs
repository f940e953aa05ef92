mod acl;
mod token_auth;

pub use acl::{AclMiddlewareFactory, AclMiddlewareService};
pub use token_auth::{TokenAuthMiddlewareFactory, TokenAuthMiddlewareService};
