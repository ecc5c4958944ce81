mod auth;

pub use auth::{JwtAuthMiddlewareFactory, JwtAuthMiddlewareService};
