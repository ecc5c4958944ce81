//! # Shop order server
//! This crate hosts the HTTP server for the shop's order service. It is responsible for:
//! * Authenticating requests with HS256 bearer tokens, and passing the authenticated customer to the handlers.
//! * Translating HTTP requests into calls on the [`order_engine`] APIs.
//! * Mapping engine errors onto HTTP status codes, with a `{"error": "..."}` body.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `GET /cart`, `POST /cart/add`, `POST /cart/remove`: manage the caller's bag.
//! * `POST /order/create-from-cart`: check out the caller's bag.
//! * `POST /order/create`: create an order from an explicit list of products.
//! * `GET /order/get/{id}`, `GET /order/info`: read orders.
//! * `POST /order/{id}/ready`, `POST /order/{id}/received`, `PATCH /order/item/{id}`, `DELETE /order/{id}`: manage
//!   orders.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;
