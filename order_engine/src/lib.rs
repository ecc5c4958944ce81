//! Order Engine
//!
//! The order engine holds the core logic of the shop's order service: customers' bags (carts), the checkout that
//! turns a bag into an order, and the order lifecycle that follows.
//!
//! The library is divided into three main sections:
//! 1. Backend contracts ([`mod@traits`]). A storage backend implements [`CatalogLookup`], [`BagManagement`] and
//!    [`OrderManagement`]. SQLite is the supported backend ([`SqliteDatabase`]). The data types stored by the backend
//!    are defined in [`mod@db_types`] and are public.
//! 2. The public API ([`BagApi`], [`CheckoutApi`], [`OrderFlowApi`]). This is what the HTTP server talks to. The APIs
//!    check ownership and order status before asking the backend to make any change.
//! 3. Support types for queries and results ([`order_objects`]).
pub mod db_types;
mod order_api;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

pub use order_api::{bag_api::BagApi, checkout_api::CheckoutApi, order_flow_api::OrderFlowApi, order_objects};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{BagManagement, CatalogLookup, ErrorKind, OrderManagement, OrderStoreError};
