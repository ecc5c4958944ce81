//! # Backend behaviour
//!
//! The traits in this module define the contracts that a storage backend must fulfil in order to power the order
//! service. The public APIs in [`crate::order_api`] are generic over these traits, so that they can be backed by
//! SQLite in production, and by mocks in tests.
//!
//! * [`CatalogLookup`] is the read-only view of the product catalog: existence and unit prices.
//! * [`BagManagement`] stores each customer's bag (cart) as an ordered multiset of product ids.
//! * [`OrderManagement`] stores orders and their line items, and owns the atomic checkout transaction.
//!
//! Backends do not check ownership on plain reads and writes; the APIs do that. The exception is
//! [`OrderManagement::checkout_bag`], which has to verify ownership inside its own transaction.
mod bag_management;
mod catalog;
mod errors;
mod order_management;

pub use bag_management::BagManagement;
pub use catalog::CatalogLookup;
pub use errors::{ErrorKind, OrderStoreError};
pub use order_management::OrderManagement;
