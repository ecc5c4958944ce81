//! # Order engine public API
//!
//! The `order_api` module exposes the programmatic API for the order service. The API is split along the same lines
//! as the backend traits, so that clients can pick the functionality they need.
//!
//! * [`bag_api`] manages the contents of a customer's bag.
//! * [`checkout_api`] turns bags (or explicit item lists) into orders.
//! * [`order_flow_api`] moves orders through their lifecycle, and lets customers inspect, adjust and delete them.
//!
//! Every operation takes the id of the authenticated customer making the request, and checks that the customer owns
//! the bag or order being acted upon.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use order_engine::{BagApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://shop.db", 5).await?;
//! let api = BagApi::new(db);
//! let bag = api.bag_for_customer(&customer_id).await?;
//! ```
pub mod bag_api;
pub mod checkout_api;
pub mod order_flow_api;
pub mod order_objects;
