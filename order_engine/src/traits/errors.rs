use thiserror::Error;

use crate::db_types::{BagId, OrderId, OrderItemId, OrderStatusType, ProductId};

/// The coarse error classes that callers (e.g. the HTTP layer) need to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidStatus,
    EmptyBag,
    InvalidInput,
    Internal,
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("No bag has been provisioned for this customer")]
    NoBagForCustomer,
    #[error("The requested bag {0} does not exist")]
    BagNotFound(BagId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested order item {0} does not exist")]
    OrderItemNotFound(OrderItemId),
    #[error("The requested product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("The requested product {0} is not in the bag")]
    ProductNotInBag(ProductId),
    #[error("The requester does not own this resource")]
    Unauthorized,
    #[error("The operation is not allowed while the order is {actual}. It requires the order to be {expected}.")]
    InvalidStatus { expected: OrderStatusType, actual: OrderStatusType },
    #[error("The bag is empty")]
    EmptyBag,
    #[error("An order must contain at least one item")]
    NoOrderItems,
    #[error("Invalid quantity {0}. Quantities must be positive, and small enough for the order total to be priced.")]
    InvalidQuantity(i64),
}

impl OrderStoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DatabaseError(_) => ErrorKind::Internal,
            Self::NoBagForCustomer |
            Self::BagNotFound(_) |
            Self::OrderNotFound(_) |
            Self::OrderItemNotFound(_) |
            Self::ProductNotFound(_) |
            Self::ProductNotInBag(_) => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidStatus { .. } => ErrorKind::InvalidStatus,
            Self::EmptyBag => ErrorKind::EmptyBag,
            Self::NoOrderItems | Self::InvalidQuantity(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
