use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
pub use shop_common::Money;
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------     Identifiers       ---------------------------------------------------------
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// The identifier of a registered customer (buyer). This is the principal that authenticated requests act as.
    CustomerId
);
uuid_id!(BagId);
uuid_id!(OrderId);
uuid_id!(OrderItemId);
uuid_id!(
    /// The identifier of a product in the catalog
    ProductId
);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The fulfilment state of an order.
///
/// Orders only ever move forward through `Created → ReadyForPickup → Received`. `Received` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been placed. Line item quantities may still be changed.
    Created,
    /// The order has been assembled and is waiting for the customer.
    ReadyForPickup,
    /// The customer has collected the order.
    Received,
}

impl OrderStatusType {
    /// The only status an order in this status may legally move to, or `None` for the terminal status.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::ReadyForPickup),
            Self::ReadyForPickup => Some(Self::Received),
            Self::Received => None,
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.next() == Some(new_status)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Created => write!(f, "Created"),
            OrderStatusType::ReadyForPickup => write!(f, "ReadyForPickup"),
            OrderStatusType::Received => write!(f, "Received"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "ReadyForPickup" => Ok(Self::ReadyForPickup),
            "Received" => Ok(Self::Received),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
/// A catalog entry. The order service only ever reads these.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------          Bag          ---------------------------------------------------------
/// A customer's cart.
///
/// `products` is an ordered multiset: every occurrence of a product id is one unit of that product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    pub id: BagId,
    pub customer_id: CustomerId,
    pub products: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bag {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_owned_by(&self, customer_id: &CustomerId) -> bool {
        &self.customer_id == customer_id
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_price: Money,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, customer_id: &CustomerId) -> bool {
        &self.customer_id == customer_id
    }
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
/// One line of an order: a product and the number of units bought.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A line item requested for a directly created order (i.e. one that does not come from the customer's bag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    #[serde(alias = "product")]
    pub product_id: ProductId,
    pub quantity: i64,
}

impl NewOrderItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}
