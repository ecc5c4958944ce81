use std::fmt::Display;

use order_engine::{
    db_types::{NewOrderItem, Order, OrderId, OrderItem, ProductId},
    order_objects::OrderWithItems,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Body of the `/cart/add` and `/cart/remove` requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub product: ProductId,
}

/// Body of `/order/create`. Prices are always taken from the catalog, so only products and quantities are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub id: OrderId,
}

/// An order and the goods on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
    pub goods: Vec<OrderItem>,
}

impl From<OrderWithItems> for OrderResponse {
    fn from(value: OrderWithItems) -> Self {
        Self { order: value.order, goods: value.items }
    }
}
