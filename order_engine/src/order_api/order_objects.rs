use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Money, NewOrderItem, Order, OrderItem, OrderStatusType, ProductId},
    traits::OrderStoreError,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Selects one page of a customer's orders with a given status.
///
/// `offset` counts rows, not pages. A missing or zero `limit` means [`DEFAULT_PAGE_SIZE`], and limits larger than
/// [`MAX_PAGE_SIZE`] are clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: OrderStatusType,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl OrderQuery {
    pub fn new(status: OrderStatusType) -> Self {
        Self { status, limit: None, offset: None }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(&self) -> i64 {
        match self.limit {
            None | Some(0) => i64::from(DEFAULT_PAGE_SIZE),
            Some(n) => i64::from(n.min(MAX_PAGE_SIZE)),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.offset.unwrap_or(0))
    }
}

/// An order together with all of its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A product line with the unit price that was current when the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    /// Unit price × quantity, or `None` if the result does not fit in a [`Money`].
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Σ(unit price × quantity) over all lines.
///
/// Fails with [`OrderStoreError::InvalidQuantity`] for the first line whose quantity makes the total overflow.
pub fn order_total(lines: &[PricedLine]) -> Result<Money, OrderStoreError> {
    lines.iter().try_fold(Money::default(), |total, line| {
        line.line_total()
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or(OrderStoreError::InvalidQuantity(line.quantity))
    })
}

/// Collapses a bag's multiset of products into `(product, quantity)` pairs.
///
/// Products are returned in the order of their first appearance in the bag.
pub fn group_bag_contents(products: &[ProductId]) -> Vec<(ProductId, i64)> {
    let mut result: Vec<(ProductId, i64)> = Vec::new();
    for product in products {
        match result.iter_mut().find(|(p, _)| p == product) {
            Some((_, qty)) => *qty += 1,
            None => result.push((*product, 1)),
        }
    }
    result
}

/// Validates the lines of a directly created order and merges duplicate products.
pub fn merge_order_items(items: &[NewOrderItem]) -> Result<Vec<(ProductId, i64)>, OrderStoreError> {
    if items.is_empty() {
        return Err(OrderStoreError::NoOrderItems);
    }
    let mut result: Vec<(ProductId, i64)> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(OrderStoreError::InvalidQuantity(item.quantity));
        }
        match result.iter_mut().find(|(p, _)| *p == item.product_id) {
            Some((_, qty)) => {
                *qty = qty.checked_add(item.quantity).ok_or(OrderStoreError::InvalidQuantity(item.quantity))?;
            },
            None => result.push((item.product_id, item.quantity)),
        }
    }
    Ok(result)
}
