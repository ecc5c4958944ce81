use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{BagId, CustomerId, NewOrderItem},
    order_objects::OrderWithItems,
    traits::{BagManagement, OrderManagement, OrderStoreError},
};

/// `CheckoutApi` creates orders, either from the contents of a customer's bag, or from an explicit list of items.
pub struct CheckoutApi<B> {
    db: B,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement
{
    /// Converts the contents of the bag into a new order and empties the bag.
    ///
    /// See [`OrderManagement::checkout_bag`] for the guarantees. On any error, neither the bag nor the order tables
    /// have been changed.
    pub async fn checkout(&self, bag_id: &BagId, requester: &CustomerId) -> Result<OrderWithItems, OrderStoreError> {
        trace!("🛒️ Customer {requester} is checking out bag {bag_id}");
        let result = self.db.checkout_bag(bag_id, requester).await;
        if let Err(e) = &result {
            debug!("🛒️ Checkout of bag {bag_id} failed. {e}");
        }
        result
    }

    /// Creates an order for `requester` from an explicit list of items, priced from the catalog.
    pub async fn create_order(
        &self,
        requester: &CustomerId,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, OrderStoreError> {
        trace!("📝️ Customer {requester} is creating an order with {} lines", items.len());
        self.db.insert_order(requester, items).await
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement + BagManagement
{
    /// Checks out the customer's own bag.
    pub async fn checkout_customer_bag(&self, customer_id: &CustomerId) -> Result<OrderWithItems, OrderStoreError> {
        let bag_id =
            self.db.fetch_bag_id_for_customer(customer_id).await?.ok_or(OrderStoreError::NoBagForCustomer)?;
        self.checkout(&bag_id, customer_id).await
    }
}
