use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CustomerId, Order, OrderId, OrderItem, OrderItemId, OrderStatusType},
    order_objects::{OrderQuery, OrderWithItems},
    traits::{OrderManagement, OrderStoreError},
};

/// `OrderFlowApi` moves orders through their lifecycle, `Created → ReadyForPickup → Received`, and gives customers
/// access to their orders.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Fetches the order, failing if it does not exist or does not belong to `requester`.
    async fn owned_order(&self, order_id: &OrderId, requester: &CustomerId) -> Result<Order, OrderStoreError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderStoreError::OrderNotFound(*order_id))?;
        if !order.is_owned_by(requester) {
            warn!("📦️ Customer {requester} tried to access order {order_id}, which belongs to someone else");
            return Err(OrderStoreError::Unauthorized);
        }
        Ok(order)
    }

    /// Marks a `Created` order as ready for pickup.
    pub async fn mark_ready(&self, order_id: &OrderId, requester: &CustomerId) -> Result<Order, OrderStoreError> {
        self.advance(order_id, requester, OrderStatusType::Created).await
    }

    /// Marks an order that is ready for pickup as received by the customer.
    pub async fn mark_received(&self, order_id: &OrderId, requester: &CustomerId) -> Result<Order, OrderStoreError> {
        self.advance(order_id, requester, OrderStatusType::ReadyForPickup).await
    }

    /// Moves the order from `from` to the status that follows it.
    ///
    /// The status check is repeated by the backend as part of the update, so if another request changes the status
    /// in between, this call fails with [`OrderStoreError::InvalidStatus`] instead of overwriting it.
    async fn advance(
        &self,
        order_id: &OrderId,
        requester: &CustomerId,
        from: OrderStatusType,
    ) -> Result<Order, OrderStoreError> {
        let order = self.owned_order(order_id, requester).await?;
        let Some(to) = from.next() else {
            return Err(OrderStoreError::InvalidStatus { expected: from, actual: order.status });
        };
        if order.status != from {
            debug!("📦️ Order {order_id} cannot move to {to}. It is {}", order.status);
            return Err(OrderStoreError::InvalidStatus { expected: from, actual: order.status });
        }
        match self.db.transition_order_status(order_id, from, to).await? {
            Some(updated) => {
                info!("📦️ Order {order_id} is now {to}");
                Ok(updated)
            },
            None => {
                let current = self.db.fetch_order(order_id).await?.ok_or(OrderStoreError::OrderNotFound(*order_id))?;
                warn!("📦️ Order {order_id} changed to {} while moving it to {to}", current.status);
                Err(OrderStoreError::InvalidStatus { expected: from, actual: current.status })
            },
        }
    }

    /// Changes the quantity of a line item while its order is still `Created`.
    ///
    /// The order's `total_price` is NOT recalculated. After a quantity change the stored total reflects the quantities
    /// at checkout time.
    pub async fn update_item_quantity(
        &self,
        item_id: &OrderItemId,
        quantity: i64,
        requester: &CustomerId,
    ) -> Result<OrderItem, OrderStoreError> {
        if quantity <= 0 {
            return Err(OrderStoreError::InvalidQuantity(quantity));
        }
        let item = self.db.fetch_order_item(item_id).await?.ok_or(OrderStoreError::OrderItemNotFound(*item_id))?;
        let order = self.owned_order(&item.order_id, requester).await?;
        if order.status != OrderStatusType::Created {
            return Err(OrderStoreError::InvalidStatus { expected: OrderStatusType::Created, actual: order.status });
        }
        match self.db.update_item_quantity(item_id, quantity).await? {
            Some(updated) => {
                debug!("📦️ Item {item_id} of order {} now has quantity {quantity}", order.id);
                Ok(updated)
            },
            None => {
                let current = self.db.fetch_order(&order.id).await?.ok_or(OrderStoreError::OrderNotFound(order.id))?;
                Err(OrderStoreError::InvalidStatus { expected: OrderStatusType::Created, actual: current.status })
            },
        }
    }

    /// Deletes the order and its line items, whatever its status.
    pub async fn delete(&self, order_id: &OrderId, requester: &CustomerId) -> Result<(), OrderStoreError> {
        let order = self.owned_order(order_id, requester).await?;
        if !self.db.delete_order(order_id).await? {
            return Err(OrderStoreError::OrderNotFound(*order_id));
        }
        info!("🗑️ Order {order_id} ({}) deleted by its owner", order.status);
        Ok(())
    }

    /// Lists a page of the customer's orders that have exactly the status in `query`, oldest first.
    pub async fn list(&self, customer_id: &CustomerId, query: &OrderQuery) -> Result<Vec<Order>, OrderStoreError> {
        let orders = self.db.fetch_orders_for_customer(customer_id, query).await?;
        trace!("📦️ {} {} orders fetched for customer {customer_id}", orders.len(), query.status);
        Ok(orders)
    }

    /// Fetches an order together with its line items.
    pub async fn order_with_items(
        &self,
        order_id: &OrderId,
        requester: &CustomerId,
    ) -> Result<OrderWithItems, OrderStoreError> {
        let order = self.owned_order(order_id, requester).await?;
        let items = self.db.fetch_order_items(order_id).await?;
        Ok(OrderWithItems { order, items })
    }
}
