use crate::{
    db_types::{BagId, CustomerId, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderStatusType},
    order_objects::{OrderQuery, OrderWithItems},
    traits::OrderStoreError,
};

/// Storage for orders and their line items.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Converts the contents of a bag into a new order, in a single atomic transaction:
    ///
    /// * The bag is locked for the duration of the transaction, so that concurrent checkouts of the same bag are
    ///   serialised. The loser of the race sees an empty bag.
    /// * The bag must exist ([`OrderStoreError::BagNotFound`]) and belong to `customer_id`
    ///   ([`OrderStoreError::Unauthorized`]).
    /// * An empty bag fails with [`OrderStoreError::EmptyBag`].
    /// * Bag contents are grouped by product. Each product is priced from the catalog; a missing product fails the
    ///   whole checkout with [`OrderStoreError::ProductNotFound`].
    /// * An order with status `Created` and the computed total is inserted, along with one line item per distinct
    ///   product.
    /// * The bag is emptied.
    ///
    /// Either all of these writes are committed, or none are.
    async fn checkout_bag(&self, bag_id: &BagId, customer_id: &CustomerId) -> Result<OrderWithItems, OrderStoreError>;

    /// Creates an order directly from a list of products and quantities, without touching the customer's bag.
    ///
    /// The total is computed from current catalog prices, exactly as it is for a checkout. Duplicate products in
    /// `items` are merged into one line. The order and its items are inserted atomically.
    async fn insert_order(
        &self,
        customer_id: &CustomerId,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, OrderStoreError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    async fn fetch_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, OrderStoreError>;

    async fn fetch_order_item(&self, item_id: &OrderItemId) -> Result<Option<OrderItem>, OrderStoreError>;

    /// Moves the order from status `from` to status `to`, as a single conditional update.
    ///
    /// Returns the updated order, or `None` if the order was not in status `from` at the time of the update (or does
    /// not exist). The caller is responsible for checking that `from → to` is a legal transition.
    async fn transition_order_status(
        &self,
        order_id: &OrderId,
        from: OrderStatusType,
        to: OrderStatusType,
    ) -> Result<Option<Order>, OrderStoreError>;

    /// Overwrites the quantity of a line item, on condition that its order is still `Created`.
    ///
    /// Returns `None` if the item does not exist or its order has moved on. The order total is not recalculated.
    async fn update_item_quantity(
        &self,
        item_id: &OrderItemId,
        quantity: i64,
    ) -> Result<Option<OrderItem>, OrderStoreError>;

    /// Deletes the order and its line items. Returns `false` if there was no such order.
    async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderStoreError>;

    /// Fetches a page of the customer's orders that have exactly the status given in the query.
    async fn fetch_orders_for_customer(
        &self,
        customer_id: &CustomerId,
        query: &OrderQuery,
    ) -> Result<Vec<Order>, OrderStoreError>;
}
