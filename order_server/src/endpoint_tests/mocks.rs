use mockall::mock;
use order_engine::{
    db_types::{Bag, BagId, CustomerId, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderStatusType, Product, ProductId},
    order_objects::{OrderQuery, OrderWithItems},
    traits::{BagManagement, CatalogLookup, OrderManagement, OrderStoreError},
};

mock! {
    pub ShopBackend {}
    impl CatalogLookup for ShopBackend {
        async fn fetch_product(&self, product_id: &ProductId) -> Result<Option<Product>, OrderStoreError>;
    }
    impl BagManagement for ShopBackend {
        async fn fetch_bag_id_for_customer(&self, customer_id: &CustomerId) -> Result<Option<BagId>, OrderStoreError>;
        async fn fetch_bag(&self, bag_id: &BagId) -> Result<Option<Bag>, OrderStoreError>;
        async fn append_product_to_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError>;
        async fn remove_product_from_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError>;
    }
    impl OrderManagement for ShopBackend {
        async fn checkout_bag(&self, bag_id: &BagId, customer_id: &CustomerId) -> Result<OrderWithItems, OrderStoreError>;
        async fn insert_order(&self, customer_id: &CustomerId, items: &[NewOrderItem]) -> Result<OrderWithItems, OrderStoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, OrderStoreError>;
        async fn fetch_order_item(&self, item_id: &OrderItemId) -> Result<Option<OrderItem>, OrderStoreError>;
        async fn transition_order_status(&self, order_id: &OrderId, from: OrderStatusType, to: OrderStatusType) -> Result<Option<Order>, OrderStoreError>;
        async fn update_item_quantity(&self, item_id: &OrderItemId, quantity: i64) -> Result<Option<OrderItem>, OrderStoreError>;
        async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderStoreError>;
        async fn fetch_orders_for_customer(&self, customer_id: &CustomerId, query: &OrderQuery) -> Result<Vec<Order>, OrderStoreError>;
    }
}
