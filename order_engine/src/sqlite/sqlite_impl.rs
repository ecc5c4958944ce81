//! `SqliteDatabase` is a concrete implementation of an order engine backend.
//!
//! It uses SQLite as the backend and implements all the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::{migrate::MigrateError, SqliteConnection, SqlitePool};

use super::db::{bags, goods, new_pool, order_items, orders, run_migrations};
use crate::{
    db_types::{
        Bag,
        BagId,
        CustomerId,
        Money,
        NewOrderItem,
        Order,
        OrderId,
        OrderItem,
        OrderItemId,
        OrderStatusType,
        Product,
        ProductId,
    },
    order_objects::{group_bag_contents, merge_order_items, order_total, OrderQuery, OrderWithItems, PricedLine},
    traits::{BagManagement, CatalogLookup, OrderManagement, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CatalogLookup for SqliteDatabase {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Option<Product>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let product = goods::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn unit_price(&self, product_id: &ProductId) -> Result<Money, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        goods::fetch_unit_price(product_id, &mut conn).await
    }
}

impl BagManagement for SqliteDatabase {
    async fn fetch_bag_id_for_customer(&self, customer_id: &CustomerId) -> Result<Option<BagId>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let id = bags::fetch_bag_id_for_customer(customer_id, &mut conn).await?;
        Ok(id)
    }

    async fn fetch_bag(&self, bag_id: &BagId) -> Result<Option<Bag>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let bag = bags::fetch_bag(bag_id, &mut conn).await?;
        Ok(bag)
    }

    async fn append_product_to_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        bags::append_product(bag_id, product_id, &mut tx).await?;
        let bag = bags::fetch_bag(bag_id, &mut tx).await?.ok_or(OrderStoreError::BagNotFound(*bag_id))?;
        tx.commit().await?;
        debug!("🛍️ Product {product_id} added to bag {bag_id}");
        Ok(bag)
    }

    async fn remove_product_from_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        if !bags::remove_one_product(bag_id, product_id, &mut tx).await? {
            return Err(OrderStoreError::ProductNotInBag(*product_id));
        }
        let bag = bags::fetch_bag(bag_id, &mut tx).await?.ok_or(OrderStoreError::BagNotFound(*bag_id))?;
        tx.commit().await?;
        debug!("🛍️ Product {product_id} removed from bag {bag_id}");
        Ok(bag)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn checkout_bag(&self, bag_id: &BagId, customer_id: &CustomerId) -> Result<OrderWithItems, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        // Dropping `tx` on any early return rolls back, which also releases the bag lock.
        let bag = bags::lock_bag(bag_id, &mut tx).await?.ok_or(OrderStoreError::BagNotFound(*bag_id))?;
        if !bag.is_owned_by(customer_id) {
            warn!("🚫️ Customer {customer_id} tried to check out bag {bag_id}, which belongs to someone else");
            return Err(OrderStoreError::Unauthorized);
        }
        if bag.is_empty() {
            return Err(OrderStoreError::EmptyBag);
        }
        let grouped = group_bag_contents(&bag.products);
        let lines = price_lines(&grouped, &mut tx).await?;
        let result = insert_priced_order(customer_id, &lines, &mut tx).await?;
        let removed = bags::clear_bag(bag_id, &mut tx).await?;
        tx.commit().await?;
        info!(
            "🛒️ Bag {bag_id} checked out into order {} ({removed} units, total {})",
            result.order.id, result.order.total_price
        );
        Ok(result)
    }

    async fn insert_order(
        &self,
        customer_id: &CustomerId,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, OrderStoreError> {
        let merged = merge_order_items(items)?;
        let mut tx = self.pool.begin().await?;
        let lines = price_lines(&merged, &mut tx).await?;
        let result = insert_priced_order(customer_id, &lines, &mut tx).await?;
        tx.commit().await?;
        info!("📝️ Order {} created directly for customer {customer_id}", result.order.id);
        Ok(result)
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = order_items::fetch_items_for_order(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_order_item(&self, item_id: &OrderItemId) -> Result<Option<OrderItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let item = order_items::fetch_item(item_id, &mut conn).await?;
        Ok(item)
    }

    async fn transition_order_status(
        &self,
        order_id: &OrderId,
        from: OrderStatusType,
        to: OrderStatusType,
    ) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(order_id, from, to, &mut conn).await?;
        Ok(order)
    }

    async fn update_item_quantity(
        &self,
        item_id: &OrderItemId,
        quantity: i64,
    ) -> Result<Option<OrderItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let item = order_items::update_quantity_if_created(item_id, quantity, &mut conn).await?;
        Ok(item)
    }

    async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let n = order_items::delete_items_for_order(order_id, &mut tx).await?;
        let deleted = orders::delete_order(order_id, &mut tx).await?;
        tx.commit().await?;
        if deleted {
            debug!("🗑️ Order {order_id} deleted along with {n} line items");
        }
        Ok(deleted)
    }

    async fn fetch_orders_for_customer(
        &self,
        customer_id: &CustomerId,
        query: &OrderQuery,
    ) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_customer(customer_id, query, &mut conn).await?;
        Ok(orders)
    }
}

/// Prices each `(product, quantity)` pair at the current catalog price.
async fn price_lines(
    grouped: &[(ProductId, i64)],
    conn: &mut SqliteConnection,
) -> Result<Vec<PricedLine>, OrderStoreError> {
    let mut lines = Vec::with_capacity(grouped.len());
    for (product_id, quantity) in grouped {
        let unit_price = goods::fetch_unit_price(product_id, &mut *conn).await?;
        lines.push(PricedLine { product_id: *product_id, unit_price, quantity: *quantity });
    }
    Ok(lines)
}

async fn insert_priced_order(
    customer_id: &CustomerId,
    lines: &[PricedLine],
    conn: &mut SqliteConnection,
) -> Result<OrderWithItems, OrderStoreError> {
    let now = Utc::now();
    let order = Order {
        id: OrderId::random(),
        customer_id: *customer_id,
        total_price: order_total(lines)?,
        status: OrderStatusType::Created,
        created_at: now,
        updated_at: now,
    };
    orders::insert_order(&order, &mut *conn).await?;
    let items = order_items::insert_items(&order.id, lines, conn).await?;
    Ok(OrderWithItems { order, items })
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        run_migrations(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Database pool closed");
    }
}
