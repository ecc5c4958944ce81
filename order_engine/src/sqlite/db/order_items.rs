use sqlx::SqliteConnection;

use crate::{
    db_types::{OrderId, OrderItem, OrderItemId, OrderStatusType, ProductId},
    order_objects::PricedLine,
};

/// Inserts one line item per priced line and returns the new items in the same order as `lines`.
pub async fn insert_items(
    order_id: &OrderId,
    lines: &[PricedLine],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = insert_item(order_id, &line.product_id, line.quantity, &mut *conn).await?;
        items.push(item);
    }
    Ok(items)
}

async fn insert_item(
    order_id: &OrderId,
    product_id: &ProductId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as(
        "INSERT INTO order_items (id, order_id, product_id, quantity) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(OrderItemId::random())
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_items_for_order(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY rowid ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn fetch_item(item_id: &OrderItemId, conn: &mut SqliteConnection) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as("SELECT * FROM order_items WHERE id = $1").bind(item_id).fetch_optional(conn).await?;
    Ok(item)
}

/// Sets the quantity of the item, provided that its order is still in the `Created` status.
///
/// The status check and the write happen in one statement. Returns `None` if the item does not exist or if its order
/// has moved on.
pub async fn update_quantity_if_created(
    item_id: &OrderItemId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
        UPDATE order_items SET quantity = $1
        WHERE id = $2 AND order_id IN (SELECT id FROM orders WHERE status = $3)
        RETURNING *
        "#,
    )
    .bind(quantity)
    .bind(item_id)
    .bind(OrderStatusType::Created)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

pub async fn delete_items_for_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM order_items WHERE order_id = $1").bind(order_id).execute(conn).await?;
    Ok(result.rows_affected())
}
