use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{CustomerId, Order, OrderId, OrderStatusType},
    order_objects::OrderQuery,
};

pub async fn insert_order(order: &Order, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO orders (
                id,
                customer_id,
                total_price,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.total_price)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;
    trace!("📝️ Order {} inserted for customer {}", order.id, order.customer_id);
    Ok(())
}

pub async fn fetch_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Changes the order status from `from` to `to` in a single statement.
///
/// If the order's status is not `from` when the statement runs, nothing is updated and `None` is returned. This
/// makes concurrent transitions of the same order safe without holding a lock across the read and the write.
pub async fn update_order_status(
    order_id: &OrderId,
    from: OrderStatusType,
    to: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4 RETURNING *")
        .bind(to)
        .bind(Utc::now())
        .bind(order_id)
        .bind(from)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn delete_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(order_id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Fetches one page of the customer's orders in the given status.
///
/// Resulting orders are ordered by `created_at` in ascending order. Ties are broken on the id so that pages are
/// stable.
pub async fn fetch_orders_for_customer(
    customer_id: &CustomerId,
    query: &OrderQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE customer_id = $1 AND status = $2
        ORDER BY created_at ASC, id ASC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(customer_id)
    .bind(query.status)
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(conn)
    .await?;
    Ok(orders)
}
