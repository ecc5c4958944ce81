use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{FromRow, SqliteConnection};

use crate::db_types::{Bag, BagId, CustomerId, ProductId};

/// A row of the `bags` table, without its contents.
#[derive(Debug, Clone, FromRow)]
struct BagRow {
    id: BagId,
    customer_id: CustomerId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BagRow {
    fn with_products(self, products: Vec<ProductId>) -> Bag {
        Bag {
            id: self.id,
            customer_id: self.customer_id,
            products,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub async fn fetch_bag_id_for_customer(
    customer_id: &CustomerId,
    conn: &mut SqliteConnection,
) -> Result<Option<BagId>, sqlx::Error> {
    let id = sqlx::query_scalar("SELECT id FROM bags WHERE customer_id = $1")
        .bind(customer_id)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

/// The products in the bag, one entry per unit, in the order they were added.
pub async fn fetch_bag_products(bag_id: &BagId, conn: &mut SqliteConnection) -> Result<Vec<ProductId>, sqlx::Error> {
    let products = sqlx::query_scalar("SELECT product_id FROM bag_items WHERE bag_id = $1 ORDER BY position ASC")
        .bind(bag_id)
        .fetch_all(conn)
        .await?;
    Ok(products)
}

pub async fn fetch_bag(bag_id: &BagId, conn: &mut SqliteConnection) -> Result<Option<Bag>, sqlx::Error> {
    let row: Option<BagRow> = sqlx::query_as("SELECT id, customer_id, created_at, updated_at FROM bags WHERE id = $1")
        .bind(bag_id)
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => {
            let products = fetch_bag_products(bag_id, conn).await?;
            Ok(Some(row.with_products(products)))
        },
        None => Ok(None),
    }
}

/// Takes the write lock on the bag by touching its `updated_at` column.
///
/// When called as the first statement of a transaction, no other connection can modify the bag (or anything else)
/// until the transaction ends. Returns `None` if the bag does not exist.
pub async fn lock_bag(bag_id: &BagId, conn: &mut SqliteConnection) -> Result<Option<Bag>, sqlx::Error> {
    let row: Option<BagRow> = sqlx::query_as(
        "UPDATE bags SET updated_at = $1 WHERE id = $2 RETURNING id, customer_id, created_at, updated_at",
    )
    .bind(Utc::now())
    .bind(bag_id)
    .fetch_optional(&mut *conn)
    .await?;
    match row {
        Some(row) => {
            trace!("🔒️ Bag {bag_id} locked");
            let products = fetch_bag_products(bag_id, conn).await?;
            Ok(Some(row.with_products(products)))
        },
        None => Ok(None),
    }
}

async fn touch_bag(bag_id: &BagId, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bags SET updated_at = $1 WHERE id = $2").bind(Utc::now()).bind(bag_id).execute(conn).await?;
    Ok(())
}

pub async fn append_product(
    bag_id: &BagId,
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    touch_bag(bag_id, &mut *conn).await?;
    sqlx::query("INSERT INTO bag_items (bag_id, product_id) VALUES ($1, $2)")
        .bind(bag_id)
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Removes the most recently added occurrence of `product_id` from the bag.
///
/// Returns `false` if the bag did not contain the product.
pub async fn remove_one_product(
    bag_id: &BagId,
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM bag_items WHERE position = (
            SELECT position FROM bag_items
            WHERE bag_id = $1 AND product_id = $2
            ORDER BY position DESC
            LIMIT 1
        )
        "#,
    )
    .bind(bag_id)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;
    let removed = result.rows_affected() > 0;
    if removed {
        touch_bag(bag_id, conn).await?;
    }
    Ok(removed)
}

/// Empties the bag, returning the number of units removed.
pub async fn clear_bag(bag_id: &BagId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bag_items WHERE bag_id = $1").bind(bag_id).execute(conn).await?;
    Ok(result.rows_affected())
}
