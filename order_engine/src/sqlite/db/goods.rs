use sqlx::SqliteConnection;

use crate::{
    db_types::{Money, Product, ProductId},
    traits::OrderStoreError,
};

pub async fn fetch_product(product_id: &ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("SELECT * FROM goods WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Looks up the current price of an active product.
///
/// Returns [`OrderStoreError::ProductNotFound`] if the product is missing or has been deactivated.
pub async fn fetch_unit_price(product_id: &ProductId, conn: &mut SqliteConnection) -> Result<Money, OrderStoreError> {
    let price: Option<Money> = sqlx::query_scalar("SELECT price FROM goods WHERE id = $1 AND is_active")
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    price.ok_or(OrderStoreError::ProductNotFound(*product_id))
}
