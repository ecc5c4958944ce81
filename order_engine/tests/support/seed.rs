//! Test fixtures. The catalog and bag provisioning belong to other services, so tests write those rows directly.
use chrono::Utc;
use order_engine::{
    db_types::{BagId, CustomerId, Money, ProductId},
    SqliteDatabase,
};

pub async fn insert_product(db: &SqliteDatabase, name: &str, price: i64) -> ProductId {
    let id = ProductId::random();
    sqlx::query("INSERT INTO goods (id, name, description, price, is_active, created_at) VALUES ($1, $2, $3, $4, 1, $5)")
        .bind(id)
        .bind(name)
        .bind(format!("A fine {name}"))
        .bind(Money::from(price))
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .expect("Error inserting product");
    id
}

pub async fn delete_product(db: &SqliteDatabase, id: &ProductId) {
    sqlx::query("DELETE FROM goods WHERE id = $1").bind(id).execute(db.pool()).await.expect("Error deleting product");
}

pub async fn deactivate_product(db: &SqliteDatabase, id: &ProductId) {
    sqlx::query("UPDATE goods SET is_active = 0 WHERE id = $1")
        .bind(id)
        .execute(db.pool())
        .await
        .expect("Error deactivating product");
}

/// Registers a new customer and provisions their (empty) bag.
pub async fn new_customer(db: &SqliteDatabase) -> (CustomerId, BagId) {
    let customer_id = CustomerId::random();
    let bag_id = BagId::random();
    let now = Utc::now();
    sqlx::query("INSERT INTO bags (id, customer_id, created_at, updated_at) VALUES ($1, $2, $3, $4)")
        .bind(bag_id)
        .bind(customer_id)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .expect("Error provisioning bag");
    (customer_id, bag_id)
}

pub async fn count_order_items(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_items").fetch_one(db.pool()).await.expect("Error counting items")
}

pub async fn count_orders(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(db.pool()).await.expect("Error counting orders")
}
