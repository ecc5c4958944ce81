use crate::{
    db_types::{Money, Product, ProductId},
    traits::OrderStoreError,
};

/// Read-only access to the product catalog, which is owned by the goods service.
///
/// Products that have been deactivated in the catalog are treated as if they do not exist.
#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    /// Fetches the catalog entry for the given product, or `None` if there is no such product.
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Option<Product>, OrderStoreError>;

    async fn product_exists(&self, product_id: &ProductId) -> Result<bool, OrderStoreError> {
        Ok(self.fetch_product(product_id).await?.is_some_and(|p| p.is_active))
    }

    /// The current unit price of the product. Fails with [`OrderStoreError::ProductNotFound`] if the product does not
    /// exist.
    async fn unit_price(&self, product_id: &ProductId) -> Result<Money, OrderStoreError> {
        match self.fetch_product(product_id).await? {
            Some(p) if p.is_active => Ok(p.price),
            _ => Err(OrderStoreError::ProductNotFound(*product_id)),
        }
    }
}
