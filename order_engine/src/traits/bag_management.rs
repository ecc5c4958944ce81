use crate::{
    db_types::{Bag, BagId, CustomerId, ProductId},
    traits::OrderStoreError,
};

/// Storage for customer bags.
///
/// Bags are provisioned when a customer registers, so there is no way to create or delete one here.
/// They are only mutated by adding and removing products, and emptied by [`crate::traits::OrderManagement::checkout_bag`].
#[allow(async_fn_in_trait)]
pub trait BagManagement {
    /// Returns the id of the bag belonging to the customer, if one has been provisioned.
    async fn fetch_bag_id_for_customer(&self, customer_id: &CustomerId) -> Result<Option<BagId>, OrderStoreError>;

    /// Fetches the bag, including its contents in insertion order.
    async fn fetch_bag(&self, bag_id: &BagId) -> Result<Option<Bag>, OrderStoreError>;

    /// Appends one occurrence of `product_id` to the bag and returns the updated bag. No de-duplication happens.
    async fn append_product_to_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError>;

    /// Removes exactly one occurrence of `product_id` from the bag and returns the updated bag.
    ///
    /// If the bag does not contain the product, [`OrderStoreError::ProductNotInBag`] is returned and nothing changes.
    async fn remove_product_from_bag(&self, bag_id: &BagId, product_id: &ProductId) -> Result<Bag, OrderStoreError>;
}
