use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Bag, BagId, CustomerId, ProductId},
    traits::{BagManagement, CatalogLookup, OrderStoreError},
};

/// `BagApi` manages the contents of customers' bags.
pub struct BagApi<B> {
    db: B,
}

impl<B> Debug for BagApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BagApi")
    }
}

impl<B> BagApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> BagApi<B>
where B: BagManagement + CatalogLookup
{
    /// Returns the id of the bag that belongs to the customer. Every registered customer has exactly one.
    pub async fn resolve_bag_id(&self, customer_id: &CustomerId) -> Result<BagId, OrderStoreError> {
        self.db.fetch_bag_id_for_customer(customer_id).await?.ok_or(OrderStoreError::NoBagForCustomer)
    }

    /// Fetches the customer's own bag, with its contents.
    pub async fn bag_for_customer(&self, customer_id: &CustomerId) -> Result<Bag, OrderStoreError> {
        let bag_id = self.resolve_bag_id(customer_id).await?;
        self.db.fetch_bag(&bag_id).await?.ok_or(OrderStoreError::BagNotFound(bag_id))
    }

    /// Fetches a bag on behalf of `requester`, who must own it.
    pub async fn contents(&self, bag_id: &BagId, requester: &CustomerId) -> Result<Bag, OrderStoreError> {
        let bag = self.db.fetch_bag(bag_id).await?.ok_or(OrderStoreError::BagNotFound(*bag_id))?;
        if !bag.is_owned_by(requester) {
            warn!("🛍️ Customer {requester} tried to access bag {bag_id}, which belongs to someone else");
            return Err(OrderStoreError::Unauthorized);
        }
        Ok(bag)
    }

    /// Adds one unit of the product to the bag.
    ///
    /// The bag must exist and belong to `requester`, and the product must exist in the catalog. Products that are
    /// already in the bag are appended again rather than de-duplicated.
    pub async fn add(
        &self,
        bag_id: &BagId,
        product_id: &ProductId,
        requester: &CustomerId,
    ) -> Result<Bag, OrderStoreError> {
        self.contents(bag_id, requester).await?;
        if !self.db.product_exists(product_id).await? {
            debug!("🛍️ Cannot add product {product_id} to bag {bag_id}. It is not in the catalog.");
            return Err(OrderStoreError::ProductNotFound(*product_id));
        }
        let bag = self.db.append_product_to_bag(bag_id, product_id).await?;
        trace!("🛍️ Bag {bag_id} now holds {} units", bag.products.len());
        Ok(bag)
    }

    /// Removes one unit of the product from the bag.
    ///
    /// Fails with [`OrderStoreError::ProductNotInBag`] if the bag holds no units of the product.
    pub async fn remove(
        &self,
        bag_id: &BagId,
        product_id: &ProductId,
        requester: &CustomerId,
    ) -> Result<Bag, OrderStoreError> {
        self.contents(bag_id, requester).await?;
        let bag = self.db.remove_product_from_bag(bag_id, product_id).await?;
        trace!("🛍️ Bag {bag_id} now holds {} units", bag.products.len());
        Ok(bag)
    }
}
