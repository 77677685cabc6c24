use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use crate::domain::{Availability, Money, Product, ProductCreate, ProductPatch, RentPolicy};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::actor_framework::ResourceClient;

/// Client for interacting with the Product actor.
///
/// The availability methods are the only way to move a product between
/// `Available`, `Reserved` and `Rented`.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    /// Listing and moderation updates.
    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn check_availability(&self, id: String) -> Result<Availability, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckAvailability).await? {
            ProductActionResult::CheckAvailability(state) => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    /// Takes the hold only while the listing still carries the quoted `rent`.
    #[instrument(skip(self, rent))]
    pub async fn reserve(&self, id: String, order_id: String, renter_id: String, rent: RentPolicy) -> Result<(), ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Reserve { order_id, renter_id, rent }).await? {
            ProductActionResult::Reserve(()) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release(&self, id: String, order_id: String) -> Result<bool, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Release { order_id }).await? {
            ProductActionResult::Release(released) => Ok(released),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn commit_rental(
        &self,
        id: String,
        order_id: String,
        renter_id: String,
        rented_date: DateTime<Utc>,
        return_date: DateTime<Utc>,
        revenue: Money,
    ) -> Result<bool, ProductError> {
        debug!("Sending request");
        let action = ProductAction::CommitRental { order_id, renter_id, rented_date, return_date, revenue };
        match self.inner.perform_action(id, action).await? {
            ProductActionResult::CommitRental(applied) => Ok(applied),
            other => Err(unexpected(other)),
        }
    }

    /// Returns `false` when the order had already released the product.
    #[instrument(skip(self))]
    pub async fn settle(&self, id: String, order_id: String) -> Result<bool, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Settle { order_id }).await? {
            ProductActionResult::Settle(freed) => Ok(freed),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
