use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::clients::{ProductClient, UserClient};
use crate::domain::{Availability, Product, ReservationRequest, User};
use crate::error::{RentalError, RentalResult};
use crate::ports::ModerationGate;

/// Snapshots that passed every eligibility check.
#[derive(Debug, Clone)]
pub struct Eligible {
    pub renter: User,
    pub product: Product,
}

/// Pre-reservation checks, run in a fixed order and stopping at the first failure.
///
/// The product checks are repeated atomically by the product's `Reserve`
/// transition; this gate exists to report the precise reason early.
#[derive(Clone)]
pub struct EligibilityGate {
    user_client: UserClient,
    product_client: ProductClient,
    moderation: Arc<dyn ModerationGate>,
}

impl EligibilityGate {
    pub fn new(user_client: UserClient, product_client: ProductClient, moderation: Arc<dyn ModerationGate>) -> Self {
        Self { user_client, product_client, moderation }
    }

    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn check(&self, renter_id: &str, request: &ReservationRequest, now: DateTime<Utc>) -> RentalResult<Eligible> {
        let renter = self.user_client.get_user(renter_id.to_string()).await?
            .ok_or_else(|| RentalError::RenterNotFound(renter_id.to_string()))?;

        // 1. KYC
        if !self.moderation.is_verified(renter_id).await.map_err(|e| RentalError::Internal(e.to_string()))? {
            return Err(RentalError::KycRequired);
        }

        // 2. Start date
        if request.start_date <= now {
            return Err(RentalError::InvalidStartDate);
        }

        // 3. Existence
        let product_id = request.product_id.clone();
        let product = self.product_client.get_product(product_id.clone()).await?
            .ok_or_else(|| RentalError::ProductNotFound(product_id.clone()))?;

        // 4. Moderation review
        if product.under_review {
            return Err(RentalError::ProductUnderReview(product_id));
        }

        // 5. Approval
        if !self.moderation.is_product_approved(&product_id).await.map_err(|e| RentalError::Internal(e.to_string()))? {
            return Err(RentalError::ProductNotVerified(product_id));
        }

        // 6. Availability
        match product.availability {
            Availability::Available => {}
            Availability::Reserved { .. } => return Err(RentalError::ProductUnavailable(product_id)),
            Availability::Rented { .. } => return Err(RentalError::ProductAlreadyRented(product_id)),
        }

        // 7. Ownership
        if product.owner_id == renter_id {
            return Err(RentalError::CannotRentOwnProduct(product_id));
        }

        debug!("Renter eligible");
        Ok(Eligible { renter, product })
    }
}
