use crate::actor_framework::Entity;
use crate::domain::{Availability, Product, ProductCreate, ProductPatch, RentPolicy, Sales};
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

impl Entity for Product {
    const KIND: &'static str = "product";
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new listing.
    ///
    /// # Notes
    /// New listings start under review and unapproved, and are `Available`.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        validate_rent(&id, &params.rent)?;
        Ok(Self {
            id,
            owner_id: params.owner_id,
            name: params.name,
            rent: params.rent,
            under_review: true,
            is_approved: false,
            availability: Availability::Available,
            currently_rented_by: None,
            rented_date: None,
            return_date: None,
            sales: Sales::default(),
        })
    }

    /// Updates listing details and moderation flags.
    ///
    /// # Fields Updated
    /// - `name`
    /// - `rent`: only while the product is `Available`
    /// - `under_review`, `is_approved`: moderation
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(rent) = patch.rent {
            if !self.availability.is_available() {
                return Err(ProductError::InUse(self.id.clone()));
            }
            validate_rent(&self.id, &rent)?;
            self.rent = rent;
        }
        if let Some(under_review) = patch.under_review {
            self.under_review = under_review;
        }
        if let Some(is_approved) = patch.is_approved {
            self.is_approved = is_approved;
        }
        Ok(())
    }

    fn on_delete(&self) -> Result<(), ProductError> {
        if self.availability.is_available() {
            Ok(())
        } else {
            Err(ProductError::InUse(self.id.clone()))
        }
    }

    /// Handles the availability transitions.
    ///
    /// # Actions
    /// - `CheckAvailability`: returns the current state
    /// - `Reserve`: `Available -> Reserved`
    /// - `Release`: `Reserved -> Available`
    /// - `CommitRental`: `Reserved -> Rented`
    /// - `Settle`: `Rented -> Available`, idempotent per order
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckAvailability => {
                Ok(ProductActionResult::CheckAvailability(self.availability.clone()))
            }
            ProductAction::Reserve { order_id, renter_id, rent } => {
                if self.under_review {
                    return Err(ProductError::UnderReview(self.id.clone()));
                }
                if !self.is_approved {
                    return Err(ProductError::NotVerified(self.id.clone()));
                }
                if !self.availability.is_available() {
                    return Err(ProductError::Unavailable(self.id.clone()));
                }
                if self.owner_id == renter_id {
                    return Err(ProductError::CannotRentOwnProduct(self.id.clone()));
                }
                if self.rent != rent {
                    return Err(ProductError::RentChanged(self.id.clone()));
                }
                self.availability = Availability::Reserved { order_id, renter_id };
                Ok(ProductActionResult::Reserve(()))
            }
            ProductAction::Release { order_id } => match &self.availability {
                Availability::Reserved { order_id: held, .. } if *held == order_id => {
                    self.availability = Availability::Available;
                    Ok(ProductActionResult::Release(true))
                }
                _ => Ok(ProductActionResult::Release(false)),
            },
            ProductAction::CommitRental { order_id, renter_id, rented_date, return_date, revenue } => {
                match &self.availability {
                    Availability::Rented { order_id: held } if *held == order_id => {
                        return Ok(ProductActionResult::CommitRental(false));
                    }
                    Availability::Reserved { order_id: held, renter_id: holder }
                        if *held == order_id && *holder == renter_id => {}
                    _ => return Err(self.hold_mismatch(order_id)),
                }
                self.availability = Availability::Rented { order_id };
                self.currently_rented_by = Some(renter_id);
                self.rented_date = Some(rented_date);
                self.return_date = Some(return_date);
                self.sales.users = self.sales.users.saturating_add(1);
                self.sales.revenue = self.sales.revenue.saturating_add(revenue);
                Ok(ProductActionResult::CommitRental(true))
            }
            ProductAction::Settle { order_id } => match &self.availability {
                Availability::Rented { order_id: held } if *held == order_id => {
                    self.availability = Availability::Available;
                    self.currently_rented_by = None;
                    self.rented_date = None;
                    self.return_date = None;
                    Ok(ProductActionResult::Settle(true))
                }
                // Never committed: settling would free a product nobody paid for.
                Availability::Reserved { order_id: held, .. } if *held == order_id => {
                    Err(self.hold_mismatch(order_id))
                }
                _ => Ok(ProductActionResult::Settle(false)),
            },
        }
    }
}

impl Product {
    fn hold_mismatch(&self, order_id: String) -> ProductError {
        ProductError::HoldMismatch { product_id: self.id.clone(), order_id }
    }
}

fn validate_rent(id: &str, rent: &RentPolicy) -> Result<(), ProductError> {
    if rent.price == 0 {
        return Err(ProductError::ValidationError(format!("{id}: rent price must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DurationType;
    use chrono::{Duration, Utc};

    fn listed() -> Product {
        let mut product = Product::from_create_params("product_1".into(), ProductCreate {
            owner_id: "owner".into(),
            name: "Camera".into(),
            rent: RentPolicy {
                duration_type: DurationType::Hourly,
                price: 30,
                security_amount: 200,
                minimum_duration: 1,
                late_fees: 25,
            },
        }).unwrap();
        product.on_update(ProductPatch::approve()).unwrap();
        product
    }

    fn reserve(order: &str, renter: &str) -> ProductAction {
        ProductAction::Reserve { order_id: order.into(), renter_id: renter.into(), rent: listed().rent }
    }

    fn commit(order: &str, renter: &str) -> ProductAction {
        let now = Utc::now();
        ProductAction::CommitRental {
            order_id: order.into(),
            renter_id: renter.into(),
            rented_date: now,
            return_date: now + Duration::hours(2),
            revenue: 60,
        }
    }

    #[test]
    fn test_new_listing_needs_moderation() {
        let mut product = Product::from_create_params("p".into(), ProductCreate {
            owner_id: "owner".into(),
            name: "Tent".into(),
            rent: listed().rent,
        }).unwrap();
        assert_eq!(product.handle_action(reserve("o", "r")), Err(ProductError::UnderReview("p".into())));

        product.on_update(ProductPatch { under_review: Some(false), ..ProductPatch::default() }).unwrap();
        assert_eq!(product.handle_action(reserve("o", "r")), Err(ProductError::NotVerified("p".into())));
    }

    #[test]
    fn test_reserve_is_exclusive() {
        let mut product = listed();
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        assert!(product.currently_rented_by.is_none());
        assert_eq!(
            product.handle_action(reserve("order_b", "renter_b")),
            Err(ProductError::Unavailable("product_1".into()))
        );
    }

    #[test]
    fn test_owner_cannot_reserve() {
        let mut product = listed();
        assert_eq!(
            product.handle_action(reserve("o", "owner")),
            Err(ProductError::CannotRentOwnProduct("product_1".into()))
        );
    }

    #[test]
    fn test_full_cycle_sets_and_clears_rental_fields() {
        let mut product = listed();
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        assert_eq!(product.handle_action(commit("order_a", "renter_a")).unwrap(), ProductActionResult::CommitRental(true));
        assert_eq!(product.currently_rented_by.as_deref(), Some("renter_a"));
        assert_eq!(product.sales, Sales { users: 1, revenue: 60 });

        // Replayed commit is a no-op.
        assert_eq!(product.handle_action(commit("order_a", "renter_a")).unwrap(), ProductActionResult::CommitRental(false));
        assert_eq!(product.sales.users, 1);

        assert_eq!(
            product.handle_action(ProductAction::Settle { order_id: "order_a".into() }).unwrap(),
            ProductActionResult::Settle(true)
        );
        assert_eq!(product.availability, Availability::Available);
        assert!(product.currently_rented_by.is_none());
        assert!(product.rented_date.is_none());
        assert!(product.return_date.is_none());
    }

    #[test]
    fn test_settle_replay_leaves_next_hold_alone() {
        let mut product = listed();
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        product.handle_action(commit("order_a", "renter_a")).unwrap();
        product.handle_action(ProductAction::Settle { order_id: "order_a".into() }).unwrap();
        assert_eq!(
            product.handle_action(ProductAction::Settle { order_id: "order_a".into() }).unwrap(),
            ProductActionResult::Settle(false)
        );

        product.handle_action(reserve("order_b", "renter_b")).unwrap();
        assert_eq!(
            product.handle_action(ProductAction::Settle { order_id: "order_a".into() }).unwrap(),
            ProductActionResult::Settle(false)
        );
        assert_eq!(product.availability.held_by(), Some("order_b"));
    }

    #[test]
    fn test_reserve_rejects_stale_rent() {
        let mut product = listed();
        let mut quoted = product.rent.clone();
        quoted.price += 5;
        let stale = ProductAction::Reserve { order_id: "o".into(), renter_id: "r".into(), rent: quoted };
        assert_eq!(product.handle_action(stale), Err(ProductError::RentChanged("product_1".into())));
        assert!(product.availability.is_available());
    }

    #[test]
    fn test_release_only_frees_own_hold() {
        let mut product = listed();
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        assert_eq!(product.handle_action(ProductAction::Release { order_id: "order_b".into() }).unwrap(), ProductActionResult::Release(false));
        assert!(!product.availability.is_available());
        assert_eq!(product.handle_action(ProductAction::Release { order_id: "order_a".into() }).unwrap(), ProductActionResult::Release(true));
        assert!(product.availability.is_available());
    }

    #[test]
    fn test_commit_requires_matching_hold() {
        let mut product = listed();
        assert!(matches!(product.handle_action(commit("order_a", "renter_a")), Err(ProductError::HoldMismatch { .. })));
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        assert!(matches!(product.handle_action(commit("order_b", "renter_a")), Err(ProductError::HoldMismatch { .. })));
        assert!(matches!(product.handle_action(ProductAction::Settle { order_id: "order_a".into() }), Err(ProductError::HoldMismatch { .. })));
    }

    #[test]
    fn test_rent_is_frozen_while_held() {
        let mut product = listed();
        product.handle_action(reserve("order_a", "renter_a")).unwrap();
        let patch = ProductPatch { rent: Some(product.rent.clone()), ..ProductPatch::default() };
        assert_eq!(product.on_update(patch), Err(ProductError::InUse("product_1".into())));
        assert_eq!(product.on_delete(), Err(ProductError::InUse("product_1".into())));
    }
}
