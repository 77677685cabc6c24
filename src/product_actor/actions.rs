use chrono::{DateTime, Utc};

use crate::domain::{Availability, Money, RentPolicy};

/// Custom actions for Product entities.
///
/// These are the only transitions that touch availability fields.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the booking state without modifying it.
    CheckAvailability,
    /// `Available -> Reserved`, compare-and-set.
    ///
    /// # Errors
    /// Fails if the product is held, under review, unapproved, or owned by the renter,
    /// or if `rent` is no longer the listing's policy.
    Reserve {
        order_id: String,
        renter_id: String,
        /// Policy the order was quoted against.
        rent: RentPolicy,
    },
    /// `Reserved -> Available` for the given order. A no-op when that order
    /// does not hold the product.
    Release { order_id: String },
    /// `Reserved -> Rented` on payment confirmation.
    CommitRental {
        order_id: String,
        renter_id: String,
        rented_date: DateTime<Utc>,
        return_date: DateTime<Utc>,
        revenue: Money,
    },
    /// `Rented -> Available` on return. A no-op once the order no longer
    /// holds the product, so an interrupted settlement can be retried.
    Settle { order_id: String },
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    CheckAvailability(Availability),
    Reserve(()),
    /// `true` if the hold was released, `false` if nothing was held.
    Release(bool),
    /// `false` when the rental was already committed for this order.
    CommitRental(bool),
    /// `false` when the order had already released the product.
    Settle(bool),
}
