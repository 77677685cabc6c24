use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Money;

/// A registered user. Renters and owners are both users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// KYC gate: only verified users may rent.
    pub is_verified: bool,
    /// Premium renters are not charged a security deposit.
    pub is_premium: bool,
    pub backlog: Backlog,
    /// Orders whose late fee has been booked. Outlives the backlog itself,
    /// which resets once it is paid off.
    pub late_fee_orders: Vec<String>,
    pub active_rentals: Vec<ActiveRental>,
    pub notifications: Vec<Notification>,
}

/// Penalty carried forward onto the renter's next order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Backlog {
    pub amount: Money,
    pub reason: Option<String>,
    pub reference_order: Option<String>,
}

impl Backlog {
    pub fn is_clear(&self) -> bool {
        self.amount == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveRental {
    pub product_id: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    OrderReserved,
    OrderPaid,
    OrderExpired,
    OrderCancelled,
    PickedUp,
    Returned,
    LateFeeCharged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub at: DateTime<Utc>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub is_premium: bool,
}

/// Profile and KYC updates. Backlog and rentals are not patchable.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_verified: Option<bool>,
    pub is_premium: Option<bool>,
}

impl UserCreate {
    /// Creates an unverified, non-premium user payload.
    ///
    /// # Arguments
    /// * `name` - User's display name
    /// * `email` - User's email address
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_verified: false,
            is_premium: false,
        }
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }

    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }
}
