use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Money;
use crate::pricing::PricingError;

/// Unit in which a rent policy is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Hourly,
    Monthly,
}

impl FromStr for DurationType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(PricingError::UnsupportedDurationType(s.to_string())),
        }
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => f.write_str("hourly"),
            Self::Monthly => f.write_str("monthly"),
        }
    }
}

/// How a product is rented out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentPolicy {
    pub duration_type: DurationType,
    /// Price per duration unit.
    pub price: Money,
    pub security_amount: Money,
    pub minimum_duration: u32,
    pub late_fees: Money,
}

/// Booking state of a product.
///
/// `Available -> Reserved -> Rented -> Available`, plus `Reserved -> Available`
/// when the holding order expires or is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Availability {
    Available,
    /// Held for an unpaid order. The renter has no possession yet.
    Reserved { order_id: String, renter_id: String },
    Rented { order_id: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Order currently holding the product, if any.
    pub fn held_by(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Reserved { order_id, .. } | Self::Rented { order_id } => Some(order_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sales {
    pub users: u32,
    pub revenue: Money,
}

/// A rentable item listed by its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub rent: RentPolicy,
    /// Set while moderation is looking at the listing.
    pub under_review: bool,
    pub is_approved: bool,
    pub availability: Availability,
    pub currently_rented_by: Option<String>,
    pub rented_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub sales: Sales,
}

/// Payload for listing a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub owner_id: String,
    pub name: String,
    pub rent: RentPolicy,
}

/// Listing and moderation updates. Availability has no patch path.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub rent: Option<RentPolicy>,
    pub under_review: Option<bool>,
    pub is_approved: Option<bool>,
}

impl ProductPatch {
    /// Patch applied by moderation when a listing passes review.
    pub fn approve() -> Self {
        Self {
            under_review: Some(false),
            is_approved: Some(true),
            ..Self::default()
        }
    }
}
