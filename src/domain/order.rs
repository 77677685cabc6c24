use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Money;
use crate::pricing::PriceQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Product held, payment outstanding.
    Reserved,
    /// Paid; the rental runs until the item is returned.
    Rented,
    Returned,
}

/// A rental order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub renter_id: String,
    pub product_id: String,
    pub owner_id: String,
    pub duration: u32,
    pub sub_total: Money,
    pub deposit_charged: Money,
    pub service_charge: Money,
    pub backlog_charged: Money,
    pub total_price: Money,
    pub start_date: DateTime<Utc>,
    pub proposed_return_date: DateTime<Utc>,
    pub state: OrderState,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_picked_up: bool,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub return_delivered: bool,
    pub actual_return_date: Option<DateTime<Utc>>,
    /// Id of the payment intent opened with the gateway.
    pub external_order_id: String,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Unpaid orders past this instant are swept away.
    pub expires_at: DateTime<Utc>,
}

impl Order {
    pub fn is_overdue_unpaid(&self, now: DateTime<Utc>) -> bool {
        !self.is_paid && self.expires_at <= now
    }
}

/// Payload for persisting a freshly reserved order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub renter_id: String,
    pub product_id: String,
    pub owner_id: String,
    pub duration: u32,
    pub quote: PriceQuote,
    pub external_order_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What a renter asks for when reserving a product.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub product_id: String,
    pub start_date: DateTime<Utc>,
    /// Number of units of the product's duration type.
    pub duration: u32,
}
