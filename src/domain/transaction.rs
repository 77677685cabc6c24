use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Paid,
}

/// Immutable record of a confirmed payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// `<order id>:<payment id>`; uniqueness of this key is the idempotency guard.
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub renter_id: String,
    pub external_order_id: String,
    pub payment_id: String,
    pub amount: Money,
    pub status: TransactionStatus,
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn key(order_id: &str, payment_id: &str) -> String {
        format!("{order_id}:{payment_id}")
    }
}

#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub order_id: String,
    pub product_id: String,
    pub renter_id: String,
    pub external_order_id: String,
    pub payment_id: String,
    pub amount: Money,
    pub recorded_at: DateTime<Utc>,
}
