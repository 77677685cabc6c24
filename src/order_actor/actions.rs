use chrono::{DateTime, Utc};

use crate::domain::Order;

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Marks the order paid. This is the commit point shared with expiration:
    /// a paid order can no longer be deleted.
    ConfirmPayment { payment_id: String, paid_at: DateTime<Utc> },
    ConfirmPickup { at: DateTime<Utc> },
    ConfirmReturn { at: DateTime<Utc> },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    ConfirmPayment(PaymentTransition),
    ConfirmPickup(Order),
    ConfirmReturn(Order),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentTransition {
    /// This call moved the order to paid.
    Paid(Order),
    /// The same payment id already paid this order.
    AlreadyProcessed(Order),
}
