use crate::domain::{Money, Notification};

/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Records a paid rental and settles the backlog that order charged.
    StartRental {
        product_id: String,
        order_id: String,
        backlog_consumed: Money,
    },
    /// Drops the rental from the active set once it is returned.
    EndRental { order_id: String },
    /// Adds a penalty to be charged on the next order. Ignored if this
    /// order's penalty was already booked.
    AddBacklog {
        amount: Money,
        reason: String,
        order_id: String,
    },
    Notify(Notification),
}

/// Results from UserActions - variants match 1:1 with UserAction
#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    /// Backlog left after the charged amount was deducted.
    StartRental { remaining_backlog: Money },
    /// `false` when the order was not in the active set.
    EndRental(bool),
    /// Backlog total, and whether this call added to it.
    AddBacklog { total: Money, applied: bool },
    Notify(usize),
}
