use crate::actor_framework::Entity;
use crate::domain::{ActiveRental, Backlog, User, UserCreate, UserPatch};
use super::actions::{UserAction, UserActionResult};
use super::error::UserError;

impl Entity for User {
    const KIND: &'static str = "user";
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = UserAction;
    type ActionResult = UserActionResult;
    type Error = UserError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new User from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - Name, email and the initial KYC/premium flags
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        if !params.email.contains('@') {
            return Err(UserError::ValidationError(format!("invalid email: {}", params.email)));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            is_verified: params.is_verified,
            is_premium: params.is_premium,
            backlog: Backlog::default(),
            late_fee_orders: Vec::new(),
            active_rentals: Vec::new(),
            notifications: Vec::new(),
        })
    }

    /// Updates profile and KYC flags.
    ///
    /// # Fields Updated
    /// - `name`, `email`: profile
    /// - `is_verified`: set by the KYC subsystem
    /// - `is_premium`: membership
    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            if !email.contains('@') {
                return Err(UserError::ValidationError(format!("invalid email: {email}")));
            }
            self.email = email;
        }
        if let Some(is_verified) = patch.is_verified {
            self.is_verified = is_verified;
        }
        if let Some(is_premium) = patch.is_premium {
            self.is_premium = is_premium;
        }
        Ok(())
    }

    /// Handles user-specific actions.
    ///
    /// # Actions
    /// - `StartRental`: pushes the rental and deducts the consumed backlog once
    /// - `EndRental`: removes the rental
    /// - `AddBacklog`: accumulates a penalty, at most once per order
    /// - `Notify`: appends to the inbox
    fn handle_action(&mut self, action: UserAction) -> Result<UserActionResult, UserError> {
        match action {
            UserAction::StartRental { product_id, order_id, backlog_consumed } => {
                if !self.active_rentals.iter().any(|r| r.order_id == order_id) {
                    self.active_rentals.insert(0, ActiveRental { product_id, order_id });
                    self.backlog.amount = self.backlog.amount.saturating_sub(backlog_consumed);
                    if self.backlog.is_clear() {
                        self.backlog = Backlog::default();
                    }
                }
                Ok(UserActionResult::StartRental { remaining_backlog: self.backlog.amount })
            }
            UserAction::EndRental { order_id } => {
                let before = self.active_rentals.len();
                self.active_rentals.retain(|r| r.order_id != order_id);
                Ok(UserActionResult::EndRental(self.active_rentals.len() != before))
            }
            UserAction::AddBacklog { amount, reason, order_id } => {
                if self.late_fee_orders.contains(&order_id) {
                    return Ok(UserActionResult::AddBacklog { total: self.backlog.amount, applied: false });
                }
                self.backlog.amount = self.backlog.amount
                    .checked_add(amount)
                    .ok_or_else(|| UserError::BacklogOverflow(self.id.clone()))?;
                self.backlog.reason = Some(reason);
                self.backlog.reference_order = Some(order_id.clone());
                self.late_fee_orders.push(order_id);
                Ok(UserActionResult::AddBacklog { total: self.backlog.amount, applied: true })
            }
            UserAction::Notify(notification) => {
                self.notifications.push(notification);
                Ok(UserActionResult::Notify(self.notifications.len()))
            }
        }
    }
}
