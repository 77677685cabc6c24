use tracing::{debug, instrument};
use crate::domain::{Money, Notification, User, UserCreate, UserPatch};
use crate::user_actor::{UserAction, UserActionResult, UserError};
use crate::actor_framework::ResourceClient;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<String, UserError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    /// Profile and KYC updates, as issued by the admin surface.
    #[instrument(skip(self))]
    pub async fn update_user(&self, id: String, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Returns the backlog left after deducting `backlog_consumed`.
    #[instrument(skip(self))]
    pub async fn start_rental(
        &self,
        id: String,
        product_id: String,
        order_id: String,
        backlog_consumed: Money,
    ) -> Result<Money, UserError> {
        debug!("Sending request");
        let action = UserAction::StartRental { product_id, order_id, backlog_consumed };
        match self.inner.perform_action(id, action).await? {
            UserActionResult::StartRental { remaining_backlog } => Ok(remaining_backlog),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn end_rental(&self, id: String, order_id: String) -> Result<bool, UserError> {
        debug!("Sending request");
        match self.inner.perform_action(id, UserAction::EndRental { order_id }).await? {
            UserActionResult::EndRental(removed) => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the new backlog total, or `None` if this order was already charged.
    #[instrument(skip(self, reason))]
    pub async fn add_backlog(&self, id: String, amount: Money, reason: String, order_id: String) -> Result<Option<Money>, UserError> {
        debug!("Sending request");
        match self.inner.perform_action(id, UserAction::AddBacklog { amount, reason, order_id }).await? {
            UserActionResult::AddBacklog { total, applied } => Ok(applied.then_some(total)),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, notification), fields(kind = ?notification.kind))]
    pub async fn notify(&self, id: String, notification: Notification) -> Result<(), UserError> {
        debug!("Sending request");
        match self.inner.perform_action(id, UserAction::Notify(notification)).await? {
            UserActionResult::Notify(_) => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: UserActionResult) -> UserError {
    UserError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
