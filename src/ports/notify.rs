//! Fire-and-forget user notifications.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::UserClient;
use crate::domain::{Notification, NotificationKind};
use crate::ports::Clock;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, notification: Notification) -> Result<(), NotifyError>;
}

/// Appends notifications to the user's in-app inbox.
#[derive(Clone)]
pub struct InboxNotifier {
    user_client: UserClient,
}

impl InboxNotifier {
    pub fn new(user_client: UserClient) -> Self {
        Self { user_client }
    }
}

#[async_trait]
impl Notifier for InboxNotifier {
    async fn notify(&self, user_id: &str, notification: Notification) -> Result<(), NotifyError> {
        self.user_client.notify(user_id.to_string(), notification).await
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// Sends a notification in the background. Failures are logged and dropped.
pub fn dispatch(
    notifier: &Arc<dyn Notifier>,
    clock: &dyn Clock,
    user_id: &str,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
) {
    let notifier = Arc::clone(notifier);
    let user_id = user_id.to_string();
    let notification = Notification {
        kind,
        title: title.into(),
        body: body.into(),
        at: clock.now(),
    };
    tokio::spawn(async move {
        match notifier.notify(&user_id, notification).await {
            Ok(()) => debug!(user_id = %user_id, ?kind, "Notification delivered"),
            Err(e) => warn!(user_id = %user_id, ?kind, error = %e, "Notification dropped"),
        }
    });
}
