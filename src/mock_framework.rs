//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.
//! [`fail_first_action`] sits in front of a live actor instead, to break a
//! multi-step flow at one step.
//! The port doubles ([`ManualClock`], [`NullNotifier`], [`AllowAllModeration`])
//! stand in for the outbound collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::domain::Notification;
use crate::ports::{Clock, ModerationError, ModerationGate, Notifier, NotifyError};

type Reply<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so the test plays the
/// actor: it inspects each request and decides the reply, or withholds
/// it.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<T::Id>, T::CreateParams, Reply<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { id, params, respond_to }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Reply<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Relays every request to `target`, except the first action `fails`
/// picks, which is answered with `ActorClosed` without reaching the actor.
pub fn fail_first_action<T: Entity>(
    target: ResourceClient<T>,
    fails: impl Fn(&T::Action) -> bool + Send + 'static,
) -> ResourceClient<T> {
    let (client, mut receiver) = create_mock_client::<T>(10);
    tokio::spawn(async move {
        let mut failed = false;
        while let Some(request) = receiver.recv().await {
            match request {
                ResourceRequest::Action { action, respond_to, .. } if !failed && fails(&action) => {
                    failed = true;
                    let _ = respond_to.send(Err(FrameworkError::ActorClosed));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(target.perform_action(id, action).await);
                }
                ResourceRequest::Create { id: Some(id), params, respond_to } => {
                    let _ = respond_to.send(target.create_with_id(id, params).await);
                }
                ResourceRequest::Create { id: None, params, respond_to } => {
                    let _ = respond_to.send(target.create(params).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(target.get(id).await);
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(target.list().await);
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(target.update(id, patch).await);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(target.delete(id).await);
                }
            }
        }
    });
    client
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(start) })
    }

    /// Noon, 1 June 2026.
    pub fn fixed() -> Arc<Self> {
        Self::new(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Notifier that drops everything.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _user_id: &str, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Moderation double that approves every user and listing.
#[derive(Debug, Default)]
pub struct AllowAllModeration;

#[async_trait]
impl ModerationGate for AllowAllModeration {
    async fn is_verified(&self, _user_id: &str) -> Result<bool, ModerationError> {
        Ok(true)
    }

    async fn is_product_approved(&self, _product_id: &str) -> Result<bool, ModerationError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        // Test Create
        let create_task = tokio::spawn(async move {
            client.create(UserCreate::new("Test", "test@example.com")).await
        });

        let (id, payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(id, None);
        assert_eq!(payload.name, "Test");
        responder.send(Ok("user_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("user_1".to_string()));
    }

    #[tokio::test]
    async fn test_fail_first_action_then_relays() {
        use crate::actor_framework::ResourceActor;
        use crate::user_actor::{UserAction, UserActionResult};

        let (actor, target) = ResourceActor::<User>::new(10, || "user_1".to_string());
        tokio::spawn(actor.run());
        let client = fail_first_action(target, |action| matches!(action, UserAction::Notify(_)));

        let id = client.create(UserCreate::new("Test", "test@example.com")).await.unwrap();
        let note = |title: &str| UserAction::Notify(Notification {
            kind: crate::domain::NotificationKind::Returned,
            title: title.to_string(),
            body: String::new(),
            at: ManualClock::fixed().now(),
        });

        assert_eq!(client.perform_action(id.clone(), note("first")).await, Err(FrameworkError::ActorClosed));
        assert_eq!(client.perform_action(id.clone(), note("second")).await, Ok(UserActionResult::Notify(1)));
        let user = client.get(id).await.unwrap().unwrap();
        assert_eq!(user.notifications.len(), 1);
        assert_eq!(user.notifications[0].title, "second");
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::fixed();
        let start = clock.now();
        clock.advance(Duration::minutes(15));
        assert_eq!(clock.now() - start, Duration::minutes(15));
    }
}
