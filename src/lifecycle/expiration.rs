use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::clients::{OrderClient, Withdrawal};
use crate::domain::{NotificationKind, Order};
use crate::error::RentalResult;
use crate::ports::{dispatch, Ports};

#[derive(Debug, Clone, PartialEq)]
pub enum ExpiryOutcome {
    /// Order deleted and product released.
    Expired(Order),
    /// Payment won the race; nothing changed.
    Paid,
    /// Order was already gone.
    Gone,
    /// Grace period still running.
    NotDue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub expired: Vec<String>,
    pub skipped: usize,
}

/// Cancels unpaid reservations once their grace period has run out.
///
/// Deadlines live on the order records (`expires_at`), so a sweep after a
/// restart picks up everything that fell due while the process was down.
#[derive(Clone)]
pub struct ExpirationScheduler {
    order_client: OrderClient,
    ports: Ports,
}

impl ExpirationScheduler {
    pub fn new(order_client: OrderClient, ports: Ports) -> Self {
        Self { order_client, ports }
    }

    /// Expires one order if it is still unpaid and past its deadline.
    #[instrument(skip(self))]
    pub async fn expire_order(&self, order_id: String, now: DateTime<Utc>) -> RentalResult<ExpiryOutcome> {
        let Some(order) = self.order_client.get_order(order_id.clone()).await? else {
            return Ok(ExpiryOutcome::Gone);
        };
        if order.is_paid {
            debug!("Order paid, skipping");
            return Ok(ExpiryOutcome::Paid);
        }
        if !order.is_overdue_unpaid(now) {
            return Ok(ExpiryOutcome::NotDue);
        }

        // Payment may still commit between the read above and this delete;
        // the delete is vetoed in that case.
        match self.order_client.withdraw_unpaid(order_id).await? {
            Withdrawal::Withdrawn(order) => {
                info!(product_id = %order.product_id, "Unpaid order expired");
                dispatch(
                    &self.ports.notifier,
                    self.ports.clock.as_ref(),
                    &order.renter_id,
                    NotificationKind::OrderExpired,
                    "Reservation expired",
                    "Payment was not received in time, please reorder",
                );
                Ok(ExpiryOutcome::Expired(order))
            }
            Withdrawal::Paid => Ok(ExpiryOutcome::Paid),
            Withdrawal::Gone => Ok(ExpiryOutcome::Gone),
        }
    }

    /// Expires every overdue unpaid order.
    #[instrument(skip(self))]
    pub async fn sweep(&self, now: DateTime<Utc>) -> RentalResult<SweepReport> {
        let due: Vec<String> = self.order_client.list_orders().await?
            .into_iter()
            .filter(|o| o.is_overdue_unpaid(now))
            .map(|o| o.id)
            .collect();

        let mut report = SweepReport::default();
        for order_id in due {
            match self.expire_order(order_id.clone(), now).await {
                Ok(ExpiryOutcome::Expired(_)) => report.expired.push(order_id),
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    error!(order_id = %order_id, error = %e, "Expiration failed, retrying next sweep");
                    report.skipped += 1;
                }
            }
        }
        if !report.expired.is_empty() {
            info!(expired = report.expired.len(), "Sweep finished");
        }
        Ok(report)
    }

    /// Runs `sweep` every `interval`, starting immediately.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Expiration sweeper starting");
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if let Err(e) = self.sweep(self.ports.clock.now()).await {
                    error!(error = %e, "Expiration sweep failed");
                }
            }
        })
    }
}
