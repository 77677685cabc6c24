use tracing::{error, info, instrument, warn};

use crate::clients::{OrderClient, ProductClient, TransactionClient, UserClient};
use crate::domain::{NotificationKind, Order, Transaction, TransactionCreate};
use crate::error::{RentalError, RentalResult};
use crate::order_actor::{OrderError, PaymentTransition};
use crate::ports::{dispatch, Ports};
use crate::transaction_actor::TransactionError;

/// Payment callback as delivered by the gateway.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub order_id: String,
    /// Gateway order id returned when the intent was opened.
    pub external_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// First confirmation: the rental is committed.
    Confirmed(Transaction),
    /// Replay of an already applied (order, payment) pair; nothing changed.
    AlreadyProcessed { order_id: String, payment_id: String },
}

/// Applies a verified payment exactly once.
#[derive(Clone)]
pub struct PaymentReconciler {
    order_client: OrderClient,
    product_client: ProductClient,
    user_client: UserClient,
    transaction_client: TransactionClient,
    ports: Ports,
}

impl PaymentReconciler {
    pub fn new(
        order_client: OrderClient,
        product_client: ProductClient,
        user_client: UserClient,
        transaction_client: TransactionClient,
        ports: Ports,
    ) -> Self {
        Self {
            order_client,
            product_client,
            user_client,
            transaction_client,
            ports,
        }
    }

    /// Verifies and applies one payment confirmation.
    ///
    /// The order's `ConfirmPayment` transition is the commit point: it fails
    /// once expiration has deleted the order, and once it succeeds expiration
    /// can no longer delete it. Everything after it targets records pinned to
    /// this order. A replay of a committed payment re-runs the follow-up
    /// steps until the transaction is in the ledger.
    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.order_id, payment_id = %confirmation.payment_id))]
    pub async fn confirm(&self, confirmation: PaymentConfirmation) -> RentalResult<PaymentOutcome> {
        let PaymentConfirmation { order_id, external_order_id, payment_id, signature } = confirmation;

        let order = self.order_client.get_order(order_id.clone()).await?
            .ok_or_else(|| RentalError::OrderNotFound(order_id.clone()))?;

        if order.external_order_id != external_order_id
            || !self.ports.gateway.verify_signature(&external_order_id, &payment_id, &signature)
        {
            warn!("Payment signature rejected");
            return Err(RentalError::InvalidSignature);
        }

        if self.transaction_client.find(&order_id, &payment_id).await?.is_some() {
            info!("Payment already recorded");
            return Ok(PaymentOutcome::AlreadyProcessed { order_id, payment_id });
        }

        let now = self.ports.clock.now();
        let order = match self.order_client.confirm_payment(order_id.clone(), payment_id.clone(), now).await {
            Ok(PaymentTransition::Paid(order)) => order,
            Ok(PaymentTransition::AlreadyProcessed(order)) => {
                // Paid under this payment id but not yet in the ledger. Finish
                // the follow-up steps; each is a no-op once applied.
                info!("Order already paid, completing rental commit");
                self.commit_rental(&order, &payment_id).await.map_err(|e| {
                    error!(error = %e, "Rental commit still incomplete on replay");
                    e
                })?;
                return Ok(PaymentOutcome::AlreadyProcessed { order_id, payment_id });
            }
            Err(OrderError::NotFound(_)) => {
                warn!("Order expired before payment committed");
                return Err(RentalError::OrderNotFound(order_id));
            }
            Err(e) => return Err(e.into()),
        };
        info!(total = order.total_price, "Order marked paid");

        let transaction = self.commit_rental(&order, &payment_id).await.map_err(|e| {
            error!(error = %e, "Rental commit incomplete after payment");
            e
        })?;

        dispatch(
            &self.ports.notifier,
            self.ports.clock.as_ref(),
            &order.owner_id,
            NotificationKind::OrderPaid,
            "Rental confirmed",
            format!("Order {} was paid", order.id),
        );
        dispatch(
            &self.ports.notifier,
            self.ports.clock.as_ref(),
            &order.renter_id,
            NotificationKind::OrderPaid,
            "Payment received",
            format!("Return due by {}", order.proposed_return_date.to_rfc3339()),
        );
        Ok(PaymentOutcome::Confirmed(transaction))
    }

    /// Side effects of a committed payment. Each step tolerates being replayed.
    async fn commit_rental(&self, order: &Order, payment_id: &str) -> RentalResult<Transaction> {
        self.product_client.commit_rental(
            order.product_id.clone(),
            order.id.clone(),
            order.renter_id.clone(),
            order.start_date,
            order.proposed_return_date,
            order.sub_total,
        ).await?;

        let remaining = self.user_client.start_rental(
            order.renter_id.clone(),
            order.product_id.clone(),
            order.id.clone(),
            order.backlog_charged,
        ).await?;
        if order.backlog_charged > 0 {
            info!(charged = order.backlog_charged, remaining, "Backlog settled");
        }

        let params = TransactionCreate {
            order_id: order.id.clone(),
            product_id: order.product_id.clone(),
            renter_id: order.renter_id.clone(),
            external_order_id: order.external_order_id.clone(),
            payment_id: payment_id.to_string(),
            amount: order.total_price,
            recorded_at: self.ports.clock.now(),
        };
        match self.transaction_client.record(params).await {
            Ok(_) | Err(TransactionError::AlreadyExists(_)) => {}
            Err(e) => return Err(e.into()),
        }
        self.transaction_client.find(&order.id, payment_id).await?
            .ok_or_else(|| RentalError::Internal(format!("transaction missing for order {}", order.id)))
    }
}
