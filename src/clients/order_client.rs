use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::app_system::RentalConfig;
use crate::clients::ProductClient;
use crate::domain::{NotificationKind, Order, OrderCreate, ReservationRequest};
use crate::error::{RentalError, RentalResult};
use crate::lifecycle::{Eligible, EligibilityGate};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, PaymentTransition};
use crate::ports::{dispatch, PaymentIntentRequest, Ports};
use crate::pricing::{self, PricingInput};

/// Outcome of removing an unpaid order.
#[derive(Debug, Clone, PartialEq)]
pub enum Withdrawal {
    /// The order was deleted and its product hold released.
    Withdrawn(Order),
    /// Payment got there first; nothing changed.
    Paid,
    /// The order no longer exists.
    Gone,
}

/// Client for interacting with the Order actor.
///
/// This client handles the reservation orchestration: eligibility, pricing,
/// the product hold, and opening the payment intent.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    product_client: ProductClient,
    gate: EligibilityGate,
    ports: Ports,
    config: Arc<RentalConfig>,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        product_client: ProductClient,
        gate: EligibilityGate,
        ports: Ports,
        config: Arc<RentalConfig>,
    ) -> Self {
        Self {
            inner,
            product_client,
            gate,
            ports,
            config,
        }
    }

    /// Reserves a product for `renter_id` and opens the payment intent.
    ///
    /// The product hold is taken with a compare-and-set on the product record;
    /// if anything after that fails the hold is released before returning.
    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn create_order(&self, renter_id: String, request: ReservationRequest) -> RentalResult<Order> {
        info!("Processing create_order request");
        let now = self.ports.clock.now();

        // Step 1: Eligibility
        let Eligible { renter, product } = self.gate.check(&renter_id, &request, now).await?;

        // Step 2: Price
        let quote = pricing::quote(&PricingInput {
            rent: &product.rent,
            duration: request.duration,
            start_date: request.start_date,
            is_premium: renter.is_premium,
            backlog: renter.backlog.amount,
            service_charge: Some(self.config.service_charge),
        })?;
        debug!(total = quote.total_price, "Quote computed");

        // Step 3: Hold the product, provided the rent we quoted is still current
        let order_id = Uuid::new_v4().to_string();
        let held = self.product_client
            .reserve(product.id.clone(), order_id.clone(), renter_id.clone(), product.rent.clone())
            .await;
        if let Err(e) = held {
            warn!(error = %e, "Reservation lost");
            return Err(e.into());
        }
        info!(order_id = %order_id, "Product reserved");

        // Step 4: Open the payment intent and persist the order
        let intent = PaymentIntentRequest {
            amount: quote.total_price,
            currency: self.config.currency.clone(),
            receipt: order_id.clone(),
            notes: vec![
                ("product_id".to_string(), product.id.clone()),
                ("renter_id".to_string(), renter_id.clone()),
            ],
        };
        let persisted = async {
            let external_order_id = self.ports.gateway.create_payment_intent(intent).await?;
            let params = OrderCreate {
                renter_id: renter_id.clone(),
                product_id: product.id.clone(),
                owner_id: product.owner_id.clone(),
                duration: request.duration,
                quote,
                external_order_id,
                created_at: now,
                expires_at: now + self.config.reservation_grace,
            };
            self.inner.create_with_id(order_id.clone(), params).await.map_err(OrderError::from)?;
            Ok::<_, RentalError>(self.require_order(order_id.clone()).await?)
        }
        .await;

        let order = match persisted {
            Ok(order) => order,
            Err(e) => {
                error!(order_id = %order_id, error = %e, "Order could not be persisted, releasing hold");
                self.release_hold(&product.id, &order_id).await;
                return Err(e);
            }
        };

        info!(order_id = %order.id, total = order.total_price, "Order created successfully");
        dispatch(
            &self.ports.notifier,
            self.ports.clock.as_ref(),
            &order.owner_id,
            NotificationKind::OrderReserved,
            "New reservation",
            format!("{} was reserved, awaiting payment", product.name),
        );
        Ok(order)
    }

    /// Deletes an unpaid order, then releases its product hold.
    ///
    /// Delete comes first: the order record's paid-veto is what keeps a
    /// concurrent payment from landing on a released product.
    #[instrument(skip(self))]
    pub async fn withdraw_unpaid(&self, id: String) -> RentalResult<Withdrawal> {
        let order = match self.inner.delete(id.clone()).await {
            Ok(order) => order,
            Err(FrameworkError::NotFound(_)) => return Ok(Withdrawal::Gone),
            Err(FrameworkError::Entity(OrderError::AlreadyPaid(_))) => return Ok(Withdrawal::Paid),
            Err(e) => return Err(OrderError::from(e).into()),
        };
        match self.product_client.release(order.product_id.clone(), order.id.clone()).await {
            Ok(true) => debug!("Product hold released"),
            Ok(false) => warn!(product_id = %order.product_id, "Withdrawn order held no product"),
            Err(e) => {
                error!(product_id = %order.product_id, error = %e, "Release failed after order removal");
                return Err(e.into());
            }
        }
        Ok(Withdrawal::Withdrawn(order))
    }

    /// Lets the renter abandon an unpaid order.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: String, requester_id: String) -> RentalResult<Order> {
        let order = self.require_order(id.clone()).await?;
        if order.renter_id != requester_id {
            return Err(RentalError::Forbidden);
        }
        match self.withdraw_unpaid(id.clone()).await? {
            Withdrawal::Withdrawn(order) => {
                info!("Order cancelled");
                dispatch(
                    &self.ports.notifier,
                    self.ports.clock.as_ref(),
                    &order.owner_id,
                    NotificationKind::OrderCancelled,
                    "Reservation cancelled",
                    format!("Order {} was cancelled by the renter", order.id),
                );
                Ok(order)
            }
            Withdrawal::Paid => Err(RentalError::AlreadyPaid(id)),
            Withdrawal::Gone => Err(RentalError::OrderNotFound(id)),
        }
    }

    #[instrument(skip(self))]
    pub async fn orders_for_renter(&self, renter_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_orders().await?;
        orders.retain(|o| o.renter_id == renter_id);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn orders_for_owner(&self, owner_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_orders().await?;
        orders.retain(|o| o.owner_id == owner_id);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn confirm_payment(&self, id: String, payment_id: String, paid_at: DateTime<Utc>) -> Result<PaymentTransition, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::ConfirmPayment { payment_id, paid_at }).await? {
            OrderActionResult::ConfirmPayment(transition) => Ok(transition),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_pickup(&self, id: String, at: DateTime<Utc>) -> Result<Order, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::ConfirmPickup { at }).await? {
            OrderActionResult::ConfirmPickup(order) => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_return(&self, id: String, at: DateTime<Utc>) -> Result<Order, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::ConfirmReturn { at }).await? {
            OrderActionResult::ConfirmReturn(order) => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    async fn release_hold(&self, product_id: &str, order_id: &str) {
        if let Err(e) = self.product_client.release(product_id.to_string(), order_id.to_string()).await {
            error!(product_id = %product_id, order_id = %order_id, error = %e, "Failed to release product hold");
        }
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);
impl_framework_error!(OrderError);

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
