use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Money, NotificationKind, Order, Product, RentPolicy};
use crate::error::{RentalError, RentalResult};
use crate::order_actor::OrderError;
use crate::ports::{dispatch, Ports};
use crate::pricing;

/// How a late return is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LateFeePolicy {
    /// `rent.late_fees` once, however late.
    #[default]
    Flat,
    /// `rent.late_fees` per started duration unit past the deadline.
    Prorated,
}

impl FromStr for LateFeePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "prorated" => Ok(Self::Prorated),
            other => Err(format!("unknown late fee policy: {other}")),
        }
    }
}

impl LateFeePolicy {
    /// Fee for returning at `actual` against deadline `proposed`; `None` when on time.
    pub fn assess(&self, rent: &RentPolicy, proposed: DateTime<Utc>, actual: DateTime<Utc>) -> Option<Money> {
        if actual <= proposed {
            return None;
        }
        match self {
            Self::Flat => Some(rent.late_fees),
            Self::Prorated => {
                let late = (actual - proposed).num_seconds();
                let unit = pricing::unit_length(rent.duration_type).num_seconds().max(1);
                let units = (late + unit - 1) / unit;
                let units = Money::try_from(units).unwrap_or(Money::MAX);
                Some(rent.late_fees.saturating_mul(units))
            }
        }
    }
}

/// Result of closing a rental.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub order: Order,
    /// Fee added to the renter's backlog, if the return was late.
    pub late_fee: Option<Money>,
}

/// Owner-side confirmations: pickup, then return.
#[derive(Clone)]
pub struct ReturnSettlement {
    order_client: OrderClient,
    product_client: ProductClient,
    user_client: UserClient,
    ports: Ports,
    policy: LateFeePolicy,
}

impl ReturnSettlement {
    pub fn new(
        order_client: OrderClient,
        product_client: ProductClient,
        user_client: UserClient,
        ports: Ports,
        policy: LateFeePolicy,
    ) -> Self {
        Self {
            order_client,
            product_client,
            user_client,
            ports,
            policy,
        }
    }

    /// Owner confirms the renter collected the item.
    #[instrument(skip(self))]
    pub async fn confirm_pickup(&self, order_id: String, requester_id: String) -> RentalResult<Order> {
        let (order, _) = self.load_for_owner(&order_id, &requester_id).await?;
        let order = self.order_client.confirm_pickup(order.id, self.ports.clock.now()).await?;
        info!("Pickup confirmed");
        dispatch(
            &self.ports.notifier,
            self.ports.clock.as_ref(),
            &order.renter_id,
            NotificationKind::PickedUp,
            "Item picked up",
            format!("Return due by {}", order.proposed_return_date.to_rfc3339()),
        );
        Ok(order)
    }

    /// Owner confirms the item came back: frees the product and books any late fee.
    ///
    /// Recording the return on the order is the commit point. If a later step
    /// fails, calling this again finishes the remaining steps against the
    /// stored return date; once nothing is left it reports `AlreadyReturned`.
    #[instrument(skip(self))]
    pub async fn settle_return(&self, order_id: String, requester_id: String) -> RentalResult<Settlement> {
        let (order, product) = self.load_for_owner(&order_id, &requester_id).await?;

        let (order, resumed) = match self.order_client.confirm_return(order.id.clone(), self.ports.clock.now()).await {
            Ok(order) => (order, false),
            Err(OrderError::AlreadyReturned(id)) => (self.order_client.require_order(id).await?, true),
            Err(e) => return Err(e.into()),
        };
        let returned_at = order.actual_return_date
            .ok_or_else(|| RentalError::Internal(format!("order {} returned without a date", order.id)))?;

        let freed = self.product_client.settle(order.product_id.clone(), order.id.clone()).await
            .map_err(|e| {
                error!(error = %e, "Product settlement failed after return was recorded");
                RentalError::from(e)
            })?;
        let ended = self.user_client.end_rental(order.renter_id.clone(), order.id.clone()).await?;

        let late_fee = self.policy.assess(&product.rent, order.proposed_return_date, returned_at);
        let mut charged = false;
        if let Some(fee) = late_fee {
            let reason = format!("Late return of {}", product.name);
            let booked = self.user_client
                .add_backlog(order.renter_id.clone(), fee, reason, order.id.clone())
                .await?;
            if let Some(backlog) = booked {
                charged = true;
                info!(fee, backlog, "Late fee added to backlog");
                dispatch(
                    &self.ports.notifier,
                    self.ports.clock.as_ref(),
                    &order.renter_id,
                    NotificationKind::LateFeeCharged,
                    "Late return fee",
                    format!("{fee} will be charged on your next order"),
                );
            }
        }

        if resumed {
            if !(freed || ended || charged) {
                return Err(RentalError::AlreadyReturned(order.id));
            }
            warn!(freed, ended, charged, "Completed an interrupted settlement");
        }
        info!("Rental settled");
        dispatch(
            &self.ports.notifier,
            self.ports.clock.as_ref(),
            &order.renter_id,
            NotificationKind::Returned,
            "Return confirmed",
            format!("{} was returned", product.name),
        );
        Ok(Settlement { order, late_fee })
    }

    async fn load_for_owner(&self, order_id: &str, requester_id: &str) -> RentalResult<(Order, Product)> {
        let order = self.order_client.get_order(order_id.to_string()).await?
            .ok_or_else(|| RentalError::OrderNotFound(order_id.to_string()))?;
        let product = self.product_client.get_product(order.product_id.clone()).await?
            .ok_or_else(|| RentalError::ProductNotFound(order.product_id.clone()))?;
        if product.owner_id != requester_id {
            return Err(RentalError::Forbidden);
        }
        Ok((order, product))
    }
}
