use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderState};
use super::actions::{OrderAction, OrderActionResult, PaymentTransition};
use super::error::OrderError;

impl Entity for Order {
    const KIND: &'static str = "order";
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = (); // Orders only move through actions
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Order from a price quote.
    ///
    /// # Notes
    /// The order is initialized in state `Reserved`. The quote's total is
    /// recomputed and a mismatch is rejected.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        let quote = params.quote;
        if !quote.is_consistent() {
            return Err(OrderError::PriceMismatch(id));
        }
        if quote.return_date <= quote.start_date {
            return Err(OrderError::ValidationError(format!("{id}: return date must follow start date")));
        }
        Ok(Self {
            id,
            renter_id: params.renter_id,
            product_id: params.product_id,
            owner_id: params.owner_id,
            duration: params.duration,
            sub_total: quote.sub_total,
            deposit_charged: quote.deposit,
            service_charge: quote.service_charge,
            backlog_charged: quote.backlog_charged,
            total_price: quote.total_price,
            start_date: quote.start_date,
            proposed_return_date: quote.return_date,
            state: OrderState::Reserved,
            is_paid: false,
            paid_at: None,
            is_picked_up: false,
            picked_up_at: None,
            return_delivered: false,
            actual_return_date: None,
            external_order_id: params.external_order_id,
            payment_id: None,
            created_at: params.created_at,
            expires_at: params.expires_at,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), OrderError> {
        Ok(())
    }

    /// Paid orders are never deleted.
    fn on_delete(&self) -> Result<(), OrderError> {
        if self.is_paid {
            Err(OrderError::AlreadyPaid(self.id.clone()))
        } else {
            Ok(())
        }
    }

    /// Handles order-specific actions.
    ///
    /// # Actions
    /// - `ConfirmPayment`: `Reserved -> Rented`, idempotent per payment id
    /// - `ConfirmPickup`: requires payment
    /// - `ConfirmReturn`: requires payment and pickup; `Rented -> Returned`
    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::ConfirmPayment { payment_id, paid_at } => {
                if self.is_paid {
                    return if self.payment_id.as_deref() == Some(payment_id.as_str()) {
                        Ok(OrderActionResult::ConfirmPayment(PaymentTransition::AlreadyProcessed(self.clone())))
                    } else {
                        Err(OrderError::AlreadyPaid(self.id.clone()))
                    };
                }
                self.is_paid = true;
                self.paid_at = Some(paid_at);
                self.payment_id = Some(payment_id);
                self.state = OrderState::Rented;
                Ok(OrderActionResult::ConfirmPayment(PaymentTransition::Paid(self.clone())))
            }
            OrderAction::ConfirmPickup { at } => {
                if !self.is_paid {
                    return Err(OrderError::NotPaid(self.id.clone()));
                }
                if self.is_picked_up {
                    return Err(OrderError::AlreadyPickedUp(self.id.clone()));
                }
                self.is_picked_up = true;
                self.picked_up_at = Some(at);
                Ok(OrderActionResult::ConfirmPickup(self.clone()))
            }
            OrderAction::ConfirmReturn { at } => {
                if !self.is_paid {
                    return Err(OrderError::NotPaid(self.id.clone()));
                }
                if !self.is_picked_up {
                    return Err(OrderError::NotPickedUp(self.id.clone()));
                }
                if self.return_delivered {
                    return Err(OrderError::AlreadyReturned(self.id.clone()));
                }
                self.return_delivered = true;
                self.actual_return_date = Some(at);
                self.state = OrderState::Returned;
                Ok(OrderActionResult::ConfirmReturn(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceQuote;
    use chrono::{Duration, TimeZone, Utc};

    fn params(total: u64) -> OrderCreate {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        OrderCreate {
            renter_id: "renter".into(),
            product_id: "product".into(),
            owner_id: "owner".into(),
            duration: 2,
            quote: PriceQuote {
                sub_total: 200,
                deposit: 500,
                service_charge: 0,
                backlog_charged: 0,
                total_price: total,
                start_date: start,
                return_date: start + Duration::days(60),
            },
            external_order_id: "order_ext".into(),
            created_at: start - Duration::hours(1),
            expires_at: start - Duration::minutes(45),
        }
    }

    fn pay(order: &mut Order, payment_id: &str) -> Result<OrderActionResult, OrderError> {
        order.handle_action(OrderAction::ConfirmPayment { payment_id: payment_id.into(), paid_at: Utc::now() })
    }

    #[test]
    fn test_tampered_total_is_rejected() {
        assert_eq!(
            Order::from_create_params("o".into(), params(1)),
            Err(OrderError::PriceMismatch("o".into()))
        );
        let order = Order::from_create_params("o".into(), params(700)).unwrap();
        assert_eq!(order.sub_total + order.deposit_charged, order.total_price);
        assert_eq!(order.state, OrderState::Reserved);
    }

    #[test]
    fn test_payment_is_idempotent_per_payment_id() {
        let mut order = Order::from_create_params("o".into(), params(700)).unwrap();
        assert!(matches!(pay(&mut order, "pay_1"), Ok(OrderActionResult::ConfirmPayment(PaymentTransition::Paid(_)))));
        let paid_at = order.paid_at;

        assert!(matches!(pay(&mut order, "pay_1"), Ok(OrderActionResult::ConfirmPayment(PaymentTransition::AlreadyProcessed(_)))));
        assert_eq!(order.paid_at, paid_at);
        assert_eq!(pay(&mut order, "pay_2"), Err(OrderError::AlreadyPaid("o".into())));
    }

    #[test]
    fn test_paid_order_vetoes_delete() {
        let mut order = Order::from_create_params("o".into(), params(700)).unwrap();
        assert!(order.on_delete().is_ok());
        pay(&mut order, "pay_1").unwrap();
        assert_eq!(order.on_delete(), Err(OrderError::AlreadyPaid("o".into())));
    }

    #[test]
    fn test_return_requires_payment_then_pickup() {
        let mut order = Order::from_create_params("o".into(), params(700)).unwrap();
        let at = Utc::now();
        assert_eq!(order.handle_action(OrderAction::ConfirmPickup { at }), Err(OrderError::NotPaid("o".into())));
        assert_eq!(order.handle_action(OrderAction::ConfirmReturn { at }), Err(OrderError::NotPaid("o".into())));

        pay(&mut order, "pay_1").unwrap();
        assert_eq!(order.handle_action(OrderAction::ConfirmReturn { at }), Err(OrderError::NotPickedUp("o".into())));

        order.handle_action(OrderAction::ConfirmPickup { at }).unwrap();
        assert_eq!(order.handle_action(OrderAction::ConfirmPickup { at }), Err(OrderError::AlreadyPickedUp("o".into())));

        order.handle_action(OrderAction::ConfirmReturn { at }).unwrap();
        assert_eq!(order.state, OrderState::Returned);
        assert_eq!(order.handle_action(OrderAction::ConfirmReturn { at }), Err(OrderError::AlreadyReturned("o".into())));
    }
}
