//! Rental pricing.
//!
//! Pure functions only: the same inputs always produce the same quote, which is
//! what lets the order record be re-checked without trusting a client total.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{DurationType, Money, RentPolicy};

/// Days billed per monthly unit.
pub const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Invalid duration: requested {requested}, minimum {minimum}")]
    InvalidDuration { requested: u32, minimum: u32 },
    #[error("Unsupported duration type: {0}")]
    UnsupportedDurationType(String),
    #[error("Price computation overflowed")]
    Overflow,
}

/// Everything the engine needs about one reservation request.
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    pub rent: &'a RentPolicy,
    pub duration: u32,
    pub start_date: DateTime<Utc>,
    pub is_premium: bool,
    /// Renter's outstanding backlog, charged in full on this order.
    pub backlog: Money,
    pub service_charge: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub sub_total: Money,
    pub deposit: Money,
    pub service_charge: Money,
    pub backlog_charged: Money,
    pub total_price: Money,
    pub start_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
}

impl PriceQuote {
    /// True when `total_price` equals the sum of its components.
    pub fn is_consistent(&self) -> bool {
        sum_total(self.sub_total, self.deposit, self.service_charge, self.backlog_charged)
            == Ok(self.total_price)
    }
}

/// Price one rental.
pub fn quote(input: &PricingInput<'_>) -> Result<PriceQuote, PricingError> {
    let rent = input.rent;
    if input.duration == 0 || input.duration < rent.minimum_duration {
        return Err(PricingError::InvalidDuration {
            requested: input.duration,
            minimum: rent.minimum_duration.max(1),
        });
    }

    let return_date = return_date(rent.duration_type, input.start_date, input.duration)?;
    let sub_total = rent.price
        .checked_mul(Money::from(input.duration))
        .ok_or(PricingError::Overflow)?;
    let deposit = if input.is_premium { 0 } else { rent.security_amount };
    let service_charge = input.service_charge.unwrap_or(0);
    let backlog_charged = input.backlog;
    let total_price = sum_total(sub_total, deposit, service_charge, backlog_charged)?;

    Ok(PriceQuote {
        sub_total,
        deposit,
        service_charge,
        backlog_charged,
        total_price,
        start_date: input.start_date,
        return_date,
    })
}

/// Proposed return deadline for a rental starting at `start`.
pub fn return_date(
    duration_type: DurationType,
    start: DateTime<Utc>,
    duration: u32,
) -> Result<DateTime<Utc>, PricingError> {
    let units = i64::from(duration);
    let span = match duration_type {
        DurationType::Monthly => units
            .checked_mul(DAYS_PER_MONTH)
            .and_then(Duration::try_days),
        DurationType::Hourly => Duration::try_hours(units),
    }
    .ok_or(PricingError::Overflow)?;
    start.checked_add_signed(span).ok_or(PricingError::Overflow)
}

/// Length of one billing unit.
pub fn unit_length(duration_type: DurationType) -> Duration {
    match duration_type {
        DurationType::Monthly => Duration::days(DAYS_PER_MONTH),
        DurationType::Hourly => Duration::hours(1),
    }
}

fn sum_total(sub_total: Money, deposit: Money, service: Money, backlog: Money) -> Result<Money, PricingError> {
    sub_total
        .checked_add(deposit)
        .and_then(|t| t.checked_add(service))
        .and_then(|t| t.checked_add(backlog))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn monthly(price: Money, security: Money, minimum: u32) -> RentPolicy {
        RentPolicy {
            duration_type: DurationType::Monthly,
            price,
            security_amount: security,
            minimum_duration: minimum,
            late_fees: 50,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
    }

    fn input(rent: &RentPolicy, duration: u32, is_premium: bool) -> PricingInput<'_> {
        PricingInput {
            rent,
            duration,
            start_date: start(),
            is_premium,
            backlog: 0,
            service_charge: None,
        }
    }

    #[test]
    fn test_premium_renter_pays_no_deposit() {
        let rent = monthly(100, 500, 1);
        let quote = quote(&input(&rent, 2, true)).unwrap();
        assert_eq!(quote.sub_total, 200);
        assert_eq!(quote.deposit, 0);
        assert_eq!(quote.total_price, 200);
        assert_eq!(quote.return_date, start() + Duration::days(60));
    }

    #[test]
    fn test_regular_renter_pays_deposit() {
        let rent = monthly(100, 500, 1);
        let quote = quote(&input(&rent, 2, false)).unwrap();
        assert_eq!(quote.deposit, 500);
        assert_eq!(quote.total_price, 700);
    }

    #[test]
    fn test_duration_below_minimum_is_rejected() {
        let rent = monthly(100, 500, 1);
        assert_eq!(
            quote(&input(&rent, 0, false)),
            Err(PricingError::InvalidDuration { requested: 0, minimum: 1 })
        );

        let strict = monthly(100, 500, 3);
        assert_eq!(
            quote(&input(&strict, 2, false)),
            Err(PricingError::InvalidDuration { requested: 2, minimum: 3 })
        );
    }

    #[test]
    fn test_zero_duration_rejected_even_without_minimum() {
        let rent = monthly(100, 0, 0);
        assert!(matches!(quote(&input(&rent, 0, false)), Err(PricingError::InvalidDuration { .. })));
    }

    #[test]
    fn test_hourly_return_date_and_extras() {
        let rent = RentPolicy { duration_type: DurationType::Hourly, ..monthly(20, 100, 2) };
        let mut req = input(&rent, 5, false);
        req.backlog = 75;
        req.service_charge = Some(10);

        let quote = quote(&req).unwrap();
        assert_eq!(quote.return_date, start() + Duration::hours(5));
        assert_eq!(quote.sub_total, 100);
        assert_eq!(quote.backlog_charged, 75);
        assert_eq!(quote.total_price, 100 + 100 + 10 + 75);
    }

    #[test]
    fn test_unknown_duration_type_is_rejected() {
        assert_eq!("Monthly".parse::<DurationType>(), Ok(DurationType::Monthly));
        assert_eq!(
            "weekly".parse::<DurationType>(),
            Err(PricingError::UnsupportedDurationType("weekly".into()))
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let rent = monthly(Money::MAX, 0, 1);
        assert_eq!(quote(&input(&rent, 2, true)), Err(PricingError::Overflow));
    }

    proptest! {
        #[test]
        fn total_always_equals_components(
            price in 0u64..1_000_000,
            security in 0u64..1_000_000,
            backlog in 0u64..1_000_000,
            service in proptest::option::of(0u64..10_000),
            duration in 1u32..48,
            is_premium in any::<bool>(),
        ) {
            let rent = monthly(price, security, 1);
            let req = PricingInput { backlog, service_charge: service, ..input(&rent, duration, is_premium) };
            let first = quote(&req).unwrap();
            prop_assert!(first.is_consistent());
            prop_assert_eq!(first.total_price, first.sub_total + first.deposit + first.service_charge + first.backlog_charged);
            prop_assert_eq!(quote(&req).unwrap(), first);
        }
    }
}
