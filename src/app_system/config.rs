//! Service configuration from environment variables.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::domain::Money;
use crate::lifecycle::LateFeePolicy;

/// Signing secret used when none is configured. Only fit for local runs.
const DEV_PAYMENT_SECRET: &str = "change-me";

/// Settings for the rental lifecycle.
#[derive(Debug, Clone)]
pub struct RentalConfig {
    /// How long an unpaid reservation holds its product.
    pub reservation_grace: chrono::Duration,
    /// Period of the expiration sweep.
    pub sweep_interval: Duration,
    /// Platform fee added to every order.
    pub service_charge: Money,
    pub currency: String,
    /// Shared secret for payment signatures.
    pub payment_secret: String,
    pub late_fee_policy: LateFeePolicy,
    /// Mailbox size of each resource actor.
    pub actor_buffer: usize,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            reservation_grace: chrono::Duration::minutes(15),
            sweep_interval: Duration::from_secs(30),
            service_charge: 0,
            currency: "INR".to_string(),
            payment_secret: DEV_PAYMENT_SECRET.to_string(),
            late_fee_policy: LateFeePolicy::Flat,
            actor_buffer: 32,
        }
    }
}

impl RentalConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RENTAL_GRACE_SECS`: Unpaid reservation lifetime (default: 900)
    /// - `RENTAL_SWEEP_SECS`: Expiration sweep period (default: 30)
    /// - `RENTAL_SERVICE_CHARGE`: Service charge in minor units (default: 0)
    /// - `RENTAL_CURRENCY`: Payment currency (default: INR)
    /// - `RENTAL_PAYMENT_SECRET`: Gateway signing secret (warns when unset)
    /// - `RENTAL_LATE_FEE_POLICY`: `flat` or `prorated` (default: flat)
    /// - `RENTAL_ACTOR_BUFFER`: Actor mailbox size (default: 32)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            reservation_grace: parse_var("RENTAL_GRACE_SECS")
                .map(chrono::Duration::seconds)
                .unwrap_or(defaults.reservation_grace),

            sweep_interval: parse_var("RENTAL_SWEEP_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),

            service_charge: parse_var("RENTAL_SERVICE_CHARGE").unwrap_or(defaults.service_charge),

            currency: env::var("RENTAL_CURRENCY").unwrap_or(defaults.currency),

            payment_secret: env::var("RENTAL_PAYMENT_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty())
                .unwrap_or(defaults.payment_secret),

            late_fee_policy: env::var("RENTAL_LATE_FEE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.late_fee_policy),

            actor_buffer: parse_var("RENTAL_ACTOR_BUFFER")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.actor_buffer),
        };

        if config.uses_dev_secret() {
            warn!("RENTAL_PAYMENT_SECRET is not set, payment signatures use the development secret");
        }
        config
    }

    /// True while payments are signed with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.payment_secret == DEV_PAYMENT_SECRET
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
