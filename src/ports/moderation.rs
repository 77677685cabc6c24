//! KYC and listing moderation, consumed read-only by the eligibility gate.

use async_trait::async_trait;

use crate::clients::{ProductClient, UserClient};
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModerationError {
    #[error("Moderation lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait ModerationGate: Send + Sync {
    /// Whether the user passed KYC. Unknown users are not verified.
    async fn is_verified(&self, user_id: &str) -> Result<bool, ModerationError>;

    /// Whether the listing was approved. Unknown products are not approved.
    async fn is_product_approved(&self, product_id: &str) -> Result<bool, ModerationError>;
}

/// Reads the moderation flags stored on the user and product records.
#[derive(Clone)]
pub struct RecordModeration {
    user_client: UserClient,
    product_client: ProductClient,
}

impl RecordModeration {
    pub fn new(user_client: UserClient, product_client: ProductClient) -> Self {
        Self { user_client, product_client }
    }
}

#[async_trait]
impl ModerationGate for RecordModeration {
    async fn is_verified(&self, user_id: &str) -> Result<bool, ModerationError> {
        let user = self.user_client.get_user(user_id.to_string()).await
            .map_err(|e: UserError| ModerationError::Lookup(e.to_string()))?;
        Ok(user.is_some_and(|u| u.is_verified))
    }

    async fn is_product_approved(&self, product_id: &str) -> Result<bool, ModerationError> {
        let product = self.product_client.get_product(product_id.to_string()).await
            .map_err(|e: ProductError| ModerationError::Lookup(e.to_string()))?;
        Ok(product.is_some_and(|p| p.is_approved))
    }
}
