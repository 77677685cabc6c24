use tracing::{debug, instrument};
use crate::domain::{Transaction, TransactionCreate};
use crate::transaction_actor::TransactionError;
use crate::actor_framework::ResourceClient;

/// Client for the payment ledger.
#[derive(Clone)]
pub struct TransactionClient {
    inner: ResourceClient<Transaction>,
}

impl_basic_client!(TransactionClient, Transaction, TransactionError, transaction);

impl TransactionClient {
    /// Records a payment under its idempotency key.
    ///
    /// # Errors
    /// `AlreadyExists` when the same (order, payment) pair was recorded before.
    #[instrument(skip(self, params), fields(order_id = %params.order_id, payment_id = %params.payment_id))]
    pub async fn record(&self, params: TransactionCreate) -> Result<String, TransactionError> {
        debug!("Sending request");
        let key = Transaction::key(&params.order_id, &params.payment_id);
        Ok(self.inner.create_with_id(key, params).await?)
    }

    pub async fn find(&self, order_id: &str, payment_id: &str) -> Result<Option<Transaction>, TransactionError> {
        self.get_transaction(Transaction::key(order_id, payment_id)).await
    }
}
