use crate::actor_framework::Entity;
use crate::domain::{Transaction, TransactionCreate, TransactionStatus};
use super::error::TransactionError;

impl Entity for Transaction {
    const KIND: &'static str = "transaction";
    type Id = String;
    type CreateParams = TransactionCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();
    type Error = TransactionError;

    fn id(&self) -> &String { &self.id }

    /// Records a confirmed payment under its `<order id>:<payment id>` key.
    fn from_create_params(id: String, params: TransactionCreate) -> Result<Self, TransactionError> {
        if id != Transaction::key(&params.order_id, &params.payment_id) {
            return Err(TransactionError::KeyMismatch(id));
        }
        Ok(Self {
            id,
            order_id: params.order_id,
            product_id: params.product_id,
            renter_id: params.renter_id,
            external_order_id: params.external_order_id,
            payment_id: params.payment_id,
            amount: params.amount,
            status: TransactionStatus::Paid,
            recorded_at: params.recorded_at,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), TransactionError> {
        Err(TransactionError::Immutable(self.id.clone()))
    }

    fn on_delete(&self) -> Result<(), TransactionError> {
        Err(TransactionError::Immutable(self.id.clone()))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), TransactionError> {
        Err(TransactionError::Immutable(self.id.clone()))
    }
}
