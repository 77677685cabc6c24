use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::app_system::RentalConfig;
use crate::clients::{OrderClient, ProductClient, TransactionClient, UserClient};
use crate::domain::{Order, Product, Transaction, User};
use crate::error::{RentalError, RentalResult};
use crate::lifecycle::{EligibilityGate, ExpirationScheduler, PaymentReconciler, ReturnSettlement};
use crate::ports::{Clock, HmacPaymentGateway, InboxNotifier, Ports, RecordModeration, SystemClock};

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them to the lifecycle
/// services, and handling shutdown.
pub struct RentalSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub transaction_client: TransactionClient,
    pub reconciler: PaymentReconciler,
    pub expiration: ExpirationScheduler,
    pub settlement: ReturnSettlement,
    /// Concrete gateway, kept so callers can produce callback signatures.
    pub gateway: Arc<HmacPaymentGateway>,
    pub config: Arc<RentalConfig>,
    sweeper: Option<JoinHandle<()>>,
    handles: Vec<JoinHandle<()>>,
}

impl RentalSystem {
    pub fn new(config: RentalConfig) -> RentalResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RentalConfig, clock: Arc<dyn Clock>) -> RentalResult<Self> {
        let config = Arc::new(config);
        let buffer = config.actor_buffer;

        // 1. Record actors
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(buffer, sequential_ids("user"));
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(buffer, sequential_ids("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // Transactions are always created under their idempotency key.
        let (transaction_actor, transaction_resource_client) =
            ResourceActor::<Transaction>::new(buffer, sequential_ids("txn"));
        let transaction_client = TransactionClient::new(transaction_resource_client);
        let transaction_handle = tokio::spawn(transaction_actor.run());

        // 2. Ports
        let gateway = Arc::new(HmacPaymentGateway::new(&config.payment_secret)?);
        let ports = Ports {
            gateway: gateway.clone(),
            notifier: Arc::new(InboxNotifier::new(user_client.clone())),
            moderation: Arc::new(RecordModeration::new(user_client.clone(), product_client.clone())),
            clock,
        };

        // 3. Order actor and lifecycle services
        let gate = EligibilityGate::new(user_client.clone(), product_client.clone(), ports.moderation.clone());
        let (order_actor, order_resource_client) = ResourceActor::<Order>::new(buffer, sequential_ids("order"));
        let order_client = OrderClient::new(
            order_resource_client,
            product_client.clone(),
            gate,
            ports.clone(),
            config.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        let reconciler = PaymentReconciler::new(
            order_client.clone(),
            product_client.clone(),
            user_client.clone(),
            transaction_client.clone(),
            ports.clone(),
        );
        let expiration = ExpirationScheduler::new(order_client.clone(), ports.clone());
        let settlement = ReturnSettlement::new(
            order_client.clone(),
            product_client.clone(),
            user_client.clone(),
            ports,
            config.late_fee_policy,
        );

        info!(
            grace_secs = config.reservation_grace.num_seconds(),
            policy = ?config.late_fee_policy,
            "Rental system started"
        );

        Ok(Self {
            user_client,
            product_client,
            order_client,
            transaction_client,
            reconciler,
            expiration,
            settlement,
            gateway,
            config,
            sweeper: None,
            handles: vec![user_handle, product_handle, transaction_handle, order_handle],
        })
    }

    /// Starts the periodic expiration sweep. Calling it twice is a no-op.
    pub fn spawn_expiration_sweeper(&mut self) {
        if self.sweeper.is_none() {
            let handle = self.expiration.clone().spawn(self.config.sweep_interval);
            self.sweeper = Some(handle);
        }
    }

    pub async fn shutdown(self) -> RentalResult<()> {
        info!("Shutting down system...");
        let Self {
            user_client,
            product_client,
            order_client,
            transaction_client,
            reconciler,
            expiration,
            settlement,
            gateway,
            config,
            sweeper,
            handles,
        } = self;

        // The sweeper owns client clones; stop it before waiting on the actors.
        if let Some(sweeper) = sweeper {
            sweeper.abort();
            let _ = sweeper.await;
        }

        // Dropping every client closes the channels, which ends the actors.
        drop((reconciler, expiration, settlement));
        drop((order_client, transaction_client, product_client, user_client));
        drop((gateway, config));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(RentalError::Internal(format!("Actor task failed: {e}")));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}
