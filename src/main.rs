mod actor_framework;
mod app_system;
mod clients;
mod domain;
mod error;
mod lifecycle;
mod order_actor;
mod ports;
mod pricing;
mod product_actor;
mod transaction_actor;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use chrono::{Duration, Utc};
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, RentalConfig, RentalSystem};
use crate::domain::{DurationType, ProductCreate, ProductPatch, RentPolicy, ReservationRequest, UserCreate};
use crate::error::RentalResult;
use crate::lifecycle::{PaymentConfirmation, PaymentOutcome};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = RentalConfig::from_env();
    info!(policy = ?config.late_fee_policy, currency = %config.currency, "Starting rental broker");

    let mut system = RentalSystem::new(config).map_err(|e| e.to_string())?;
    system.spawn_expiration_sweeper();

    let span = tracing::info_span!("demo_rental");
    let result = run_demo(&system).instrument(span).await;
    if let Err(e) = &result {
        error!(error = %e, "Demo rental failed");
    }

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;
    result.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}

/// Walks one rental from listing to return.
async fn run_demo(system: &RentalSystem) -> RentalResult<()> {
    let owner_id = system.user_client.create_user(UserCreate::new("Olivia", "olivia@example.com").verified()).await?;
    let renter_id = system.user_client.create_user(UserCreate::new("Ravi", "ravi@example.com").verified()).await?;
    info!(owner_id = %owner_id, renter_id = %renter_id, "Users created");

    let product_id = system.product_client.create_product(ProductCreate {
        owner_id: owner_id.clone(),
        name: "Camping tent".to_string(),
        rent: RentPolicy {
            duration_type: DurationType::Hourly,
            price: 100,
            security_amount: 500,
            minimum_duration: 2,
            late_fees: 250,
        },
    }).await?;
    system.product_client.update_product(product_id.clone(), ProductPatch::approve()).await?;
    info!(product_id = %product_id, "Product listed and approved");

    let order = system.order_client.create_order(renter_id.clone(), ReservationRequest {
        product_id: product_id.clone(),
        start_date: Utc::now() + Duration::hours(1),
        duration: 3,
    }).await?;
    info!(order = %to_json(&order), "Order reserved");

    // Stand-in for the gateway's success callback.
    let payment_id = format!("pay_{}", uuid::Uuid::new_v4().simple());
    let confirmation = PaymentConfirmation {
        order_id: order.id.clone(),
        external_order_id: order.external_order_id.clone(),
        signature: system.gateway.sign(&order.external_order_id, &payment_id),
        payment_id,
    };
    if let PaymentOutcome::Confirmed(transaction) = system.reconciler.confirm(confirmation).await? {
        info!(transaction = %to_json(&transaction), "Payment recorded");
    }

    system.settlement.confirm_pickup(order.id.clone(), owner_id.clone()).await?;
    let settlement = system.settlement.settle_return(order.id.clone(), owner_id).await?;
    info!(order = %to_json(&settlement.order), late_fee = ?settlement.late_fee, "Rental closed");

    if let Some(product) = system.product_client.get_product(product_id).await? {
        info!(product = %to_json(&product), "Final product state");
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
