use thiserror::Error;

use crate::order_actor::OrderError;
use crate::ports::PaymentError;
use crate::pricing::PricingError;
use crate::product_actor::ProductError;
use crate::transaction_actor::TransactionError;
use crate::user_actor::UserError;

/// Caller-facing errors of the rental lifecycle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RentalError {
    // --- validation ---
    #[error("Invalid duration: requested {requested}, minimum {minimum}")]
    InvalidDuration { requested: u32, minimum: u32 },
    #[error("Unsupported duration type: {0}")]
    UnsupportedDurationType(String),
    #[error("Start date must be in the future")]
    InvalidStartDate,
    #[error("Price overflow")]
    PriceOverflow,

    // --- eligibility ---
    #[error("Renter not found: {0}")]
    RenterNotFound(String),
    #[error("KYC verification required")]
    KycRequired,
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Product is under review: {0}")]
    ProductUnderReview(String),
    #[error("Product is not verified: {0}")]
    ProductNotVerified(String),
    #[error("Cannot rent own product: {0}")]
    CannotRentOwnProduct(String),

    // --- concurrency ---
    #[error("Product already rented: {0}")]
    ProductAlreadyRented(String),
    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),
    #[error("Rent policy changed, quote again: {0}")]
    RentChanged(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    // --- payment ---
    #[error("Invalid payment signature")]
    InvalidSignature,
    #[error("Order already paid: {0}")]
    AlreadyPaid(String),
    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    // --- order progression ---
    #[error("Order not paid: {0}")]
    OrderNotPaid(String),
    #[error("Order not picked up: {0}")]
    NotPickedUp(String),
    #[error("Order already picked up: {0}")]
    AlreadyPickedUp(String),
    #[error("Order already returned: {0}")]
    AlreadyReturned(String),

    // --- authorization ---
    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RentalResult<T> = Result<T, RentalError>;

impl From<PricingError> for RentalError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::InvalidDuration { requested, minimum } => Self::InvalidDuration { requested, minimum },
            PricingError::UnsupportedDurationType(t) => Self::UnsupportedDurationType(t),
            PricingError::Overflow => Self::PriceOverflow,
        }
    }
}

impl From<UserError> for RentalError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(id) => Self::RenterNotFound(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ProductError> for RentalError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => Self::ProductNotFound(id),
            ProductError::UnderReview(id) => Self::ProductUnderReview(id),
            ProductError::NotVerified(id) => Self::ProductNotVerified(id),
            ProductError::Unavailable(id) => Self::ProductUnavailable(id),
            ProductError::CannotRentOwnProduct(id) => Self::CannotRentOwnProduct(id),
            ProductError::RentChanged(id) => Self::RentChanged(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<OrderError> for RentalError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => Self::OrderNotFound(id),
            OrderError::AlreadyPaid(id) => Self::AlreadyPaid(id),
            OrderError::NotPaid(id) => Self::OrderNotPaid(id),
            OrderError::NotPickedUp(id) => Self::NotPickedUp(id),
            OrderError::AlreadyPickedUp(id) => Self::AlreadyPickedUp(id),
            OrderError::AlreadyReturned(id) => Self::AlreadyReturned(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<TransactionError> for RentalError {
    fn from(e: TransactionError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<PaymentError> for RentalError {
    fn from(e: PaymentError) -> Self {
        Self::PaymentGateway(e.to_string())
    }
}
