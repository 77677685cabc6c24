use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product already exists: {0}")]
    AlreadyExists(String),
    #[error("Product is under review: {0}")]
    UnderReview(String),
    #[error("Product is not verified: {0}")]
    NotVerified(String),
    #[error("Product is unavailable: {0}")]
    Unavailable(String),
    /// The listing's rent policy changed after the order was quoted.
    #[error("Rent policy changed for product: {0}")]
    RentChanged(String),
    #[error("Owner cannot rent their own product: {0}")]
    CannotRentOwnProduct(String),
    /// The transition names an order that does not hold the product.
    #[error("Product {product_id} is not held by order {order_id}")]
    HoldMismatch { product_id: String, order_id: String },
    #[error("Product is in use: {0}")]
    InUse(String),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
