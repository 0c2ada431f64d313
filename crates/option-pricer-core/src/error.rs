use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid target price {price}: market price must be positive")]
    InvalidTarget { price: f64 },
}
