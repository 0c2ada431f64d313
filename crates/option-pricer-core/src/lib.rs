pub mod distribution;
pub mod error;
pub mod implied_vol;
pub mod pricing;
pub mod types;

pub use error::PricerError;
pub use types::OptionType;

/// Standard result type for all pricing operations
pub type PricerResult<T> = Result<T, PricerError>;
