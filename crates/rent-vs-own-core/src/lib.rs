pub mod error;
pub mod mortgage;
pub mod params;
pub mod records;
pub mod returns;
pub mod tax;
pub mod time_value;
pub mod types;

#[cfg(feature = "ownership")]
pub mod ownership;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "cashflow")]
pub mod cashflow;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::RentVsOwnError;
pub use types::*;

/// Standard result type for all rent-vs-own computations
pub type RentVsOwnResult<T> = Result<T, RentVsOwnError>;
