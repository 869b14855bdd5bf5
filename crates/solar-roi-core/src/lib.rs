pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "roi")]
pub mod solar;

#[cfg(feature = "lead")]
pub mod lead;

pub use error::{FieldError, SolarRoiError};
pub use types::*;

/// Standard result type for all solar-roi operations
pub type SolarRoiResult<T> = Result<T, SolarRoiError>;
