pub mod constants;
pub mod error;
pub mod estimate;
pub mod types;

pub use error::{IntelError, Result};
pub use estimate::Estimate;
