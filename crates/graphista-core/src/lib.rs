pub mod config;
pub mod error;
pub mod types;

pub use config::GraphistaConfig;
pub use error::{GraphistaError, Result};
pub use types::*;
