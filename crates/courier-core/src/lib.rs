//! # Courier Core
//! Shared traits, types, error handling, and configuration for Courier.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::CourierConfig;
pub use error::{CourierError, Result};
