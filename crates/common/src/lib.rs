//! Shared types for the market toolkit.

pub mod config;
pub mod error;
pub mod types;

pub use error::Error;
pub use types::{MarketStatus, Side};
