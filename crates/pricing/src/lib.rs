//! Pricing engine crate.
//!
//! Pure conversion from on-chain market state to implied prices and
//! payout multipliers. No I/O, no shared state.

pub mod curve;

pub use curve::{compute_prices, MarketSnapshot, PriceQuote};
