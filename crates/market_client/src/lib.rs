//! Market client boundary.
//!
//! Typed contracts for the external market program: lifecycle
//! operations, raw-state reads, and raw-to-UI unit conversion. The
//! on-chain program itself (AMM execution, settlement, token mint and
//! burn) is an external collaborator; this crate only shapes requests,
//! validates them at the boundary, and converts returned state.

pub mod convert;
pub mod fixture;
pub mod lifecycle;

pub use convert::{snapshot_from_raw, ui_amount, RawMarketState, TokenScales};
pub use fixture::{FixtureMarkets, SeedMarket};
pub use lifecycle::{
    CreateMarketParams, CreateMarketReceipt, MarketLifecycle, RedeemParams, SettleParams,
    SnapshotSource, TradeParams, TxReceipt,
};
