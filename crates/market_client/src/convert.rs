//! Raw on-chain amounts to UI decimal conversion.
//!
//! Chain accounts store fixed-point integers; the pricing engine works
//! in UI units. Collateral decimals vary by mint, outcome token
//! decimals are a deployment constant, so both are configuration.

use pricing::MarketSnapshot;
use serde::{Deserialize, Serialize};

/// Raw integer state of a market account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMarketState {
    /// Collateral locked, in the collateral token's base units.
    pub collateral_reserves: u64,
    /// YES supply in outcome-token base units.
    pub yes_supply: u64,
    /// NO supply in outcome-token base units.
    pub no_supply: u64,
}

/// Decimal counts used to normalize raw amounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenScales {
    pub collateral_decimals: u8,
    pub outcome_decimals: u8,
}

impl Default for TokenScales {
    fn default() -> Self {
        Self {
            collateral_decimals: 6,
            outcome_decimals: 6,
        }
    }
}

/// Convert a raw integer amount to UI units for a given decimal count.
pub fn ui_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

/// Build a pricing snapshot from raw account state.
pub fn snapshot_from_raw(raw: &RawMarketState, scales: &TokenScales) -> MarketSnapshot {
    MarketSnapshot {
        collateral_reserves: ui_amount(raw.collateral_reserves, scales.collateral_decimals),
        yes_supply: ui_amount(raw.yes_supply, scales.outcome_decimals),
        no_supply: ui_amount(raw.no_supply, scales.outcome_decimals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_amount_six_decimals() {
        assert_eq!(ui_amount(1_500_000, 6), 1.5);
        assert_eq!(ui_amount(0, 6), 0.0);
        assert_eq!(ui_amount(1, 6), 0.000001);
    }

    #[test]
    fn ui_amount_zero_decimals_is_identity() {
        assert_eq!(ui_amount(42, 0), 42.0);
    }

    #[test]
    fn snapshot_uses_separate_scales() {
        let raw = RawMarketState {
            collateral_reserves: 1_000_000_000, // 9 decimals
            yes_supply: 650_000_000,            // 6 decimals
            no_supply: 350_000_000,
        };
        let scales = TokenScales {
            collateral_decimals: 9,
            outcome_decimals: 6,
        };
        let snap = snapshot_from_raw(&raw, &scales);
        assert_eq!(snap.collateral_reserves, 1.0);
        assert_eq!(snap.yes_supply, 650.0);
        assert_eq!(snap.no_supply, 350.0);
    }
}
