//! Toolkit configuration types.

use serde::{Deserialize, Serialize};

/// Default initial odds for new markets, in basis points (5000 = 50%).
pub const DEFAULT_ODDS_BPS: u16 = 5000;
/// Lowest accepted initial odds (1%).
pub const MIN_ODDS_BPS: u16 = 100;
/// Highest accepted initial odds (99%).
pub const MAX_ODDS_BPS: u16 = 9900;

/// Top-level toolkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Decimal count of the collateral token (varies by mint; 6 for USDC).
    #[serde(default = "default_collateral_decimals")]
    pub collateral_decimals: u8,

    /// Decimal count of the YES/NO outcome tokens.
    #[serde(default = "default_outcome_decimals")]
    pub outcome_decimals: u8,

    /// Initial odds applied to new markets when no flag is given.
    #[serde(default = "default_odds_bps")]
    pub default_odds_bps: u16,

    /// Collateral mint used for new markets when no flag is given.
    #[serde(default = "default_collateral_mint")]
    pub default_collateral_mint: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_collateral_decimals() -> u8 {
    6
}

fn default_outcome_decimals() -> u8 {
    6
}

fn default_odds_bps() -> u16 {
    DEFAULT_ODDS_BPS
}

fn default_collateral_mint() -> String {
    // USDC mainnet mint.
    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collateral_decimals: default_collateral_decimals(),
            outcome_decimals: default_outcome_decimals(),
            default_odds_bps: default_odds_bps(),
            default_collateral_mint: default_collateral_mint(),
        }
    }
}
