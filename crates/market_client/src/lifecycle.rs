//! Market lifecycle contracts.
//!
//! Every operation takes an explicitly enumerated parameter struct with
//! documented defaults, validated at this boundary. Out-of-range values
//! are rejected here rather than deep inside a call chain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::config::{MAX_ODDS_BPS, MIN_ODDS_BPS};
use common::{Error, Side};
use serde::{Deserialize, Serialize};

use crate::convert::RawMarketState;

/// Longest accepted market question, in characters.
pub const MAX_QUESTION_LEN: usize = 200;

// ── Parameter structs ─────────────────────────────────────────────────

/// Parameters for creating a new binary market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarketParams {
    /// Market question, e.g. "Will X happen by March?".
    pub question: String,
    /// When trading ends and the market becomes resolvable.
    pub end_time: DateTime<Utc>,
    /// Initial collateral deposited, in UI units. Must be > 0.
    pub initial_liquidity: f64,
    /// Collateral mint address.
    pub collateral_mint: String,
    /// Custom oracle address; `None` uses the program's default oracle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle: Option<String>,
    /// Initial YES odds in basis points. Default 5000, range 100-9900.
    pub initial_odds_bps: u16,
}

impl CreateMarketParams {
    /// Validate all fields, collecting every issue into one error.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), Error> {
        let mut issues: Vec<String> = Vec::new();

        if self.question.trim().is_empty() {
            issues.push("question must not be empty".into());
        }
        if self.question.chars().count() > MAX_QUESTION_LEN {
            issues.push(format!("question must be <= {MAX_QUESTION_LEN} characters"));
        }
        if self.end_time <= now {
            issues.push("end_time must be in the future".into());
        }
        if !self.initial_liquidity.is_finite() || self.initial_liquidity <= 0.0 {
            issues.push("initial_liquidity must be a finite number > 0".into());
        }
        if self.collateral_mint.trim().is_empty() {
            issues.push("collateral_mint must not be empty".into());
        }
        if let Some(oracle) = &self.oracle {
            if oracle.trim().is_empty() {
                issues.push("oracle must not be empty when provided".into());
            }
        }
        if self.initial_odds_bps < MIN_ODDS_BPS || self.initial_odds_bps > MAX_ODDS_BPS {
            issues.push(format!(
                "initial_odds_bps must be in {MIN_ODDS_BPS}-{MAX_ODDS_BPS}, got {}",
                self.initial_odds_bps
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "invalid market parameters:\n - {}",
                issues.join("\n - ")
            )))
        }
    }
}

/// Parameters for a buy or sell against a market.
///
/// For buys, `amount` is collateral deposited; for sells, it is outcome
/// tokens burned. Both are UI units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeParams {
    pub market: String,
    pub side: Side,
    pub amount: f64,
}

impl TradeParams {
    pub fn validate(&self) -> Result<(), Error> {
        if self.market.trim().is_empty() {
            return Err(Error::InvalidArgument("market address must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "amount must be a finite number > 0, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Parameters for settling a market to its winning outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleParams {
    pub market: String,
    pub winning_side: Side,
}

impl SettleParams {
    pub fn validate(&self) -> Result<(), Error> {
        if self.market.trim().is_empty() {
            return Err(Error::InvalidArgument("market address must not be empty".into()));
        }
        Ok(())
    }
}

/// Parameters for redeeming a winning position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemParams {
    pub market: String,
}

impl RedeemParams {
    pub fn validate(&self) -> Result<(), Error> {
        if self.market.trim().is_empty() {
            return Err(Error::InvalidArgument("market address must not be empty".into()));
        }
        Ok(())
    }
}

// ── Receipts ──────────────────────────────────────────────────────────

/// Result of a market creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarketReceipt {
    /// Address of the new market.
    pub market: String,
    /// Transaction signature.
    pub signature: String,
}

/// Result of any other lifecycle transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    pub signature: String,
}

// ── Traits ────────────────────────────────────────────────────────────

/// Lifecycle operations of the external market program.
///
/// Implementations own their endpoint and signing context; nothing here
/// is process-global, so tests can inject fixtures.
#[async_trait]
pub trait MarketLifecycle {
    async fn create_market(&self, params: &CreateMarketParams)
        -> Result<CreateMarketReceipt, Error>;
    async fn buy(&self, params: &TradeParams) -> Result<TxReceipt, Error>;
    async fn sell(&self, params: &TradeParams) -> Result<TxReceipt, Error>;
    async fn set_resolvable(&self, market: &str, resolvable: bool) -> Result<TxReceipt, Error>;
    async fn settle(&self, params: &SettleParams) -> Result<TxReceipt, Error>;
    async fn redeem(&self, params: &RedeemParams) -> Result<TxReceipt, Error>;
}

/// Read-only source of raw market account state.
#[async_trait]
pub trait SnapshotSource {
    async fn market_state(&self, market: &str) -> Result<RawMarketState, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_create(now: DateTime<Utc>) -> CreateMarketParams {
        CreateMarketParams {
            question: "Will it rain in NYC tomorrow?".into(),
            end_time: now + Duration::hours(24),
            initial_liquidity: 100.0,
            collateral_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into(),
            oracle: None,
            initial_odds_bps: 5000,
        }
    }

    #[test]
    fn valid_create_params_pass() {
        let now = Utc::now();
        assert!(valid_create(now).validate(now).is_ok());
    }

    #[test]
    fn odds_out_of_range_rejected() {
        let now = Utc::now();
        for bps in [0, 99, 9901, u16::MAX] {
            let mut p = valid_create(now);
            p.initial_odds_bps = bps;
            let err = p.validate(now).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(_)),
                "odds {bps} should be rejected"
            );
        }
        // Boundary values are accepted.
        for bps in [100, 9900] {
            let mut p = valid_create(now);
            p.initial_odds_bps = bps;
            assert!(p.validate(now).is_ok(), "odds {bps} should be accepted");
        }
    }

    #[test]
    fn empty_question_and_past_end_time_rejected_together() {
        let now = Utc::now();
        let mut p = valid_create(now);
        p.question = "   ".into();
        p.end_time = now - Duration::hours(1);
        let err = p.validate(now).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("question"), "missing question issue: {msg}");
        assert!(msg.contains("end_time"), "missing end_time issue: {msg}");
    }

    #[test]
    fn non_positive_liquidity_rejected() {
        let now = Utc::now();
        for liq in [0.0, -5.0, f64::NAN] {
            let mut p = valid_create(now);
            p.initial_liquidity = liq;
            assert!(p.validate(now).is_err(), "liquidity {liq} should be rejected");
        }
    }

    #[test]
    fn trade_amount_must_be_positive() {
        let trade = TradeParams {
            market: "market-1".into(),
            side: Side::Yes,
            amount: 0.0,
        };
        assert!(trade.validate().is_err());

        let trade = TradeParams {
            amount: 12.5,
            ..trade
        };
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn empty_market_address_rejected_everywhere() {
        assert!(TradeParams {
            market: "".into(),
            side: Side::No,
            amount: 1.0
        }
        .validate()
        .is_err());
        assert!(SettleParams {
            market: " ".into(),
            winning_side: Side::Yes
        }
        .validate()
        .is_err());
        assert!(RedeemParams { market: "".into() }.validate().is_err());
    }
}
