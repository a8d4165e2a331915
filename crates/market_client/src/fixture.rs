//! In-memory fixture implementation of the market client traits.
//!
//! Backs the CLI's dry-run mode and the test suites. The fixture keeps
//! a plain market map behind an `RwLock` and enforces lifecycle
//! ordering (open, resolvable, settled), but it does not reproduce the
//! external program's AMM: buys and sells apply flat 1:1 bookkeeping,
//! and `create` splits the initial outcome supply by the odds
//! parameter. Real execution happens on chain.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{Error, MarketStatus, Side};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::convert::{RawMarketState, TokenScales};
use crate::lifecycle::{
    CreateMarketParams, CreateMarketReceipt, MarketLifecycle, RedeemParams, SettleParams,
    SnapshotSource, TradeParams, TxReceipt,
};

/// A market entry loaded from a seed file or created at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMarket {
    pub address: String,
    #[serde(default)]
    pub question: String,
    pub state: RawMarketState,
    #[serde(default)]
    pub status: MarketStatus,
    #[serde(default)]
    pub winner: Option<Side>,
}

#[derive(Debug, Clone)]
struct FixtureMarket {
    question: String,
    state: RawMarketState,
    status: MarketStatus,
    winner: Option<Side>,
}

/// In-memory market store implementing `MarketLifecycle` and
/// `SnapshotSource`.
#[derive(Debug, Clone)]
pub struct FixtureMarkets {
    scales: TokenScales,
    markets: Arc<RwLock<HashMap<String, FixtureMarket>>>,
}

impl FixtureMarkets {
    pub fn new(scales: TokenScales) -> Self {
        Self {
            scales,
            markets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load markets from a JSON seed document (an array of `SeedMarket`).
    pub fn from_json(scales: TokenScales, json: &str) -> Result<Self, Error> {
        let seeds: Vec<SeedMarket> = serde_json::from_str(json)?;
        let map = seeds
            .into_iter()
            .map(|s| {
                (
                    s.address,
                    FixtureMarket {
                        question: s.question,
                        state: s.state,
                        status: s.status,
                        winner: s.winner,
                    },
                )
            })
            .collect();
        Ok(Self {
            scales,
            markets: Arc::new(RwLock::new(map)),
        })
    }

    pub async fn market_count(&self) -> usize {
        self.markets.read().await.len()
    }

    fn collateral_raw(&self, ui: f64) -> u64 {
        (ui * 10f64.powi(self.scales.collateral_decimals as i32)).round() as u64
    }

    fn outcome_raw(&self, ui: f64) -> u64 {
        (ui * 10f64.powi(self.scales.outcome_decimals as i32)).round() as u64
    }

    fn new_signature() -> String {
        format!("sig-{}", Uuid::new_v4())
    }
}

#[async_trait]
impl MarketLifecycle for FixtureMarkets {
    async fn create_market(
        &self,
        params: &CreateMarketParams,
    ) -> Result<CreateMarketReceipt, Error> {
        params.validate(Utc::now())?;

        let address = format!("market-{}", Uuid::new_v4());
        let reserves = self.collateral_raw(params.initial_liquidity);

        // Split the initial outcome supply by the odds parameter. The
        // real split is the on-chain program's call; the fixture only
        // needs plausible state for pricing.
        let total_supply = self.outcome_raw(params.initial_liquidity * 2.0);
        let yes_supply = (total_supply as u128 * params.initial_odds_bps as u128 / 10_000) as u64;
        let no_supply = total_supply - yes_supply;

        let market = FixtureMarket {
            question: params.question.clone(),
            state: RawMarketState {
                collateral_reserves: reserves,
                yes_supply,
                no_supply,
            },
            status: MarketStatus::Open,
            winner: None,
        };

        debug!(
            "Fixture create: {} — \"{}\" reserves={} yes={} no={}",
            address, market.question, reserves, yes_supply, no_supply
        );

        self.markets.write().await.insert(address.clone(), market);

        Ok(CreateMarketReceipt {
            market: address,
            signature: Self::new_signature(),
        })
    }

    async fn buy(&self, params: &TradeParams) -> Result<TxReceipt, Error> {
        params.validate()?;

        let mut markets = self.markets.write().await;
        let market = markets
            .get_mut(&params.market)
            .ok_or_else(|| Error::MarketNotFound(params.market.clone()))?;

        if market.status != MarketStatus::Open {
            return Err(Error::MarketState(format!(
                "cannot buy: market {} is {:?}",
                params.market, market.status
            )));
        }

        let collateral = self.collateral_raw(params.amount);
        let tokens = self.outcome_raw(params.amount); // flat fill
        market.state.collateral_reserves += collateral;
        match params.side {
            Side::Yes => market.state.yes_supply += tokens,
            Side::No => market.state.no_supply += tokens,
        }

        debug!(
            "Fixture buy: {} {} amount={} reserves={}",
            params.side.label(),
            params.market,
            params.amount,
            market.state.collateral_reserves
        );

        Ok(TxReceipt {
            signature: Self::new_signature(),
        })
    }

    async fn sell(&self, params: &TradeParams) -> Result<TxReceipt, Error> {
        params.validate()?;

        let mut markets = self.markets.write().await;
        let market = markets
            .get_mut(&params.market)
            .ok_or_else(|| Error::MarketNotFound(params.market.clone()))?;

        if market.status != MarketStatus::Open {
            return Err(Error::MarketState(format!(
                "cannot sell: market {} is {:?}",
                params.market, market.status
            )));
        }

        let tokens = self.outcome_raw(params.amount);
        let supply = match params.side {
            Side::Yes => &mut market.state.yes_supply,
            Side::No => &mut market.state.no_supply,
        };
        if *supply < tokens {
            return Err(Error::MarketState(format!(
                "cannot sell {} {} tokens: only {} in circulation",
                params.amount,
                params.side.label(),
                *supply
            )));
        }
        *supply -= tokens;

        let collateral = self.collateral_raw(params.amount); // flat fill
        market.state.collateral_reserves =
            market.state.collateral_reserves.saturating_sub(collateral);

        Ok(TxReceipt {
            signature: Self::new_signature(),
        })
    }

    async fn set_resolvable(&self, market: &str, resolvable: bool) -> Result<TxReceipt, Error> {
        let mut markets = self.markets.write().await;
        let entry = markets
            .get_mut(market)
            .ok_or_else(|| Error::MarketNotFound(market.to_string()))?;

        if entry.status == MarketStatus::Settled {
            return Err(Error::MarketState(format!(
                "cannot change resolvable flag: market {market} is already settled"
            )));
        }
        entry.status = if resolvable {
            MarketStatus::Resolvable
        } else {
            MarketStatus::Open
        };

        debug!("Fixture set_resolvable: {} -> {:?}", market, entry.status);

        Ok(TxReceipt {
            signature: Self::new_signature(),
        })
    }

    async fn settle(&self, params: &SettleParams) -> Result<TxReceipt, Error> {
        params.validate()?;

        let mut markets = self.markets.write().await;
        let market = markets
            .get_mut(&params.market)
            .ok_or_else(|| Error::MarketNotFound(params.market.clone()))?;

        match market.status {
            MarketStatus::Settled => {
                return Err(Error::MarketState(format!(
                    "market {} is already settled",
                    params.market
                )));
            }
            MarketStatus::Open => {
                return Err(Error::MarketState(format!(
                    "market {} is not resolvable yet",
                    params.market
                )));
            }
            MarketStatus::Resolvable => {}
        }

        market.status = MarketStatus::Settled;
        market.winner = Some(params.winning_side);

        debug!(
            "Fixture settle: {} winner={}",
            params.market,
            params.winning_side.label()
        );

        Ok(TxReceipt {
            signature: Self::new_signature(),
        })
    }

    async fn redeem(&self, params: &RedeemParams) -> Result<TxReceipt, Error> {
        params.validate()?;

        let mut markets = self.markets.write().await;
        let market = markets
            .get_mut(&params.market)
            .ok_or_else(|| Error::MarketNotFound(params.market.clone()))?;

        if market.status != MarketStatus::Settled {
            return Err(Error::MarketState(format!(
                "cannot redeem: market {} is not settled",
                params.market
            )));
        }

        // Winning positions drain the pool.
        market.state.collateral_reserves = 0;

        debug!(
            "Fixture redeem: {} winner={:?}",
            params.market, market.winner
        );

        Ok(TxReceipt {
            signature: Self::new_signature(),
        })
    }
}

#[async_trait]
impl SnapshotSource for FixtureMarkets {
    async fn market_state(&self, market: &str) -> Result<RawMarketState, Error> {
        self.markets
            .read()
            .await
            .get(market)
            .map(|m| m.state)
            .ok_or_else(|| Error::MarketNotFound(market.to_string()))
    }
}
