//! marketctl: pricing and lifecycle planner for a binary prediction market.
//!
//! `price` converts market state (from flags or a seed file) into
//! implied prices and payout multipliers. The lifecycle subcommands
//! (create, buy, sell, set-resolvable, settle, redeem) validate their
//! parameters and run against an in-memory fixture as a dry run;
//! transaction signing and submission belong to the external chain
//! client.

mod config;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};

use common::config::AppConfig;
use common::{Error, Side};
use market_client::{
    snapshot_from_raw, CreateMarketParams, FixtureMarkets, MarketLifecycle, RawMarketState,
    RedeemParams, SettleParams, SnapshotSource, TokenScales, TradeParams,
};
use pricing::{compute_prices, MarketSnapshot, PriceQuote};

/// Binary prediction market CLI.
#[derive(Parser)]
#[command(name = "marketctl", about = "Binary prediction market pricing and lifecycle planner")]
struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    /// JSON seed file of markets, used by --market lookups and dry runs.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute implied prices and payout multipliers for a market.
    Price {
        /// Market address to read from the seed file.
        #[arg(long, conflicts_with_all = ["reserves", "yes_supply", "no_supply"])]
        market: Option<String>,

        /// Collateral reserves, in UI units.
        #[arg(long)]
        reserves: Option<f64>,

        /// Circulating YES supply, in UI units.
        #[arg(long)]
        yes_supply: Option<f64>,

        /// Circulating NO supply, in UI units.
        #[arg(long)]
        no_supply: Option<f64>,

        /// Interpret the three values as raw base-unit amounts instead.
        #[arg(long)]
        raw: bool,

        /// Also show the projected payout for this collateral stake.
        #[arg(long)]
        stake: Option<f64>,
    },

    /// Plan a new binary market (dry run).
    Create {
        /// Market question.
        #[arg(long)]
        question: String,

        /// Trading end time, RFC 3339 (e.g. 2026-09-01T00:00:00Z).
        #[arg(long, conflicts_with = "duration_hours")]
        end_time: Option<String>,

        /// Trading window from now, in hours.
        #[arg(long)]
        duration_hours: Option<f64>,

        /// Initial collateral liquidity, in UI units.
        #[arg(long)]
        liquidity: f64,

        /// Collateral mint address (defaults from config).
        #[arg(long)]
        collateral_mint: Option<String>,

        /// Custom oracle address (defaults to the program oracle).
        #[arg(long)]
        oracle: Option<String>,

        /// Initial YES odds in basis points, 100-9900 (defaults from config).
        #[arg(long)]
        odds_bps: Option<u16>,
    },

    /// Buy outcome tokens with collateral (dry run).
    Buy {
        #[arg(long)]
        market: String,
        /// Outcome side: yes or no.
        #[arg(long)]
        side: String,
        /// Collateral to deposit, in UI units.
        #[arg(long)]
        amount: f64,
    },

    /// Sell outcome tokens back for collateral (dry run).
    Sell {
        #[arg(long)]
        market: String,
        /// Outcome side: yes or no.
        #[arg(long)]
        side: String,
        /// Outcome tokens to burn, in UI units.
        #[arg(long)]
        amount: f64,
    },

    /// Flag a market as resolvable, or clear the flag (dry run).
    SetResolvable {
        #[arg(long)]
        market: String,
        /// Clear the resolvable flag instead of setting it.
        #[arg(long)]
        off: bool,
    },

    /// Settle a market to its winning outcome (dry run).
    Settle {
        #[arg(long)]
        market: String,
        /// Winning side: yes or no.
        #[arg(long)]
        winner: String,
    },

    /// Redeem a winning position (dry run).
    Redeem {
        #[arg(long)]
        market: String,
    },
}

fn scales_from(cfg: &AppConfig) -> TokenScales {
    TokenScales {
        collateral_decimals: cfg.collateral_decimals,
        outcome_decimals: cfg.outcome_decimals,
    }
}

fn load_fixture(seed: Option<&Path>, scales: TokenScales) -> Result<FixtureMarkets, Error> {
    match seed {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            let fixture = FixtureMarkets::from_json(scales, &contents)?;
            info!("Loaded seed file: {}", path.display());
            Ok(fixture)
        }
        None => Ok(FixtureMarkets::new(scales)),
    }
}

fn parse_end_time(
    end_time: Option<&str>,
    duration_hours: Option<f64>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    match (end_time, duration_hours) {
        (Some(raw), None) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| Error::InvalidArgument(format!("end_time is not RFC 3339: {e}"))),
        (None, Some(hours)) => {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "duration_hours must be a finite number > 0, got {hours}"
                )));
            }
            Ok(now + Duration::seconds((hours * 3600.0) as i64))
        }
        _ => Err(Error::InvalidArgument(
            "exactly one of --end-time or --duration-hours is required".into(),
        )),
    }
}

fn emit(json_mode: bool, human: &str, value: serde_json::Value) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
    } else {
        println!("{human}");
    }
}

fn quote_human(snapshot: &MarketSnapshot, quote: &PriceQuote, stake: Option<f64>) -> String {
    let mut out = format!(
        "reserves:       {:.6}\n\
         YES supply:     {:.6}\n\
         NO supply:      {:.6}\n\
         YES price:      {:.6}\n\
         NO price:       {:.6}\n\
         YES multiplier: {:.4}x\n\
         NO multiplier:  {:.4}x",
        snapshot.collateral_reserves,
        snapshot.yes_supply,
        snapshot.no_supply,
        quote.yes_price,
        quote.no_price,
        quote.yes_multiplier,
        quote.no_multiplier,
    );
    if let Some(stake) = stake {
        out.push_str(&format!(
            "\npayout if YES:  {:.6} (stake {:.6})\npayout if NO:   {:.6} (stake {:.6})",
            quote.payout(Side::Yes, stake),
            stake,
            quote.payout(Side::No, stake),
            stake,
        ));
    }
    out
}

#[allow(clippy::too_many_arguments)]
async fn run_price(
    cfg: &AppConfig,
    fixture: &FixtureMarkets,
    json_mode: bool,
    market: Option<String>,
    reserves: Option<f64>,
    yes_supply: Option<f64>,
    no_supply: Option<f64>,
    raw: bool,
    stake: Option<f64>,
) -> Result<(), Error> {
    let snapshot = if let Some(address) = market {
        let state = fixture.market_state(&address).await?;
        snapshot_from_raw(&state, &scales_from(cfg))
    } else {
        let (Some(reserves), Some(yes), Some(no)) = (reserves, yes_supply, no_supply) else {
            return Err(Error::InvalidArgument(
                "provide --market, or all of --reserves, --yes-supply, --no-supply".into(),
            ));
        };
        if raw {
            let to_raw = |v: f64, name: &str| -> Result<u64, Error> {
                if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
                    return Err(Error::InvalidArgument(format!(
                        "{name} must be a non-negative integer in raw mode, got {v}"
                    )));
                }
                Ok(v as u64)
            };
            let state = RawMarketState {
                collateral_reserves: to_raw(reserves, "reserves")?,
                yes_supply: to_raw(yes, "yes_supply")?,
                no_supply: to_raw(no, "no_supply")?,
            };
            snapshot_from_raw(&state, &scales_from(cfg))
        } else {
            MarketSnapshot {
                collateral_reserves: reserves,
                yes_supply: yes,
                no_supply: no,
            }
        }
    };

    if let Some(stake) = stake {
        if !stake.is_finite() || stake <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "stake must be a finite number > 0, got {stake}"
            )));
        }
    }

    match compute_prices(&snapshot) {
        Ok(quote) => {
            let mut value = json!({
                "snapshot": snapshot,
                "quote": quote,
            });
            if let Some(stake) = stake {
                value["payout"] = json!({
                    "stake": stake,
                    "if_yes": quote.payout(Side::Yes, stake),
                    "if_no": quote.payout(Side::No, stake),
                });
            }
            emit(json_mode, &quote_human(&snapshot, &quote, stake), value);
            Ok(())
        }
        // A market with no circulating supply has no price yet. Not a
        // user mistake, so report N/A and exit cleanly.
        Err(Error::Domain(reason)) => {
            emit(
                json_mode,
                &format!("price: N/A (no price available yet: {reason})"),
                json!({ "snapshot": snapshot, "quote": null, "reason": reason }),
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Copy)]
enum TradeKind {
    Buy,
    Sell,
}

async fn run_trade(
    fixture: &FixtureMarkets,
    json_mode: bool,
    kind: TradeKind,
    market: String,
    side: String,
    amount: f64,
) -> Result<(), Error> {
    let params = TradeParams {
        market,
        side: side.parse::<Side>()?,
        amount,
    };
    params.validate()?;

    let (receipt, verb, unit) = match kind {
        TradeKind::Buy => (fixture.buy(&params).await?, "bought", "collateral"),
        TradeKind::Sell => (fixture.sell(&params).await?, "sold", "tokens"),
    };

    emit(
        json_mode,
        &format!(
            "[dry-run] {} {} on {}: {} {}\n  tx: {}",
            verb,
            params.side.label(),
            params.market,
            params.amount,
            unit,
            receipt.signature
        ),
        json!({ "request": params, "receipt": receipt, "dry_run": true }),
    );
    Ok(())
}

async fn run(cli: Cli, cfg: AppConfig) -> Result<(), Error> {
    let fixture = load_fixture(cli.seed.as_deref(), scales_from(&cfg))?;
    let json_mode = cli.json;

    match cli.command {
        Command::Price {
            market,
            reserves,
            yes_supply,
            no_supply,
            raw,
            stake,
        } => {
            run_price(
                &cfg, &fixture, json_mode, market, reserves, yes_supply, no_supply, raw, stake,
            )
            .await
        }

        Command::Create {
            question,
            end_time,
            duration_hours,
            liquidity,
            collateral_mint,
            oracle,
            odds_bps,
        } => {
            let now = Utc::now();
            let params = CreateMarketParams {
                question,
                end_time: parse_end_time(end_time.as_deref(), duration_hours, now)?,
                initial_liquidity: liquidity,
                collateral_mint: collateral_mint
                    .unwrap_or_else(|| cfg.default_collateral_mint.clone()),
                oracle,
                initial_odds_bps: odds_bps.unwrap_or(cfg.default_odds_bps),
            };
            params.validate(now)?;

            let receipt = fixture.create_market(&params).await?;
            emit(
                json_mode,
                &format!(
                    "[dry-run] market created: {}\n  question: {}\n  ends:     {}\n  odds:     {} bps\n  tx:       {}",
                    receipt.market,
                    params.question,
                    params.end_time.to_rfc3339(),
                    params.initial_odds_bps,
                    receipt.signature,
                ),
                json!({ "request": params, "receipt": receipt, "dry_run": true }),
            );
            Ok(())
        }

        Command::Buy { market, side, amount } => {
            run_trade(&fixture, json_mode, TradeKind::Buy, market, side, amount).await
        }

        Command::Sell { market, side, amount } => {
            run_trade(&fixture, json_mode, TradeKind::Sell, market, side, amount).await
        }

        Command::SetResolvable { market, off } => {
            let receipt = fixture.set_resolvable(&market, !off).await?;
            emit(
                json_mode,
                &format!(
                    "[dry-run] market {} resolvable={}\n  tx: {}",
                    market, !off, receipt.signature
                ),
                json!({ "market": market, "resolvable": !off, "receipt": receipt, "dry_run": true }),
            );
            Ok(())
        }

        Command::Settle { market, winner } => {
            let params = SettleParams {
                market,
                winning_side: winner.parse::<Side>()?,
            };
            params.validate()?;
            let receipt = fixture.settle(&params).await?;
            emit(
                json_mode,
                &format!(
                    "[dry-run] market {} settled: {} wins\n  tx: {}",
                    params.market,
                    params.winning_side.label(),
                    receipt.signature
                ),
                json!({ "request": params, "receipt": receipt, "dry_run": true }),
            );
            Ok(())
        }

        Command::Redeem { market } => {
            let params = RedeemParams { market };
            params.validate()?;
            let receipt = fixture.redeem(&params).await?;
            emit(
                json_mode,
                &format!(
                    "[dry-run] position redeemed on {}\n  tx: {}",
                    params.market, receipt.signature
                ),
                json!({ "request": params, "receipt": receipt, "dry_run": true }),
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketctl=info,market_client=info,pricing=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, cfg).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn end_time_rfc3339_is_normalized_to_utc() {
        let t = parse_end_time(Some("2026-09-01T02:00:00+02:00"), None, fixed_now()).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn malformed_end_time_rejected() {
        let err = parse_end_time(Some("next tuesday"), None, fixed_now()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidArgument(_)),
            "expected InvalidArgument, got {err:?}"
        );
    }

    #[test]
    fn duration_hours_offsets_from_now() {
        let now = fixed_now();
        let t = parse_end_time(None, Some(36.5), now).unwrap();
        assert_eq!(t, now + Duration::seconds(36 * 3600 + 1800));
    }

    #[test]
    fn non_positive_or_non_finite_duration_rejected() {
        for hours in [0.0, -24.0, f64::NAN, f64::INFINITY] {
            let err = parse_end_time(None, Some(hours), fixed_now()).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(_)),
                "hours {hours} should be rejected"
            );
        }
    }

    #[test]
    fn exactly_one_of_end_time_and_duration_required() {
        let now = fixed_now();
        assert!(parse_end_time(None, None, now).is_err());
        assert!(parse_end_time(Some("2026-09-01T00:00:00Z"), Some(24.0), now).is_err());
    }
}
