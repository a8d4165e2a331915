//! Bonding-curve pricing for binary markets.
//!
//! Given a market's collateral reserves `R` and outcome token supplies
//! `Y` (YES) and `N` (NO), all in UI decimal units:
//!
//! ```text
//! denominator    = Y² + N²
//! yes_price      = R·Y / denominator
//! no_price       = R·N / denominator
//! yes_multiplier = 1 + (N/Y)²
//! no_multiplier  = 1 + (Y/N)²
//! ```
//!
//! The multipliers depend only on the supply ratio, so scaling both
//! supplies by a constant leaves them unchanged. Note that the prices
//! are NOT constrained to sum to 1; that is a property of this curve,
//! not a bug, and nothing here renormalizes them.
//!
//! Edge cases:
//! - any negative or non-finite field: `Error::InvalidArgument`
//! - both supplies zero: `Error::Domain` (prices undefined)
//! - exactly one supply zero: `Error::Domain` (multiplier undefined);
//!   callers should surface this as "no price available yet"
//! - zero reserves with positive supplies: both prices are exactly 0,
//!   which is a valid result for an empty or fully redeemed market

use common::{Error, Side};
use serde::{Deserialize, Serialize};

// ── Types ─────────────────────────────────────────────────────────────

/// On-chain state of one binary market at a point in time.
///
/// All fields are UI decimal amounts: raw integer amounts divided by
/// their token's decimal base before construction (see
/// `market_client::snapshot_from_raw`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Total collateral locked in the market.
    pub collateral_reserves: f64,
    /// Circulating YES outcome tokens.
    pub yes_supply: f64,
    /// Circulating NO outcome tokens.
    pub no_supply: f64,
}

/// Implied prices and payout multipliers for both outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Implied price of YES.
    pub yes_price: f64,
    /// Implied price of NO.
    pub no_price: f64,
    /// Payout per unit collateral staked on YES if YES wins.
    pub yes_multiplier: f64,
    /// Payout per unit collateral staked on NO if NO wins.
    pub no_multiplier: f64,
}

impl PriceQuote {
    pub fn multiplier(&self, side: Side) -> f64 {
        match side {
            Side::Yes => self.yes_multiplier,
            Side::No => self.no_multiplier,
        }
    }

    /// Projected payout for `stake` collateral on `side`, if it wins.
    pub fn payout(&self, side: Side, stake: f64) -> f64 {
        stake * self.multiplier(side)
    }
}

// ── Engine ────────────────────────────────────────────────────────────

impl MarketSnapshot {
    /// Reject negative or non-finite fields.
    fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("collateral_reserves", self.collateral_reserves),
            ("yes_supply", self.yes_supply),
            ("no_supply", self.no_supply),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "{name} must be finite, got {value}"
                )));
            }
            if value < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "{name} must be >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Compute implied prices and payout multipliers for a market snapshot.
///
/// Pure and synchronous: any failure is immediate and total, and there
/// is nothing to retry.
pub fn compute_prices(snapshot: &MarketSnapshot) -> Result<PriceQuote, Error> {
    snapshot.validate()?;

    let r = snapshot.collateral_reserves;
    let yes = snapshot.yes_supply;
    let no = snapshot.no_supply;

    if yes == 0.0 && no == 0.0 {
        return Err(Error::Domain(
            "prices undefined: both outcome supplies are zero".into(),
        ));
    }
    if yes == 0.0 || no == 0.0 {
        let empty = if yes == 0.0 { Side::Yes } else { Side::No };
        return Err(Error::Domain(format!(
            "undefined multiplier: {} supply is zero",
            empty.label()
        )));
    }

    let denominator = yes * yes + no * no;

    Ok(PriceQuote {
        yes_price: r * yes / denominator,
        no_price: r * no / denominator,
        yes_multiplier: 1.0 + (no / yes).powi(2),
        no_multiplier: 1.0 + (yes / no).powi(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn snapshot(reserves: f64, yes: f64, no: f64) -> MarketSnapshot {
        MarketSnapshot {
            collateral_reserves: reserves,
            yes_supply: yes,
            no_supply: no,
        }
    }

    // ── Symmetry ──────────────────────────────────────────────────────

    #[test]
    fn balanced_supplies_give_equal_prices_and_2x_multipliers() {
        for supply in [1.0, 42.5, 1_000_000.0] {
            let q = compute_prices(&snapshot(500.0, supply, supply)).unwrap();
            assert!(
                (q.yes_price - q.no_price).abs() < TOL,
                "yes={} no={} should match at supply {}",
                q.yes_price,
                q.no_price,
                supply
            );
            assert!((q.yes_multiplier - 2.0).abs() < TOL);
            assert!((q.no_multiplier - 2.0).abs() < TOL);
        }
    }

    // ── Scale invariance ──────────────────────────────────────────────

    #[test]
    fn multipliers_depend_only_on_supply_ratio() {
        let base = compute_prices(&snapshot(1000.0, 650.0, 350.0)).unwrap();
        for k in [0.001, 3.0, 1e6] {
            let scaled = compute_prices(&snapshot(1000.0, 650.0 * k, 350.0 * k)).unwrap();
            assert!(
                (scaled.yes_multiplier - base.yes_multiplier).abs() < 1e-6,
                "yes multiplier changed under scaling by {}: {} vs {}",
                k,
                scaled.yes_multiplier,
                base.yes_multiplier
            );
            assert!((scaled.no_multiplier - base.no_multiplier).abs() < 1e-6);
        }
    }

    // ── Boundaries ────────────────────────────────────────────────────

    #[test]
    fn zero_reserves_gives_zero_prices_not_an_error() {
        let q = compute_prices(&snapshot(0.0, 100.0, 50.0)).unwrap();
        assert_eq!(q.yes_price, 0.0);
        assert_eq!(q.no_price, 0.0);
        // Multipliers are still defined by the supply ratio.
        assert!((q.yes_multiplier - 1.25).abs() < TOL);
        assert!((q.no_multiplier - 5.0).abs() < TOL);
    }

    #[test]
    fn zero_yes_supply_is_domain_error() {
        let err = compute_prices(&snapshot(1000.0, 0.0, 100.0)).unwrap_err();
        assert!(
            matches!(err, Error::Domain(_)),
            "expected Domain error, got {err:?}"
        );
    }

    #[test]
    fn zero_no_supply_is_domain_error() {
        let err = compute_prices(&snapshot(1000.0, 100.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    #[test]
    fn both_supplies_zero_is_domain_error() {
        let err = compute_prices(&snapshot(1000.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    // ── Concrete scenario ─────────────────────────────────────────────

    #[test]
    fn documented_scenario_matches_closed_form() {
        let q = compute_prices(&snapshot(1000.0, 650.0, 350.0)).unwrap();

        let denominator = 650.0_f64 * 650.0 + 350.0 * 350.0;
        assert_eq!(denominator, 545_000.0);

        assert!((q.yes_price - 1000.0 * 650.0 / denominator).abs() < TOL);
        assert!((q.no_price - 1000.0 * 350.0 / denominator).abs() < TOL);
        assert!((q.yes_multiplier - (1.0 + (350.0_f64 / 650.0).powi(2))).abs() < TOL);
        assert!((q.no_multiplier - (1.0 + (650.0_f64 / 350.0).powi(2))).abs() < TOL);

        // Rounded reference values.
        assert!((q.yes_price - 1.1927).abs() < 1e-4);
        assert!((q.no_price - 0.6422).abs() < 1e-4);
        assert!((q.yes_multiplier - 1.2899).abs() < 1e-4);
        assert!((q.no_multiplier - 4.4490).abs() < 1e-4);

        // The prices deliberately do not sum to 1 under this curve.
        assert!((q.yes_price + q.no_price - 1.0).abs() > 0.5);
    }

    // ── Input rejection ───────────────────────────────────────────────

    #[test]
    fn negative_inputs_are_rejected() {
        let cases = [
            snapshot(-1.0, 100.0, 100.0),
            snapshot(1000.0, -0.5, 100.0),
            snapshot(1000.0, 100.0, -100.0),
        ];
        for s in cases {
            let err = compute_prices(&s).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(_)),
                "expected InvalidArgument for {s:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let cases = [
            snapshot(f64::NAN, 100.0, 100.0),
            snapshot(1000.0, f64::INFINITY, 100.0),
            snapshot(1000.0, 100.0, f64::NEG_INFINITY),
        ];
        for s in cases {
            let err = compute_prices(&s).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    // ── Payout helper ─────────────────────────────────────────────────

    #[test]
    fn payout_scales_stake_by_multiplier() {
        let q = compute_prices(&snapshot(1000.0, 500.0, 500.0)).unwrap();
        assert!((q.payout(Side::Yes, 25.0) - 50.0).abs() < TOL);
        assert!((q.payout(Side::No, 10.0) - 20.0).abs() < TOL);
    }
}
