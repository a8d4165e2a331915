//! Configuration loader — merges env vars, .env file, and config.toml.

use common::config::{AppConfig, MAX_ODDS_BPS, MIN_ODDS_BPS};
use common::Error;
use std::path::Path;

/// Largest decimal count seen across deployments (18 for wrapped mints).
const MAX_TOKEN_DECIMALS: u8 = 18;

fn parse_u8(raw: &str, env_name: &str) -> Result<u8, Error> {
    raw.trim()
        .parse::<u8>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer in 0-255")))
}

fn parse_u16(raw: &str, env_name: &str) -> Result<u16, Error> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer in 0-65535")))
}

pub fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.collateral_decimals > MAX_TOKEN_DECIMALS {
        issues.push(format!(
            "collateral_decimals must be <= {MAX_TOKEN_DECIMALS}, got {}",
            config.collateral_decimals
        ));
    }
    if config.outcome_decimals > MAX_TOKEN_DECIMALS {
        issues.push(format!(
            "outcome_decimals must be <= {MAX_TOKEN_DECIMALS}, got {}",
            config.outcome_decimals
        ));
    }
    if config.default_odds_bps < MIN_ODDS_BPS || config.default_odds_bps > MAX_ODDS_BPS {
        issues.push(format!(
            "default_odds_bps must be in {MIN_ODDS_BPS}-{MAX_ODDS_BPS}, got {}",
            config.default_odds_bps
        ));
    }
    if config.default_collateral_mint.trim().is_empty() {
        issues.push("default_collateral_mint must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load toolkit configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(raw) = std::env::var("MARKETCTL_COLLATERAL_DECIMALS") {
        config.collateral_decimals = parse_u8(&raw, "MARKETCTL_COLLATERAL_DECIMALS")?;
    }
    if let Ok(raw) = std::env::var("MARKETCTL_OUTCOME_DECIMALS") {
        config.outcome_decimals = parse_u8(&raw, "MARKETCTL_OUTCOME_DECIMALS")?;
    }
    if let Ok(raw) = std::env::var("MARKETCTL_DEFAULT_ODDS_BPS") {
        config.default_odds_bps = parse_u16(&raw, "MARKETCTL_DEFAULT_ODDS_BPS")?;
    }
    if let Ok(mint) = std::env::var("MARKETCTL_COLLATERAL_MINT") {
        config.default_collateral_mint = mint;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
