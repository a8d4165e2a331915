//! Unified error type for the market toolkit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value is outside its declared domain
    /// (negative, non-finite, out of range). Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The computation is mathematically undefined for otherwise valid
    /// inputs. Callers may treat this as "no price available yet".
    #[error("Undefined for these inputs: {0}")]
    Domain(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Market not found: {0}")]
    MarketNotFound(String),

    /// An operation was attempted in the wrong lifecycle state
    /// (e.g. settling a market that is not resolvable yet).
    #[error("Market state error: {0}")]
    MarketState(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
