//! Domain types shared across the toolkit.

use serde::{Deserialize, Serialize};

/// One of the two outcomes of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Yes => "YES",
            Side::No => "NO",
        }
    }
}

impl std::str::FromStr for Side {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Side::Yes),
            "no" | "n" => Ok(Side::No),
            other => Err(crate::Error::InvalidArgument(format!(
                "side must be 'yes' or 'no', got '{other}'"
            ))),
        }
    }
}

/// Lifecycle state of a market.
///
/// A market opens for trading, is flagged resolvable once its end
/// condition can be judged, and is settled by the oracle exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    #[default]
    Open,
    Resolvable,
    Settled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("YES".parse::<Side>().unwrap(), Side::Yes);
        assert_eq!("no".parse::<Side>().unwrap(), Side::No);
        assert!("maybe".parse::<Side>().is_err());
    }

    #[test]
    fn side_labels() {
        assert_eq!(Side::Yes.label(), "YES");
        assert_eq!(Side::No.label(), "NO");
    }
}
