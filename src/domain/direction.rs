//! Transaction direction
//!
//! Closed two-value enum for the flow of money on a ledger entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a ledger entry. Maps to the Postgres
/// `transaction_direction` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_direction", rename_all = "lowercase")]
pub enum Direction {
    Income,
    Outcome,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Outcome => "outcome",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Direction::Income),
            "outcome" => Ok(Direction::Outcome),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("income".parse::<Direction>().unwrap(), Direction::Income);
        assert_eq!("outcome".parse::<Direction>().unwrap(), Direction::Outcome);
    }

    #[test]
    fn test_direction_rejects_unknown() {
        assert!("expense".parse::<Direction>().is_err());
        assert!("INCOME".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Income).unwrap(), "\"income\"");
        let parsed: Direction = serde_json::from_str("\"outcome\"").unwrap();
        assert_eq!(parsed, Direction::Outcome);
    }
}
