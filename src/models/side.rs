use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{AppError, Result};

/// One of the two sides of a fixture. Used for winners on both matches and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team,
    Opponent,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Team => "team",
            Side::Opponent => "opponent",
        }
    }

    /// Parses a line winner token. `unfinished` (and blank/none/null) clears the winner.
    pub fn from_winner_token(raw: &str) -> Result<Option<Side>> {
        match raw.trim().to_lowercase().as_str() {
            "team" | "home" | "0" => Ok(Some(Side::Team)),
            "opponent" | "away" | "1" => Ok(Some(Side::Opponent)),
            "unfinished" | "" | "none" | "null" => Ok(None),
            _ => Err(AppError::invalid_data(
                "winner must be 'team', 'opponent', or 'unfinished'",
            )),
        }
    }

    /// A completed match always has a winner.
    pub fn from_match_winner(raw: &str) -> Result<Side> {
        match Side::from_winner_token(raw) {
            Ok(Some(side)) => Ok(side),
            _ => Err(AppError::invalid_data("winner must be 'team' or 'opponent'")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side currently holds service. Encoded as `0` (team) / `1` (opponent)
/// both on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Serve {
    #[default]
    Team,
    Opponent,
}

impl Serve {
    pub fn as_index(self) -> u8 {
        match self {
            Serve::Team => 0,
            Serve::Opponent => 1,
        }
    }

    pub fn from_index(index: i64) -> Option<Serve> {
        match index {
            0 => Some(Serve::Team),
            1 => Some(Serve::Opponent),
            _ => None,
        }
    }
}

impl Serialize for Serve {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_index())
    }
}

impl<'de> Deserialize<'de> for Serve {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let index = i64::deserialize(deserializer)?;
        Serve::from_index(index)
            .ok_or_else(|| de::Error::custom(format!("invalid serve index {index}")))
    }
}
