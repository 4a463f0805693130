//! Supported games.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A game whose gacha history the store archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Game {
    StarRail,
    ZenlessZoneZero,
}

impl Game {
    /// Every supported game, in migration order.
    pub const ALL: [Game; 2] = [Game::StarRail, Game::ZenlessZoneZero];

    /// Value stored in the `game` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Game::StarRail => "StarRail",
            Game::ZenlessZoneZero => "ZenlessZoneZero",
        }
    }

    /// Per-game folder used by the standalone releases.
    pub fn legacy_folder_name(&self) -> &'static str {
        match self {
            Game::StarRail => "SRTools",
            Game::ZenlessZoneZero => "ZenlessTools",
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Game::StarRail => "Honkai: Star Rail",
            Game::ZenlessZoneZero => "Zenless Zone Zero",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starrail" | "star_rail" | "hsr" | "sr" => Ok(Game::StarRail),
            "zenlesszonezero" | "zenless" | "zzz" => Ok(Game::ZenlessZoneZero),
            _ => Err(StoreError::InvalidGame(s.to_string())),
        }
    }
}
