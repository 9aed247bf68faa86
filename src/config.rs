//! Game settings, validated before any game state is constructed

use crate::catalog::Language;
use crate::{DragonError, Result};
use serde::{Deserialize, Serialize};

pub const MAX_SEATS: usize = 6;

/// Supported game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum GameMode {
    Solo,
    Multiplayer,
}

/// Immutable settings consumed at game start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    pub player_names: Vec<String>,
    pub n_bots: usize,
    pub language: Language,
    pub mode: GameMode,
    /// Seed for the game RNG; games with the same seed and the same decision
    /// sequence replay identically
    pub seed: u64,
}

impl GameSettings {
    /// Validate ranges: 1-6 human players, 0-6 bots, at most 6 seats total,
    /// and at least 2 seats so there is an opponent to play against.
    pub fn validate(&self) -> Result<()> {
        let n_players = self.player_names.len();
        if n_players == 0 || n_players > MAX_SEATS {
            return Err(DragonError::InvalidSettings(format!(
                "number of players must be between 1 and {MAX_SEATS}, got {n_players}"
            )));
        }
        if self.n_bots > MAX_SEATS {
            return Err(DragonError::InvalidSettings(format!(
                "number of bots must be between 0 and {MAX_SEATS}, got {}",
                self.n_bots
            )));
        }
        if n_players + self.n_bots > MAX_SEATS {
            return Err(DragonError::InvalidSettings(format!(
                "{n_players} players plus {} bots exceed the {MAX_SEATS} available seats",
                self.n_bots
            )));
        }
        if n_players + self.n_bots < 2 {
            return Err(DragonError::InvalidSettings(
                "the game needs at least two seats (players plus bots)".to_string(),
            ));
        }
        if self.mode == GameMode::Solo && n_players != 1 {
            return Err(DragonError::InvalidSettings(format!(
                "solo mode takes exactly one human player, got {n_players}"
            )));
        }
        Ok(())
    }

    /// Total number of seats at the table
    pub fn n_seats(&self) -> usize {
        self.player_names.len() + self.n_bots
    }
}

impl Default for GameSettings {
    /// The original front-end defaults: one player named Player_1, two bots,
    /// English, solo mode.
    fn default() -> Self {
        GameSettings {
            player_names: vec!["Player_1".to_string()],
            n_bots: 2,
            language: Language::English,
            mode: GameMode::Solo,
            seed: 0,
        }
    }
}
