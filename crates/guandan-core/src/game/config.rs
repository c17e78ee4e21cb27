use crate::model::player::{PersonalityTag, SEATS};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings fixed for the lifetime of one `GameManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Deal seed; `None` draws one from the thread RNG at game start.
    pub seed: Option<u64>,
    pub trump_suit: Suit,
    pub starting_level: Rank,
    pub ai_seats: [bool; SEATS],
    pub personalities: [PersonalityTag; SEATS],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            trump_suit: Suit::Hearts,
            starting_level: Rank::Two,
            ai_seats: [false, true, true, true],
            personalities: [PersonalityTag::Balanced; SEATS],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameConfigError {
    #[error("starting level must be an ordinary rank, got {0:?}")]
    InvalidStartingLevel(Rank),
    #[error("trump suit must be an ordinary suit")]
    JokerTrumpSuit,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn all_ai(mut self) -> Self {
        self.ai_seats = [true; SEATS];
        self
    }

    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.starting_level.is_joker() {
            return Err(GameConfigError::InvalidStartingLevel(self.starting_level));
        }
        if self.trump_suit.is_joker() {
            return Err(GameConfigError::JokerTrumpSuit);
        }
        Ok(())
    }
}
