//! Summaries derived from a tracker's belief rows and behaviour counters.

use crate::model::play::PlayKind;
use serde::Serialize;

/// Estimated structure of one seat's hidden hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandInference {
    pub bombs: f32,
    pub straights: f32,
    pub triples: f32,
    pub pairs: f32,
    /// Likely holds a joker or a level card.
    pub has_control: bool,
    /// `0..=1`; grows as the hand shrinks and the round progresses.
    pub confidence: f32,
}

impl HandInference {
    pub const EMPTY: HandInference = HandInference {
        bombs: 0.0,
        straights: 0.0,
        triples: 0.0,
        pairs: 0.0,
        has_control: false,
        confidence: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPattern {
    Aggressive,
    Conservative,
    Balanced,
}

/// Per-seat behaviour counters for the current round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub plays: u32,
    pub passes: u32,
    pub play_kinds: [u32; 10],
    /// Passes counted by the kind of play they declined to beat.
    pub passed_on: [u32; 10],
    pub bombs: u32,
}

impl PlayerStats {
    pub fn record_play(&mut self, kind: PlayKind) {
        self.plays += 1;
        self.play_kinds[kind.index()] += 1;
        if kind.is_bomb() {
            self.bombs += 1;
        }
    }

    pub fn record_pass(&mut self, lead: Option<PlayKind>) {
        self.passes += 1;
        if let Some(kind) = lead {
            self.passed_on[kind.index()] += 1;
        }
    }

    pub fn actions(&self) -> u32 {
        self.plays + self.passes
    }

    pub fn pass_rate(&self) -> f32 {
        match self.actions() {
            0 => 0.0,
            n => self.passes as f32 / n as f32,
        }
    }

    pub fn bomb_rate(&self) -> f32 {
        match self.plays {
            0 => 0.0,
            n => self.bombs as f32 / n as f32,
        }
    }

    /// Needs three observed actions before leaving `Balanced`.
    pub fn pattern(&self) -> PlayerPattern {
        if self.actions() < 3 {
            return PlayerPattern::Balanced;
        }
        let pass_rate = self.pass_rate();
        let bomb_rate = self.bomb_rate();
        if pass_rate < 0.3 || bomb_rate > 0.2 {
            PlayerPattern::Aggressive
        } else if pass_rate > 0.6 && bomb_rate < 0.05 {
            PlayerPattern::Conservative
        } else {
            PlayerPattern::Balanced
        }
    }
}
