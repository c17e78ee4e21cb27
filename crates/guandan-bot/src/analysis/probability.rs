use crate::eval::{HandEvaluator, StructureAnalyzer};
use guandan_core::belief::{CardTracker, PlayerPattern};
use guandan_core::game::GameState;
use guandan_core::model::play::{Play, PlayKind};
use guandan_core::model::player::Seat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Mean chance an opponent beats the play.
    pub beaten: f32,
    /// Chance the partner can take the trick back.
    pub assist: f32,
    pub should_play: bool,
}

/// Probability estimates for one seat, built on that seat's card tracker.
///
/// Reads only public information from `GameState` (hand sizes, the lead,
/// trick winners) plus the analyzing seat's own hand.
pub struct ProbabilityAnalyzer<'a> {
    tracker: &'a CardTracker,
    evaluator: HandEvaluator,
    structure: StructureAnalyzer,
}

impl<'a> ProbabilityAnalyzer<'a> {
    pub fn new(tracker: &'a CardTracker) -> Self {
        Self {
            tracker,
            evaluator: HandEvaluator::new(),
            structure: StructureAnalyzer::new(),
        }
    }

    pub fn tracker(&self) -> &CardTracker {
        self.tracker
    }

    pub fn win_probability(&self, state: &GameState, seat: Seat) -> f32 {
        let team = seat.team();
        let sizes = state.hand_sizes();
        let mine = sizes[seat.index()] as f32;
        let partner = sizes[seat.partner().index()];
        let opponents = seat.opponents();
        let opp_sizes: Vec<usize> = opponents.iter().map(|s| sizes[s.index()]).collect();
        let avg_opp = opp_sizes.iter().sum::<usize>() as f32 / opp_sizes.len() as f32;

        let mut p = 0.5;

        let own_team = state.team_card_count(team) as f32;
        let other_team = state.team_card_count(team.other()) as f32;
        p += ((other_team - own_team) / 40.0).clamp(-0.25, 0.25);
        p += ((avg_opp - mine) / 50.0).clamp(-0.1, 0.1);

        let own_hand = state.hand(seat).cards();
        let own_bombs = self.evaluator.evaluate(own_hand, state.trump).bombs as f32
            + self.tracker.estimate_bomb_count_for(seat.partner());
        let opp_bombs: f32 = opponents
            .iter()
            .map(|s| self.tracker.estimate_bomb_count_for(*s))
            .sum();
        p += (own_bombs - opp_bombs) * 0.12;

        match state.last_play_player {
            Some(holder) if holder.team() == team => p += 0.08,
            Some(_) => p -= 0.05,
            None if state.current_player == seat => p += 0.08,
            None => {}
        }

        if mine <= 3.0 {
            p += 0.15;
        } else if mine <= 5.0 {
            p += 0.08;
        }
        if partner > 0 && partner <= 3 {
            p += 0.1;
        }
        if opp_sizes.iter().any(|n| *n > 0 && *n <= 3) {
            p -= 0.12;
        }

        let own_turns = self.structure.turns_needed(own_hand, state.trump) as f32;
        let opp_turns = opp_sizes
            .iter()
            .map(|n| *n as f32 / 1.8)
            .fold(f32::INFINITY, f32::min);
        if own_turns < opp_turns {
            p += 0.05;
        } else if own_turns > opp_turns {
            p -= 0.05;
        }

        p += 0.03 * state.control_streak(team) as f32;
        p.clamp(0.0, 1.0)
    }

    pub fn evaluate_risk(&self, play: &Play, state: &GameState, seat: Seat) -> RiskAssessment {
        let beaten = self.estimate_beaten_probability(play, state, seat);
        let assist = self.estimate_teammate_can_help(play, state, seat);
        let mut level = if beaten < 0.3 {
            RiskLevel::Low
        } else if beaten < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };
        if level == RiskLevel::Medium && assist > 0.6 {
            level = RiskLevel::Low;
        }
        RiskAssessment {
            level,
            beaten,
            assist,
            should_play: !(level == RiskLevel::High && assist < 0.4),
        }
    }

    /// Mean over opponents still holding cards of the chance they beat `play`.
    pub fn estimate_beaten_probability(&self, play: &Play, state: &GameState, seat: Seat) -> f32 {
        let base = base_beaten_probability(play);
        let power = play.trump().power(play.main_card());
        let mut total = 0.0;
        let mut counted = 0;
        for opponent in seat.opponents() {
            let remaining = state.hand(opponent).len();
            if remaining == 0 {
                continue;
            }
            let mut p = base + count_band(remaining, [0.25, 0.1, 0.0, -0.1, -0.15]);

            let bombs = self.tracker.estimate_bomb_count_for(opponent);
            if play.is_bomb() {
                p += 0.05 * bombs;
            } else {
                p += 0.1 * bombs.min(2.0);
            }

            p += match self.tracker.player_pattern(opponent) {
                PlayerPattern::Aggressive => 0.1,
                PlayerPattern::Conservative => -0.1,
                PlayerPattern::Balanced => 0.0,
            };

            if !play.is_bomb() {
                if power >= 90 {
                    p -= 0.1;
                } else if power <= 30 {
                    p += 0.1;
                }
            }

            let inference = self.tracker.infer_hand_structure(opponent);
            let structural = match play.kind() {
                PlayKind::Single if inference.has_control => 0.05,
                PlayKind::Pair if inference.pairs >= 3.0 => 0.05,
                PlayKind::Triple | PlayKind::TripleWithPair if inference.triples >= 1.0 => 0.05,
                PlayKind::Straight if inference.straights >= 0.5 => 0.05,
                PlayKind::Bomb if inference.bombs >= 1.0 => 0.05,
                _ => 0.0,
            };
            p += structural * (0.5 + 0.5 * inference.confidence);

            total += p.clamp(0.0, 1.0);
            counted += 1;
        }
        if counted == 0 {
            0.0
        } else {
            total / counted as f32
        }
    }

    pub fn estimate_teammate_can_help(&self, play: &Play, state: &GameState, seat: Seat) -> f32 {
        let partner = seat.partner();
        let remaining = state.hand(partner).len();
        if remaining == 0 || play.kind() == PlayKind::FourKings {
            return 0.0;
        }
        let mut p = 0.45 + count_band(remaining, [0.15, 0.08, 0.0, -0.08, -0.15]);
        p += 0.25 * self.tracker.estimate_bomb_count_for(partner);
        p += match play.kind() {
            PlayKind::Single => 0.1,
            PlayKind::Pair => 0.05,
            PlayKind::Straight | PlayKind::Plate | PlayKind::TriplePair => -0.05,
            PlayKind::StraightFlush => -0.1,
            PlayKind::Bomb => -0.2,
            _ => 0.0,
        };
        if remaining <= 5 {
            p += 0.1;
        }
        if play.trump().power(play.main_card()) >= 90 {
            p -= 0.15;
        }
        p.clamp(0.0, 1.0)
    }

    /// Rule ladder deciding whether spending `bomb` now is worth it.
    pub fn should_use_bomb(&self, state: &GameState, seat: Seat, bomb: &Play) -> bool {
        let sizes = state.hand_sizes();
        let mine = sizes[seat.index()];
        let partner = sizes[seat.partner().index()];
        let opponents = seat.opponents();

        if opponents.iter().any(|s| sizes[s.index()] > 0 && sizes[s.index()] <= 2) {
            return true;
        }
        if bomb.len() == mine || (mine <= 5 && partner <= 5) {
            return true;
        }
        let win = self.win_probability(state, seat);
        if win < 0.25 {
            return true;
        }
        if bomb.kind() == PlayKind::FourKings {
            return false;
        }
        if win > 0.75 && mine > 8 {
            return false;
        }
        if bomb.len() >= 6 && win > 0.5 && mine > 8 {
            return false;
        }
        let opp_bombs: f32 = opponents
            .iter()
            .map(|s| self.tracker.estimate_bomb_count_for(*s))
            .sum();
        if opp_bombs > 1.5 || (bomb.len() < 6 && opp_bombs > 1.0) {
            return true;
        }
        if let (Some(last), Some(holder)) = (&state.last_play, state.last_play_player) {
            let strong = last.is_bomb()
                || last.len() >= 5
                || last.trump().power(last.main_card()) >= 60;
            if holder.is_opponent(seat)
                && strong
                && win < 0.6
                && self.estimate_teammate_can_help(last, state, seat) < 0.4
            {
                return true;
            }
        }
        false
    }
}

fn base_beaten_probability(play: &Play) -> f32 {
    match play.kind() {
        PlayKind::FourKings => 0.05,
        PlayKind::Bomb => match play.len() {
            4 => 0.25,
            5 => 0.18,
            6 => 0.12,
            _ => 0.08,
        },
        PlayKind::StraightFlush => 0.15,
        PlayKind::Plate | PlayKind::TriplePair | PlayKind::TripleWithPair => 0.3,
        PlayKind::Straight | PlayKind::Triple => 0.35,
        PlayKind::Single => 0.55,
        PlayKind::Pair => 0.45,
    }
}

/// Adjustment by hand size: 20+, 12+, 6+, 3+, fewer.
fn count_band(remaining: usize, steps: [f32; 5]) -> f32 {
    match remaining {
        20.. => steps[0],
        12..=19 => steps[1],
        6..=11 => steps[2],
        3..=5 => steps[3],
        _ => steps[4],
    }
}
