//! Per-round card tracker: who has played what, and where the unseen cards probably are.

use crate::belief::inference::{HandInference, PlayerPattern, PlayerStats};
use crate::game::state::{GameState, TrickAction};
use crate::model::card::{Card, CardId, DECK_SIZE};
use crate::model::play::Play;
use crate::model::player::{SEATS, Seat};
use crate::model::rank::Rank;
use crate::model::trump::{CardTier, TrumpContext};
use std::array;
use std::cmp::Ordering;

const RENORMALIZE_PASSES: usize = 8;

/// An action the tracker can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerAction {
    Played { seat: Seat, play: Play },
    Passed { seat: Seat },
}

impl TrackerAction {
    pub fn seat(&self) -> Seat {
        match self {
            TrackerAction::Played { seat, .. } | TrackerAction::Passed { seat } => *seat,
        }
    }
}

/// Belief state over the unseen cards, seen from `perspective`.
///
/// Every row other than the perspective's sums to the seat's remaining card count.
#[derive(Debug, Clone)]
pub struct CardTracker {
    perspective: Seat,
    trump: TrumpContext,
    round: u32,
    played: [bool; DECK_SIZE],
    own: [bool; DECK_SIZE],
    remaining: [usize; SEATS],
    probs: [[f32; DECK_SIZE]; SEATS],
    stats: [PlayerStats; SEATS],
    lead: Option<Play>,
    passes_since_lead: usize,
}

impl CardTracker {
    pub fn new(state: &GameState, perspective: Seat) -> Self {
        let mut tracker = Self {
            perspective,
            trump: state.trump,
            round: state.round_number,
            played: [false; DECK_SIZE],
            own: [false; DECK_SIZE],
            remaining: [0; SEATS],
            probs: [[0.0; DECK_SIZE]; SEATS],
            stats: array::from_fn(|_| PlayerStats::default()),
            lead: None,
            passes_since_lead: 0,
        };
        tracker.reset_for_round(state, perspective);
        tracker
    }

    /// Rebuilds from the current round: own hand, cards already played and hand sizes.
    pub fn reset_for_round(&mut self, state: &GameState, perspective: Seat) {
        self.perspective = perspective;
        self.trump = state.trump;
        self.round = state.round_number;
        self.played = [false; DECK_SIZE];
        self.own = [false; DECK_SIZE];
        self.stats = array::from_fn(|_| PlayerStats::default());
        for card in state.played_cards() {
            self.played[card.id.index()] = true;
        }
        for card in state.hand(perspective).iter() {
            self.own[card.id.index()] = true;
        }
        self.remaining = state.hand_sizes();
        self.lead = state.last_play.clone();
        self.passes_since_lead = state
            .current_trick
            .iter()
            .rev()
            .take_while(|entry| matches!(entry.action, TrickAction::Passed))
            .count();
        for entry in &state.history {
            self.stats[entry.seat.index()].record_play(entry.play.kind());
        }
        self.seed_uniform();
    }

    pub fn perspective(&self) -> Seat {
        self.perspective
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn trump(&self) -> TrumpContext {
        self.trump
    }

    pub fn remaining(&self, seat: Seat) -> usize {
        self.remaining[seat.index()]
    }

    pub fn stats(&self, seat: Seat) -> &PlayerStats {
        &self.stats[seat.index()]
    }

    pub fn probability(&self, seat: Seat, id: CardId) -> f32 {
        self.probs[seat.index()][id.index()]
    }

    pub fn row_sum(&self, seat: Seat) -> f32 {
        self.probs[seat.index()].iter().sum()
    }

    pub fn is_played(&self, id: CardId) -> bool {
        self.played[id.index()]
    }

    /// Not played and not in the perspective's hand.
    pub fn is_unseen(&self, id: CardId) -> bool {
        !self.played[id.index()] && !self.own[id.index()]
    }

    pub fn unseen_cards(&self) -> impl Iterator<Item = Card> + '_ {
        (0..DECK_SIZE as u8)
            .map(CardId)
            .filter(|id| self.is_unseen(*id))
            .filter_map(Card::from_id)
    }

    pub fn played_total(&self) -> usize {
        self.played.iter().filter(|p| **p).count()
    }

    pub fn observe(&mut self, action: &TrackerAction) {
        match action {
            TrackerAction::Played { seat, play } => self.on_played(*seat, play),
            TrackerAction::Passed { seat } => self.on_passed(*seat),
        }
    }

    fn on_played(&mut self, seat: Seat, play: &Play) {
        for card in play.cards() {
            let index = card.id.index();
            self.played[index] = true;
            self.own[index] = false;
            for row in self.probs.iter_mut() {
                row[index] = 0.0;
            }
        }
        let slot = &mut self.remaining[seat.index()];
        *slot = slot.saturating_sub(play.len());
        self.stats[seat.index()].record_play(play.kind());
        self.lead = Some(play.clone());
        self.passes_since_lead = 0;
        for other in Seat::LOOP {
            if other != self.perspective {
                self.renormalize_row(other);
            }
        }
    }

    fn on_passed(&mut self, seat: Seat) {
        let lead_kind = self.lead.as_ref().map(Play::kind);
        self.stats[seat.index()].record_pass(lead_kind);
        if let Some(lead) = self.lead.clone() {
            if seat != self.perspective {
                let factor = 0.7 + 0.2 * self.stats[seat.index()].pass_rate();
                let main = lead.main_card();
                for card in self.unseen_cards().collect::<Vec<_>>() {
                    if self.trump.compare_strength(card, main) == Ordering::Greater {
                        self.probs[seat.index()][card.id.index()] *= factor;
                    }
                }
                self.renormalize_row(seat);
            }
        }
        self.passes_since_lead += 1;
        if self.passes_since_lead >= SEATS - 1 {
            self.lead = None;
            self.passes_since_lead = 0;
        }
    }

    fn seed_uniform(&mut self) {
        self.probs = [[0.0; DECK_SIZE]; SEATS];
        let unseen: Vec<usize> = (0..DECK_SIZE)
            .filter(|index| !self.played[*index] && !self.own[*index])
            .collect();
        if unseen.is_empty() {
            return;
        }
        for seat in Seat::LOOP {
            if seat == self.perspective {
                continue;
            }
            let p = (self.remaining[seat.index()] as f32 / unseen.len() as f32).min(1.0);
            for index in &unseen {
                self.probs[seat.index()][*index] = p;
            }
        }
    }

    /// Rescales one row to the seat's remaining count, capping each cell at 1.
    fn renormalize_row(&mut self, seat: Seat) {
        let target = self.remaining[seat.index()] as f32;
        let unseen: Vec<usize> = (0..DECK_SIZE)
            .filter(|index| !self.played[*index] && !self.own[*index])
            .collect();
        let row = &mut self.probs[seat.index()];
        if target == 0.0 {
            row.iter_mut().for_each(|p| *p = 0.0);
            return;
        }
        if unseen.iter().all(|index| row[*index] <= 0.0) {
            let p = (target / unseen.len().max(1) as f32).min(1.0);
            for index in &unseen {
                row[*index] = p;
            }
            return;
        }
        for _ in 0..RENORMALIZE_PASSES {
            let fixed: f32 = unseen.iter().map(|i| row[*i]).filter(|p| *p >= 1.0).sum();
            let free: f32 = unseen
                .iter()
                .map(|i| row[*i])
                .filter(|p| *p > 0.0 && *p < 1.0)
                .sum();
            if free <= 0.0 {
                break;
            }
            let scale = (target - fixed).max(0.0) / free;
            let mut clipped = false;
            for index in &unseen {
                let p = row[*index];
                if p > 0.0 && p < 1.0 {
                    let scaled = p * scale;
                    if scaled > 1.0 {
                        clipped = true;
                    }
                    row[*index] = scaled.min(1.0);
                }
            }
            if !clipped {
                break;
            }
        }
    }

    /// Expected number of `seat`'s cards at each rank, indexed by `Rank::index`.
    pub fn rank_mass(&self, seat: Seat) -> [f32; 15] {
        let mut mass = [0.0f32; 15];
        for card in self.unseen_cards() {
            mass[card.rank.index()] += self.probs[seat.index()][card.id.index()];
        }
        mass
    }

    /// Copies of `rank` neither played nor held by the perspective.
    pub fn unseen_of_rank(&self, rank: Rank) -> usize {
        self.unseen_cards().filter(|card| card.rank == rank).count()
    }

    pub fn infer_hand_structure(&self, seat: Seat) -> HandInference {
        if seat == self.perspective || self.remaining(seat) == 0 {
            return HandInference::EMPTY;
        }
        let mass = self.rank_mass(seat);
        let mut bombs = 0.0;
        let mut triples = 0.0;
        let mut pairs = 0.0;
        for rank in Rank::ORDERED {
            let m = mass[rank.index()];
            let bomb = ((m - 3.0) / 2.0).clamp(0.0, 1.0);
            bombs += bomb;
            triples += (m - 2.0).clamp(0.0, 1.0) * (1.0 - bomb);
            pairs += (m - 1.0).clamp(0.0, 1.0) * (1.0 - bomb);
        }
        if mass[Rank::SmallJoker.index()] + mass[Rank::BigJoker.index()] > 3.5 {
            bombs += 1.0;
        }

        let runnable: Vec<f32> = Rank::ORDERED
            .iter()
            .map(|rank| {
                if self.trump.runs_allow(*rank) {
                    mass[rank.index()].min(1.0)
                } else {
                    0.0
                }
            })
            .collect();
        let straights = runnable
            .windows(5)
            .map(|window| window.iter().product::<f32>())
            .sum::<f32>();

        let control_mass: f32 = self
            .unseen_cards()
            .filter(|card| self.trump.tier(*card) >= CardTier::TrumpRank)
            .map(|card| self.probs[seat.index()][card.id.index()])
            .sum();

        let hand_factor = 1.0 - self.remaining(seat) as f32 / 27.0;
        let progress = self.played_total() as f32 / DECK_SIZE as f32;
        let confidence = (0.5 * hand_factor + 0.5 * progress).clamp(0.0, 1.0);

        HandInference {
            bombs,
            straights,
            triples,
            pairs,
            has_control: control_mass >= 1.0,
            confidence,
        }
    }

    pub fn player_pattern(&self, seat: Seat) -> PlayerPattern {
        self.stats[seat.index()].pattern()
    }

    /// Table-wide bomb estimate over unseen cards.
    pub fn estimate_bomb_count(&self) -> f32 {
        let mut estimate = 0.0;
        for rank in Rank::ORDERED {
            if self.unseen_of_rank(rank) >= 4 {
                estimate += 0.3;
            }
        }
        let jokers = self.unseen_of_rank(Rank::SmallJoker) + self.unseen_of_rank(Rank::BigJoker);
        if jokers == 4 {
            estimate += 0.5;
        }
        estimate
    }

    /// Share of the table-wide estimate proportional to `seat`'s hidden cards.
    pub fn estimate_bomb_count_for(&self, seat: Seat) -> f32 {
        if seat == self.perspective {
            return 0.0;
        }
        let hidden: usize = Seat::LOOP
            .iter()
            .filter(|s| **s != self.perspective)
            .map(|s| self.remaining(*s))
            .sum();
        if hidden == 0 {
            return 0.0;
        }
        self.estimate_bomb_count() * self.remaining(seat) as f32 / hidden as f32
    }
}
