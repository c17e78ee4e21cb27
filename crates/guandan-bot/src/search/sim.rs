//! Lightweight simulation state for tree search.
//!
//! Hands are `Rc`-shared: applying a move replaces only the mover's hand, so
//! cloning a node's state costs four reference bumps.

use guandan_core::belief::CardTracker;
use guandan_core::game::GameState;
use guandan_core::model::card::Card;
use guandan_core::model::deck::Deck;
use guandan_core::model::legal::{beating_plays, legal_plays};
use guandan_core::model::play::Play;
use guandan_core::model::player::{SEATS, Seat, Team};
use guandan_core::model::trump::TrumpContext;
use rand::Rng;
use rand::seq::SliceRandom;
use std::array;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimMove {
    Play(Play),
    Pass,
}

#[derive(Debug, Clone)]
pub struct SimState {
    hands: [Rc<Vec<Card>>; SEATS],
    trump: TrumpContext,
    current: Seat,
    last_play: Option<Rc<Play>>,
    last_player: Option<Seat>,
    finished: Option<Team>,
}

impl SimState {
    pub fn new(hands: [Vec<Card>; SEATS], trump: TrumpContext, current: Seat) -> Self {
        let finished = Seat::LOOP
            .iter()
            .find(|seat| hands[seat.index()].is_empty())
            .map(|seat| seat.team());
        Self {
            hands: hands.map(Rc::new),
            trump,
            current,
            last_play: None,
            last_player: None,
            finished,
        }
    }

    /// Fills the hidden hands by sampling unseen cards from the tracker's beliefs.
    ///
    /// `seat`'s own hand is taken from `state`; other seats keep their real sizes.
    pub fn determinize<R: Rng + ?Sized>(
        state: &GameState,
        seat: Seat,
        tracker: Option<&CardTracker>,
        rng: &mut R,
    ) -> Self {
        let sizes = state.hand_sizes();
        let own: Vec<Card> = state.hand(seat).cards().to_vec();
        let mut unseen: Vec<Card> = match tracker {
            Some(tracker) => tracker.unseen_cards().collect(),
            None => {
                let played: Vec<Card> = state.played_cards().copied().collect();
                Deck::standard()
                    .cards()
                    .iter()
                    .copied()
                    .filter(|card| !own.contains(card) && !played.contains(card))
                    .collect()
            }
        };
        unseen.shuffle(rng);

        let mut hands: [Vec<Card>; SEATS] = array::from_fn(|_| Vec::new());
        hands[seat.index()] = own;
        let mut capacity: [usize; SEATS] = sizes;
        capacity[seat.index()] = 0;

        for card in unseen {
            let weights: Vec<(Seat, f32)> = Seat::LOOP
                .iter()
                .filter(|s| capacity[s.index()] > 0)
                .map(|s| {
                    let weight = tracker
                        .map(|t| t.probability(*s, card.id))
                        .unwrap_or(1.0)
                        .max(0.01);
                    (*s, weight)
                })
                .collect();
            if weights.is_empty() {
                break;
            }
            let total: f32 = weights.iter().map(|(_, w)| *w).sum();
            let mut roll = rng.gen_range(0.0..total);
            let mut chosen = weights[weights.len() - 1].0;
            for (candidate, weight) in &weights {
                if roll < *weight {
                    chosen = *candidate;
                    break;
                }
                roll -= weight;
            }
            hands[chosen.index()].push(card);
            capacity[chosen.index()] -= 1;
        }

        let mut sim = Self::new(hands, state.trump, state.current_player);
        sim.last_play = state.last_play.clone().map(Rc::new);
        sim.last_player = state.last_play_player;
        sim
    }

    pub fn current(&self) -> Seat {
        self.current
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn trump(&self) -> TrumpContext {
        self.trump
    }

    pub fn finished(&self) -> Option<Team> {
        self.finished
    }

    pub fn is_terminal(&self) -> bool {
        self.finished.is_some()
    }

    pub fn last_play(&self) -> Option<&Play> {
        self.last_play.as_deref()
    }

    /// Moves available to the current seat; passing is offered whenever a lead exists.
    pub fn legal_moves(&self) -> Vec<SimMove> {
        if self.is_terminal() {
            return Vec::new();
        }
        let hand = self.hand(self.current);
        match self.last_play() {
            None => legal_plays(hand, self.trump)
                .into_iter()
                .map(SimMove::Play)
                .collect(),
            Some(last) => {
                let mut moves: Vec<SimMove> = beating_plays(hand, last)
                    .into_iter()
                    .map(SimMove::Play)
                    .collect();
                moves.push(SimMove::Pass);
                moves
            }
        }
    }

    /// Applies one move; the lead clears when the turn returns to whoever played it.
    ///
    /// Tree expansion and rollouts both step through here, matching the live game.
    pub fn apply(&self, mv: &SimMove) -> SimState {
        let mut next = self.clone();
        let seat = self.current;
        if let SimMove::Play(play) = mv {
            let remaining: Vec<Card> = self
                .hand(seat)
                .iter()
                .copied()
                .filter(|card| !play.cards().iter().any(|p| p.id == card.id))
                .collect();
            if remaining.is_empty() {
                next.finished = Some(seat.team());
            }
            next.hands[seat.index()] = Rc::new(remaining);
            next.last_play = Some(Rc::new(play.clone()));
            next.last_player = Some(seat);
        }
        next.current = seat.next();
        if next.last_player == Some(next.current) {
            next.last_play = None;
            next.last_player = None;
        }
        next
    }

    /// Rollout policy: followers take the lowest beating play, leaders a random legal one.
    pub fn rollout_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SimMove> {
        if self.is_terminal() {
            return None;
        }
        let hand = self.hand(self.current);
        match self.last_play() {
            Some(last) => Some(
                beating_plays(hand, last)
                    .into_iter()
                    .next()
                    .map_or(SimMove::Pass, SimMove::Play),
            ),
            None => legal_plays(hand, self.trump)
                .choose(rng)
                .cloned()
                .map(SimMove::Play),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SimMove, SimState};
    use guandan_core::belief::CardTracker;
    use guandan_core::game::GameState;
    use guandan_core::model::deck::Deck;
    use guandan_core::model::player::Seat;
    use guandan_core::model::rank::Rank;
    use guandan_core::model::suit::Suit;
    use guandan_core::model::trump::TrumpContext;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::rc::Rc;

    const TRUMP: TrumpContext = TrumpContext::new(Rank::Two, Suit::Hearts);

    #[test]
    fn determinized_hands_keep_sizes_and_own_cards() {
        let state = GameState::from_hands(Deck::shuffled_with_seed(12).deal(), TRUMP, Seat(0));
        let tracker = CardTracker::new(&state, Seat(0));
        let mut rng = SmallRng::seed_from_u64(1);
        let sim = SimState::determinize(&state, Seat(0), Some(&tracker), &mut rng);
        for seat in Seat::LOOP {
            assert_eq!(sim.hand(seat).len(), 27);
        }
        assert_eq!(sim.hand(Seat(0)), state.hand(Seat(0)).cards());
    }

    #[test]
    fn apply_shares_untouched_hands() {
        let state = GameState::from_hands(Deck::shuffled_with_seed(13).deal(), TRUMP, Seat(0));
        let mut rng = SmallRng::seed_from_u64(2);
        let sim = SimState::determinize(&state, Seat(0), None, &mut rng);
        let moves = sim.legal_moves();
        assert!(!moves.contains(&SimMove::Pass));
        let next = sim.apply(&moves[0]);
        assert!(Rc::ptr_eq(&sim.hands[2], &next.hands[2]));
        assert!(next.hand(Seat(0)).len() < 27);
        assert_eq!(next.current(), Seat(1));
        assert!(next.legal_moves().contains(&SimMove::Pass));
    }

    #[test]
    fn lead_clears_after_everyone_passes() {
        let state = GameState::from_hands(Deck::shuffled_with_seed(14).deal(), TRUMP, Seat(0));
        let mut rng = SmallRng::seed_from_u64(3);
        let mut sim = SimState::determinize(&state, Seat(0), None, &mut rng);
        let lead = sim.legal_moves().remove(0);
        sim = sim.apply(&lead);
        for _ in 0..3 {
            sim = sim.apply(&SimMove::Pass);
        }
        assert_eq!(sim.current(), Seat(0));
        assert!(sim.last_play().is_none());
    }
}
