use crate::model::card::{Card, DECK_SIZE};
use crate::model::hand::Hand;
use crate::model::play::Play;
use crate::model::player::{PersonalityTag, Player, SEATS, Seat, Team};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trump::TrumpContext;
use serde::{Deserialize, Serialize};
use std::array;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Playing,
    RoundEnd,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "play", rename_all = "snake_case")]
pub enum TrickAction {
    Played(Play),
    Passed,
}

/// One entry of the current trick log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrickEntry {
    pub seat: Seat,
    pub action: TrickAction,
}

/// A play recorded in the round history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub seat: Seat,
    pub play: Play,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    pub players: [Player; SEATS],
    pub current_player: Seat,
    pub last_play: Option<Play>,
    pub last_play_player: Option<Seat>,
    pub current_trick: Vec<TrickEntry>,
    pub level: Rank,
    pub trump: TrumpContext,
    pub team_scores: [u32; 2],
    /// Plays made this round, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Seat that won each completed trick this round.
    pub trick_winners: Vec<Seat>,
    pub round_number: u32,
    pub round_winner: Option<Seat>,
    pub game_winner: Option<Team>,
    pub deck_remaining: usize,
}

impl GameState {
    /// Empty table waiting for a deal.
    pub fn waiting(
        level: Rank,
        trump_suit: Suit,
        ai_seats: [bool; SEATS],
        personalities: [PersonalityTag; SEATS],
    ) -> Self {
        let players = array::from_fn(|i| Player::new(Seat(i), ai_seats[i], personalities[i]));
        Self {
            phase: Phase::Waiting,
            players,
            current_player: Seat(0),
            last_play: None,
            last_play_player: None,
            current_trick: Vec::new(),
            level,
            trump: TrumpContext::new(level, trump_suit),
            team_scores: [0; 2],
            history: Vec::new(),
            trick_winners: Vec::new(),
            round_number: 0,
            round_winner: None,
            game_winner: None,
            deck_remaining: DECK_SIZE,
        }
    }

    /// Mid-round position built from explicit hands, for analysis and tests.
    pub fn from_hands(hands: [Hand; SEATS], trump: TrumpContext, leader: Seat) -> Self {
        let mut state = Self::waiting(
            trump.rank,
            trump.suit,
            [true; SEATS],
            [PersonalityTag::Balanced; SEATS],
        );
        let dealt: usize = hands.iter().map(Hand::len).sum();
        for (player, hand) in state.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
        state.phase = Phase::Playing;
        state.current_player = leader;
        state.round_number = 1;
        state.deck_remaining = DECK_SIZE.saturating_sub(dealt);
        state
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.players[seat.index()].hand
    }

    pub fn hand_sizes(&self) -> [usize; SEATS] {
        array::from_fn(|i| self.players[i].hand.len())
    }

    pub fn team_card_count(&self, team: Team) -> usize {
        team.seats().iter().map(|seat| self.hand(*seat).len()).sum()
    }

    /// Cards played this round.
    pub fn played_cards(&self) -> impl Iterator<Item = &Card> {
        self.history.iter().flat_map(|entry| entry.play.cards().iter())
    }

    pub fn played_count(&self) -> usize {
        self.history.iter().map(|entry| entry.play.len()).sum()
    }

    /// Hands, history and undealt cards; always 108 within a round.
    pub fn card_total(&self) -> usize {
        self.hand_sizes().iter().sum::<usize>() + self.played_count() + self.deck_remaining
    }

    /// The player to act must lead: nobody has played into the current trick.
    pub fn is_leading(&self) -> bool {
        self.last_play.is_none()
    }

    /// Consecutive completed tricks won by `team`, counted back from the latest.
    pub fn control_streak(&self, team: Team) -> u32 {
        self.trick_winners
            .iter()
            .rev()
            .take_while(|seat| seat.team() == team)
            .count() as u32
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameEnd
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, Phase};
    use crate::model::deck::Deck;
    use crate::model::player::{Seat, Team};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::TrumpContext;

    #[test]
    fn from_hands_accounts_for_every_card() {
        let hands = Deck::shuffled_with_seed(5).deal();
        let trump = TrumpContext::new(Rank::Two, Suit::Hearts);
        let state = GameState::from_hands(hands, trump, Seat(1));
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.card_total(), 108);
        assert_eq!(state.hand_sizes(), [27; 4]);
        assert!(state.is_leading());
    }

    #[test]
    fn control_streak_counts_trailing_team_wins() {
        let mut state = GameState::from_hands(
            Deck::shuffled_with_seed(1).deal(),
            TrumpContext::new(Rank::Two, Suit::Hearts),
            Seat(0),
        );
        state.trick_winners = vec![Seat(1), Seat(0), Seat(2), Seat(0)];
        assert_eq!(state.control_streak(Team::Zero), 3);
        assert_eq!(state.control_streak(Team::One), 0);
    }
}
