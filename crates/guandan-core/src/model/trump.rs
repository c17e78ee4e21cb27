//! Card strength under the round's trump rank and trump suit.
//!
//! Ordering, strongest first: big joker, small joker, trump rank of the trump
//! suit, other trump-rank cards (by suit), trump-suit cards (by rank), then
//! plain cards by rank and suit.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrumpContext {
    pub rank: Rank,
    pub suit: Suit,
}

/// Coarse strength bands, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardTier {
    Plain,
    TrumpSuit,
    TrumpRank,
    LevelTrump,
    SmallJoker,
    BigJoker,
}

impl TrumpContext {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn tier(&self, card: Card) -> CardTier {
        match card.rank {
            Rank::BigJoker => CardTier::BigJoker,
            Rank::SmallJoker => CardTier::SmallJoker,
            rank if rank == self.rank && card.suit == self.suit => CardTier::LevelTrump,
            rank if rank == self.rank => CardTier::TrumpRank,
            _ if card.suit == self.suit => CardTier::TrumpSuit,
            _ => CardTier::Plain,
        }
    }

    /// Strength key; equal keys mean the same face.
    pub fn strength(&self, card: Card) -> (CardTier, u8, u8) {
        match self.tier(card) {
            CardTier::TrumpRank => (CardTier::TrumpRank, card.suit as u8, 0),
            CardTier::TrumpSuit => (CardTier::TrumpSuit, card.rank.value(), 0),
            CardTier::Plain => (CardTier::Plain, card.rank.value(), card.suit as u8),
            tier => (tier, 0, 0),
        }
    }

    /// Single scalar in `0..=100` used by heuristics that want a number.
    pub fn power(&self, card: Card) -> u8 {
        match self.tier(card) {
            CardTier::BigJoker => 100,
            CardTier::SmallJoker => 95,
            CardTier::LevelTrump => 90,
            CardTier::TrumpRank => 80 + card.suit as u8,
            CardTier::TrumpSuit => 60 + card.rank.value(),
            CardTier::Plain => card.rank.value() * 4 + card.suit as u8,
        }
    }

    /// Rank order with the trump rank just above Ace; suit plays no part.
    pub fn rank_power(&self, rank: Rank) -> u8 {
        if rank.is_joker() {
            rank.value() + 1
        } else if rank == self.rank {
            Rank::Ace.value() + 1
        } else {
            rank.value()
        }
    }

    /// Strength comparison ignoring deck copy.
    pub fn compare_strength(&self, a: Card, b: Card) -> Ordering {
        self.strength(a).cmp(&self.strength(b))
    }

    /// Strict total order over distinct cards: strength, then id.
    pub fn compare_cards(&self, a: Card, b: Card) -> Ordering {
        self.compare_strength(a, b).then(a.id.cmp(&b.id))
    }

    /// Sorts weakest first.
    pub fn sort_cards(&self, cards: &mut [Card]) {
        cards.sort_by(|a, b| self.compare_cards(*a, *b));
    }

    pub fn is_trumpish(&self, card: Card) -> bool {
        self.tier(card) != CardTier::Plain
    }

    /// Whether `rank` may appear in straights, plates and triple-pairs.
    pub fn runs_allow(&self, rank: Rank) -> bool {
        !rank.is_joker() && rank != self.rank
    }
}

#[cfg(test)]
mod tests {
    use super::{CardTier, TrumpContext};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use std::cmp::Ordering;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit, 0).unwrap()
    }

    #[test]
    fn tiers_follow_trump_context() {
        let trump = TrumpContext::new(Rank::Five, Suit::Hearts);
        assert_eq!(trump.tier(card(Rank::Five, Suit::Hearts)), CardTier::LevelTrump);
        assert_eq!(trump.tier(card(Rank::Five, Suit::Clubs)), CardTier::TrumpRank);
        assert_eq!(trump.tier(card(Rank::Two, Suit::Hearts)), CardTier::TrumpSuit);
        assert_eq!(trump.tier(card(Rank::Ace, Suit::Spades)), CardTier::Plain);
        assert_eq!(
            trump.tier(Card::new(Rank::BigJoker, Suit::Joker, 1).unwrap()),
            CardTier::BigJoker
        );
    }

    #[test]
    fn trump_rank_outranks_aces_and_jokers_outrank_all() {
        let trump = TrumpContext::new(Rank::Seven, Suit::Spades);
        let seven = card(Rank::Seven, Suit::Clubs);
        let ace = card(Rank::Ace, Suit::Diamonds);
        let small = Card::new(Rank::SmallJoker, Suit::Joker, 0).unwrap();
        assert_eq!(trump.compare_strength(seven, ace), Ordering::Greater);
        assert_eq!(trump.compare_strength(small, seven), Ordering::Greater);
    }

    #[test]
    fn compare_cards_is_a_strict_total_order() {
        let trump = TrumpContext::new(Rank::Ten, Suit::Diamonds);
        let deck = Deck::standard();
        let cards = deck.cards();
        for a in cards.iter().step_by(7) {
            assert_eq!(trump.compare_cards(*a, *a), Ordering::Equal);
            for b in cards.iter().step_by(5) {
                let ab = trump.compare_cards(*a, *b);
                let ba = trump.compare_cards(*b, *a);
                assert_eq!(ab, ba.reverse());
                if a.id != b.id {
                    assert_ne!(ab, Ordering::Equal);
                }
                for c in cards.iter().step_by(11) {
                    if ab == Ordering::Less && trump.compare_cards(*b, *c) == Ordering::Less {
                        assert_eq!(trump.compare_cards(*a, *c), Ordering::Less);
                    }
                }
            }
        }
    }

    #[test]
    fn sort_is_idempotent() {
        let trump = TrumpContext::new(Rank::Two, Suit::Hearts);
        let mut cards = Deck::shuffled_with_seed(3).cards().to_vec();
        trump.sort_cards(&mut cards);
        let once = cards.clone();
        trump.sort_cards(&mut cards);
        assert_eq!(once, cards);
    }

    #[test]
    fn power_agrees_with_strength_order() {
        let trump = TrumpContext::new(Rank::Jack, Suit::Clubs);
        let mut cards = Deck::standard().cards().to_vec();
        trump.sort_cards(&mut cards);
        for pair in cards.windows(2) {
            assert!(trump.power(pair[0]) <= trump.power(pair[1]));
        }
    }
}
