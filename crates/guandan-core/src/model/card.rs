use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of physical cards in play: two 54-card decks.
pub const DECK_SIZE: usize = 108;
const CARDS_PER_DECK: u8 = 54;

/// Identifier unique across both decks, dense in `0..108`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u8);

impl CardId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Builds the card for `rank`/`suit` from deck copy `deck` (0 or 1).
    ///
    /// Returns `None` for impossible combinations such as a suited joker.
    pub fn new(rank: Rank, suit: Suit, deck: u8) -> Option<Self> {
        if deck > 1 || rank.is_joker() != suit.is_joker() {
            return None;
        }
        let local = match rank {
            Rank::SmallJoker => 52,
            Rank::BigJoker => 53,
            _ => suit.index() as u8 * 13 + rank.index() as u8,
        };
        Some(Self {
            id: CardId(deck * CARDS_PER_DECK + local),
            rank,
            suit,
        })
    }

    pub fn from_id(id: CardId) -> Option<Self> {
        if id.index() >= DECK_SIZE {
            return None;
        }
        let local = id.0 % CARDS_PER_DECK;
        let (rank, suit) = match local {
            52 => (Rank::SmallJoker, Suit::Joker),
            53 => (Rank::BigJoker, Suit::Joker),
            _ => (
                Rank::ORDERED[(local % 13) as usize],
                Suit::from_index((local / 13) as usize)?,
            ),
        };
        Some(Self { id, rank, suit })
    }

    /// Which of the two physical decks this card came from.
    pub const fn deck(self) -> u8 {
        self.id.0 / CARDS_PER_DECK
    }

    pub const fn is_joker(self) -> bool {
        self.rank.is_joker()
    }

    /// Same face regardless of which deck the card came from.
    pub fn same_face(self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{}{}", self.rank, self.suit)
        }
    }
}
