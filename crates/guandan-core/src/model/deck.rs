use crate::model::card::{Card, CardId, DECK_SIZE};
use crate::model::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;

/// Cards dealt to each seat: 108 / 4.
pub const HAND_SIZE: usize = 27;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Both decks in id order: 2 x (52 suited cards + small joker + big joker).
    pub fn standard() -> Self {
        let cards = (0..DECK_SIZE as u8)
            .filter_map(|raw| Card::from_id(CardId(raw)))
            .collect();
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deals round-robin until every seat holds 27 cards; the deck is left empty.
    pub fn deal(&mut self) -> [Hand; 4] {
        let mut piles: [Vec<Card>; 4] = array::from_fn(|_| Vec::with_capacity(HAND_SIZE));
        for (index, card) in self.cards.drain(..).enumerate() {
            piles[index % 4].push(card);
        }
        piles.map(Hand::with_cards)
    }
}
