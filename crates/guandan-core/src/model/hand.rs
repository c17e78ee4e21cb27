use crate::model::card::{Card, CardId};
use serde::Serialize;
use std::vec::Vec;

/// Cards held by one seat, kept in natural (rank, suit, id) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Removes every id or none of them.
    pub fn remove_all(&mut self, ids: &[CardId]) -> Option<Vec<Card>> {
        if !self.contains_all(ids) {
            return None;
        }
        let removed = ids.iter().filter_map(|id| self.remove(*id)).collect();
        Some(removed)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    pub fn contains_all(&self, ids: &[CardId]) -> bool {
        let mut seen: Vec<CardId> = Vec::with_capacity(ids.len());
        for id in ids {
            if seen.contains(id) || !self.contains(*id) {
                return false;
            }
            seen.push(*id);
        }
        true
    }

    pub fn get(&self, id: CardId) -> Option<Card> {
        self.cards.iter().copied().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then(a.suit.cmp(&b.suit))
                .then(a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::{Card, CardId};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn card(rank: Rank, suit: Suit, deck: u8) -> Card {
        Card::new(rank, suit, deck).unwrap()
    }

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let three = card(Rank::Three, Suit::Clubs, 0);
        hand.add(three);
        assert!(hand.contains(three.id));
        assert_eq!(hand.remove(three.id), Some(three));
        assert!(!hand.contains(three.id));
    }

    #[test]
    fn cards_are_sorted_by_rank_then_suit() {
        let hand = Hand::with_cards(vec![
            card(Rank::King, Suit::Spades, 0),
            card(Rank::Two, Suit::Hearts, 1),
            card(Rank::Two, Suit::Clubs, 0),
        ]);
        let ordered: Vec<_> = hand.iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(
            ordered,
            vec![
                (Rank::Two, Suit::Clubs),
                (Rank::Two, Suit::Hearts),
                (Rank::King, Suit::Spades)
            ]
        );
    }

    #[test]
    fn remove_all_is_all_or_nothing() {
        let a = card(Rank::Four, Suit::Clubs, 0);
        let b = card(Rank::Four, Suit::Clubs, 1);
        let mut hand = Hand::with_cards(vec![a, b]);
        assert!(hand.remove_all(&[a.id, CardId(99)]).is_none());
        assert_eq!(hand.len(), 2);
        assert!(hand.remove_all(&[a.id, a.id]).is_none());
        assert_eq!(hand.remove_all(&[a.id, b.id]).map(|v| v.len()), Some(2));
        assert!(hand.is_empty());
    }
}
