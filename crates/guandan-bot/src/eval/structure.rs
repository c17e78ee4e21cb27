//! Greedy decomposition of a hand into plays that cover every card.
//!
//! Extraction order: bombs and four-kings, straight-flushes, plates,
//! triple-pairs, straights, triples (with a spare pair when one exists),
//! pairs, then singles. The number of plays approximates the turns needed
//! to empty the hand.

use guandan_core::model::card::Card;
use guandan_core::model::play::Play;
use guandan_core::model::rank::Rank;
use guandan_core::model::suit::Suit;
use guandan_core::model::trump::TrumpContext;

const STRAIGHT_LEN: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureAnalyzer;

impl StructureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn decompose(&self, cards: &[Card], trump: TrumpContext) -> Vec<Play> {
        let mut pool = Pool::new(cards, trump);
        let mut plays = Vec::new();

        pool.take_four_kings(&mut plays);
        pool.take_bombs(&mut plays);
        for suit in Suit::ORDINARY {
            while pool.take_straight_flush(suit, &mut plays) {}
        }
        while pool.take_run(2, 3, &mut plays) {}
        while pool.take_run(3, 2, &mut plays) {}
        while pool.take_longest_straight(&mut plays) {}
        pool.take_triples(&mut plays);
        pool.take_pairs(&mut plays);
        pool.take_singles(&mut plays);
        plays
    }

    /// Turns needed to empty the hand under the greedy decomposition.
    pub fn turns_needed(&self, cards: &[Card], trump: TrumpContext) -> usize {
        self.decompose(cards, trump).len()
    }
}

/// Remaining cards bucketed by rank, each bucket weakest first.
struct Pool {
    trump: TrumpContext,
    groups: [Vec<Card>; 15],
}

impl Pool {
    fn new(cards: &[Card], trump: TrumpContext) -> Self {
        let mut groups: [Vec<Card>; 15] = Default::default();
        for card in cards {
            groups[card.rank.index()].push(*card);
        }
        for group in groups.iter_mut() {
            trump.sort_cards(group);
        }
        Self { trump, groups }
    }

    fn group(&self, rank: Rank) -> &Vec<Card> {
        &self.groups[rank.index()]
    }

    /// Classifies `cards` and records it; unclassifiable sets fall back to singles.
    fn emit(&self, cards: Vec<Card>, plays: &mut Vec<Play>) {
        match Play::classify(&cards, self.trump) {
            Some(play) => plays.push(play),
            None => plays.extend(
                cards
                    .iter()
                    .filter_map(|card| Play::classify(&[*card], self.trump)),
            ),
        }
    }

    fn remove(&mut self, card: Card) {
        let group = &mut self.groups[card.rank.index()];
        if let Some(index) = group.iter().position(|c| c.id == card.id) {
            group.remove(index);
        }
    }

    fn take_four_kings(&mut self, plays: &mut Vec<Play>) {
        if self.group(Rank::SmallJoker).len() == 2 && self.group(Rank::BigJoker).len() == 2 {
            let mut cards = std::mem::take(&mut self.groups[Rank::SmallJoker.index()]);
            cards.append(&mut self.groups[Rank::BigJoker.index()]);
            self.emit(cards, plays);
        }
    }

    fn take_bombs(&mut self, plays: &mut Vec<Play>) {
        for rank in Rank::ORDERED {
            if self.group(rank).len() >= 4 {
                let cards = std::mem::take(&mut self.groups[rank.index()]);
                self.emit(cards, plays);
            }
        }
    }

    fn take_straight_flush(&mut self, suit: Suit, plays: &mut Vec<Play>) -> bool {
        let present = |pool: &Pool, rank: Rank| {
            pool.trump.runs_allow(rank) && pool.group(rank).iter().any(|c| c.suit == suit)
        };
        let Some(start) = first_run(|rank| present(self, rank), STRAIGHT_LEN) else {
            return false;
        };
        let cards: Vec<Card> = Rank::ORDERED[start..start + STRAIGHT_LEN]
            .iter()
            .filter_map(|rank| self.group(*rank).iter().copied().find(|c| c.suit == suit))
            .collect();
        for card in &cards {
            self.remove(*card);
        }
        self.emit(cards, plays);
        true
    }

    /// Takes the lowest run of `len` ranks holding `per_rank` cards each.
    fn take_run(&mut self, len: usize, per_rank: usize, plays: &mut Vec<Play>) -> bool {
        let eligible =
            |pool: &Pool, rank: Rank| pool.trump.runs_allow(rank) && pool.group(rank).len() >= per_rank;
        let Some(start) = first_run(|rank| eligible(self, rank), len) else {
            return false;
        };
        let mut cards = Vec::with_capacity(len * per_rank);
        for rank in &Rank::ORDERED[start..start + len] {
            cards.extend(self.groups[rank.index()].drain(..per_rank));
        }
        self.emit(cards, plays);
        true
    }

    /// Extracts the longest straight of at least five ranks, one card per rank.
    fn take_longest_straight(&mut self, plays: &mut Vec<Play>) -> bool {
        let present = |rank: Rank| self.trump.runs_allow(rank) && !self.group(rank).is_empty();
        let mut best: Option<(usize, usize)> = None;
        let mut start = 0;
        while start < Rank::ORDERED.len() {
            let len = Rank::ORDERED[start..]
                .iter()
                .take_while(|rank| present(**rank))
                .count();
            if len >= STRAIGHT_LEN && best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((start, len));
            }
            start += len.max(1);
        }
        let Some((start, len)) = best else {
            return false;
        };
        let cards: Vec<Card> = Rank::ORDERED[start..start + len]
            .iter()
            .map(|rank| self.groups[rank.index()].remove(0))
            .collect();
        self.emit(cards, plays);
        true
    }

    fn take_triples(&mut self, plays: &mut Vec<Play>) {
        for rank in Rank::ALL {
            if self.group(rank).len() != 3 {
                continue;
            }
            let mut cards = std::mem::take(&mut self.groups[rank.index()]);
            let spare = Rank::ALL
                .iter()
                .copied()
                .find(|other| *other != rank && self.group(*other).len() == 2);
            if let Some(pair_rank) = spare {
                cards.append(&mut self.groups[pair_rank.index()]);
            }
            self.emit(cards, plays);
        }
    }

    fn take_pairs(&mut self, plays: &mut Vec<Play>) {
        for rank in Rank::ALL {
            if self.group(rank).len() == 2 {
                let cards = std::mem::take(&mut self.groups[rank.index()]);
                self.emit(cards, plays);
            }
        }
    }

    fn take_singles(&mut self, plays: &mut Vec<Play>) {
        for rank in Rank::ALL {
            for card in std::mem::take(&mut self.groups[rank.index()]) {
                self.emit(vec![card], plays);
            }
        }
    }
}

/// Index into `Rank::ORDERED` of the lowest window of `len` ranks all satisfying `ok`.
fn first_run(ok: impl Fn(Rank) -> bool, len: usize) -> Option<usize> {
    let flags: Vec<bool> = Rank::ORDERED.iter().map(|rank| ok(*rank)).collect();
    if len == 0 || len > flags.len() {
        return None;
    }
    (0..=flags.len() - len).find(|start| flags[*start..*start + len].iter().all(|f| *f))
}

#[cfg(test)]
mod tests {
    use super::StructureAnalyzer;
    use guandan_core::model::card::Card;
    use guandan_core::model::deck::Deck;
    use guandan_core::model::play::{Play, PlayKind};
    use guandan_core::model::rank::Rank;
    use guandan_core::model::suit::Suit;
    use guandan_core::model::trump::TrumpContext;
    use std::collections::HashSet;

    const TRUMP: TrumpContext = TrumpContext::new(Rank::Two, Suit::Hearts);

    fn c(rank: Rank, suit: Suit, deck: u8) -> Card {
        Card::new(rank, suit, deck).unwrap()
    }

    fn count_kind(plays: &[Play], kind: PlayKind) -> usize {
        plays.iter().filter(|play| play.kind() == kind).count()
    }

    #[test]
    fn decomposition_covers_every_card_once() {
        let analyzer = StructureAnalyzer::new();
        for seed in 0..8 {
            let hands = Deck::shuffled_with_seed(seed).deal();
            for hand in &hands {
                let plays = analyzer.decompose(hand.cards(), TRUMP);
                let ids: Vec<_> = plays.iter().flat_map(|p| p.ids()).collect();
                let unique: HashSet<_> = ids.iter().copied().collect();
                assert_eq!(ids.len(), hand.len());
                assert_eq!(unique.len(), hand.len());
            }
        }
    }

    #[test]
    fn extracts_bombs_first() {
        let mut cards: Vec<Card> = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts]
            .iter()
            .map(|suit| c(Rank::Nine, *suit, 0))
            .collect();
        cards.push(c(Rank::Four, Suit::Clubs, 0));
        let plays = StructureAnalyzer::new().decompose(&cards, TRUMP);
        assert_eq!(plays[0].kind(), PlayKind::Bomb);
        assert_eq!(plays.len(), 2);
    }

    #[test]
    fn extracts_straight_flush_plate_and_triple_pair() {
        let mut cards: Vec<Card> = [Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven]
            .iter()
            .map(|rank| c(*rank, Suit::Spades, 0))
            .collect();
        for rank in [Rank::Nine, Rank::Ten] {
            for suit in [Suit::Clubs, Suit::Diamonds, Suit::Hearts] {
                cards.push(c(rank, suit, 1));
            }
        }
        for rank in [Rank::Queen, Rank::King, Rank::Ace] {
            cards.push(c(rank, Suit::Clubs, 0));
            cards.push(c(rank, Suit::Diamonds, 0));
        }
        let plays = StructureAnalyzer::new().decompose(&cards, TRUMP);
        assert_eq!(count_kind(&plays, PlayKind::StraightFlush), 1);
        assert_eq!(count_kind(&plays, PlayKind::Plate), 1);
        assert_eq!(count_kind(&plays, PlayKind::TriplePair), 1);
        assert_eq!(plays.len(), 3);
    }

    #[test]
    fn triple_takes_a_spare_pair() {
        let cards = vec![
            c(Rank::Eight, Suit::Clubs, 0),
            c(Rank::Eight, Suit::Spades, 0),
            c(Rank::Eight, Suit::Diamonds, 0),
            c(Rank::Jack, Suit::Clubs, 0),
            c(Rank::Jack, Suit::Spades, 0),
            c(Rank::Three, Suit::Clubs, 0),
        ];
        let plays = StructureAnalyzer::new().decompose(&cards, TRUMP);
        assert_eq!(count_kind(&plays, PlayKind::TripleWithPair), 1);
        assert_eq!(count_kind(&plays, PlayKind::Single), 1);
        assert_eq!(StructureAnalyzer::new().turns_needed(&cards, TRUMP), 2);
    }
}
