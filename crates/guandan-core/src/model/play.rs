use crate::model::card::{Card, CardId};
use crate::model::rank::Rank;
use crate::model::trump::TrumpContext;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    Single,
    Pair,
    Triple,
    TripleWithPair,
    TriplePair,
    Plate,
    Straight,
    StraightFlush,
    Bomb,
    FourKings,
}

impl PlayKind {
    pub const ALL: [PlayKind; 10] = [
        PlayKind::Single,
        PlayKind::Pair,
        PlayKind::Triple,
        PlayKind::TripleWithPair,
        PlayKind::TriplePair,
        PlayKind::Plate,
        PlayKind::Straight,
        PlayKind::StraightFlush,
        PlayKind::Bomb,
        PlayKind::FourKings,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bombs and four-kings outrank every ordinary play.
    pub const fn is_bomb(self) -> bool {
        matches!(self, PlayKind::Bomb | PlayKind::FourKings)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlayKind::Single => "single",
            PlayKind::Pair => "pair",
            PlayKind::Triple => "triple",
            PlayKind::TripleWithPair => "triple_with_pair",
            PlayKind::TriplePair => "triple_pair",
            PlayKind::Plate => "plate",
            PlayKind::Straight => "straight",
            PlayKind::StraightFlush => "straight_flush",
            PlayKind::Bomb => "bomb",
            PlayKind::FourKings => "four_kings",
        }
    }
}

impl fmt::Display for PlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified set of cards. Cards are stored strongest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play {
    kind: PlayKind,
    cards: Vec<Card>,
    main: Card,
    trump: TrumpContext,
}

impl Play {
    /// Classifies `cards` under `trump`; `None` means the shape is illegal.
    pub fn classify(cards: &[Card], trump: TrumpContext) -> Option<Play> {
        if cards.is_empty() || has_duplicate_ids(cards) {
            return None;
        }
        let mut sorted = cards.to_vec();
        sorted.sort_by(|a, b| trump.compare_cards(*b, *a));
        let groups = RankGroups::from_cards(&sorted);
        let n = sorted.len();

        let (kind, main) = if n == 4 && sorted.iter().all(|card| card.is_joker()) {
            (PlayKind::FourKings, sorted[0])
        } else if groups.distinct() == 1 {
            let kind = match n {
                1 => PlayKind::Single,
                2 => PlayKind::Pair,
                3 => PlayKind::Triple,
                _ => PlayKind::Bomb,
            };
            (kind, sorted[0])
        } else if n == 5 && groups.shape() == [2, 3] {
            let triple_rank = groups.rank_with_count(3)?;
            let main = sorted.iter().copied().find(|card| card.rank == triple_rank)?;
            (PlayKind::TripleWithPair, main)
        } else if n >= 5 && groups.all_counts(1) && groups.is_run(trump) {
            let same_suit = sorted.iter().all(|card| card.suit == sorted[0].suit);
            let kind = if same_suit {
                PlayKind::StraightFlush
            } else {
                PlayKind::Straight
            };
            (kind, top_of_run(&sorted, trump)?)
        } else if n >= 6 && groups.all_counts(3) && groups.is_run(trump) {
            (PlayKind::Plate, top_of_run(&sorted, trump)?)
        } else if n >= 6 && groups.all_counts(2) && groups.distinct() >= 3 && groups.is_run(trump)
        {
            (PlayKind::TriplePair, top_of_run(&sorted, trump)?)
        } else {
            return None;
        };

        Some(Play {
            kind,
            cards: sorted,
            main,
            trump,
        })
    }

    pub fn kind(&self) -> PlayKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|card| card.id).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card that decides comparisons between plays of the same shape.
    pub fn main_card(&self) -> Card {
        self.main
    }

    pub fn trump(&self) -> TrumpContext {
        self.trump
    }

    pub fn is_bomb(&self) -> bool {
        self.kind.is_bomb()
    }

    /// `Some(ordering)` when the plays are comparable, `None` otherwise.
    pub fn compare(&self, other: &Play) -> Option<Ordering> {
        use PlayKind::{Bomb, FourKings};
        let trump = self.trump;
        match (self.kind, other.kind) {
            (FourKings, FourKings) => Some(Ordering::Equal),
            (FourKings, _) => Some(Ordering::Greater),
            (_, FourKings) => Some(Ordering::Less),
            (Bomb, Bomb) => Some(
                self.len()
                    .cmp(&other.len())
                    .then_with(|| {
                        trump
                            .rank_power(self.main.rank)
                            .cmp(&trump.rank_power(other.main.rank))
                    }),
            ),
            (Bomb, _) => Some(Ordering::Greater),
            (_, Bomb) => Some(Ordering::Less),
            (a, b) if a == b && self.len() == other.len() => {
                Some(trump.compare_strength(self.main, other.main))
            }
            _ => None,
        }
    }

    /// Strictly higher and comparable.
    pub fn can_beat(&self, other: &Play) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// Same kind and the same faces, ignoring which deck each card came from.
    pub fn same_faces(&self, other: &Play) -> bool {
        self.kind == other.kind
            && self.cards.len() == other.cards.len()
            && self
                .cards
                .iter()
                .zip(other.cards.iter())
                .all(|(a, b)| a.same_face(*b))
    }

    /// Sort key, weakest first: ordinary plays, then bombs by size, then four-kings.
    pub fn weakness_key(&self) -> (u8, usize, u8, usize) {
        let band = match self.kind {
            PlayKind::FourKings => 2,
            PlayKind::Bomb => 1,
            _ => 0,
        };
        let size = if self.kind == PlayKind::Bomb { self.len() } else { 0 };
        (band, size, self.trump.power(self.main), self.len())
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}

fn has_duplicate_ids(cards: &[Card]) -> bool {
    let mut ids: Vec<CardId> = cards.iter().map(|card| card.id).collect();
    ids.sort();
    ids.windows(2).any(|pair| pair[0] == pair[1])
}

/// Highest-ranked card of a run; ties resolved by trump strength.
fn top_of_run(sorted: &[Card], trump: TrumpContext) -> Option<Card> {
    sorted.iter().copied().max_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| trump.compare_cards(*a, *b))
    })
}

/// Per-rank card counts for a candidate play.
struct RankGroups {
    counts: [u8; 15],
}

impl RankGroups {
    fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for card in cards {
            counts[card.rank.index()] += 1;
        }
        Self { counts }
    }

    fn present(&self) -> impl Iterator<Item = (Rank, u8)> + '_ {
        Rank::ALL
            .iter()
            .copied()
            .zip(self.counts.iter().copied())
            .filter(|(_, count)| *count > 0)
    }

    fn distinct(&self) -> usize {
        self.present().count()
    }

    /// Sorted multiset of group sizes.
    fn shape(&self) -> Vec<u8> {
        let mut shape: Vec<u8> = self.present().map(|(_, count)| count).collect();
        shape.sort_unstable();
        shape
    }

    fn all_counts(&self, expected: u8) -> bool {
        self.present().all(|(_, count)| count == expected)
    }

    fn rank_with_count(&self, expected: u8) -> Option<Rank> {
        self.present()
            .find(|(_, count)| *count == expected)
            .map(|(rank, _)| rank)
    }

    /// Consecutive natural ranks, none of them jokers or the trump rank.
    fn is_run(&self, trump: TrumpContext) -> bool {
        let ranks: Vec<Rank> = self.present().map(|(rank, _)| rank).collect();
        if ranks.iter().any(|rank| !trump.runs_allow(*rank)) {
            return false;
        }
        ranks
            .windows(2)
            .all(|pair| pair[1].value() == pair[0].value() + 1)
    }
}
