//! Enumeration of the distinct legal plays contained in a set of cards.
//!
//! Two plays with the same kind and the same faces are the same play for
//! every decision the engine makes, so each face multiset appears once.
//! Same-rank sets take the cheapest cards that still carry a given main face.
//! Runs take the cheapest cards below the top rank, once per top face, plus a
//! mixed-suit straight whenever the cheapest picks happen to share a suit.

use crate::model::card::Card;
use crate::model::play::{Play, PlayKind};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trump::TrumpContext;
use std::collections::HashSet;

const MIN_STRAIGHT: usize = 5;
const MIN_PLATE: usize = 2;
const MIN_TRIPLE_PAIR: usize = 3;

/// Every distinct legal play in `cards`, weakest first.
pub fn legal_plays(cards: &[Card], trump: TrumpContext) -> Vec<Play> {
    let groups = group_by_rank(cards, trump);
    let mut out = PlayCollector::new(trump);

    for group in groups.iter().filter(|g| !g.is_empty()) {
        for size in 1..=group.len() {
            for set in same_rank_sets(group, size, trump) {
                out.push(&set);
            }
        }
    }

    // Triple plus pair: every triple variant with the cheapest pair of each other rank.
    for (ti, triples) in groups.iter().enumerate() {
        if triples.len() < 3 {
            continue;
        }
        for triple in same_rank_sets(triples, 3, trump) {
            for (pi, pairs) in groups.iter().enumerate() {
                if pi == ti || pairs.len() < 2 {
                    continue;
                }
                let mut set = triple.clone();
                set.extend_from_slice(&pairs[..2]);
                out.push(&set);
            }
        }
    }

    for window in run_windows(&groups, trump, 1, MIN_STRAIGHT) {
        for set in run_sets(&window, 1, trump) {
            if let Some(mixed) = mixed_suit_variant(&set, &window) {
                out.push(&mixed);
            }
            out.push(&set);
        }
    }
    for window in run_windows(&groups, trump, 3, MIN_PLATE) {
        for set in run_sets(&window, 3, trump) {
            out.push(&set);
        }
    }
    for window in run_windows(&groups, trump, 2, MIN_TRIPLE_PAIR) {
        for set in run_sets(&window, 2, trump) {
            out.push(&set);
        }
    }

    for suit in Suit::ORDINARY {
        let suited: Vec<Card> = cards.iter().copied().filter(|c| c.suit == suit).collect();
        let suited_groups = group_by_rank(&suited, trump);
        for window in run_windows(&suited_groups, trump, 1, MIN_STRAIGHT) {
            let set: Vec<Card> = window.iter().map(|g| g[0]).collect();
            out.push(&set);
        }
    }

    let jokers: Vec<Card> = cards.iter().copied().filter(|c| c.is_joker()).collect();
    if jokers.len() == 4 {
        out.push(&jokers);
    }

    out.finish()
}

/// Legal plays in `cards` that strictly beat `last`, weakest first.
pub fn beating_plays(cards: &[Card], last: &Play) -> Vec<Play> {
    legal_plays(cards, last.trump())
        .into_iter()
        .filter(|play| play.can_beat(last))
        .collect()
}

pub fn lowest_beating_play(cards: &[Card], last: &Play) -> Option<Play> {
    beating_plays(cards, last).into_iter().next()
}

/// Orders plays weakest first.
pub fn sort_weakest_first(plays: &mut [Play]) {
    plays.sort_by_key(|play| play.weakness_key());
}

struct PlayCollector {
    trump: TrumpContext,
    seen: HashSet<(PlayKind, Vec<(Rank, Suit)>)>,
    plays: Vec<Play>,
}

impl PlayCollector {
    fn new(trump: TrumpContext) -> Self {
        Self {
            trump,
            seen: HashSet::new(),
            plays: Vec::new(),
        }
    }

    fn push(&mut self, cards: &[Card]) {
        let Some(play) = Play::classify(cards, self.trump) else {
            return;
        };
        let faces = play.cards().iter().map(|c| (c.rank, c.suit)).collect();
        if self.seen.insert((play.kind(), faces)) {
            self.plays.push(play);
        }
    }

    fn finish(mut self) -> Vec<Play> {
        sort_weakest_first(&mut self.plays);
        self.plays
    }
}

/// Cards bucketed by rank index, each bucket weakest first.
fn group_by_rank(cards: &[Card], trump: TrumpContext) -> [Vec<Card>; 15] {
    let mut groups: [Vec<Card>; 15] = Default::default();
    for card in cards {
        groups[card.rank.index()].push(*card);
    }
    for group in groups.iter_mut() {
        trump.sort_cards(group);
    }
    groups
}

/// `size`-card subsets of one rank group, one per distinct main face.
///
/// Each subset is the main card plus the weakest `size - 1` cards below it.
fn same_rank_sets(group: &[Card], size: usize, trump: TrumpContext) -> Vec<Vec<Card>> {
    let mut sets = Vec::new();
    if size == 0 || group.len() < size {
        return sets;
    }
    for (i, card) in group.iter().enumerate() {
        let last_of_face = group
            .get(i + 1)
            .is_none_or(|next| trump.compare_strength(*next, *card).is_ne());
        if !last_of_face || i + 1 < size {
            continue;
        }
        let mut set = group[..size - 1].to_vec();
        set.push(*card);
        sets.push(set);
    }
    sets
}

/// One run per distinct top face: the cheapest `per_rank` cards of every lower
/// rank, then a top-rank set carrying that face.
fn run_sets(window: &[&Vec<Card>], per_rank: usize, trump: TrumpContext) -> Vec<Vec<Card>> {
    let Some((top, lower)) = window.split_last() else {
        return Vec::new();
    };
    let base: Vec<Card> = lower
        .iter()
        .flat_map(|g| g[..per_rank].iter().copied())
        .collect();
    same_rank_sets(top, per_rank, trump)
        .into_iter()
        .map(|top_set| {
            let mut set = base.clone();
            set.extend(top_set);
            set
        })
        .collect()
}

/// A single-suit straight with its lowest swappable card replaced by an
/// off-suit copy of the same rank.
///
/// `set` holds one card per rank in window order.
fn mixed_suit_variant(set: &[Card], window: &[&Vec<Card>]) -> Option<Vec<Card>> {
    let suit = set.first()?.suit;
    if set.len() != window.len() || set.iter().any(|card| card.suit != suit) {
        return None;
    }
    window.iter().enumerate().find_map(|(i, group)| {
        let off = group.iter().copied().find(|card| card.suit != suit)?;
        let mut mixed = set.to_vec();
        mixed[i] = off;
        Some(mixed)
    })
}

/// Consecutive runs of run-eligible ranks holding at least `per_rank` cards.
fn run_windows<'a>(
    groups: &'a [Vec<Card>; 15],
    trump: TrumpContext,
    per_rank: usize,
    min_len: usize,
) -> Vec<Vec<&'a Vec<Card>>> {
    let mut windows = Vec::new();
    let eligible = |rank: Rank| trump.runs_allow(rank) && groups[rank.index()].len() >= per_rank;
    for (start, first) in Rank::ORDERED.iter().enumerate() {
        if !eligible(*first) {
            continue;
        }
        let mut run = vec![&groups[first.index()]];
        for rank in Rank::ORDERED.iter().skip(start + 1) {
            if !eligible(*rank) {
                break;
            }
            run.push(&groups[rank.index()]);
            if run.len() >= min_len {
                windows.push(run.clone());
            }
        }
    }
    windows
}
