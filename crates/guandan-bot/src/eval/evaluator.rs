use guandan_core::model::card::Card;
use guandan_core::model::rank::Rank;
use guandan_core::model::trump::{CardTier, TrumpContext};
use serde::Serialize;

const BOMB_BONUS_PER_EXTRA_CARD: i32 = 20;
const FOUR_KINGS_BONUS: i32 = 100;
const TRUMP_CARD_BONUS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureTag {
    FourKings,
    HasBomb,
    HasTriples,
    PairRich,
    TrumpHeavy,
    ControlRich,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandEvaluation {
    pub score: i32,
    pub bombs: usize,
    /// Jokers, trump-rank cards and aces.
    pub control_cards: usize,
    pub tags: Vec<StructureTag>,
}

impl HandEvaluation {
    pub fn has_tag(&self, tag: StructureTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Static strength score of a hand under a trump context.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn card_value(&self, card: Card, trump: TrumpContext) -> i32 {
        match trump.tier(card) {
            CardTier::BigJoker => 15,
            CardTier::SmallJoker => 12,
            CardTier::LevelTrump => 10,
            CardTier::TrumpRank => 8,
            CardTier::TrumpSuit => base_value(card.rank) + 2,
            CardTier::Plain => base_value(card.rank),
        }
    }

    pub fn evaluate(&self, cards: &[Card], trump: TrumpContext) -> HandEvaluation {
        let mut score = 0;
        let mut counts = [0usize; 15];
        let mut trumpish = 0;
        let mut control_cards = 0;
        for card in cards {
            score += self.card_value(*card, trump);
            counts[card.rank.index()] += 1;
            if trump.is_trumpish(*card) {
                trumpish += 1;
                score += TRUMP_CARD_BONUS;
            }
            if card.is_joker() || card.rank == trump.rank || card.rank == Rank::Ace {
                control_cards += 1;
            }
        }

        let mut bombs = 0;
        for count in counts.iter().copied().filter(|count| *count >= 4) {
            bombs += 1;
            score += BOMB_BONUS_PER_EXTRA_CARD * (count as i32 - 3);
        }
        let four_kings = counts[Rank::SmallJoker.index()] == 2 && counts[Rank::BigJoker.index()] == 2;
        if four_kings {
            bombs += 1;
            score += FOUR_KINGS_BONUS;
        }

        let mut tags = Vec::new();
        if four_kings {
            tags.push(StructureTag::FourKings);
        }
        if counts.iter().any(|count| *count >= 4) {
            tags.push(StructureTag::HasBomb);
        }
        if counts.iter().any(|count| *count == 3) {
            tags.push(StructureTag::HasTriples);
        }
        if counts.iter().filter(|count| **count == 2).count() >= 3 {
            tags.push(StructureTag::PairRich);
        }
        if !cards.is_empty() && trumpish * 3 >= cards.len() {
            tags.push(StructureTag::TrumpHeavy);
        }
        if control_cards >= 4 {
            tags.push(StructureTag::ControlRich);
        }

        HandEvaluation {
            score,
            bombs,
            control_cards,
            tags,
        }
    }
}

fn base_value(rank: Rank) -> i32 {
    match rank {
        Rank::Ace => 6,
        Rank::King => 5,
        Rank::Queen => 4,
        Rank::Jack => 3,
        Rank::Ten => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{HandEvaluator, StructureTag};
    use guandan_core::model::card::Card;
    use guandan_core::model::rank::Rank;
    use guandan_core::model::suit::Suit;
    use guandan_core::model::trump::TrumpContext;

    const TRUMP: TrumpContext = TrumpContext::new(Rank::Five, Suit::Hearts);

    fn c(rank: Rank, suit: Suit, deck: u8) -> Card {
        Card::new(rank, suit, deck).unwrap()
    }

    #[test]
    fn card_values_follow_the_table() {
        let eval = HandEvaluator::new();
        assert_eq!(eval.card_value(c(Rank::BigJoker, Suit::Joker, 0), TRUMP), 15);
        assert_eq!(eval.card_value(c(Rank::SmallJoker, Suit::Joker, 0), TRUMP), 12);
        assert_eq!(eval.card_value(c(Rank::Five, Suit::Hearts, 0), TRUMP), 10);
        assert_eq!(eval.card_value(c(Rank::Five, Suit::Clubs, 0), TRUMP), 8);
        assert_eq!(eval.card_value(c(Rank::King, Suit::Hearts, 0), TRUMP), 7);
        assert_eq!(eval.card_value(c(Rank::Ace, Suit::Spades, 0), TRUMP), 6);
        assert_eq!(eval.card_value(c(Rank::Three, Suit::Spades, 0), TRUMP), 1);
    }

    #[test]
    fn bombs_and_four_kings_add_bonuses() {
        let eval = HandEvaluator::new();
        let sevens: Vec<Card> = [Suit::Clubs, Suit::Diamonds, Suit::Spades]
            .iter()
            .flat_map(|suit| [c(Rank::Seven, *suit, 0), c(Rank::Seven, *suit, 1)])
            .collect();
        let result = eval.evaluate(&sevens, TRUMP);
        assert_eq!(result.bombs, 1);
        assert_eq!(result.score, 6 + 20 * 3);
        assert!(result.has_tag(StructureTag::HasBomb));

        let jokers = vec![
            c(Rank::SmallJoker, Suit::Joker, 0),
            c(Rank::SmallJoker, Suit::Joker, 1),
            c(Rank::BigJoker, Suit::Joker, 0),
            c(Rank::BigJoker, Suit::Joker, 1),
        ];
        let result = eval.evaluate(&jokers, TRUMP);
        assert_eq!(result.score, 12 * 2 + 15 * 2 + 4 + 100);
        assert_eq!(result.control_cards, 4);
        assert!(result.has_tag(StructureTag::FourKings));
        assert!(result.has_tag(StructureTag::ControlRich));
    }

    #[test]
    fn empty_hand_scores_zero() {
        let result = HandEvaluator::new().evaluate(&[], TRUMP);
        assert_eq!(result.score, 0);
        assert!(result.tags.is_empty());
    }
}
