use super::{AiConfig, Personality};
use crate::analysis::{ProbabilityAnalyzer, RiskAssessment, RiskLevel};
use crate::eval::HandEvaluator;
use crate::search::{Mcts, SearchLimits, SimMove};
use guandan_core::belief::CardTracker;
use guandan_core::game::GameState;
use guandan_core::model::card::DECK_SIZE;
use guandan_core::model::legal::{beating_plays, legal_plays};
use guandan_core::model::play::{Play, PlayKind};
use guandan_core::model::player::Seat;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

const STRONG_HAND_SCORE: i32 = 120;
const SHORT_HAND: usize = 5;
const NEAR_FINISH: usize = 3;
const CONTROL_RICH: usize = 4;
const MCTS_AGREEMENT_BONUS: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "move", content = "play", rename_all = "snake_case")]
pub enum Move {
    Play(Play),
    Pass,
}

impl Move {
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }

    pub fn play(&self) -> Option<&Play> {
        match self {
            Move::Play(play) => Some(play),
            Move::Pass => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    EmptyHand,
    Lead,
    TeammateYield,
    TeammateFinish,
    ForcedPass,
    Scored,
    LowestRisk,
    Desperate,
    RiskPass,
    Mcts,
    Heuristic,
}

impl DecisionReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionReason::EmptyHand => "empty_hand",
            DecisionReason::Lead => "lead",
            DecisionReason::TeammateYield => "teammate_yield",
            DecisionReason::TeammateFinish => "teammate_finish",
            DecisionReason::ForcedPass => "forced_pass",
            DecisionReason::Scored => "scored",
            DecisionReason::LowestRisk => "lowest_risk",
            DecisionReason::Desperate => "desperate",
            DecisionReason::RiskPass => "risk_pass",
            DecisionReason::Mcts => "mcts",
            DecisionReason::Heuristic => "heuristic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub mv: Move,
    pub reason: DecisionReason,
}

impl Decision {
    fn play(play: Play, reason: DecisionReason) -> Self {
        Self {
            mv: Move::Play(play),
            reason,
        }
    }

    fn pass(reason: DecisionReason) -> Self {
        Self {
            mv: Move::Pass,
            reason,
        }
    }
}

/// Coarse game progress from the share of the deck already played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhaseTag {
    Early,
    Mid,
    Late,
}

impl GamePhaseTag {
    pub fn from_state(state: &GameState) -> Self {
        let held: usize = state.hand_sizes().iter().sum();
        let played = DECK_SIZE.saturating_sub(held) as f32 / DECK_SIZE as f32;
        if played < 0.3 {
            GamePhaseTag::Early
        } else if played < 0.7 {
            GamePhaseTag::Mid
        } else {
            GamePhaseTag::Late
        }
    }

    pub const fn multiplier(self) -> f32 {
        match self {
            GamePhaseTag::Early => 0.9,
            GamePhaseTag::Mid => 1.0,
            GamePhaseTag::Late => 1.2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhaseTag::Early => "early",
            GamePhaseTag::Mid => "mid",
            GamePhaseTag::Late => "late",
        }
    }
}

struct Candidate {
    play: Play,
    risk: RiskAssessment,
    score: f32,
}

/// Chooses a move for one seat from a stable view of the game.
///
/// The engine never mutates `GameState`; with a tracker it scores candidates
/// through a [`ProbabilityAnalyzer`], without one it falls back to fixed rules.
#[derive(Clone)]
pub struct StrategyEngine {
    config: AiConfig,
    evaluator: HandEvaluator,
    rng: SmallRng,
}

impl StrategyEngine {
    pub fn new(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            evaluator: HandEvaluator::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn decide_move(
        &mut self,
        seat: Seat,
        state: &GameState,
        tracker: Option<&CardTracker>,
        personality: &Personality,
    ) -> Decision {
        let phase = GamePhaseTag::from_state(state);
        let decision = self.decide(seat, state, tracker, personality, phase);
        debug!(
            target: "guandan_bot::strategy",
            seat = seat.index(),
            phase = phase.as_str(),
            personality = personality.tag.as_str(),
            hand = state.hand(seat).len(),
            kind = decision.mv.play().map(|p| p.kind().as_str()).unwrap_or("pass"),
            reason = decision.reason.as_str(),
            "decision"
        );
        decision
    }

    fn decide(
        &mut self,
        seat: Seat,
        state: &GameState,
        tracker: Option<&CardTracker>,
        personality: &Personality,
        phase: GamePhaseTag,
    ) -> Decision {
        let hand = state.hand(seat).cards();
        if hand.is_empty() {
            return Decision::pass(DecisionReason::EmptyHand);
        }

        let (last, holder) = match (&state.last_play, state.last_play_player) {
            (Some(last), Some(holder)) if holder != seat => (last, holder),
            _ => return self.choose_lead(seat, state, tracker),
        };

        let beating = beating_plays(hand, last);
        if holder.is_teammate(seat) {
            return self.follow_teammate(seat, state, tracker, beating);
        }
        if beating.is_empty() {
            return Decision::pass(DecisionReason::ForcedPass);
        }

        let mcts = if self.should_search(state, seat, beating.len()) {
            self.run_search(state, seat, tracker)
        } else {
            None
        };

        match tracker {
            Some(tracker) => {
                let analyzer = ProbabilityAnalyzer::new(tracker);
                self.choose_scored(
                    seat,
                    state,
                    &analyzer,
                    personality,
                    phase,
                    beating,
                    mcts.as_ref(),
                )
            }
            None => self.choose_heuristic(seat, state, beating, mcts),
        }
    }

    fn choose_lead(
        &self,
        seat: Seat,
        state: &GameState,
        tracker: Option<&CardTracker>,
    ) -> Decision {
        let hand = state.hand(seat).cards();
        let plays = legal_plays(hand, state.trump);
        if let Some(finisher) = plays.iter().find(|play| play.len() == hand.len()) {
            return Decision::play(finisher.clone(), DecisionReason::Lead);
        }

        let choice = match tracker {
            Some(tracker) => {
                let analyzer = ProbabilityAnalyzer::new(tracker);
                let (bombs, others): (Vec<Play>, Vec<Play>) =
                    plays.into_iter().partition(|play| play.is_bomb());
                let pool = if others.is_empty() { bombs } else { others };
                pool.into_iter()
                    .map(|play| {
                        let score = lead_score(&analyzer, &play, state, seat);
                        (play, score)
                    })
                    .max_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(play, _)| play)
            }
            None => lead_by_ladder(plays),
        };

        match choice {
            Some(play) => Decision::play(play, DecisionReason::Lead),
            None => Decision::pass(DecisionReason::EmptyHand),
        }
    }

    fn follow_teammate(
        &self,
        seat: Seat,
        state: &GameState,
        tracker: Option<&CardTracker>,
        beating: Vec<Play>,
    ) -> Decision {
        let own = state.hand(seat).len();
        let partner = state.hand(seat.partner()).len();
        let finishing = own <= NEAR_FINISH
            || (tracker.is_some() && partner <= NEAR_FINISH && own <= SHORT_HAND);
        if finishing {
            let pick = beating
                .iter()
                .find(|play| play.len() == own)
                .or_else(|| beating.iter().find(|play| !play.is_bomb()))
                .cloned();
            if let Some(play) = pick {
                return Decision::play(play, DecisionReason::TeammateFinish);
            }
        }
        Decision::pass(DecisionReason::TeammateYield)
    }

    fn should_search(&self, state: &GameState, seat: Seat, beating: usize) -> bool {
        if !self.config.mcts_enabled {
            return false;
        }
        let sizes = state.hand_sizes();
        let held: usize = sizes.iter().sum();
        sizes[seat.index()] <= 8
            || sizes.iter().any(|n| *n > 0 && *n <= SHORT_HAND)
            || beating <= 3
            || DECK_SIZE.saturating_sub(held) > 60
    }

    fn run_search(
        &mut self,
        state: &GameState,
        seat: Seat,
        tracker: Option<&CardTracker>,
    ) -> Option<SimMove> {
        let limits = SearchLimits::from_config(&self.config, state.hand(seat).len());
        let mut search = Mcts::new(limits, self.rng.r#gen());
        match search.search(state, seat, tracker) {
            Ok(outcome) => Some(outcome.mv),
            Err(err) => {
                debug!(target: "guandan_bot::strategy", seat = seat.index(), error = %err, "search failed, using heuristics");
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn choose_scored(
        &self,
        seat: Seat,
        state: &GameState,
        analyzer: &ProbabilityAnalyzer<'_>,
        personality: &Personality,
        phase: GamePhaseTag,
        beating: Vec<Play>,
        mcts: Option<&SimMove>,
    ) -> Decision {
        let own = state.hand(seat).len();
        let win = analyzer.win_probability(state, seat);
        let phase_scale = phase.multiplier() * personality.aggression_scale();

        let mut candidates: Vec<Candidate> = beating
            .into_iter()
            .map(|play| {
                let risk = analyzer.evaluate_risk(&play, state, seat);
                let mut score = match risk.level {
                    RiskLevel::Low => 30.0,
                    RiskLevel::Medium => 0.0,
                    RiskLevel::High => -30.0 / personality.risk_tolerance.max(0.1),
                };
                score += win * 20.0;
                let left = own.saturating_sub(play.len());
                if left <= NEAR_FINISH {
                    score += 25.0;
                } else if left <= SHORT_HAND {
                    score += 15.0;
                }
                if play.is_bomb() {
                    score += if analyzer.should_use_bomb(state, seat, &play) {
                        40.0 / personality.bomb_threshold.max(0.1)
                    } else {
                        -40.0 * personality.bomb_threshold
                    };
                }
                if risk.assist > 0.5 {
                    score += 15.0 * personality.teamwork_priority;
                }
                score *= phase_scale;
                if matches!(mcts, Some(SimMove::Play(suggested)) if suggested == &play) {
                    score += MCTS_AGREEMENT_BONUS;
                }
                score -= play.trump().power(play.main_card()) as f32 / 100.0;
                Candidate { play, risk, score }
            })
            .collect();
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let Some(top) = candidates.first() else {
            return Decision::pass(DecisionReason::ForcedPass);
        };
        if top.risk.should_play {
            return Decision::play(top.play.clone(), DecisionReason::Scored);
        }
        let safest = candidates
            .iter()
            .filter(|candidate| candidate.risk.should_play)
            .min_by(|a, b| a.risk.beaten.total_cmp(&b.risk.beaten));
        if let Some(candidate) = safest {
            return Decision::play(candidate.play.clone(), DecisionReason::LowestRisk);
        }
        if own <= SHORT_HAND {
            return Decision::play(top.play.clone(), DecisionReason::Desperate);
        }
        Decision::pass(DecisionReason::RiskPass)
    }

    fn choose_heuristic(
        &self,
        seat: Seat,
        state: &GameState,
        beating: Vec<Play>,
        mcts: Option<SimMove>,
    ) -> Decision {
        match mcts {
            Some(SimMove::Play(play)) => return Decision::play(play, DecisionReason::Mcts),
            Some(SimMove::Pass) => return Decision::pass(DecisionReason::Mcts),
            None => {}
        }
        let hand = state.hand(seat).cards();
        let evaluation = self.evaluator.evaluate(hand, state.trump);
        let strong = evaluation.score >= STRONG_HAND_SCORE
            || hand.len() <= SHORT_HAND
            || evaluation.control_cards >= CONTROL_RICH;
        let pick = if strong {
            beating
                .iter()
                .rev()
                .find(|play| !play.is_bomb())
                .or_else(|| beating.first())
        } else {
            beating.first()
        };
        match pick {
            Some(play) => Decision::play(play.clone(), DecisionReason::Heuristic),
            None => Decision::pass(DecisionReason::ForcedPass),
        }
    }
}

fn lead_score(analyzer: &ProbabilityAnalyzer<'_>, play: &Play, state: &GameState, seat: Seat) -> f32 {
    let risk = match analyzer.evaluate_risk(play, state, seat).level {
        RiskLevel::Low => 20.0,
        RiskLevel::Medium => 5.0,
        RiskLevel::High => -15.0,
    };
    let shape = match play.kind() {
        PlayKind::Straight => 15.0,
        PlayKind::Plate => 14.0,
        PlayKind::TriplePair | PlayKind::TripleWithPair => 12.0,
        PlayKind::StraightFlush => 10.0,
        PlayKind::Triple => 8.0,
        PlayKind::Pair => 6.0,
        PlayKind::Single => 3.0,
        PlayKind::Bomb | PlayKind::FourKings => -30.0,
    };
    risk + shape - play.trump().power(play.main_card()) as f32 / 20.0
}

/// Straight, then triple family, then pair, then single; weakest of the first non-empty tier.
fn lead_by_ladder(plays: Vec<Play>) -> Option<Play> {
    const LADDER: [&[PlayKind]; 4] = [
        &[PlayKind::Straight],
        &[PlayKind::Plate, PlayKind::TripleWithPair, PlayKind::Triple],
        &[PlayKind::TriplePair, PlayKind::Pair],
        &[PlayKind::Single],
    ];
    for tier in LADDER {
        if let Some(play) = plays.iter().find(|play| tier.contains(&play.kind())) {
            return Some(play.clone());
        }
    }
    plays.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::{DecisionReason, GamePhaseTag, Move, StrategyEngine, lead_by_ladder};
    use crate::strategy::{AiConfig, Personality};
    use guandan_core::belief::CardTracker;
    use guandan_core::game::GameState;
    use guandan_core::model::card::Card;
    use guandan_core::model::deck::Deck;
    use guandan_core::model::hand::Hand;
    use guandan_core::model::legal::legal_plays;
    use guandan_core::model::play::{Play, PlayKind};
    use guandan_core::model::player::Seat;
    use guandan_core::model::rank::Rank;
    use guandan_core::model::suit::Suit;
    use guandan_core::model::trump::TrumpContext;

    const TRUMP: TrumpContext = TrumpContext::new(Rank::Two, Suit::Hearts);

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit, 0).unwrap()
    }

    fn engine() -> StrategyEngine {
        StrategyEngine::new(AiConfig::fast().without_mcts(), 9)
    }

    #[test]
    fn phase_tracks_played_share() {
        let fresh = GameState::from_hands(Deck::shuffled_with_seed(1).deal(), TRUMP, Seat(0));
        assert_eq!(GamePhaseTag::from_state(&fresh), GamePhaseTag::Early);
        let hands = [
            Hand::with_cards(vec![c(Rank::Three, Suit::Clubs)]),
            Hand::new(),
            Hand::new(),
            Hand::new(),
        ];
        let late = GameState::from_hands(hands, TRUMP, Seat(0));
        assert_eq!(GamePhaseTag::from_state(&late), GamePhaseTag::Late);
    }

    #[test]
    fn ladder_prefers_straights_then_triples() {
        let cards = vec![
            c(Rank::Three, Suit::Clubs),
            c(Rank::Four, Suit::Clubs),
            c(Rank::Five, Suit::Spades),
            c(Rank::Six, Suit::Clubs),
            c(Rank::Seven, Suit::Diamonds),
            c(Rank::Nine, Suit::Clubs),
            c(Rank::Nine, Suit::Spades),
        ];
        let play = lead_by_ladder(legal_plays(&cards, TRUMP)).unwrap();
        assert_eq!(play.kind(), PlayKind::Straight);

        let pairs = vec![c(Rank::Nine, Suit::Clubs), c(Rank::Nine, Suit::Spades), c(Rank::Four, Suit::Clubs)];
        let play = lead_by_ladder(legal_plays(&pairs, TRUMP)).unwrap();
        assert_eq!(play.kind(), PlayKind::Pair);
    }

    #[test]
    fn leader_finishes_in_one_play_when_possible() {
        let hands = [
            Hand::with_cards(vec![c(Rank::Nine, Suit::Clubs), c(Rank::Nine, Suit::Spades)]),
            Hand::with_cards(vec![c(Rank::Three, Suit::Clubs)]),
            Hand::with_cards(vec![c(Rank::Four, Suit::Clubs)]),
            Hand::with_cards(vec![c(Rank::Five, Suit::Clubs)]),
        ];
        let state = GameState::from_hands(hands, TRUMP, Seat(0));
        let tracker = CardTracker::new(&state, Seat(0));
        let decision = engine().decide_move(Seat(0), &state, Some(&tracker), &Personality::default());
        assert_eq!(decision.reason, DecisionReason::Lead);
        assert_eq!(decision.mv.play().map(Play::len), Some(2));
    }

    #[test]
    fn forced_pass_without_a_beating_play() {
        let hands = [
            Hand::with_cards(vec![c(Rank::Ace, Suit::Clubs), c(Rank::Three, Suit::Spades)]),
            Hand::with_cards(vec![c(Rank::Three, Suit::Clubs), c(Rank::Four, Suit::Spades)]),
            Hand::with_cards(vec![c(Rank::Four, Suit::Clubs)]),
            Hand::with_cards(vec![c(Rank::Five, Suit::Clubs)]),
        ];
        let mut state = GameState::from_hands(hands, TRUMP, Seat(1));
        state.last_play = Play::classify(&[c(Rank::King, Suit::Diamonds)], TRUMP);
        state.last_play_player = Some(Seat(0));
        let decision = engine().decide_move(Seat(1), &state, None, &Personality::default());
        assert_eq!(decision.mv, Move::Pass);
        assert_eq!(decision.reason, DecisionReason::ForcedPass);
    }
}
