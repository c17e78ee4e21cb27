use guandan_bot::{AiConfig, DecisionReason, Move, Personality, StrategyEngine};
use guandan_core::belief::CardTracker;
use guandan_core::game::GameState;
use guandan_core::model::card::Card;
use guandan_core::model::deck::Deck;
use guandan_core::model::hand::Hand;
use guandan_core::model::play::{Play, PlayKind};
use guandan_core::model::player::Seat;
use guandan_core::model::rank::Rank;
use guandan_core::model::suit::Suit;
use guandan_core::model::trump::TrumpContext;

const TRUMP: TrumpContext = TrumpContext::new(Rank::Two, Suit::Hearts);

fn c(rank: Rank, suit: Suit, deck: u8) -> Card {
    Card::new(rank, suit, deck).unwrap()
}

fn hand(cards: &[(Rank, Suit, u8)]) -> Hand {
    Hand::with_cards(cards.iter().map(|(r, s, d)| c(*r, *s, *d)).collect())
}

/// Plain cards from the second deck, one suit per seat so ids never collide.
fn filler(ranks: &[Rank], suit: Suit) -> Vec<(Rank, Suit, u8)> {
    ranks.iter().map(|r| (*r, suit, 1)).collect()
}

/// `leader` has just played `lead`; `seat` is next to act.
fn following(hands: [Hand; 4], leader: Seat, lead: &[Card], seat: Seat) -> GameState {
    let mut state = GameState::from_hands(hands, TRUMP, seat);
    state.last_play = Play::classify(lead, TRUMP);
    state.last_play_player = Some(leader);
    state
}

fn engine(mcts: bool) -> StrategyEngine {
    let config = if mcts { AiConfig::fast() } else { AiConfig::fast().without_mcts() };
    StrategyEngine::new(config, 11)
}

const LONG: [Rank; 6] = [Rank::Three, Rank::Four, Rank::Five, Rank::Seven, Rank::Eight, Rank::Nine];

#[test]
fn yields_to_a_leading_partner() {
    let mut mine = filler(&LONG, Suit::Spades);
    mine.push((Rank::Ace, Suit::Spades, 0));
    let hands = [
        hand(&filler(&LONG, Suit::Clubs)),
        hand(&filler(&LONG, Suit::Diamonds)),
        hand(&mine),
        hand(&filler(&LONG, Suit::Hearts)),
    ];
    let state = following(hands, Seat(0), &[c(Rank::Six, Suit::Diamonds, 0)], Seat(2));
    let tracker = CardTracker::new(&state, Seat(2));
    let decision = engine(false).decide_move(Seat(2), &state, Some(&tracker), &Personality::default());
    assert_eq!(decision.mv, Move::Pass);
    assert_eq!(decision.reason, DecisionReason::TeammateYield);
}

#[test]
fn finishes_over_partner_with_a_short_hand() {
    let mine = [(Rank::Ace, Suit::Spades, 0)];
    let hands = [
        hand(&filler(&LONG, Suit::Clubs)),
        hand(&filler(&LONG, Suit::Diamonds)),
        hand(&mine),
        hand(&filler(&LONG, Suit::Hearts)),
    ];
    let state = following(hands, Seat(0), &[c(Rank::Six, Suit::Diamonds, 0)], Seat(2));
    let decision = engine(false).decide_move(Seat(2), &state, None, &Personality::default());
    assert_eq!(decision.reason, DecisionReason::TeammateFinish);
    assert_eq!(decision.mv.play().map(Play::len), Some(1));
}

#[test]
fn bombs_an_opponent_about_to_go_out() {
    let mut mine = vec![
        (Rank::Seven, Suit::Clubs, 0),
        (Rank::Seven, Suit::Diamonds, 0),
        (Rank::Seven, Suit::Spades, 0),
        (Rank::Seven, Suit::Clubs, 1),
    ];
    mine.extend(filler(&[Rank::Three, Rank::Four, Rank::Five, Rank::Nine, Rank::Ten, Rank::Jack], Suit::Diamonds));
    let opponent = [(Rank::Four, Suit::Spades, 0), (Rank::Eight, Suit::Diamonds, 0)];
    let hands = [
        hand(&opponent),
        hand(&mine),
        hand(&filler(&LONG, Suit::Spades)),
        hand(&filler(&LONG, Suit::Hearts)),
    ];
    let state = following(hands, Seat(0), &[c(Rank::Ace, Suit::Diamonds, 0)], Seat(1));
    let tracker = CardTracker::new(&state, Seat(1));
    let decision = engine(false).decide_move(Seat(1), &state, Some(&tracker), &Personality::default());
    let play = decision.mv.play().expect("bomb expected");
    assert_eq!(play.kind(), PlayKind::Bomb);
}

#[test]
fn forced_pass_when_nothing_beats_the_lead() {
    let mine = filler(&[Rank::Three, Rank::Four], Suit::Diamonds);
    let hands = [
        hand(&filler(&LONG, Suit::Clubs)),
        hand(&mine),
        hand(&filler(&LONG, Suit::Spades)),
        hand(&filler(&LONG, Suit::Hearts)),
    ];
    let lead = [c(Rank::King, Suit::Spades, 0), c(Rank::King, Suit::Diamonds, 0)];
    let state = following(hands, Seat(0), &lead, Seat(1));
    let tracker = CardTracker::new(&state, Seat(1));
    let decision = engine(true).decide_move(Seat(1), &state, Some(&tracker), &Personality::conservative());
    assert_eq!(decision.reason, DecisionReason::ForcedPass);
}

#[test]
fn heuristic_follow_beats_an_opponent_lead() {
    let state = {
        let hands = Deck::shuffled_with_seed(31).deal();
        let lead = Play::classify(&[c(Rank::Three, Suit::Spades, 1)], TRUMP);
        let mut state = GameState::from_hands(hands, TRUMP, Seat(1));
        state.last_play = lead;
        state.last_play_player = Some(Seat(0));
        state
    };
    let decision = engine(false).decide_move(Seat(1), &state, None, &Personality::default());
    let play = decision.mv.play().expect("a follow exists over a three");
    assert!(state.last_play.as_ref().is_some_and(|last| play.can_beat(last)));
    assert_eq!(decision.reason, DecisionReason::Heuristic);
}

#[test]
fn search_decides_short_endgames() {
    let mine = [(Rank::Queen, Suit::Spades, 0), (Rank::Queen, Suit::Diamonds, 0)];
    let small = [Rank::Three, Rank::Four];
    let hands = [
        hand(&filler(&small, Suit::Clubs)),
        hand(&mine),
        hand(&filler(&small, Suit::Diamonds)),
        hand(&filler(&small, Suit::Spades)),
    ];
    let lead = [c(Rank::Five, Suit::Spades, 0), c(Rank::Five, Suit::Diamonds, 0)];
    let state = following(hands, Seat(0), &lead, Seat(1));
    let decision = engine(true).decide_move(Seat(1), &state, None, &Personality::default());
    assert_eq!(decision.reason, DecisionReason::Mcts);
    assert_eq!(decision.mv.play().map(Play::kind), Some(PlayKind::Pair));
}

#[test]
fn scored_decisions_only_use_owned_cards() {
    for seed in 0..6 {
        let hands = Deck::shuffled_with_seed(seed).deal();
        let mut state = GameState::from_hands(hands, TRUMP, Seat(3));
        state.last_play = Play::classify(&[c(Rank::Six, Suit::Clubs, 1)], TRUMP);
        state.last_play_player = Some(Seat(2));
        let tracker = CardTracker::new(&state, Seat(3));
        for personality in [Personality::aggressive(), Personality::cooperative()] {
            let decision = engine(false).decide_move(Seat(3), &state, Some(&tracker), &personality);
            if let Move::Play(play) = &decision.mv {
                assert!(state.hand(Seat(3)).contains_all(&play.ids()));
            }
        }
    }
}
