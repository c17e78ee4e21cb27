use guandan_bot::{
    AiConfig, AiOrchestrator, InstantClock, Personality, Policy, SimplePolicy, StrategyPolicy,
};
use guandan_core::game::{GameConfig, GameManager, Phase, PlayOutcome};
use guandan_core::model::player::{PersonalityTag, Seat};

const TURN_CAP: usize = 2_000;

fn manager(seed: u64) -> GameManager {
    let mut manager = GameManager::new(GameConfig::with_seed(seed).all_ai()).unwrap();
    manager.start_new_game();
    manager
}

fn play_round(orchestrator: &mut AiOrchestrator, manager: &mut GameManager) -> usize {
    let mut turns = 0;
    while manager.state().phase == Phase::Playing {
        let (_, outcome) = orchestrator.play_turn(manager).expect("AI moves are legal");
        turns += 1;
        assert_eq!(manager.state().card_total(), 108);
        if matches!(outcome, PlayOutcome::RoundWon { .. } | PlayOutcome::GameWon { .. }) {
            break;
        }
        assert!(turns < TURN_CAP, "round did not finish");
    }
    turns
}

#[test]
fn self_play_round_completes_with_legal_moves() {
    let mut manager = manager(101);
    let tags = [
        PersonalityTag::Aggressive,
        PersonalityTag::Conservative,
        PersonalityTag::Cooperative,
        PersonalityTag::Balanced,
    ];
    let mut orchestrator = AiOrchestrator::new(AiConfig::fast().without_mcts(), tags, 7)
        .with_clock(Box::new(InstantClock::default()));
    let turns = play_round(&mut orchestrator, &mut manager);
    assert!(turns > 0);
    assert_eq!(manager.state().phase, Phase::RoundEnd);
    assert!(manager.state().round_winner.is_some());
}

#[test]
fn trackers_follow_round_changes() {
    let mut manager = manager(202);
    let policies: [Box<dyn Policy>; 4] = [
        Box::new(StrategyPolicy::new(AiConfig::fast().without_mcts(), Personality::balanced(), 1)),
        Box::new(SimplePolicy::new(AiConfig::fast().without_mcts(), 2)),
        Box::new(StrategyPolicy::new(AiConfig::fast().without_mcts(), Personality::aggressive(), 3)),
        Box::new(SimplePolicy::new(AiConfig::fast().without_mcts(), 4)),
    ];
    let mut orchestrator = AiOrchestrator::with_policies(AiConfig::fast(), policies, 9);
    assert_eq!(orchestrator.policy_name(Seat(1)), "simple");

    play_round(&mut orchestrator, &mut manager);
    let first_round = orchestrator.tracker(Seat(0)).map(|t| t.round());
    assert_eq!(first_round, Some(1));

    manager.start_next_round().unwrap();
    orchestrator.play_turn(&mut manager).unwrap();
    for seat in Seat::LOOP {
        let tracker = orchestrator.tracker(seat).unwrap();
        assert_eq!(tracker.round(), 2);
        for other in Seat::LOOP.into_iter().filter(|other| *other != seat) {
            let expected = manager.state().hand(other).len() as f32;
            assert!((tracker.row_sum(other) - expected).abs() < 1e-2);
        }
    }
}

#[test]
fn hint_leaves_state_untouched() {
    let manager = manager(303);
    let orchestrator = AiOrchestrator::new(AiConfig::fast(), [PersonalityTag::Balanced; 4], 5);
    let before = manager.state().clone();
    let seat = before.current_player;
    let hint = orchestrator.get_hint(seat, manager.state());
    let play = hint.mv.play().expect("the leader always has a play");
    assert!(manager.state().hand(seat).contains_all(&play.ids()));
    assert_eq!(manager.state().hand_sizes(), before.hand_sizes());
    assert_eq!(manager.state().history, before.history);
    assert!(orchestrator.tracker(seat).is_none());
}

#[test]
fn search_enabled_turns_stay_legal() {
    let mut manager = manager(404);
    let mut orchestrator = AiOrchestrator::new(AiConfig::fast(), [PersonalityTag::Balanced; 4], 6);
    for _ in 0..12 {
        if manager.state().phase != Phase::Playing {
            break;
        }
        orchestrator.play_turn(&mut manager).unwrap();
    }
    assert_eq!(manager.state().card_total(), 108);
}
