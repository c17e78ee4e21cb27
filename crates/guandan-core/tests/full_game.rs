use guandan_core::game::{GameManager, Phase, PlayError, PlayOutcome};
use guandan_core::model::legal::{legal_plays, lowest_beating_play};
use guandan_core::model::player::Seat;
use guandan_core::model::rank::Rank;

/// Leads the weakest legal play, follows with the lowest beating play or passes.
fn step(manager: &mut GameManager) -> PlayOutcome {
    let state = manager.state();
    let seat = state.current_player;
    let cards = state.hand(seat).cards().to_vec();
    let choice = match &state.last_play {
        None => legal_plays(&cards, state.trump).into_iter().next(),
        Some(last) => lowest_beating_play(&cards, last),
    };
    match choice {
        Some(play) => manager.play_cards(seat, &play.ids()).expect("legal play"),
        None => manager.pass(seat).expect("pass after a lead"),
    }
}

#[test]
fn seeded_game_runs_to_completion() {
    let mut manager = GameManager::with_seed(2024);
    manager.start_new_game();
    let mut rounds = 0;
    for _ in 0..20_000 {
        match manager.state().phase {
            Phase::GameEnd => break,
            Phase::RoundEnd => {
                rounds += 1;
                manager.start_next_round().expect("round end");
            }
            Phase::Playing => {
                step(&mut manager);
                assert_eq!(manager.state().card_total(), 108);
            }
            Phase::Waiting => unreachable!("game was started"),
        }
    }
    let state = manager.state();
    assert_eq!(state.phase, Phase::GameEnd);
    assert_eq!(rounds, 12, "levels 2 through K end in a round break");
    assert_eq!(state.team_scores.iter().sum::<u32>(), 13);
    assert_eq!(manager.results().len(), 13);
    assert_eq!(manager.results().last().map(|r| r.level), Some(Rank::Ace));
    assert!(state.game_winner.is_some());
}

#[test]
fn round_winner_leads_next_round() {
    let mut manager = GameManager::with_seed(77);
    manager.start_new_game();
    while manager.state().phase == Phase::Playing {
        step(&mut manager);
    }
    let winner = manager.state().round_winner.expect("round winner");
    assert_eq!(manager.state().level, Rank::Three);
    manager.start_next_round().unwrap();
    let state = manager.state();
    assert_eq!(state.current_player, winner);
    assert_eq!(state.trump.rank, Rank::Three);
    assert_eq!(state.hand_sizes(), [27; 4]);
    assert!(state.history.is_empty());
}

#[test]
fn actions_after_round_end_are_rejected() {
    let mut manager = GameManager::with_seed(78);
    manager.start_new_game();
    while manager.state().phase == Phase::Playing {
        step(&mut manager);
    }
    let seat = manager.state().current_player;
    assert_eq!(
        manager.pass(seat),
        Err(PlayError::NotPlaying(Phase::RoundEnd))
    );
}

#[test]
fn trick_resets_only_on_wraparound() {
    let mut manager = GameManager::with_seed(79);
    manager.start_new_game();
    for _ in 0..200 {
        if manager.state().phase != Phase::Playing {
            break;
        }
        let before = manager.state().last_play_player;
        let acting = manager.state().current_player;
        let outcome = step(&mut manager);
        if let PlayOutcome::TrickReset { winner } = outcome {
            assert_eq!(Some(winner), before);
            assert_eq!(acting.next(), winner);
            assert!(manager.state().last_play.is_none());
            assert_eq!(manager.state().current_player, winner);
        }
    }
    assert!(Seat::LOOP.iter().all(|s| manager.state().hand(*s).len() <= 27));
}
