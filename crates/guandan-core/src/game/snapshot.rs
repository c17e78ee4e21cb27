use crate::game::state::{GameState, Phase, TrickEntry};
use crate::model::card::Card;
use crate::model::play::Play;
use crate::model::player::{SEATS, Seat, Team};
use crate::model::rank::Rank;
use crate::model::trump::TrumpContext;
use serde::Serialize;

/// Consumer-facing view of the table. Other seats' hands appear only as counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round_number: u32,
    pub current_player: Seat,
    pub level: Rank,
    pub trump: TrumpContext,
    pub team_scores: [u32; 2],
    pub hand_sizes: [usize; SEATS],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_hand: Option<Vec<Card>>,
    pub last_play: Option<Play>,
    pub last_play_player: Option<Seat>,
    pub current_trick: Vec<TrickEntry>,
    pub plays_this_round: usize,
    pub cards_played: usize,
    pub round_winner: Option<Seat>,
    pub game_winner: Option<Team>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, perspective: Option<Seat>) -> Self {
        Self {
            phase: state.phase,
            round_number: state.round_number,
            current_player: state.current_player,
            level: state.level,
            trump: state.trump,
            team_scores: state.team_scores,
            hand_sizes: state.hand_sizes(),
            perspective,
            own_hand: perspective.map(|seat| state.hand(seat).cards().to_vec()),
            last_play: state.last_play.clone(),
            last_play_player: state.last_play_player,
            current_trick: state.current_trick.clone(),
            plays_this_round: state.history.len(),
            cards_played: state.played_count(),
            round_winner: state.round_winner,
            game_winner: state.game_winner,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::manager::GameManager;
    use crate::model::player::Seat;

    #[test]
    fn snapshot_serializes_to_json() {
        let mut manager = GameManager::with_seed(99);
        manager.start_new_game();
        let json = manager.snapshot(None).to_json().unwrap();
        assert!(json.contains("\"phase\": \"playing\""));
        assert!(json.contains("\"round_number\": 1"));
        assert!(!json.contains("\"own_hand\""));
    }

    #[test]
    fn perspective_reveals_only_own_hand() {
        let mut manager = GameManager::with_seed(100);
        manager.start_new_game();
        let snapshot = manager.snapshot(Some(Seat(2)));
        let own = snapshot.own_hand.as_ref().unwrap();
        assert_eq!(own.as_slice(), manager.state().hand(Seat(2)).cards());
        assert_eq!(snapshot.hand_sizes, [27; 4]);
    }
}
