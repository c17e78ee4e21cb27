use crate::game::config::{GameConfig, GameConfigError};
use crate::game::snapshot::GameSnapshot;
use crate::game::state::{GameState, HistoryEntry, Phase, TrickAction, TrickEntry};
use crate::game::validator::{PlayError, validate};
use crate::model::card::{CardId, DECK_SIZE};
use crate::model::deck::Deck;
use crate::model::play::{Play, PlayKind};
use crate::model::player::{Seat, Team};
use crate::model::rank::Rank;
use crate::model::trump::TrumpContext;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// What a successful play or pass did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played { kind: PlayKind },
    Passed,
    /// Everyone else passed; `winner` leads the next trick.
    TrickReset { winner: Seat },
    RoundWon { winner: Seat, team: Team, next_level: Rank },
    GameWon { winner: Seat, team: Team },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("next round can only start after a round ends (phase {0:?})")]
    NotAtRoundEnd(Phase),
}

/// Summary of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub level: Rank,
    pub winner: Seat,
    pub team: Team,
    pub plays: usize,
}

/// Owns the authoritative `GameState` and is its only writer.
#[derive(Debug, Clone)]
pub struct GameManager {
    config: GameConfig,
    state: GameState,
    results: Vec<RoundResult>,
    rng: StdRng,
    seed: u64,
}

impl GameManager {
    pub fn new(config: GameConfig) -> Result<Self, GameConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self::build(config, seed))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(GameConfig::with_seed(seed), seed)
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let state = GameState::waiting(
            config.starting_level,
            config.trump_suit,
            config.ai_seats,
            config.personalities,
        );
        Self {
            config,
            state,
            results: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the authoritative state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self, perspective: Option<Seat>) -> GameSnapshot {
        GameSnapshot::capture(&self.state, perspective)
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Resets scores and level, reseeds the deal and starts round one.
    pub fn start_new_game(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.results.clear();
        self.state = GameState::waiting(
            self.config.starting_level,
            self.config.trump_suit,
            self.config.ai_seats,
            self.config.personalities,
        );
        self.deal_round(Seat(0));
        info!(seed = self.seed, level = %self.state.level, "game started");
    }

    /// Deals the next round at the advanced level; the previous round's winner leads.
    pub fn start_next_round(&mut self) -> Result<(), RoundError> {
        if self.state.phase != Phase::RoundEnd {
            return Err(RoundError::NotAtRoundEnd(self.state.phase));
        }
        let leader = self.state.round_winner.unwrap_or(Seat(0));
        self.deal_round(leader);
        Ok(())
    }

    pub fn play_cards(&mut self, seat: Seat, ids: &[CardId]) -> Result<PlayOutcome, PlayError> {
        self.ensure_turn(seat)?;
        let play = validate(
            self.state.player(seat),
            ids,
            self.state.last_play.as_ref(),
            self.state.trump,
        )?;
        let hand = &mut self.state.players[seat.index()].hand;
        hand.remove_all(ids).ok_or(PlayError::IllegalShape)?;
        let kind = play.kind();
        debug!(seat = %seat, play = %play, "play applied");

        self.record(seat, play);
        if self.state.hand(seat).is_empty() {
            return Ok(self.finish_round(seat));
        }
        Ok(self
            .advance_turn(seat)
            .unwrap_or(PlayOutcome::Played { kind }))
    }

    pub fn pass(&mut self, seat: Seat) -> Result<PlayOutcome, PlayError> {
        self.ensure_turn(seat)?;
        if self.state.last_play.is_none() {
            return Err(PlayError::NoLeadToFollow);
        }
        self.state.current_trick.push(TrickEntry {
            seat,
            action: TrickAction::Passed,
        });
        Ok(self.advance_turn(seat).unwrap_or(PlayOutcome::Passed))
    }

    fn ensure_turn(&self, seat: Seat) -> Result<(), PlayError> {
        if self.state.phase != Phase::Playing {
            return Err(PlayError::NotPlaying(self.state.phase));
        }
        if seat != self.state.current_player {
            return Err(PlayError::OutOfTurn {
                expected: self.state.current_player,
                actual: seat,
            });
        }
        Ok(())
    }

    fn record(&mut self, seat: Seat, play: Play) {
        self.state.current_trick.push(TrickEntry {
            seat,
            action: TrickAction::Played(play.clone()),
        });
        self.state.history.push(HistoryEntry {
            seat,
            play: play.clone(),
        });
        self.state.last_play = Some(play);
        self.state.last_play_player = Some(seat);
    }

    /// Moves the turn on; clears the trick when it comes back to the last player who played.
    fn advance_turn(&mut self, seat: Seat) -> Option<PlayOutcome> {
        let next = seat.next();
        self.state.current_player = next;
        let winner = self.state.last_play_player?;
        if winner != next {
            return None;
        }
        self.state.last_play = None;
        self.state.last_play_player = None;
        self.state.current_trick.clear();
        self.state.trick_winners.push(winner);
        debug!(winner = %winner, "trick reset");
        Some(PlayOutcome::TrickReset { winner })
    }

    fn finish_round(&mut self, winner: Seat) -> PlayOutcome {
        let team = winner.team();
        self.state.team_scores[team.index()] += 1;
        self.state.round_winner = Some(winner);
        self.results.push(RoundResult {
            round: self.state.round_number,
            level: self.state.level,
            winner,
            team,
            plays: self.state.history.len(),
        });

        match self.state.level.next_level() {
            Some(next_level) => {
                self.state.level = next_level;
                self.state.phase = Phase::RoundEnd;
                info!(
                    round = self.state.round_number,
                    winner = %winner,
                    team = team.index(),
                    next_level = %next_level,
                    "round won"
                );
                PlayOutcome::RoundWon {
                    winner,
                    team,
                    next_level,
                }
            }
            None => {
                self.state.phase = Phase::GameEnd;
                self.state.game_winner = Some(team);
                info!(
                    round = self.state.round_number,
                    winner = %winner,
                    team = team.index(),
                    scores = ?self.state.team_scores,
                    "game won at level A"
                );
                PlayOutcome::GameWon { winner, team }
            }
        }
    }

    fn deal_round(&mut self, leader: Seat) {
        let mut deck = Deck::shuffled(&mut self.rng);
        let hands = deck.deal();
        for (player, hand) in self.state.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
        let state = &mut self.state;
        state.deck_remaining = deck.len();
        state.trump = TrumpContext::new(state.level, self.config.trump_suit);
        state.phase = Phase::Playing;
        state.current_player = leader;
        state.last_play = None;
        state.last_play_player = None;
        state.current_trick.clear();
        state.history.clear();
        state.trick_winners.clear();
        state.round_winner = None;
        state.round_number += 1;
        debug_assert_eq!(state.card_total(), DECK_SIZE);
        debug!(round = state.round_number, level = %state.level, leader = %leader, "round dealt");
    }
}
