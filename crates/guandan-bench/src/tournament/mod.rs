use std::array;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use guandan_bot::{AiConfig, AiOrchestrator, InstantClock, Personality, Policy, SimplePolicy, StrategyPolicy};
use guandan_core::game::{
    GameConfig, GameConfigError, GameManager, Phase, PlayError, PlayOutcome, RoundError,
};
use guandan_core::model::player::{SEATS, Seat, Team};
use guandan_core::model::rank::Rank;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event, warn};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs, SeatConfig};
use crate::logging::TELEMETRY_FILE;

/// Plays configured self-play games and writes per-round JSONL rows plus a summary.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

/// A finished round as seen by the runner.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round: u32,
    pub level: Rank,
    pub winner: Seat,
    pub team: Team,
    pub plays: usize,
    pub turns: usize,
}

#[derive(Debug, Serialize)]
struct RoundLogRow<'a> {
    run_id: &'a str,
    game_index: usize,
    game_seed: u64,
    round: u32,
    level: Rank,
    winner: &'a str,
    winner_seat: usize,
    team: usize,
    plays: usize,
    turns: usize,
    team_scores: [u32; 2],
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("game {game}: rejected move: {source}")]
    Play {
        game: usize,
        #[source]
        source: PlayError,
    },
    #[error("game {game}: {source}")]
    Round {
        game: usize,
        #[source]
        source: RoundError,
    },
    #[error(transparent)]
    Config(#[from] GameConfigError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error("expected {expected} seats, found {found}")]
    SeatCount { expected: usize, found: usize },
}

impl TournamentRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.seats.len() != SEATS {
            return Err(RunnerError::SeatCount {
                expected: SEATS,
                found: config.seats.len(),
            });
        }
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    /// Execute every game, streaming one JSONL row per finished round.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            rows_written +=
                self.play_game(game_index, game_seed, &mut writer, &mut analytics)?;
        }
        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md, &self.config.run_id)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.telemetry_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: self.config.games.count,
            rounds_played: summary.rounds,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        game_seed: u64,
        writer: &mut BufWriter<File>,
        analytics: &mut AnalyticsCollector,
    ) -> Result<usize, RunnerError> {
        let mut game_config = GameConfig::with_seed(game_seed).all_ai();
        game_config.starting_level = self.config.games.starting_level;
        game_config.personalities = array::from_fn(|i| self.config.seats[i].personality);

        let mut manager = GameManager::new(game_config)?;
        manager.start_new_game();

        let mut orchestrator = build_orchestrator(&self.config.seats, game_seed)
            .with_clock(Box::new(InstantClock::default()));

        let mut rows = 0usize;
        let mut turns = 0usize;
        let mut round_turns = 0usize;

        loop {
            match manager.state().phase {
                Phase::GameEnd => break,
                Phase::RoundEnd => {
                    manager
                        .start_next_round()
                        .map_err(|source| RunnerError::Round {
                            game: game_index,
                            source,
                        })?;
                    round_turns = 0;
                    continue;
                }
                Phase::Waiting | Phase::Playing => {}
            }

            if turns >= self.config.games.max_turns {
                warn!(
                    target: "guandan_bench::game",
                    run_id = %self.config.run_id,
                    game_index,
                    turns,
                    "turn cap reached; game abandoned"
                );
                analytics.record_game(None);
                return Ok(rows);
            }

            let seat = manager.state().current_player;
            let start = Instant::now();
            let (decision, outcome) =
                orchestrator
                    .play_turn(&mut manager)
                    .map_err(|source| RunnerError::Play {
                        game: game_index,
                        source,
                    })?;
            let elapsed = start.elapsed();
            turns += 1;
            round_turns += 1;
            analytics.record_decision(seat.index(), elapsed, &decision);

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                let shown = decision
                    .mv
                    .play()
                    .map(|play| play.to_string())
                    .unwrap_or_else(|| "pass".to_string());
                event!(
                    target: "guandan_bench::play",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    round = manager.state().round_number,
                    seat = %seat,
                    policy = orchestrator.policy_name(seat),
                    reason = decision.reason.as_str(),
                    mv = %shown,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0
                );
            }

            if let PlayOutcome::RoundWon { .. } | PlayOutcome::GameWon { .. } = outcome {
                if let Some(result) = manager.results().last() {
                    let round = RoundOutcome {
                        round: result.round,
                        level: result.level,
                        winner: result.winner,
                        team: result.team,
                        plays: result.plays,
                        turns: round_turns,
                    };
                    analytics.record_round(&round);
                    write_round_row(
                        writer,
                        &self.config,
                        game_index,
                        game_seed,
                        &round,
                        manager.state().team_scores,
                    )?;
                    rows += 1;
                }
            }

            if let PlayOutcome::GameWon { team, .. } = outcome {
                analytics.record_game(Some(team));
            }
        }

        Ok(rows)
    }
}

fn build_orchestrator(seats: &[SeatConfig], seed: u64) -> AiOrchestrator {
    let base = AiConfig {
        thinking_delay_enabled: false,
        ..AiConfig::fast()
    };
    let policies: [Box<dyn Policy>; SEATS] = array::from_fn(|index| {
        let seat = &seats[index];
        let config = AiConfig {
            mcts_enabled: seat.mcts,
            ..base
        };
        let policy_seed = seed.wrapping_add(index as u64 + 1);
        if seat.analyzer {
            Box::new(StrategyPolicy::new(
                config,
                Personality::from_tag(seat.personality),
                policy_seed,
            )) as Box<dyn Policy>
        } else {
            Box::new(SimplePolicy::new(config, policy_seed)) as Box<dyn Policy>
        }
    });
    AiOrchestrator::with_policies(base, policies, seed)
}

fn write_round_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &RoundOutcome,
    team_scores: [u32; 2],
) -> Result<(), RunnerError> {
    let winner_name = config
        .seats
        .get(outcome.winner.index())
        .map(|seat| seat.name.as_str())
        .unwrap_or("");
    let row = RoundLogRow {
        run_id: &config.run_id,
        game_index,
        game_seed,
        round: outcome.round,
        level: outcome.level,
        winner: winner_name,
        winner_seat: outcome.winner.index(),
        team: outcome.team.index(),
        plays: outcome.plays,
        turns: outcome.turns,
        team_scores,
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
