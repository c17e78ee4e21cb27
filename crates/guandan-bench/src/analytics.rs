use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use guandan_bot::{Decision, Move};
use guandan_core::model::player::Team;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{BenchmarkConfig, SEAT_COUNT, SeatConfig};
use crate::tournament::RoundOutcome;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Running tallies for one run.
pub struct AnalyticsCollector {
    seats: Vec<SeatAccumulator>,
    team_rounds: [usize; 2],
    team_games: [usize; 2],
    unfinished_games: usize,
    rounds: usize,
    plays: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            seats: config.seats.iter().cloned().map(SeatAccumulator::new).collect(),
            team_rounds: [0; 2],
            team_games: [0; 2],
            unfinished_games: 0,
            rounds: 0,
            plays: 0,
        }
    }

    pub fn record_decision(&mut self, seat: usize, elapsed: Duration, decision: &Decision) {
        if let Some(acc) = self.seats.get_mut(seat) {
            acc.record(elapsed, decision);
        }
    }

    pub fn record_round(&mut self, outcome: &RoundOutcome) {
        self.rounds += 1;
        self.plays += outcome.plays;
        self.team_rounds[outcome.team.index()] += 1;
        if let Some(acc) = self.seats.get_mut(outcome.winner.index()) {
            acc.rounds_won += 1;
        }
    }

    pub fn record_game(&mut self, winner: Option<Team>) {
        match winner {
            Some(team) => self.team_games[team.index()] += 1,
            None => self.unfinished_games += 1,
        }
    }

    pub fn finalize(self) -> AnalyticsSummary {
        let rounds = self.rounds;
        let team_zero_rate = if rounds == 0 {
            0.0
        } else {
            self.team_rounds[0] as f64 / rounds as f64
        };
        AnalyticsSummary {
            rounds,
            avg_plays_per_round: if rounds == 0 {
                0.0
            } else {
                self.plays as f64 / rounds as f64
            },
            team_rounds: self.team_rounds,
            team_games: self.team_games,
            unfinished_games: self.unfinished_games,
            team_zero_round_rate: team_zero_rate,
            p_value: two_sided_p_value(self.team_rounds[0], rounds),
            seats: self.seats.into_iter().map(SeatAccumulator::into_report).collect(),
        }
    }
}

struct SeatAccumulator {
    config: SeatConfig,
    decisions: usize,
    passes: usize,
    bombs: usize,
    total: Duration,
    rounds_won: usize,
    reasons: BTreeMap<&'static str, usize>,
}

impl SeatAccumulator {
    fn new(config: SeatConfig) -> Self {
        Self {
            config,
            decisions: 0,
            passes: 0,
            bombs: 0,
            total: Duration::ZERO,
            rounds_won: 0,
            reasons: BTreeMap::new(),
        }
    }

    fn record(&mut self, elapsed: Duration, decision: &Decision) {
        self.decisions += 1;
        self.total += elapsed;
        match &decision.mv {
            Move::Pass => self.passes += 1,
            Move::Play(play) if play.is_bomb() => self.bombs += 1,
            Move::Play(_) => {}
        }
        *self.reasons.entry(decision.reason.as_str()).or_default() += 1;
    }

    fn into_report(self) -> SeatReport {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / self.decisions as f64
        };
        SeatReport {
            name: self.config.name,
            personality: self.config.personality.as_str(),
            analyzer: self.config.analyzer,
            mcts: self.config.mcts,
            decisions: self.decisions,
            pass_rate: if self.decisions == 0 {
                0.0
            } else {
                self.passes as f64 / self.decisions as f64
            },
            bombs: self.bombs,
            rounds_won: self.rounds_won,
            avg_ms_per_decision: avg_ms,
            reasons: self.reasons,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatReport {
    pub name: String,
    pub personality: &'static str,
    pub analyzer: bool,
    pub mcts: bool,
    pub decisions: usize,
    pub pass_rate: f64,
    pub bombs: usize,
    pub rounds_won: usize,
    pub avg_ms_per_decision: f64,
    pub reasons: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub rounds: usize,
    pub avg_plays_per_round: f64,
    pub team_rounds: [usize; 2],
    pub team_games: [usize; 2],
    pub unfinished_games: usize,
    pub team_zero_round_rate: f64,
    /// Two-sided normal-approximation p-value against an even split.
    pub p_value: f64,
    pub seats: Vec<SeatReport>,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str) -> Result<(), AnalyticsError> {
        let mut out = String::new();
        out.push_str(&format!("# Self-play Summary: {run_id}\n\n"));
        out.push_str(&format!(
            "Rounds: {} (avg {:.1} plays per round)\n\n",
            self.rounds, self.avg_plays_per_round
        ));
        out.push_str("| Team | Seats | Rounds won | Games won |\n");
        out.push_str("|------|-------|------------|-----------|\n");
        for team in [Team::Zero, Team::One] {
            let seats = team
                .seats()
                .iter()
                .filter_map(|seat| self.seats.get(seat.index()))
                .map(|seat| seat.name.as_str())
                .collect::<Vec<_>>()
                .join(" + ");
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                team.index(),
                seats,
                self.team_rounds[team.index()],
                self.team_games[team.index()],
            ));
        }
        out.push_str(&format!(
            "\nTeam 0 round win rate: {:.1}% (p = {:.3} vs 50%)",
            self.team_zero_round_rate * 100.0,
            self.p_value
        ));
        if self.unfinished_games > 0 {
            out.push_str(&format!(
                "; {} game(s) hit the turn cap",
                self.unfinished_games
            ));
        }
        out.push_str("\n\n");

        out.push_str("| Seat | Name | Personality | Analyzer | MCTS | Decisions | Pass % | Bombs | Rounds won | Avg ms/decision |\n");
        out.push_str("|------|------|-------------|----------|------|-----------|--------|-------|------------|-----------------|\n");
        for (index, seat) in self.seats.iter().enumerate().take(SEAT_COUNT) {
            out.push_str(&format!(
                "| {index} | {name} | {personality} | {analyzer} | {mcts} | {decisions} | {pass:.1}% | {bombs} | {won} | {ms:.2} |\n",
                name = seat.name,
                personality = seat.personality,
                analyzer = if seat.analyzer { "Yes" } else { "No" },
                mcts = if seat.mcts { "Yes" } else { "No" },
                decisions = seat.decisions,
                pass = seat.pass_rate * 100.0,
                bombs = seat.bombs,
                won = seat.rounds_won,
                ms = seat.avg_ms_per_decision,
            ));
        }

        fs::write(path.as_ref(), out).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

fn two_sided_p_value(successes: usize, trials: usize) -> f64 {
    if trials == 0 {
        return 1.0;
    }
    let n = trials as f64;
    let z = (successes as f64 - n * 0.5).abs() / (n * 0.25).sqrt();
    match Normal::new(0.0, 1.0) {
        Ok(normal) => (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::two_sided_p_value;

    #[test]
    fn even_split_is_not_significant() {
        assert!((two_sided_p_value(50, 100) - 1.0).abs() < 1e-9);
        assert_eq!(two_sided_p_value(0, 0), 1.0);
    }

    #[test]
    fn lopsided_split_is_significant() {
        let p = two_sided_p_value(80, 100);
        assert!(p < 0.001, "p = {p}");
        assert!((two_sided_p_value(20, 100) - p).abs() < 1e-12);
    }
}
