//! Drives AI seats: keeps per-seat trackers in sync, applies the thinking
//! delay, asks the seat's policy for a decision and hands it to a sink.

use crate::policy::{Policy, PolicyContext, StrategyPolicy};
use crate::strategy::{AiConfig, Decision, Move, Personality};
use guandan_core::belief::{CardTracker, TrackerAction};
use guandan_core::game::{GameManager, GameState, PlayError, PlayOutcome};
use guandan_core::model::play::Play;
use guandan_core::model::player::{PersonalityTag, SEATS, Seat};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::array;
use std::time::Duration;
use tracing::debug;

const DELAY_MIN_MS: u64 = 500;
const DELAY_MAX_MS: u64 = 1500;

/// Where simulated thinking time goes.
pub trait ThinkingClock: Send {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepClock;

impl ThinkingClock for SleepClock {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately; keeps a running total for inspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock {
    pub total: Duration,
}

impl ThinkingClock for InstantClock {
    fn pause(&mut self, duration: Duration) {
        self.total += duration;
    }
}

/// Receives exactly one call per AI move.
pub trait MoveSink {
    type Output;

    fn on_play(&mut self, seat: Seat, play: &Play) -> Self::Output;
    fn on_pass(&mut self, seat: Seat) -> Self::Output;
}

impl MoveSink for GameManager {
    type Output = Result<PlayOutcome, PlayError>;

    fn on_play(&mut self, seat: Seat, play: &Play) -> Self::Output {
        self.play_cards(seat, &play.ids())
    }

    fn on_pass(&mut self, seat: Seat) -> Self::Output {
        self.pass(seat)
    }
}

/// Closure pair adapter for callers that just want notifications.
pub struct Callbacks<P, Q> {
    pub on_play: P,
    pub on_pass: Q,
}

impl<P, Q> MoveSink for Callbacks<P, Q>
where
    P: FnMut(Seat, &Play),
    Q: FnMut(Seat),
{
    type Output = ();

    fn on_play(&mut self, seat: Seat, play: &Play) {
        (self.on_play)(seat, play);
    }

    fn on_pass(&mut self, seat: Seat) {
        (self.on_pass)(seat);
    }
}

pub struct AiOrchestrator {
    config: AiConfig,
    policies: [Box<dyn Policy>; SEATS],
    trackers: [Option<CardTracker>; SEATS],
    round: Option<u32>,
    clock: Box<dyn ThinkingClock>,
    rng: SmallRng,
}

impl AiOrchestrator {
    /// One `StrategyPolicy` per seat with the given personalities.
    pub fn new(config: AiConfig, personalities: [PersonalityTag; SEATS], seed: u64) -> Self {
        let policies: [Box<dyn Policy>; SEATS] = array::from_fn(|index| {
            Box::new(StrategyPolicy::new(
                config,
                Personality::from_tag(personalities[index]),
                seed.wrapping_add(index as u64 + 1),
            )) as Box<dyn Policy>
        });
        Self::with_policies(config, policies, seed)
    }

    pub fn with_policies(config: AiConfig, policies: [Box<dyn Policy>; SEATS], seed: u64) -> Self {
        let clock: Box<dyn ThinkingClock> = if config.thinking_delay_enabled {
            Box::new(SleepClock)
        } else {
            Box::new(InstantClock::default())
        };
        Self {
            config,
            policies,
            trackers: array::from_fn(|_| None),
            round: None,
            clock,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn ThinkingClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn policy_name(&self, seat: Seat) -> &'static str {
        self.policies[seat.index()].name()
    }

    pub fn tracker(&self, seat: Seat) -> Option<&CardTracker> {
        self.trackers[seat.index()].as_ref()
    }

    /// Rebuilds every tracker when a new round (or the first one) is seen.
    pub fn sync(&mut self, state: &GameState) {
        if self.round == Some(state.round_number) && self.trackers.iter().all(Option::is_some) {
            return;
        }
        for seat in Seat::LOOP {
            match &mut self.trackers[seat.index()] {
                Some(tracker) => tracker.reset_for_round(state, seat),
                slot => *slot = Some(CardTracker::new(state, seat)),
            }
        }
        self.round = Some(state.round_number);
        debug!(target: "guandan_bot::orchestrator", round = state.round_number, "trackers reset");
    }

    /// Feeds a public action to every seat's tracker.
    pub fn observe_action(&mut self, action: &TrackerAction) {
        for tracker in self.trackers.iter_mut().flatten() {
            tracker.observe(action);
        }
    }

    /// Random base delay scaled by the seat's thinking multiplier, then held
    /// inside 500..=1500ms. Zero when disabled.
    pub fn thinking_delay(&mut self, seat: Seat) -> Duration {
        if !self.config.thinking_delay_enabled {
            return Duration::ZERO;
        }
        let base = self.rng.gen_range(DELAY_MIN_MS..=DELAY_MAX_MS) as f32;
        let scale = self.policies[seat.index()]
            .personality()
            .thinking_time_multiplier
            .max(0.0);
        let scaled = (base * scale) as u64;
        Duration::from_millis(scaled.clamp(DELAY_MIN_MS, DELAY_MAX_MS))
    }

    /// Decides for `seat` against a stable `state` and reports to `sink` once.
    pub fn make_move<S: MoveSink>(
        &mut self,
        seat: Seat,
        state: &GameState,
        sink: &mut S,
    ) -> (Decision, S::Output) {
        self.sync(state);
        let delay = self.thinking_delay(seat);
        if !delay.is_zero() {
            self.clock.pause(delay);
        }
        let ctx = PolicyContext {
            seat,
            state,
            tracker: self.trackers[seat.index()].as_ref(),
        };
        let decision = self.policies[seat.index()].choose(&ctx);
        let output = match &decision.mv {
            Move::Play(play) => sink.on_play(seat, play),
            Move::Pass => sink.on_pass(seat),
        };
        (decision, output)
    }

    /// Plays the current seat's turn on `manager` and records it in every tracker.
    pub fn play_turn(
        &mut self,
        manager: &mut GameManager,
    ) -> Result<(Decision, PlayOutcome), PlayError> {
        let state = manager.state().clone();
        let seat = state.current_player;
        let (decision, result) = self.make_move(seat, &state, manager);
        let outcome = result?;
        let action = match &decision.mv {
            Move::Play(play) => TrackerAction::Played {
                seat,
                play: play.clone(),
            },
            Move::Pass => TrackerAction::Passed { seat },
        };
        self.observe_action(&action);
        Ok((decision, outcome))
    }

    /// Advisory move for `seat`; leaves the game, the trackers and the policy
    /// RNG untouched.
    pub fn get_hint(&self, seat: Seat, state: &GameState) -> Decision {
        let fresh;
        let tracker = match self.trackers[seat.index()].as_ref() {
            Some(tracker) if tracker.round() == state.round_number => tracker,
            _ => {
                fresh = CardTracker::new(state, seat);
                &fresh
            }
        };
        let ctx = PolicyContext {
            seat,
            state,
            tracker: Some(tracker),
        };
        self.policies[seat.index()].hint(&ctx)
    }
}
