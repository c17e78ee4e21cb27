use crate::strategy::{AiConfig, Decision, Personality, StrategyEngine};
use guandan_core::belief::CardTracker;
use guandan_core::game::GameState;
use guandan_core::model::player::Seat;

/// What a policy may look at for one decision.
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub state: &'a GameState,
    /// The deciding seat's own belief state, when one is kept.
    pub tracker: Option<&'a CardTracker>,
}

/// Unified interface for seat controllers.
pub trait Policy: Send {
    fn choose(&mut self, ctx: &PolicyContext<'_>) -> Decision;

    /// The move `choose` would make now, leaving the policy's own state as it was.
    fn hint(&self, ctx: &PolicyContext<'_>) -> Decision;

    fn name(&self) -> &'static str;

    fn personality(&self) -> Personality {
        Personality::default()
    }
}

/// Full engine: tracker-driven scoring plus optional search.
pub struct StrategyPolicy {
    engine: StrategyEngine,
    personality: Personality,
}

impl StrategyPolicy {
    pub fn new(config: AiConfig, personality: Personality, seed: u64) -> Self {
        Self {
            engine: StrategyEngine::new(config, seed),
            personality,
        }
    }
}

impl Policy for StrategyPolicy {
    fn choose(&mut self, ctx: &PolicyContext<'_>) -> Decision {
        self.engine
            .decide_move(ctx.seat, ctx.state, ctx.tracker, &self.personality)
    }

    fn hint(&self, ctx: &PolicyContext<'_>) -> Decision {
        self.engine
            .clone()
            .decide_move(ctx.seat, ctx.state, ctx.tracker, &self.personality)
    }

    fn name(&self) -> &'static str {
        "strategy"
    }

    fn personality(&self) -> Personality {
        self.personality
    }
}

/// Rule-based fallback that never consults a tracker.
pub struct SimplePolicy {
    engine: StrategyEngine,
}

impl SimplePolicy {
    pub fn new(config: AiConfig, seed: u64) -> Self {
        Self {
            engine: StrategyEngine::new(config, seed),
        }
    }
}

impl Policy for SimplePolicy {
    fn choose(&mut self, ctx: &PolicyContext<'_>) -> Decision {
        self.engine
            .decide_move(ctx.seat, ctx.state, None, &Personality::balanced())
    }

    fn hint(&self, ctx: &PolicyContext<'_>) -> Decision {
        self.engine
            .clone()
            .decide_move(ctx.seat, ctx.state, None, &Personality::balanced())
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}
