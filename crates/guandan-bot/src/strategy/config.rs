/// Engine-level switches and search budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiConfig {
    pub mcts_enabled: bool,
    /// Budget for a mid-sized hand.
    pub mcts_time_ms: u64,
    /// Budget once the hand is short.
    pub mcts_min_time_ms: u64,
    /// Budget for a long hand.
    pub mcts_max_time_ms: u64,
    pub mcts_iterations: u32,
    pub mcts_depth: u32,
    pub rollout_plies: u32,
    pub thinking_delay_enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            mcts_enabled: true,
            mcts_time_ms: 1500,
            mcts_min_time_ms: 1000,
            mcts_max_time_ms: 2000,
            mcts_iterations: 800,
            mcts_depth: 20,
            rollout_plies: 30,
            thinking_delay_enabled: true,
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Tiny budgets with no delay; used by tests and the bench.
    pub fn fast() -> Self {
        Self {
            mcts_time_ms: 40,
            mcts_min_time_ms: 20,
            mcts_max_time_ms: 60,
            mcts_iterations: 60,
            thinking_delay_enabled: false,
            ..Self::default()
        }
    }

    pub fn without_mcts(mut self) -> Self {
        self.mcts_enabled = false;
        self
    }

    /// Time budget for a hand of `hand_len` cards.
    pub fn time_budget_ms(&self, hand_len: usize) -> u64 {
        match hand_len {
            0..=5 => self.mcts_min_time_ms,
            6..=15 => self.mcts_time_ms,
            _ => self.mcts_max_time_ms,
        }
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |raw: String| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON");

        let mcts_enabled = read("GD_MCTS").map(flag).unwrap_or(defaults.mcts_enabled);
        let mcts_time_ms = read("GD_MCTS_TIME_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.mcts_time_ms);
        let mcts_iterations = read("GD_MCTS_ITERATIONS")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.mcts_iterations);
        let thinking_delay_enabled = read("GD_THINKING_DELAY")
            .map(flag)
            .unwrap_or(defaults.thinking_delay_enabled);

        Self {
            mcts_enabled,
            mcts_time_ms,
            mcts_min_time_ms: defaults.mcts_min_time_ms.min(mcts_time_ms),
            mcts_max_time_ms: defaults.mcts_max_time_ms.max(mcts_time_ms),
            mcts_iterations,
            thinking_delay_enabled,
            ..defaults
        }
    }
}
