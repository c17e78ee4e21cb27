mod config;
mod engine;
mod personality;

pub use config::AiConfig;
pub use engine::{Decision, DecisionReason, GamePhaseTag, Move, StrategyEngine};
pub use personality::Personality;
