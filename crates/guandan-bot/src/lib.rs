pub mod analysis;
pub mod eval;
pub mod orchestrator;
pub mod policy;
pub mod search;
pub mod strategy;

pub use analysis::{ProbabilityAnalyzer, RiskAssessment, RiskLevel};
pub use eval::{HandEvaluation, HandEvaluator, StructureAnalyzer, StructureTag};
pub use orchestrator::{AiOrchestrator, Callbacks, InstantClock, MoveSink, SleepClock, ThinkingClock};
pub use policy::{Policy, PolicyContext, SimplePolicy, StrategyPolicy};
pub use search::{Mcts, SearchError, SearchLimits, SearchOutcome, SimMove};
pub use strategy::{AiConfig, Decision, DecisionReason, GamePhaseTag, Move, Personality, StrategyEngine};
