//! Monte Carlo tree search over sampled deals.

mod mcts;
mod sim;

pub use mcts::{Mcts, SearchError, SearchLimits, SearchOutcome};
pub use sim::{SimMove, SimState};
