//! Authoritative game state and the turn/round state machine.
//!
//! - `validator`: pure legality check for a proposed play.
//! - `state`: the `GameState` data the manager mutates.
//! - `manager`: `GameManager`, the only writer of `GameState`.
//! - `snapshot`: serializable read-only view for consumers.

pub mod config;
pub mod manager;
pub mod snapshot;
pub mod state;
pub mod validator;

pub use config::{GameConfig, GameConfigError};
pub use manager::{GameManager, PlayOutcome, RoundError, RoundResult};
pub use snapshot::GameSnapshot;
pub use state::{GameState, HistoryEntry, Phase, TrickAction, TrickEntry};
pub use validator::{PlayError, validate};
