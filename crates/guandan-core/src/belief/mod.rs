//! Per-round belief tracking over the cards other seats may hold.
//!
//! - `tracker`: the `CardTracker` probability rows and their incremental updates.
//! - `inference`: behaviour counters and the summaries derived from them.

mod inference;
mod tracker;

pub use inference::{HandInference, PlayerPattern, PlayerStats};
pub use tracker::{CardTracker, TrackerAction};
