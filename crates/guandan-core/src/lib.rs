pub mod belief;
pub mod game;
pub mod model;

pub use game::{GameConfig, GameManager, GameSnapshot, GameState, Phase, PlayError, PlayOutcome};
pub use model::card::{Card, CardId};
pub use model::play::{Play, PlayKind};
pub use model::player::{Seat, Team};
pub use model::trump::TrumpContext;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "guandan"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "guandan");
        assert!(!AppInfo::version().is_empty());
    }
}
