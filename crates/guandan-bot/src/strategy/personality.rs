use guandan_core::model::player::PersonalityTag;
use serde::Serialize;

/// Multipliers applied to strategy weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Personality {
    pub tag: PersonalityTag,
    pub risk_tolerance: f32,
    pub bomb_threshold: f32,
    pub teamwork_priority: f32,
    pub thinking_time_multiplier: f32,
    pub aggressiveness: f32,
}

impl Personality {
    pub const fn aggressive() -> Self {
        Self {
            tag: PersonalityTag::Aggressive,
            risk_tolerance: 1.4,
            bomb_threshold: 0.7,
            teamwork_priority: 0.8,
            thinking_time_multiplier: 0.8,
            aggressiveness: 1.2,
        }
    }

    pub const fn conservative() -> Self {
        Self {
            tag: PersonalityTag::Conservative,
            risk_tolerance: 0.6,
            bomb_threshold: 1.4,
            teamwork_priority: 1.0,
            thinking_time_multiplier: 1.2,
            aggressiveness: 0.8,
        }
    }

    pub const fn cooperative() -> Self {
        Self {
            tag: PersonalityTag::Cooperative,
            risk_tolerance: 1.0,
            bomb_threshold: 1.0,
            teamwork_priority: 1.5,
            thinking_time_multiplier: 1.0,
            aggressiveness: 1.0,
        }
    }

    pub const fn balanced() -> Self {
        Self {
            tag: PersonalityTag::Balanced,
            risk_tolerance: 1.0,
            bomb_threshold: 1.0,
            teamwork_priority: 1.0,
            thinking_time_multiplier: 1.0,
            aggressiveness: 1.0,
        }
    }

    pub const fn from_tag(tag: PersonalityTag) -> Self {
        match tag {
            PersonalityTag::Aggressive => Self::aggressive(),
            PersonalityTag::Conservative => Self::conservative(),
            PersonalityTag::Cooperative => Self::cooperative(),
            PersonalityTag::Balanced => Self::balanced(),
        }
    }

    /// Phase multiplier scale, kept within `0.8..=1.2`.
    pub fn aggression_scale(&self) -> f32 {
        self.aggressiveness.clamp(0.8, 1.2)
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::balanced()
    }
}

impl From<PersonalityTag> for Personality {
    fn from(tag: PersonalityTag) -> Self {
        Self::from_tag(tag)
    }
}
