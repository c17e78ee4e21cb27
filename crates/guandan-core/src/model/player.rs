use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const SEATS: usize = 4;

/// Seat index helpers. Seats 0 and 2 form team 0; seats 1 and 3 form team 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(pub usize);

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat(0), Seat(1), Seat(2), Seat(3)];

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SEATS { Some(Seat(index)) } else { None }
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn next(self) -> Seat {
        Seat((self.0 + 1) % SEATS)
    }

    pub const fn previous(self) -> Seat {
        Seat((self.0 + SEATS - 1) % SEATS)
    }

    pub const fn partner(self) -> Seat {
        Seat((self.0 + 2) % SEATS)
    }

    pub const fn team(self) -> Team {
        if self.0 % 2 == 0 { Team::Zero } else { Team::One }
    }

    pub fn is_teammate(self, other: Seat) -> bool {
        self != other && self.team() == other.team()
    }

    pub fn is_opponent(self, other: Seat) -> bool {
        self.team() != other.team()
    }

    /// The two seats on the other team, in turn order after `self`.
    pub fn opponents(self) -> [Seat; 2] {
        [self.next(), self.previous()]
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Zero,
    One,
}

impl Team {
    pub const fn index(self) -> usize {
        match self {
            Team::Zero => 0,
            Team::One => 1,
        }
    }

    pub const fn other(self) -> Team {
        match self {
            Team::Zero => Team::One,
            Team::One => Team::Zero,
        }
    }

    pub const fn seats(self) -> [Seat; 2] {
        match self {
            Team::Zero => [Seat(0), Seat(2)],
            Team::One => [Seat(1), Seat(3)],
        }
    }
}

/// Personality tag carried on a player record; the bot crate maps it to weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTag {
    Aggressive,
    Conservative,
    Cooperative,
    #[default]
    Balanced,
}

impl PersonalityTag {
    pub const ALL: [PersonalityTag; 4] = [
        PersonalityTag::Aggressive,
        PersonalityTag::Conservative,
        PersonalityTag::Cooperative,
        PersonalityTag::Balanced,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PersonalityTag::Aggressive => "aggressive",
            PersonalityTag::Conservative => "conservative",
            PersonalityTag::Cooperative => "cooperative",
            PersonalityTag::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub seat: Seat,
    pub hand: Hand,
    pub team: Team,
    pub is_ai: bool,
    pub personality: PersonalityTag,
}

impl Player {
    pub fn new(seat: Seat, is_ai: bool, personality: PersonalityTag) -> Self {
        Self {
            seat,
            hand: Hand::new(),
            team: seat.team(),
            is_ai,
            personality,
        }
    }
}
