//! Closed creature kind set and the per-kind rule table
//!
//! Every per-kind parameter is a pure function of the kind, and combat and
//! support compatibility are direct matches over `(actor, target)`. The
//! whole matrix is inspectable here and nowhere else.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Orc,
    Squirrel,
    Bear,
    Druid,
    Dragon,
}

impl CreatureKind {
    /// Every kind, in persisted-code order
    pub const ALL: [CreatureKind; 5] = [
        CreatureKind::Orc,
        CreatureKind::Squirrel,
        CreatureKind::Bear,
        CreatureKind::Druid,
        CreatureKind::Dragon,
    ];

    /// Numeric code used by the save format
    pub fn code(self) -> u8 {
        match self {
            CreatureKind::Orc => 1,
            CreatureKind::Squirrel => 2,
            CreatureKind::Bear => 3,
            CreatureKind::Druid => 4,
            CreatureKind::Dragon => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<CreatureKind> {
        match code {
            1 => Some(CreatureKind::Orc),
            2 => Some(CreatureKind::Squirrel),
            3 => Some(CreatureKind::Bear),
            4 => Some(CreatureKind::Druid),
            5 => Some(CreatureKind::Dragon),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreatureKind::Orc => "Orc",
            CreatureKind::Squirrel => "Squirrel",
            CreatureKind::Bear => "Bear",
            CreatureKind::Druid => "Druid",
            CreatureKind::Dragon => "Dragon",
        }
    }

    /// Maximum per-axis shift in one movement tick
    pub fn move_range(self) -> i32 {
        match self {
            CreatureKind::Orc => 8,
            CreatureKind::Squirrel => 2,
            CreatureKind::Bear => 2,
            CreatureKind::Druid => 4,
            CreatureKind::Dragon => 12,
        }
    }

    /// Interaction reach in world units
    pub fn interaction_range(self) -> i32 {
        match self {
            CreatureKind::Orc => 15,
            CreatureKind::Squirrel => 8,
            CreatureKind::Bear => 12,
            CreatureKind::Druid => 15,
            CreatureKind::Dragon => 20,
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            CreatureKind::Orc => 120,
            CreatureKind::Squirrel => 50,
            CreatureKind::Bear => 150,
            CreatureKind::Druid => 100,
            CreatureKind::Dragon => 300,
        }
    }

    /// Fixed damage dealt on a successful hit
    pub fn damage(self) -> i32 {
        match self {
            CreatureKind::Orc => 70,
            CreatureKind::Squirrel => 0,
            CreatureKind::Bear => 25,
            CreatureKind::Druid => 0,
            CreatureKind::Dragon => 80,
        }
    }

    /// Combat compatibility: can `self` damage `target`?
    pub fn can_damage(self, target: CreatureKind) -> bool {
        use CreatureKind::*;
        match (self, target) {
            (Orc, Orc) | (Orc, Bear) | (Orc, Druid) => true,
            (Bear, Squirrel) => true,
            // Dragons prey on every other kind
            (Dragon, t) => t != Dragon,
            _ => false,
        }
    }

    /// Support compatibility: can `self` heal `target`?
    pub fn can_support(self, target: CreatureKind) -> bool {
        matches!(
            (self, target),
            (CreatureKind::Druid, CreatureKind::Bear)
                | (CreatureKind::Druid, CreatureKind::Squirrel)
        )
    }
}

impl std::fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
