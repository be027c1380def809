//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Stable identifier for creatures
///
/// Ids are dense arena indices, assigned in spawn order. The total order on
/// ids doubles as the global lock-acquisition order whenever two creatures
/// must be locked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Simulation tick counter (movement/detection time unit)
pub type Tick = u64;

/// Result of resolving one directed interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The target's health reached zero
    Killed,
    /// The target took damage and survived
    Hurt,
    /// The attack roll missed (ties count as a miss)
    Escaped,
    /// The target was restored to full health
    Healed,
    /// The pairing has no combat or support rule, or support had no effect
    NoInteraction,
}

impl Outcome {
    /// Past-tense verb for log lines
    pub fn verb(self) -> &'static str {
        match self {
            Outcome::Killed => "killed",
            Outcome::Hurt => "hurt",
            Outcome::Escaped => "escaped",
            Outcome::Healed => "healed",
            Outcome::NoInteraction => "ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_id_equality() {
        let a = CreatureId(1);
        let b = CreatureId(1);
        let c = CreatureId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_creature_id_ordering_follows_payload() {
        assert!(CreatureId(0) < CreatureId(1));
        assert!(CreatureId(7) > CreatureId(3));
    }

    #[test]
    fn test_creature_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<CreatureId, &str> = HashMap::new();
        map.insert(CreatureId(1), "orc");
        assert_eq!(map.get(&CreatureId(1)), Some(&"orc"));
    }
}
