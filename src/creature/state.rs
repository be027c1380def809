//! Per-creature state behind a synchronized accessor
//!
//! Identity (id, name, kind) is immutable and lives outside the lock;
//! position, health, and the alive flag are reachable only through the
//! vitals mutex. Code that must observe or mutate two creatures together
//! goes through `Arena::lock_pair`, never through two independent `lock`
//! calls.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::core::types::CreatureId;
use crate::creature::kind::CreatureKind;

/// Mutable creature record, guarded by the creature's vitals mutex
///
/// Invariants: `0 <= health <= max_health(kind)`; `alive == false` implies
/// `health == 0`; position stays within map bounds.
#[derive(Debug, Clone)]
pub struct Vitals {
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub alive: bool,
}

impl Vitals {
    /// Apply `amount` damage, clamping health at zero.
    ///
    /// Returns true when this strike was lethal. Death is terminal: callers
    /// never resurrect through this type.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        if self.health == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    /// Restore a living creature to `max` health.
    ///
    /// Returns true when anything changed; a dead or already-full target is
    /// left untouched.
    pub fn restore(&mut self, max: i32) -> bool {
        if self.alive && self.health < max {
            self.health = max;
            return true;
        }
        false
    }

    pub fn distance_sq_to(&self, other: &Vitals) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Construction-time description of a creature
///
/// Also the shape of one persisted record: kind, name, position. Health and
/// aliveness are never persisted; a spec always produces a fresh creature
/// at full health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub kind: CreatureKind,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

/// Point-in-time copy of one creature's state
///
/// Taken under the vitals lock; used by the detection pass and by read-only
/// consumers that must not hold locks while working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub alive: bool,
}

pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub kind: CreatureKind,
    vitals: Mutex<Vitals>,
}

impl Creature {
    pub fn new(id: CreatureId, spec: &CreatureSpec) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            kind: spec.kind,
            vitals: Mutex::new(Vitals {
                x: spec.x,
                y: spec.y,
                health: spec.kind.max_health(),
                alive: true,
            }),
        }
    }

    /// Lock the vitals. A poisoned mutex is recovered: the record stays
    /// consistent under every exit path, and no simulation condition is
    /// allowed to terminate the process.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Vitals> {
        self.vitals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        let v = self.lock();
        CreatureSnapshot {
            id: self.id,
            kind: self.kind,
            x: v.x,
            y: v.y,
            health: v.health,
            alive: v.alive,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        let v = self.lock();
        (v.x, v.y)
    }

    pub fn is_alive(&self) -> bool {
        self.lock().alive
    }

    pub fn health(&self) -> i32 {
        self.lock().health
    }

    /// Apply one movement step, bounded to `[0, max_x] x [0, max_y]`.
    ///
    /// An axis whose shifted position would leave the map is skipped rather
    /// than clamped. Dead creatures do not move.
    pub fn wander(&self, dx: i32, dy: i32, max_x: i32, max_y: i32) {
        let mut v = self.lock();
        if !v.alive {
            return;
        }
        if (0..=max_x).contains(&(v.x + dx)) {
            v.x += dx;
        }
        if (0..=max_y).contains(&(v.y + dy)) {
            v.y += dy;
        }
    }
}

impl std::fmt::Debug for Creature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
