//! Central creature store
//!
//! The arena owns every creature for the lifetime of the run; dead
//! creatures remain as terminal records and ids stay dense and stable.
//! Whenever two creatures must be locked together, `lock_pair` acquires
//! the vitals locks in ascending id order, so lock-order deadlock between
//! concurrent pair resolutions is structurally impossible.

use std::sync::{Arc, MutexGuard};

use crate::core::types::CreatureId;
use crate::creature::state::{Creature, CreatureSnapshot, CreatureSpec, Vitals};

#[derive(Default)]
pub struct Arena {
    creatures: Vec<Arc<Creature>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[CreatureSpec]) -> Self {
        let mut arena = Self::new();
        for spec in specs {
            arena.spawn(spec.clone());
        }
        arena
    }

    pub fn spawn(&mut self, spec: CreatureSpec) -> CreatureId {
        let id = CreatureId(self.creatures.len() as u32);
        self.creatures.push(Arc::new(Creature::new(id, &spec)));
        id
    }

    pub fn get(&self, id: CreatureId) -> Option<&Arc<Creature>> {
        self.creatures.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Creature>> {
        self.creatures.iter()
    }

    /// Snapshot every creature, one lock at a time
    pub fn snapshots(&self) -> Vec<CreatureSnapshot> {
        self.creatures.iter().map(|c| c.snapshot()).collect()
    }

    pub fn living_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_alive()).count()
    }

    /// Lock the vitals of `a` and `b` together.
    ///
    /// Guards come back in argument order, but acquisition always happens
    /// in ascending id order. Returns `None` for a self-pair or an unknown
    /// id; the caller drops such events.
    pub fn lock_pair(
        &self,
        a: CreatureId,
        b: CreatureId,
    ) -> Option<(MutexGuard<'_, Vitals>, MutexGuard<'_, Vitals>)> {
        if a == b {
            return None;
        }
        let first = self.get(a.min(b))?;
        let second = self.get(a.max(b))?;
        let low = first.lock();
        let high = second.lock();
        if a < b {
            Some((low, high))
        } else {
            Some((high, low))
        }
    }
}
