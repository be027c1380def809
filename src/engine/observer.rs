//! Outcome notification fan-out
//!
//! Subscriptions live in a registry keyed by creature id, not inside
//! creatures, so observers are owned externally and referenced only by
//! handle. Observer failures are isolated: a panicking observer is logged
//! and skipped, never unwound into the resolver loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use ahash::AHashMap;

use crate::core::types::{CreatureId, Outcome};
use crate::creature::state::Creature;

/// Receives interaction outcomes.
///
/// Called synchronously from the resolver thread after the participants'
/// locks have been released: implementations may read creature state but
/// must return promptly and must not mutate it.
pub trait InteractionObserver: Send + Sync {
    fn on_interaction(&self, actor: &Creature, target: &Creature, outcome: Outcome);
}

#[derive(Default)]
pub struct ObserverRegistry {
    subscriptions: Mutex<AHashMap<CreatureId, Vec<Arc<dyn InteractionObserver>>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, id: CreatureId, observer: Arc<dyn InteractionObserver>) {
        self.subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(id)
            .or_default()
            .push(observer);
    }

    /// Fan one outcome out to the acting creature's observers.
    pub fn notify(&self, actor: &Creature, target: &Creature, outcome: Outcome) {
        let observers = {
            let subs = self
                .subscriptions
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subs.get(&actor.id).cloned()
        };
        let Some(observers) = observers else {
            return;
        };
        for observer in observers {
            let call = AssertUnwindSafe(|| observer.on_interaction(actor, target, outcome));
            if catch_unwind(call).is_err() {
                tracing::warn!(
                    actor = %actor.name,
                    ?outcome,
                    "observer panicked during notification; continuing"
                );
            }
        }
    }
}
