//! Thread-safe FIFO bridging the detector and the resolver
//!
//! Unbounded: backpressure is deliberately absent, so a slow resolver grows
//! the queue rather than stalling detection. Events carry identity only;
//! every decision is recomputed from live state at resolution time.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::types::CreatureId;

/// Candidate pair flagged as spatially eligible to interact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub actor: CreatureId,
    pub target: CreatureId,
}

#[derive(Default)]
pub struct EventQueue {
    inner: Mutex<VecDeque<InteractionEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, VecDeque<InteractionEvent>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one event; never blocks beyond the internal lock.
    pub fn push(&self, event: InteractionEvent) {
        self.guard().push_back(event);
    }

    /// Append a batch of events under a single lock acquisition.
    pub fn extend(&self, events: impl IntoIterator<Item = InteractionEvent>) {
        self.guard().extend(events);
    }

    /// Remove and return the oldest event, or `None` when empty.
    pub fn pop(&self) -> Option<InteractionEvent> {
        self.guard().pop_front()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn event(actor: u32, target: u32) -> InteractionEvent {
        InteractionEvent {
            actor: CreatureId(actor),
            target: CreatureId(target),
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.push(event(0, 1));
        queue.push(event(2, 3));
        queue.push(event(4, 5));

        assert_eq!(queue.pop(), Some(event(0, 1)));
        assert_eq!(queue.pop(), Some(event(2, 3)));
        assert_eq!(queue.pop(), Some(event(4, 5)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_pop_on_empty_returns_none_without_blocking() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_concurrent_pushes_all_arrive() {
        let queue = Arc::new(EventQueue::new());
        let mut handles = Vec::new();
        for t in 0..4u32 {
            let queue = Arc::clone(&queue);
            handles.push(std::thread::spawn(move || {
                for i in 0..1_000u32 {
                    queue.push(event(t, i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(queue.len(), 4_000);
    }
}
