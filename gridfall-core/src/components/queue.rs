//! The bounded, order-preserving queue of pending timed events.
//!
//! Storage is split in two: a slot pool (`SlotMap`) that owns every live
//! [`ScheduledEvent`] and never allocates past its warm-up capacity, and a
//! dense `Vec<EventKey>` giving the pending order. Each event carries its
//! own position (`pos`) in that order; removal compacts the order vector by
//! shifting later keys one slot toward the head and rewrites every shifted
//! event's `pos`, so `pos == index` holds after every mutation. The engine's
//! due-scan relies on this invariant to re-read the slot an element slid
//! into instead of skipping it.

use slotmap::SlotMap;
use tracing::{trace, warn};

use crate::common::EventKey;
use crate::events::EventId;

/// Maximum number of pending events. A schedule request against a full
/// queue is dropped silently; see [`EventQueue::schedule`].
pub const CAPACITY: usize = 64;

/// A scheduled, time-stamped request to run one dispatch handler.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    pub id: EventId,
    /// Absolute clock value at or after which the event becomes eligible.
    pub due: u64,
    /// Current position in the pending order.
    pub pos: usize,
}

/// Bounded queue of pending events, owned exclusively by the engine.
#[derive(Debug)]
pub struct EventQueue {
    pool: SlotMap<EventKey, ScheduledEvent>,
    pending: Vec<EventKey>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pool: SlotMap::with_capacity_and_key(CAPACITY),
            pending: Vec::with_capacity(CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Appends a new event due at `now + delay`.
    ///
    /// When the queue is full the request is dropped with no signal to the
    /// caller beyond a log line and a `None` return; queue contents are
    /// left untouched. Dropping, not erroring, is the queue's capacity
    /// contract and is asserted by tests, not treated as a failure path.
    pub fn schedule(&mut self, id: EventId, delay: u64, now: u64) -> Option<EventKey> {
        if self.pending.len() >= CAPACITY {
            warn!(?id, "event queue full, schedule request dropped");
            return None;
        }
        let pos = self.pending.len();
        let due = now + delay;
        let key = self.pool.insert(ScheduledEvent { id, due, pos });
        self.pending.push(key);
        trace!(?id, due, pos, "event scheduled");
        Some(key)
    }

    /// The event currently at `index` in the pending order.
    pub fn get(&self, index: usize) -> Option<&ScheduledEvent> {
        self.pending.get(index).and_then(|key| self.pool.get(*key))
    }

    /// Removes the event at `index`, compacting the order.
    ///
    /// Every later event shifts one slot toward the head and has its `pos`
    /// rewritten to the new position; relative order is preserved.
    pub fn delete_at(&mut self, index: usize) -> Option<ScheduledEvent> {
        if index >= self.pending.len() {
            return None;
        }
        let key = self.pending.remove(index);
        let removed = self.pool.remove(key);
        for (i, shifted) in self.pending.iter().enumerate().skip(index) {
            self.pool[*shifted].pos = i;
        }
        if let Some(event) = &removed {
            trace!(id = ?event.id, index, remaining = self.pending.len(), "event removed");
        }
        removed
    }

    /// Deletes from the head until the queue is empty. Returns the number
    /// of events discarded.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        while self.delete_at(0).is_some() {}
        count
    }

    /// Iterates pending events in order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> + '_ {
        self.pending.iter().map(|key| &self.pool[*key])
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_match_indices(queue: &EventQueue) -> bool {
        queue.iter().enumerate().all(|(i, event)| event.pos == i)
    }

    #[test]
    fn length_stays_within_bounds() {
        let mut queue = EventQueue::new();
        for i in 0..CAPACITY + 10 {
            queue.schedule(EventId::ListenInput, i as u64, 0);
            assert!(queue.len() <= CAPACITY);
        }
        assert_eq!(queue.len(), CAPACITY);
        while queue.delete_at(0).is_some() {}
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn schedule_on_full_queue_leaves_contents_unchanged() {
        let mut queue = EventQueue::new();
        for _ in 0..CAPACITY {
            queue.schedule(EventId::ClearText, 1, 0);
        }
        let before: Vec<(EventId, u64)> = queue.iter().map(|e| (e.id, e.due)).collect();
        assert!(queue.schedule(EventId::ShowHud, 9, 0).is_none());
        let after: Vec<(EventId, u64)> = queue.iter().map(|e| (e.id, e.due)).collect();
        assert_eq!(queue.len(), CAPACITY);
        assert_eq!(before, after);
    }

    #[test]
    fn delete_compacts_and_rewrites_positions() {
        let mut queue = EventQueue::new();
        queue.schedule(EventId::MenuStart, 0, 0);
        queue.schedule(EventId::ShowControls, 1, 0);
        queue.schedule(EventId::ShowLore, 2, 0);
        queue.schedule(EventId::ShowStats, 3, 0);

        let removed = queue.delete_at(1).unwrap();
        assert_eq!(removed.id, EventId::ShowControls);
        assert_eq!(queue.len(), 3);
        assert!(positions_match_indices(&queue));
        let order: Vec<EventId> = queue.iter().map(|e| e.id).collect();
        assert_eq!(
            order,
            vec![EventId::MenuStart, EventId::ShowLore, EventId::ShowStats]
        );

        queue.delete_at(0).unwrap();
        assert!(positions_match_indices(&queue));
        queue.delete_at(1).unwrap();
        assert!(positions_match_indices(&queue));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cancel_all_empties_regardless_of_due_times() {
        let mut queue = EventQueue::new();
        queue.schedule(EventId::DecayCheck, 0, 0);
        queue.schedule(EventId::DropBitBlock, 500, 7);
        queue.schedule(EventId::ShowHud, 2, 1_000_000);
        assert_eq!(queue.cancel_all(), 3);
        assert!(queue.is_empty());
        assert_eq!(queue.cancel_all(), 0);
    }

    #[test]
    fn due_times_are_schedule_time_plus_delay() {
        let mut queue = EventQueue::new();
        queue.schedule(EventId::IntroWake, 4, 10);
        assert_eq!(queue.get(0).unwrap().due, 14);
    }
}
