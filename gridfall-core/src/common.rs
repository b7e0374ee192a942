//! Common, primitive types shared across the engine.
//!
//! This module defines the pooled-storage key for scheduled events and the
//! small identifier enums that cross the boundary between the engine and its
//! collaborators. Using distinct types improves type safety and code clarity.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely identifies a scheduled event inside the queue's slot pool.
    ///
    /// Keys are handed out by [`crate::components::queue::EventQueue`] and
    /// become invalid once the event fires or is cancelled. Slot reuse is
    /// generation-checked, so a stale key can never alias a newer event.
    pub struct EventKey;
}

/// Movement axis for runner repositioning requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// The two capsules offered during the intro sequence.
///
/// Blue selects the normal game, red the hard one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capsule {
    Blue,
    Red,
}

impl Capsule {
    /// The capsule the player did not take.
    pub fn other(self) -> Self {
        match self {
            Capsule::Blue => Capsule::Red,
            Capsule::Red => Capsule::Blue,
        }
    }
}

/// Identifies a slot in the fixed-size animation bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationId {
    /// The selected bit oscillating under the runner's focus.
    BitShake,
}

impl AnimationId {
    /// All animation slots, in bank order.
    pub const ALL: [AnimationId; 1] = [AnimationId::BitShake];
}
