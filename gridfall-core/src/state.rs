//! Shared game state written by dispatch handlers and the phase machine.

use crate::common::{AnimationId, Capsule};

/// Coarse application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Game,
    Pause,
    Stats,
}

/// Fine-grained sub-state of the current screen: an in-progress effect or a
/// wait condition. `Idle` is the neutral waiting state handlers park the
/// game in while a follow-up event is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ShowMenu,
    ShowControls,
    ShowGameplay,
    ShowLore,
    ShowLore2,
    AwaitingInput,
    MovingCapsule,
    BitBlockFalling,
    DestroyingGrid,
    RegeneratingGrid,
    RunnerMovingX,
    RunnerMovingY,
    Paused,
    ShowStats,
}

/// Difficulty selected through the intro capsule choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Normal,
    Hard,
}

impl Difficulty {
    /// Score awarded per overflow.
    pub fn overflow_score(self) -> u32 {
        match self {
            Difficulty::Normal => 100,
            Difficulty::Hard => 200,
        }
    }

    /// Failed evaluations tolerated before the run ends.
    pub fn miss_allowance(self) -> u32 {
        match self {
            Difficulty::Normal => 3,
            Difficulty::Hard => 1,
        }
    }

    /// The capsule that selects this difficulty.
    pub fn capsule(self) -> Capsule {
        match self {
            Difficulty::Normal => Capsule::Blue,
            Difficulty::Hard => Capsule::Red,
        }
    }
}

impl From<Capsule> for Difficulty {
    fn from(capsule: Capsule) -> Self {
        match capsule {
            Capsule::Blue => Difficulty::Normal,
            Capsule::Red => Difficulty::Hard,
        }
    }
}

/// The mutable game data shared by every handler.
///
/// Single-threaded cooperative access only: the engine hands out `&mut`
/// along the interrupt path and nowhere else, so no locking is involved.
#[derive(Debug)]
pub struct GameState {
    pub screen: Screen,
    pub phase: Phase,
    pub difficulty: Difficulty,
    /// Whether the decay countdown is currently running.
    pub decay_active: bool,
    /// Remaining decay window, in elapsed-time units.
    pub decay_left: i32,
    pub score: u32,
    /// Total overflows achieved this run.
    pub overflows: u32,
    /// Overflows achieved against the current grid; resets on regeneration.
    pub grid_overflows: u32,
    pub misses: u32,
    /// Number of grid regenerations survived.
    pub regens: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Menu,
            phase: Phase::Idle,
            difficulty: Difficulty::Normal,
            decay_active: false,
            decay_left: 0,
            score: 0,
            overflows: 0,
            grid_overflows: 0,
            misses: 0,
            regens: 0,
        }
    }

    /// Resets the decay window and starts the countdown.
    pub fn arm_decay(&mut self, window: i32) {
        self.decay_left = window;
        self.decay_active = true;
    }

    /// Suspends or resumes the decay countdown without resetting it.
    pub fn set_decay(&mut self, active: bool) {
        self.decay_active = active;
    }

    /// Applies one bit-block evaluation result to the score counters.
    ///
    /// Returns `false` once the miss allowance for the current difficulty
    /// is exhausted, which ends the run.
    pub fn apply_evaluation(&mut self, overflow: bool) -> bool {
        if overflow {
            self.score += self.difficulty.overflow_score();
            self.overflows += 1;
            self.grid_overflows += 1;
        } else {
            self.misses += 1;
        }
        self.misses < self.difficulty.miss_allowance()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry in the animation bank.
#[derive(Debug, Clone, Copy)]
pub struct AnimationSlot {
    pub active: bool,
    /// Signed oscillation value, toggled by the animation ticker.
    pub state: i8,
}

/// Fixed-size bank of animation slots, indexed by [`AnimationId`].
#[derive(Debug)]
pub struct Animations {
    slots: [AnimationSlot; AnimationId::ALL.len()],
}

impl Animations {
    pub fn new() -> Self {
        Self {
            slots: [AnimationSlot {
                active: false,
                state: 1,
            }; AnimationId::ALL.len()],
        }
    }

    pub fn set_active(&mut self, id: AnimationId, active: bool) {
        self.slots[id as usize].active = active;
    }

    pub fn slot(&self, id: AnimationId) -> AnimationSlot {
        self.slots[id as usize]
    }

    pub fn slot_mut(&mut self, id: AnimationId) -> &mut AnimationSlot {
        &mut self.slots[id as usize]
    }
}

impl Default for Animations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_tracks_score_and_miss_allowance() {
        let mut state = GameState::new();
        assert!(state.apply_evaluation(true));
        assert_eq!(state.score, 100);
        assert_eq!(state.grid_overflows, 1);
        assert!(state.apply_evaluation(false));
        assert!(state.apply_evaluation(false));
        // Third miss exhausts the normal-mode allowance.
        assert!(!state.apply_evaluation(false));
    }

    #[test]
    fn hard_mode_ends_on_first_miss() {
        let mut state = GameState::new();
        state.difficulty = Difficulty::Hard;
        assert!(!state.apply_evaluation(false));
    }
}
