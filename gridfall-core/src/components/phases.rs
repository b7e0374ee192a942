//! The coarse-rate phase checker.
//!
//! Runs every fifteenth tick outside pause and inspects the current phase
//! together with the collaborators' effect-completion probes. Transitions
//! that depend on wall time are not performed inline; the checker enqueues
//! the follow-up event and parks the phase in `Idle`, decoupling physical
//! effect completion from the logical state change.

use crate::common::{AnimationId, Axis};
use crate::engine::GridfallEngine;
use crate::events::{delay, EventId};
use crate::state::{Phase, Screen};
use crate::world::World;

/// Raw-tick interval between phase machine passes.
const PHASE_TICK_INTERVAL: u64 = 15;

impl<W: World> GridfallEngine<W> {
    /// One phase machine pass. Any phase not listed is a no-op; the frame
    /// is committed to the sprite collaborator either way.
    pub fn update_phases(&mut self) {
        if self.clock.ticks() % PHASE_TICK_INTERVAL != 0 || self.state.screen == Screen::Pause {
            return;
        }

        match self.state.phase {
            Phase::BitBlockFalling => {
                if self.world.bit_block_landed() {
                    self.schedule_event(EventId::RegenerateBitBlock, delay::SECS_1);
                    self.set_phase(Phase::Idle);
                }
            }
            Phase::DestroyingGrid => {
                if self.world.grid_decay_done() {
                    self.schedule_event(EventId::RegenerateGrid, delay::SECS_3);
                    self.set_phase(Phase::Idle);
                }
            }
            Phase::RunnerMovingX => {
                if self.world.move_finished(Axis::X) {
                    self.world.update_pivot();
                    self.animations.set_active(AnimationId::BitShake, true);
                    self.set_phase(Phase::AwaitingInput);
                }
            }
            Phase::RunnerMovingY => {
                if self.world.move_finished(Axis::Y) {
                    self.world.update_pivot();
                    self.animations.set_active(AnimationId::BitShake, true);
                    self.set_phase(Phase::AwaitingInput);
                }
            }
            Phase::MovingCapsule => {
                if self.world.capsule_landed(self.state.difficulty.capsule()) {
                    self.set_phase(Phase::Idle);
                }
            }
            _ => {}
        }

        self.world.commit_frame();
    }
}
