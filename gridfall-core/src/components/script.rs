//! The dispatch table: one handler arm per event identifier.
//!
//! This is the game's continuation mechanism. No handler ever blocks or
//! sleeps; a multi-beat sequence is expressed by each beat scheduling its
//! successors with a relative delay and returning. The `match` is
//! exhaustive over [`EventId`], so an unmapped identifier cannot exist.

use crate::common::{AnimationId, Axis};
use crate::engine::GridfallEngine;
use crate::events::{delay, EventId};
use crate::state::{Difficulty, Phase, Screen};
use crate::world::{Backdrop, View, World};

/// Console row used for the menu prompt blink.
const PROMPT_ROW: u8 = 9;
/// Console row used for dialogue lines.
const DIALOGUE_ROW: u8 = 10;
/// Console row used for the capsule choice legend.
const LEGEND_ROW: u8 = 20;

impl<W: World> GridfallEngine<W> {
    /// Runs the handler bound to `id`. Called only from the due-scan, after
    /// the event has been removed from the queue.
    pub(crate) fn dispatch(&mut self, id: EventId) {
        match id {
            // --- MAIN MENU ---
            EventId::MenuStart => {
                self.world.show(View::Menu);
                self.set_phase(Phase::ShowMenu);
                self.schedule_event(EventId::MenuHidePrompt, delay::SECS_1);
            }
            EventId::MenuHidePrompt => {
                if self.state.phase == Phase::ShowMenu {
                    self.world.say(PROMPT_ROW, "");
                    self.schedule_event(EventId::MenuShowPrompt, delay::SECS_1);
                }
            }
            EventId::MenuShowPrompt => {
                if self.state.phase == Phase::ShowMenu {
                    self.world.say(PROMPT_ROW, "<press start to begin>");
                    self.schedule_event(EventId::MenuHidePrompt, delay::SECS_1);
                }
            }
            EventId::ShowControls => {
                self.set_phase(Phase::ShowControls);
                self.world.show(View::Controls);
            }
            EventId::ShowGameplay => {
                self.set_phase(Phase::ShowGameplay);
                self.world.show(View::Gameplay);
            }
            EventId::ShowLore => {
                self.set_phase(Phase::ShowLore);
                self.world.show(View::Lore);
            }
            EventId::ShowLore2 => {
                self.set_phase(Phase::ShowLore2);
                self.world.show(View::Lore2);
            }

            // --- INTRO ---
            EventId::IntroBoot => {
                self.world.set_backdrop(Backdrop::Grid);
                self.schedule_event(EventId::ClearText, delay::NOW);
                self.schedule_event(EventId::IntroWake, delay::SECS_4);
            }
            EventId::IntroWake => {
                self.world.say(PROMPT_ROW, "_");
                self.world.say(DIALOGUE_ROW, "Wake up, runner...");
                self.world.set_backdrop(Backdrop::GridRunner);
                self.schedule_event(EventId::ClearText, delay::SECS_3);
                self.schedule_event(EventId::IntroLine1, delay::SECS_4);
            }
            EventId::IntroLine1 => {
                self.world.say(DIALOGUE_ROW, "The grid has been watching you.");
                self.schedule_event(EventId::ClearText, delay::SECS_3);
                self.schedule_event(EventId::IntroLine2, delay::SECS_5);
            }
            EventId::IntroLine2 => {
                self.world.say(DIALOGUE_ROW, "Follow the stray signal.");
                self.world.set_backdrop(Backdrop::Signal1);
                self.schedule_event(EventId::IntroLine3, delay::SECS_5);
                self.schedule_event(EventId::IntroGlitch, delay::SECS_3);
                self.schedule_event(EventId::ClearText, delay::SECS_3);
            }
            EventId::IntroGlitch => {
                self.world.set_backdrop(Backdrop::Signal2);
            }
            EventId::IntroLine3 => {
                self.world.say(PROMPT_ROW, "_");
                self.world.say(DIALOGUE_ROW, "Knock, knock.");
                self.world.set_backdrop(Backdrop::Signal3);
                self.schedule_event(EventId::ClearText, delay::SECS_3);
                self.schedule_event(EventId::IntroChoice, delay::SECS_4);
                self.schedule_event(EventId::SetBackdropGrid2, delay::SECS_3);
            }
            EventId::IntroChoice => {
                self.world.say(DIALOGUE_ROW, "So: blue capsule, or red?");
                self.world.say(LEGEND_ROW, "Blue - Normal      Red - Hard");
                self.schedule_event(EventId::IntroShowCapsules, delay::SECS_2);
            }
            EventId::IntroShowCapsules => {
                self.world.spawn_capsules();
                self.set_phase(Phase::AwaitingInput);
            }
            EventId::CapsuleChosen => {
                self.world.clear_text();
                let line = match self.state.difficulty {
                    Difficulty::Hard => "A bold pick. I approve.",
                    Difficulty::Normal => "The gentle path, then.",
                };
                self.world.say(DIALOGUE_ROW, line);
                self.world.resolve_capsule(self.state.difficulty.capsule());
                self.set_phase(Phase::MovingCapsule);
                self.schedule_event(EventId::ClearText, delay::SECS_2);
                self.schedule_event(EventId::IntroTaunt, delay::SECS_4);
            }
            EventId::IntroTaunt => {
                let line = match self.state.difficulty {
                    Difficulty::Hard => "Or was it?",
                    Difficulty::Normal => "Try not to get lost in there.",
                };
                self.world.say(DIALOGUE_ROW, line);
                self.world
                    .resolve_capsule(self.state.difficulty.capsule().other());
                self.schedule_event(EventId::ClearText, delay::SECS_3);
                self.schedule_event(EventId::IntroHandoff, delay::SECS_4);
            }
            EventId::IntroHandoff => {
                self.world.show(View::IntroPanel1);
                self.world.spawn_runner();
                self.schedule_event(EventId::GameStart, delay::SECS_4);
                self.schedule_event(EventId::ClearText, delay::SECS_3);
            }
            EventId::SetBackdropTitle => {
                self.world.set_backdrop(Backdrop::Title);
            }
            EventId::SetBackdropGrid => {
                self.world.set_backdrop(Backdrop::Grid);
            }
            EventId::SetBackdropGrid2 => {
                self.world.set_backdrop(Backdrop::Grid2);
            }
            EventId::ClearText => {
                self.world.clear_text();
            }

            // --- GAME ---
            EventId::GameStart => {
                self.set_screen(Screen::Game);
                self.world.display_grid(true);
                self.world.show(View::IntroPanel2);
                self.schedule_event(EventId::ArmDecay, delay::SECS_4);
                self.schedule_event(EventId::ShowHud, delay::SECS_4);
            }
            EventId::ArmDecay => {
                let window = self.config().rules.decay_window;
                self.state.arm_decay(window);
                self.set_phase(Phase::AwaitingInput);
                self.schedule_event(EventId::DecayCheck, delay::SECS_1);
            }
            EventId::DecayCheck => {
                if self.state.decay_active {
                    self.state.decay_left -= 1;
                    self.world.show(View::Hud);
                    if self.state.decay_left <= 0 {
                        if self.state.grid_overflows >= self.config().rules.min_overflows {
                            self.state.set_decay(false);
                            self.schedule_event(EventId::DestroyGrid, delay::NOW);
                        } else {
                            self.game_over(false);
                            return;
                        }
                    }
                    self.schedule_event(EventId::DecayCheck, delay::SECS_1);
                }
            }
            EventId::DropBitBlock => {
                self.set_phase(Phase::BitBlockFalling);
            }
            EventId::RegenerateBitBlock => {
                self.world.rebuild_bit_block();
                self.state.set_decay(true);
                self.set_phase(Phase::AwaitingInput);
                self.schedule_event(EventId::DecayCheck, delay::SECS_1);
            }
            EventId::HideGrid => {
                self.set_phase(Phase::RegeneratingGrid);
                self.world.display_grid(false);
                self.schedule_event(EventId::RegenerateGrid, delay::SECS_5);
            }
            EventId::RegenerateGrid => {
                self.world.rebuild_grid();
                self.world.display_grid(true);
                let window = self.config().rules.decay_window;
                self.state.arm_decay(window);
                self.state.regens += 1;
                self.state.grid_overflows = 0;
                self.set_phase(Phase::AwaitingInput);
                self.schedule_event(EventId::DecayCheck, delay::SECS_1);
            }
            EventId::DestroyGrid => {
                self.world.show(View::GridRebuild);
                self.set_phase(Phase::DestroyingGrid);
            }
            EventId::RunnerMoveX => {
                self.world.begin_move(Axis::X);
                self.animations.set_active(AnimationId::BitShake, false);
                self.set_phase(Phase::RunnerMovingX);
            }
            EventId::RunnerMoveY => {
                self.world.begin_move(Axis::Y);
                self.animations.set_active(AnimationId::BitShake, false);
                self.set_phase(Phase::RunnerMovingY);
            }
            EventId::EvaluateBitBlock => {
                self.animations.set_active(AnimationId::BitShake, false);
                let overflow = self.world.bit_block_overflowed();
                if !self.state.apply_evaluation(overflow) {
                    self.game_over(false);
                    return;
                }
                self.state.set_decay(false);
                if overflow {
                    self.world.show(View::Overflow);
                    self.schedule_event(EventId::ShowHud, delay::SECS_4);
                } else {
                    self.world.show(View::Fail);
                    self.schedule_event(EventId::ShowHud, delay::SECS_5);
                }
                self.schedule_event(EventId::DropBitBlock, delay::SECS_2);
            }
            EventId::ShowHud => {
                self.state.set_decay(true);
                self.world.show(View::Hud);
            }
            EventId::ShowStats => {
                self.world.show(View::Stats);
                self.set_screen(Screen::Stats);
                self.set_phase(Phase::ShowStats);
            }
            EventId::ListenInput => {
                self.set_phase(Phase::AwaitingInput);
            }
            EventId::Pause => {
                self.set_screen(Screen::Pause);
                self.set_phase(Phase::Paused);
                self.world.show(View::PauseOverlay);
            }
        }
    }
}
