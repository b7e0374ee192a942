//! The engine that owns every piece of shared state and runs the
//! per-interrupt update chain.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::common::{AnimationId, Capsule};
use crate::components::queue::EventQueue;
use crate::config::GridfallConfig;
use crate::events::{delay, EngineEvent, EventId};
use crate::state::{Animations, GameState, Phase, Screen};
use crate::time::GameClock;
use crate::world::{Backdrop, View, World};

/// Raw-tick interval between animation ticker passes.
const ANIMATION_TICK_INTERVAL: u64 = 3;

/// The scheduling and phase-transition core.
///
/// One explicitly-owned object holds the clock, the event queue, the game
/// state and the animation bank; the timer driver borrows it mutably for
/// each interrupt. Nothing here blocks: waiting is always expressed as
/// scheduling an event with a delay.
pub struct GridfallEngine<W: World> {
    config: Arc<GridfallConfig>,
    pub(crate) clock: GameClock,
    pub(crate) queue: EventQueue,
    pub(crate) state: GameState,
    pub(crate) animations: Animations,
    pub(crate) world: W,
    engine_event_sender: broadcast::Sender<EngineEvent>,
}

impl<W: World> GridfallEngine<W> {
    pub fn new(config: GridfallConfig, world: W) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (engine_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let clock = GameClock::new(config.timer.latch, config.timer.interruption_rate);
        Self {
            config: Arc::new(config),
            clock,
            queue: EventQueue::new(),
            state: GameState::new(),
            animations: Animations::new(),
            world,
            engine_event_sender,
        }
    }

    /// Resets the event system to empty. Called once at startup and again
    /// whenever the game state is torn down wholesale.
    pub fn init_event_system(&mut self) {
        let count = self.queue.cancel_all();
        if count > 0 {
            self.send(EngineEvent::QueueCleared { count });
        }
    }

    /// Boots the engine: clears the queue, shows the title backdrop and
    /// schedules the menu script.
    pub fn power_on(&mut self) {
        info!(
            latch = self.clock.latch(),
            rate = self.clock.interruption_rate(),
            "engine powering on"
        );
        self.init_event_system();
        self.world.set_backdrop(Backdrop::Title);
        self.schedule_event(EventId::MenuStart, delay::NOW);
        self.send(EngineEvent::EngineStarted);
    }

    /// Schedules `id` to fire `relative_delay` time units from now.
    ///
    /// On a full queue the request is dropped silently; the only traces are
    /// a log line and an [`EngineEvent::EventDropped`] notification.
    pub fn schedule_event(&mut self, id: EventId, relative_delay: u64) {
        let now = self.clock.now();
        match self.queue.schedule(id, relative_delay, now) {
            Some(_) => self.send(EngineEvent::EventScheduled {
                id,
                due: now + relative_delay,
            }),
            None => self.send(EngineEvent::EventDropped { id }),
        }
    }

    /// Permanently discards every pending event.
    ///
    /// Unlike pausing, which merely suspends processing, this forgets the
    /// pending script entirely.
    pub fn cancel_all_events(&mut self) {
        let count = self.queue.cancel_all();
        self.send(EngineEvent::QueueCleared { count });
    }

    /// The single per-interrupt entry point: advances the clock, then runs
    /// the animation ticker, the phase machine and the due-scan in that
    /// fixed order. A phase transition made by the phase machine is
    /// therefore visible to events processed in the same tick.
    pub fn on_timer_interrupt(&mut self) {
        self.clock.advance();
        self.update_animations();
        self.update_phases();
        self.process_due();
    }

    /// The key-interrupt line. Only honored mid-game, where it surrenders
    /// the run.
    pub fn on_key_interrupt(&mut self) {
        if self.state.screen == Screen::Game {
            self.surrender();
        }
    }

    /// Gives up the current run: pending events are discarded and the
    /// stats screen is scheduled.
    pub fn surrender(&mut self) {
        debug!("run surrendered");
        self.state.set_decay(false);
        self.cancel_all_events();
        self.set_phase(Phase::Idle);
        self.send(EngineEvent::GameOver { victory: false });
        self.world.show(View::GameOver);
        self.schedule_event(EventId::ShowStats, delay::SECS_2);
    }

    /// Toggles every active animation slot's oscillation value and pushes
    /// the per-animation side effect. Runs every third tick outside pause.
    pub fn update_animations(&mut self) {
        if self.clock.ticks() % ANIMATION_TICK_INTERVAL != 0 || self.state.screen == Screen::Pause {
            return;
        }
        for id in AnimationId::ALL {
            let state = {
                let slot = self.animations.slot_mut(id);
                if !slot.active {
                    continue;
                }
                slot.state = -slot.state;
                slot.state
            };
            match id {
                AnimationId::BitShake => self.world.shake_bit(state),
            }
        }
    }

    /// Scans the queue once, head to tail, firing every due event.
    ///
    /// The pending count is snapshotted at entry. After a removal the scan
    /// re-reads the same index, because the next element has just slid into
    /// the freed slot; advancing would skip it. Events enqueued by handlers
    /// during the scan land beyond the snapshot bound and wait for the next
    /// pass, which keeps per-interrupt work bounded even for zero-delay
    /// self-rescheduling handlers.
    ///
    /// Each due event is removed before its handler runs, so the handler
    /// sees the slot it occupied as free capacity.
    pub fn process_due(&mut self) {
        if self.queue.is_empty() || self.state.screen == Screen::Pause {
            return;
        }
        let now = self.clock.now();
        let mut remaining = self.queue.len();
        let mut index = 0;
        while remaining > 0 && index < self.queue.len() {
            let due_id = match self.queue.get(index) {
                Some(event) if event.due <= now => Some(event.id),
                _ => None,
            };
            match due_id {
                Some(id) => {
                    self.queue.delete_at(index);
                    trace!(?id, time = now, "event due, dispatching");
                    self.send(EngineEvent::EventFired { id, time: now });
                    self.dispatch(id);
                }
                None => index += 1,
            }
            remaining -= 1;
        }
    }

    /// Requests a pause through the event queue.
    pub fn request_pause(&mut self) {
        if self.state.screen == Screen::Game {
            self.schedule_event(EventId::Pause, delay::NOW);
        }
    }

    /// Leaves pause. Pending events were preserved; anything that became
    /// due while paused fires on the next interrupt.
    pub fn resume(&mut self) {
        if self.state.screen != Screen::Pause {
            return;
        }
        self.set_screen(Screen::Game);
        self.set_phase(Phase::AwaitingInput);
        self.world.show(View::Hud);
    }

    /// Starts the intro script from the menu. The menu blink loop stops on
    /// its own once the phase leaves `ShowMenu`.
    pub fn begin_run(&mut self) {
        if self.state.screen != Screen::Menu {
            return;
        }
        self.set_phase(Phase::Idle);
        self.schedule_event(EventId::IntroBoot, delay::NOW);
    }

    /// Records the capsule choice made during the intro and schedules the
    /// follow-up beat. Ignored outside the choice window.
    pub fn select_capsule(&mut self, capsule: Capsule) {
        if self.state.screen != Screen::Menu || self.state.phase != Phase::AwaitingInput {
            return;
        }
        self.state.difficulty = capsule.into();
        self.schedule_event(EventId::CapsuleChosen, delay::NOW);
    }

    /// Ends the run: stops the decay countdown, discards the pending
    /// script and schedules the stats screen.
    pub(crate) fn game_over(&mut self, victory: bool) {
        debug!(victory, "run over");
        self.state.set_decay(false);
        self.cancel_all_events();
        self.send(EngineEvent::GameOver { victory });
        self.world.show(View::GameOver);
        self.set_phase(Phase::Idle);
        self.schedule_event(EventId::ShowStats, delay::SECS_3);
    }

    /// Sets the fine-grained phase, notifying subscribers.
    pub fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            self.state.phase = phase;
            self.send(EngineEvent::PhaseChanged { phase });
        }
    }

    /// Sets the coarse screen state, notifying subscribers.
    pub fn set_screen(&mut self, screen: Screen) {
        if self.state.screen != screen {
            self.state.screen = screen;
            self.send(EngineEvent::ScreenChanged { screen });
        }
    }

    /// Subscribes to the engine's notification stream.
    pub fn subscribe_engine_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.engine_event_sender.subscribe()
    }

    pub(crate) fn send(&self, event: EngineEvent) {
        self.engine_event_sender.send(event).ok();
    }

    // --- Read access for drivers, front-ends and tests ---

    pub fn config(&self) -> &GridfallConfig {
        &self.config
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}
