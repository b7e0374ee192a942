//! The simulated hardware: a timer interrupt line and a key interrupt line.
//!
//! `TimerDriver` owns the engine outright, which preserves a single-core
//! execution model: one foreground context, with "interrupts"
//! (interval ticks and key commands) serialized through a single `select!`
//! loop. The scheduling core itself stays synchronous and can be exercised
//! in tests by calling the engine's entry points directly, with no driver
//! at all.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::common::Capsule;
use crate::engine::GridfallEngine;
use crate::events::{delay, EngineEvent, EventId};
use crate::state::{Phase, Screen};
use crate::world::World;

/// Keys the input collaborator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Leave the menu and start the intro script.
    Start,
    /// Request a runner move along the X axis.
    MoveX,
    /// Request a runner move along the Y axis.
    MoveY,
    /// Drop the bit block.
    Drop,
    /// Evaluate the dropped bit block against the grid.
    Evaluate,
    ChooseBlue,
    ChooseRed,
    Pause,
    Resume,
    /// The interrupt-wired surrender combination.
    Surrender,
}

/// Commands accepted by the driver loop.
#[derive(Debug, Clone, Copy)]
pub enum DriverCommand {
    Key(KeyPress),
    /// Log a snapshot of clock, state and queue depth.
    Status,
    Shutdown,
}

/// Drives the engine with a tokio interval standing in for the hardware
/// timer. Command senders play the role of the key matrix.
pub struct TimerDriver<W: World> {
    engine: GridfallEngine<W>,
    command_rx: mpsc::Receiver<DriverCommand>,
}

impl<W: World> TimerDriver<W> {
    /// Wraps an engine, returning the driver and the command handle used
    /// by front-ends to inject input.
    pub fn new(engine: GridfallEngine<W>) -> (Self, mpsc::Sender<DriverCommand>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        (Self { engine, command_rx }, command_tx)
    }

    pub fn engine(&self) -> &GridfallEngine<W> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridfallEngine<W> {
        &mut self.engine
    }

    /// Powers the engine on and runs the interrupt loop until a shutdown
    /// signal or command arrives.
    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let period = self.engine.config().resolution.period();
        info!(
            ?period,
            latch = self.engine.config().timer.latch,
            rate = self.engine.config().timer.interruption_rate,
            "timer driver configured"
        );
        self.engine.power_on();

        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                Some(command) = self.command_rx.recv() => {
                    if self.handle_command(command) {
                        break;
                    }
                }
                _ = interval.tick() => self.engine.on_timer_interrupt(),
            }
        }

        self.engine.send(EngineEvent::EngineShutdown);
        info!("timer driver stopped");
        Ok(())
    }

    /// Returns `true` when the driver should stop.
    fn handle_command(&mut self, command: DriverCommand) -> bool {
        match command {
            DriverCommand::Key(key) => self.handle_key(key),
            DriverCommand::Status => {
                let state = self.engine.state();
                info!(
                    ticks = self.engine.clock().ticks(),
                    time = self.engine.clock().now(),
                    screen = ?state.screen,
                    phase = ?state.phase,
                    score = state.score,
                    decay_left = state.decay_left,
                    pending = self.engine.queue().len(),
                    "status"
                );
            }
            DriverCommand::Shutdown => return true,
        }
        false
    }

    /// The input collaborator: inspects the game state and either schedules
    /// gameplay events or pokes the engine's direct controls.
    fn handle_key(&mut self, key: KeyPress) {
        debug!(?key, "key received");
        let screen = self.engine.state().screen;
        let phase = self.engine.state().phase;
        let in_play = screen == Screen::Game && phase == Phase::AwaitingInput;
        match key {
            KeyPress::Start => self.engine.begin_run(),
            KeyPress::MoveX => {
                if in_play {
                    self.engine.schedule_event(EventId::RunnerMoveX, delay::NOW);
                }
            }
            KeyPress::MoveY => {
                if in_play {
                    self.engine.schedule_event(EventId::RunnerMoveY, delay::NOW);
                }
            }
            KeyPress::Drop => {
                if in_play {
                    self.engine.schedule_event(EventId::DropBitBlock, delay::NOW);
                }
            }
            KeyPress::Evaluate => {
                if in_play {
                    self.engine
                        .schedule_event(EventId::EvaluateBitBlock, delay::NOW);
                }
            }
            KeyPress::ChooseBlue => self.engine.select_capsule(Capsule::Blue),
            KeyPress::ChooseRed => self.engine.select_capsule(Capsule::Red),
            KeyPress::Pause => self.engine.request_pause(),
            KeyPress::Resume => self.engine.resume(),
            KeyPress::Surrender => self.engine.on_key_interrupt(),
        }
    }
}
