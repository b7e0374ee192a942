use anyhow::Result;
use gridfall::prelude::*;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

/// A world that renders nothing but narrates every collaborator call, with
/// just enough toy physics for the phase machine to make progress.
#[derive(Debug, Default)]
struct DemoWorld {
    fall_steps: u8,
    decay_steps: u8,
    overflow_next: bool,
}

impl World for DemoWorld {
    fn set_backdrop(&mut self, backdrop: Backdrop) {
        info!("[WORLD] backdrop -> {:?}", backdrop);
    }
    fn show(&mut self, view: View) {
        info!("[WORLD] view -> {:?}", view);
    }
    fn say(&mut self, row: u8, line: &str) {
        info!("[WORLD] row {:02}: {}", row, line);
    }
    fn clear_text(&mut self) {
        info!("[WORLD] text cleared");
    }
    fn display_grid(&mut self, visible: bool) {
        info!("[WORLD] grid visible: {}", visible);
    }
    fn spawn_capsules(&mut self) {
        info!("[WORLD] capsules offered");
    }
    fn resolve_capsule(&mut self, capsule: Capsule) {
        info!("[WORLD] capsule resolved: {:?}", capsule);
    }
    fn spawn_runner(&mut self) {
        info!("[WORLD] runner spawned");
    }
    fn rebuild_bit_block(&mut self) {
        info!("[WORLD] bit block rebuilt");
    }
    fn rebuild_grid(&mut self) {
        info!("[WORLD] grid rebuilt");
    }
    fn begin_move(&mut self, axis: Axis) {
        info!("[WORLD] runner moving along {:?}", axis);
    }
    fn update_pivot(&mut self) {
        info!("[WORLD] pivot updated");
    }
    fn shake_bit(&mut self, offset: i8) {
        info!("[WORLD] bit shake offset {}", offset);
    }
    fn commit_frame(&mut self) {}

    fn bit_block_landed(&mut self) -> bool {
        if self.fall_steps == 0 {
            self.fall_steps = 3;
            true
        } else {
            self.fall_steps -= 1;
            false
        }
    }
    fn grid_decay_done(&mut self) -> bool {
        if self.decay_steps == 0 {
            self.decay_steps = 2;
            true
        } else {
            self.decay_steps -= 1;
            false
        }
    }
    fn move_finished(&mut self, _axis: Axis) -> bool {
        true
    }
    fn capsule_landed(&mut self, _capsule: Capsule) -> bool {
        true
    }
    fn bit_block_overflowed(&mut self) -> bool {
        self.overflow_next = !self.overflow_next;
        self.overflow_next
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    // 2. Load configuration (gridfall.toml if present), then speed the
    //    timer up so the whole script unfolds in a short demo session.
    let mut config = GridfallConfig::load("gridfall")?;
    config.resolution = ClockResolution::Custom {
        ticks_per_second: 300,
    };

    // 3. Create the engine and subscribe to its notification stream.
    let engine = GridfallEngine::new(config, DemoWorld::default());
    spawn_event_listener(&engine);

    // 4. Wrap the engine in the timer driver.
    let (driver, commands) = TimerDriver::new(engine);

    // 5. Spawn an autopilot that plays a few rounds by reacting to the
    //    engine's own notifications.
    let mut pilot_rx = driver.engine().subscribe_engine_events();
    let pilot_commands = commands.clone();
    tokio::spawn(async move { autopilot(&mut pilot_rx, pilot_commands).await });

    // 6. Run until Ctrl+C.
    let (shutdown_tx, _) = broadcast::channel(1);
    let driver_handle = tokio::spawn(driver.run(shutdown_tx.subscribe()));

    commands.send(DriverCommand::Key(KeyPress::Start)).await?;
    info!(
        "{} v{} demo running. Press Ctrl+C to shut down.",
        gridfall::ENGINE_NAME,
        gridfall::VERSION
    );
    tokio::signal::ctrl_c().await?;
    shutdown_tx.send(()).ok();
    driver_handle.await??;
    Ok(())
}

/// Prints every notification the engine emits.
fn spawn_event_listener<W: World>(engine: &GridfallEngine<W>) {
    let mut events_rx = engine.subscribe_engine_events();
    tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            match event {
                EngineEvent::EventScheduled { .. } => {}
                other => info!("[ENGINE] => {:?}", other),
            }
        }
    });
}

/// Reacts to script milestones the way a (very patient) player would.
async fn autopilot(
    events: &mut broadcast::Receiver<EngineEvent>,
    commands: mpsc::Sender<DriverCommand>,
) {
    while let Ok(event) = events.recv().await {
        let key = match event {
            EngineEvent::EventFired {
                id: EventId::IntroShowCapsules,
                ..
            } => Some(KeyPress::ChooseBlue),
            EngineEvent::EventFired {
                id: EventId::ShowHud,
                ..
            } => Some(KeyPress::Drop),
            EngineEvent::EventFired {
                id: EventId::RegenerateBitBlock,
                ..
            } => Some(KeyPress::Evaluate),
            EngineEvent::GameOver { .. } => {
                info!("[PILOT] run over, idling");
                None
            }
            _ => None,
        };
        if let Some(key) = key {
            // Give the driver a beat to process pending interrupts first.
            tokio::time::sleep(Duration::from_millis(50)).await;
            if commands.send(DriverCommand::Key(key)).await.is_err() {
                break;
            }
        }
    }
}
