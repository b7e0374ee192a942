//! # Gridfall
//!
//! A deterministic, tick-driven event scheduling and phase engine for a
//! grid puzzle game.
//!
//! Gridfall models the timing core of an interrupt-driven machine: a
//! periodic timer advances a monotonic clock, and all game logic runs as
//! deferred, time-stamped events drained at a controlled point in the
//! interrupt chain. Cut-scenes and gameplay progression are chains of
//! self-rescheduling handlers; nothing ever blocks or sleeps.
//!
//! ## Core Concepts
//!
//! - **GameClock**: a raw tick counter plus a derived elapsed-time value;
//!   every scheduling delay is expressed in elapsed-time units.
//! - **EventQueue**: a bounded, order-preserving queue with compacting
//!   removal. A full queue drops new requests silently, by contract.
//! - **Interrupt cadence**: each timer interrupt runs the animation ticker
//!   (every 3rd tick), the phase machine (every 15th tick) and the due-scan,
//!   in that fixed order.
//! - **World seam**: rendering, sprites, input and effect physics live
//!   behind the [`world::World`] trait; the engine only consumes boolean
//!   effect-completion probes.
//! - **Configuration-Driven**: timer rate, latch and gameplay tuning come
//!   from a [`config::GridfallConfig`], typically loaded from a TOML file.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gridfall::prelude::*;
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Create a default configuration.
//!     let config = GridfallConfig::default();
//!
//!     // 2. Create the engine against a do-nothing world.
//!     let engine = GridfallEngine::new(config, NullWorld);
//!
//!     // 3. Subscribe to the notification stream before starting.
//!     let mut events = engine.subscribe_engine_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("engine event: {:?}", event);
//!         }
//!     });
//!
//!     // 4. Wrap the engine in the timer driver and run it.
//!     let (driver, commands) = TimerDriver::new(engine);
//!     let (shutdown_tx, _) = broadcast::channel(1);
//!     let handle = tokio::spawn(driver.run(shutdown_tx.subscribe()));
//!
//!     // 5. Press start, then let it run until Ctrl+C.
//!     commands.send(DriverCommand::Key(KeyPress::Start)).await?;
//!     tokio::signal::ctrl_c().await?;
//!     shutdown_tx.send(()).ok();
//!     handle.await??;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Gridfall Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod driver;
pub mod engine;
pub mod events;
pub mod state;
pub mod time;
pub mod world;

/// A prelude module for easy importing of the most common Gridfall types.
pub mod prelude {
    pub use crate::common::{AnimationId, Axis, Capsule, EventKey};
    pub use crate::config::{ClockResolution, GridfallConfig};
    pub use crate::driver::{DriverCommand, KeyPress, TimerDriver};
    pub use crate::engine::GridfallEngine;
    pub use crate::events::{delay, EngineEvent, EventId};
    pub use crate::state::{Difficulty, GameState, Phase, Screen};
    pub use crate::world::{Backdrop, NullWorld, View, World};
}
