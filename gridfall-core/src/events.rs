//! The closed set of schedulable events and the engine's broadcast
//! notifications.
//!
//! `EventId` is the public vocabulary of the dispatch table: every value
//! names exactly one handler arm, so an unmapped identifier cannot exist at
//! runtime. `EngineEvent` is the observability stream the engine publishes
//! while it runs; subscribers (loggers, front-ends) consume it without ever
//! feeding back into scheduling.

use crate::state::{Phase, Screen};

/// Relative scheduling delays, in elapsed-time units. One unit corresponds
/// to one wall-clock second at the default interruption rate.
pub mod delay {
    pub const NOW: u64 = 0;
    pub const SECS_1: u64 = 1;
    pub const SECS_2: u64 = 2;
    pub const SECS_3: u64 = 3;
    pub const SECS_4: u64 = 4;
    pub const SECS_5: u64 = 5;
}

/// Identifier of a deferred, time-stamped event.
///
/// Scheduling one of these is the only way game logic moves forward in
/// time: each handler runs once when due, mutates shared state, and may
/// schedule its successors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    // Main menu.
    MenuStart,
    MenuHidePrompt,
    MenuShowPrompt,
    ShowControls,
    ShowGameplay,
    ShowLore,
    ShowLore2,

    // Intro cut-scene.
    IntroBoot,
    IntroWake,
    IntroLine1,
    IntroLine2,
    IntroGlitch,
    IntroLine3,
    IntroChoice,
    IntroShowCapsules,
    CapsuleChosen,
    IntroTaunt,
    IntroHandoff,
    SetBackdropTitle,
    SetBackdropGrid,
    SetBackdropGrid2,
    ClearText,

    // Gameplay.
    GameStart,
    ArmDecay,
    DecayCheck,
    DropBitBlock,
    RegenerateBitBlock,
    HideGrid,
    RegenerateGrid,
    DestroyGrid,
    RunnerMoveX,
    RunnerMoveY,
    EvaluateBitBlock,
    ShowHud,
    ShowStats,
    ListenInput,
    Pause,
}

/// Notifications broadcast by the engine as it runs.
///
/// Sent synchronously from the interrupt path with `send(..).ok()`; a
/// missing subscriber is never an error.
#[derive(Debug, Clone, Copy)]
pub enum EngineEvent {
    /// Fired once when the engine is powered on and the boot script is
    /// scheduled.
    EngineStarted,
    /// Fired when the driver loop is about to exit.
    EngineShutdown,
    /// A schedule request was accepted.
    EventScheduled { id: EventId, due: u64 },
    /// A schedule request hit a full queue and was dropped.
    EventDropped { id: EventId },
    /// An event became due and its handler ran.
    EventFired { id: EventId, time: u64 },
    /// The pending queue was cleared.
    QueueCleared { count: usize },
    /// The fine-grained phase changed.
    PhaseChanged { phase: Phase },
    /// The coarse screen state changed.
    ScreenChanged { screen: Screen },
    /// The run ended.
    GameOver { victory: bool },
}
