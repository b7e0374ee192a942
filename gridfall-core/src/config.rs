//! Engine configuration structures.
//!
//! These structs are deserialized with `serde`, typically from a
//! `gridfall.toml` file merged with `GRIDFALL_*` environment variables via
//! the `config` crate. Every field carries a default, so an absent file
//! yields a fully usable configuration.

use std::time::Duration;

use serde::Deserialize;

/// The top-level configuration for the engine and its timer driver.
#[derive(Debug, Clone, Deserialize)]
pub struct GridfallConfig {
    /// Tick speed of the simulated hardware timer.
    #[serde(default)]
    pub resolution: ClockResolution,

    /// Values the register-level timer driver is programmed with at startup.
    #[serde(default)]
    pub timer: TimerConfig,

    /// Gameplay tuning knobs.
    #[serde(default)]
    pub rules: RuleConfig,
}

impl GridfallConfig {
    /// Loads configuration from `<name>.toml` (optional) overlaid with
    /// `GRIDFALL_*` environment variables.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix("GRIDFALL").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for GridfallConfig {
    fn default() -> Self {
        Self {
            resolution: ClockResolution::default(),
            timer: TimerConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

/// Operational speed of the timer interrupt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// ~60 interrupts per second.
    High,
    /// ~30 interrupts per second. The default.
    Medium,
    /// 1 interrupt per second. Useful for watching the script unfold.
    Low,
    /// A user-defined speed in interrupts per second.
    Custom { ticks_per_second: u64 },
}

impl ClockResolution {
    /// The interval between two timer interrupts at this resolution.
    pub fn period(&self) -> Duration {
        match self {
            ClockResolution::High => Duration::from_nanos(1_000_000_000 / 60),
            ClockResolution::Medium => Duration::from_nanos(1_000_000_000 / 30),
            ClockResolution::Low => Duration::from_secs(1),
            ClockResolution::Custom { ticks_per_second } => {
                Duration::from_nanos(1_000_000_000 / (*ticks_per_second).max(1))
            }
        }
    }
}

impl Default for ClockResolution {
    fn default() -> Self {
        ClockResolution::Medium
    }
}

/// Startup values for the hardware timer registers.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerConfig {
    /// Data-register latch value the hardware driver programs once at
    /// startup. Recorded and logged; the simulated driver derives its
    /// cadence from [`ClockResolution`] instead.
    #[serde(default)]
    pub latch: u32,

    /// Ticks per elapsed-time unit. With the default resolution this makes
    /// one scheduling unit equal one second.
    #[serde(default = "default_interruption_rate")]
    pub interruption_rate: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            latch: 0,
            interruption_rate: default_interruption_rate(),
        }
    }
}

/// Gameplay tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Length of the decay window, in elapsed-time units.
    #[serde(default = "default_decay_window")]
    pub decay_window: i32,

    /// Overflows that must be achieved against a grid before its decay
    /// window expires.
    #[serde(default = "default_min_overflows")]
    pub min_overflows: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            decay_window: default_decay_window(),
            min_overflows: default_min_overflows(),
        }
    }
}

// --- Default value functions for serde ---

fn default_interruption_rate() -> u32 {
    30
}

fn default_decay_window() -> i32 {
    20
}

fn default_min_overflows() -> u32 {
    3
}
