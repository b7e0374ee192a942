//! The monotonic game clock advanced by the timer interrupt path.

/// Monotonic tick counter plus the derived elapsed-time value used for
/// event due times.
///
/// The clock is advanced exactly once per timer interrupt and is never
/// written anywhere else. `ticks` counts raw interrupts; `time` advances
/// once every `interruption_rate` ticks and is the unit all scheduling
/// delays are expressed in (one unit is roughly a second at the default
/// rate). Both counters are `u64`, so wraparound is unreachable within any
/// achievable run length and due-time comparisons are plain `<=`.
#[derive(Debug)]
pub struct GameClock {
    ticks: u64,
    time: u64,
    latch: u32,
    interruption_rate: u32,
}

impl GameClock {
    /// Creates a clock from the startup timer configuration. A zero
    /// `interruption_rate` is clamped to 1.
    pub fn new(latch: u32, interruption_rate: u32) -> Self {
        Self {
            ticks: 0,
            time: 0,
            latch,
            interruption_rate: interruption_rate.max(1),
        }
    }

    /// Advances the clock by one tick. Must stay cheap: this runs in the
    /// interrupt path before any deferred processing.
    pub fn advance(&mut self) {
        self.ticks += 1;
        if self.ticks % u64::from(self.interruption_rate) == 0 {
            self.time += 1;
        }
    }

    /// Elapsed time in scheduling units.
    pub fn now(&self) -> u64 {
        self.time
    }

    /// Raw tick counter, used for modulo-gated periodic passes.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The hardware latch value the register-level driver was told to
    /// program at startup. Retained for status reporting only.
    pub fn latch(&self) -> u32 {
        self.latch
    }

    /// Ticks per elapsed-time unit.
    pub fn interruption_rate(&self) -> u32 {
        self.interruption_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_derives_from_ticks_at_the_configured_rate() {
        let mut clock = GameClock::new(0, 3);
        assert_eq!(clock.now(), 0);
        for _ in 0..7 {
            clock.advance();
        }
        assert_eq!(clock.ticks(), 7);
        assert_eq!(clock.now(), 2);
        for _ in 0..2 {
            clock.advance();
        }
        assert_eq!(clock.now(), 3);
    }

    #[test]
    fn zero_rate_is_clamped() {
        let mut clock = GameClock::new(0, 0);
        clock.advance();
        assert_eq!(clock.now(), 1);
    }
}
