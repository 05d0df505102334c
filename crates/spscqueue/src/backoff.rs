use std::hint;
use std::thread;

/// How a blocking `push` / `pop` waits for the peer to publish.
///
/// Every strategy re-checks the peer's index between idles, so FIFO order and
/// visibility are the same whichever one is picked. They only trade latency
/// against CPU usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Cede the processor to the scheduler on every failed check.
    #[default]
    Yield,
    /// Busy spin with PAUSE hints. Lowest latency, burns a core while waiting.
    Spin,
    /// Spin with exponentially more PAUSE hints, then yield once spinning
    /// stops paying off.
    Backoff,
}

impl WaitStrategy {
    /// Idles once. `backoff` carries the spin/yield progression across calls
    /// of a single wait and is ignored by the non-adaptive strategies.
    #[inline]
    pub(crate) fn idle(self, backoff: &mut Backoff) {
        match self {
            Self::Yield => thread::yield_now(),
            Self::Spin => hint::spin_loop(),
            Self::Backoff => backoff.snooze(),
        }
    }
}

/// Adaptive backoff (Crossbeam-style).
///
/// Progressively increases wait time: spin with PAUSE → yield to OS. Unlike a
/// bounded retry helper it never gives up; once spinning is exhausted every
/// further `snooze` yields.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding

    /// Creates a new backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        let spins = 1 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= Self::SPIN_LIMIT {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin until the limit, then yield on every call.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            self.spin();
        } else {
            thread::yield_now();
        }
    }

    /// Returns true once spinning is exhausted and `snooze` yields.
    #[inline]
    pub fn is_yielding(&self) -> bool {
        self.step > Self::SPIN_LIMIT
    }

    /// Reset for next wait cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();
        assert_eq!(b.step, 0);

        b.spin();
        assert!(b.step > 0);

        while !b.is_yielding() {
            b.snooze();
        }
        assert_eq!(b.step, Backoff::SPIN_LIMIT + 1);

        // Yielding does not advance further
        b.snooze();
        b.snooze();
        assert_eq!(b.step, Backoff::SPIN_LIMIT + 1);

        b.reset();
        assert_eq!(b.step, 0);
    }

    #[test]
    fn test_wait_strategy_default_is_yield() {
        assert_eq!(WaitStrategy::default(), WaitStrategy::Yield);
    }

    #[test]
    fn test_idle_only_drives_backoff_for_adaptive_strategy() {
        let mut b = Backoff::new();
        WaitStrategy::Yield.idle(&mut b);
        WaitStrategy::Spin.idle(&mut b);
        assert_eq!(b.step, 0);

        WaitStrategy::Backoff.idle(&mut b);
        assert_eq!(b.step, 1);
    }
}
