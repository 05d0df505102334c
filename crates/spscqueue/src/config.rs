use crate::{ConfigError, WaitStrategy};

/// Configuration for a [`Queue`](crate::Queue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of elements the queue holds (default: 1024).
    /// The backing store has one more slot than this.
    pub capacity: usize,
    /// How blocking `push` / `pop` wait for the peer (default: `Yield`)
    pub wait_strategy: WaitStrategy,
}

impl Config {
    /// Creates a configuration for `capacity` elements with the default
    /// wait strategy.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            wait_strategy: WaitStrategy::Yield,
        }
    }

    /// Sets the wait strategy.
    pub const fn with_wait_strategy(mut self, wait_strategy: WaitStrategy) -> Self {
        self.wait_strategy = wait_strategy;
        self
    }

    /// Returns the number of backing slots, `capacity + 1`.
    #[inline]
    pub const fn slots(&self) -> Result<usize, ConfigError> {
        match self.capacity.checked_add(1) {
            Some(slots) => Ok(slots),
            None => Err(ConfigError::CapacityOverflow {
                capacity: self.capacity,
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Low latency configuration (1K elements, busy spin while blocked)
pub const LOW_LATENCY_CONFIG: Config = Config::new(1024).with_wait_strategy(WaitStrategy::Spin);

/// Low CPU configuration (64K elements, spin-then-yield backoff while blocked)
pub const LOW_CPU_CONFIG: Config = Config::new(1 << 16).with_wait_strategy(WaitStrategy::Backoff);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_reserve_sentinel_gap() {
        assert_eq!(Config::new(8).slots(), Ok(9));
        assert_eq!(Config::new(0).slots(), Ok(1));
    }

    #[test]
    fn test_slots_overflow() {
        assert_eq!(
            Config::new(usize::MAX).slots(),
            Err(ConfigError::CapacityOverflow {
                capacity: usize::MAX
            })
        );
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::default().wait_strategy, WaitStrategy::Yield);
        assert_eq!(LOW_LATENCY_CONFIG.wait_strategy, WaitStrategy::Spin);
        assert_eq!(LOW_CPU_CONFIG.capacity, 65536);
    }
}
