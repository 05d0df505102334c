//! Error types for queue construction and non-blocking enqueue.

use std::fmt;
use thiserror::Error;

/// Error returned by [`Producer::offer`](crate::Producer::offer) when no slot
/// is free. Carries the rejected value back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("queue is full")]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be enqueued.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

/// Errors from building a queue out of a [`Config`](crate::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `capacity + 1` backing slots cannot be represented.
    #[error("capacity {capacity} leaves no room for the sentinel slot")]
    CapacityOverflow {
        /// The requested capacity.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_returns_value() {
        let err = Full(String::from("payload"));
        assert_eq!(err.to_string(), "queue is full");
        assert_eq!(format!("{err:?}"), "Full(..)");
        assert_eq!(err.into_inner(), "payload");
    }
}
