//! Debug assertion macros for queue invariants.
//!
//! These macros are only active in debug builds (`#[cfg(debug_assertions)]`),
//! so there is zero overhead in release builds. The contract checks that keep
//! the safe API sound (`advance` / `commit` misuse) are not here; those are
//! unconditional `assert!`s in `queue.rs`.

// =============================================================================
// Index bounds
// =============================================================================

/// Assert that an index lies inside the backing store.
///
/// **Invariant**: `0 ≤ index < capacity + 1`
///
/// Used in: `publish_write()` and `publish_read()` before the Release store
macro_rules! debug_assert_index_in_bounds {
    ($name:literal, $index:expr, $slots:expr) => {
        debug_assert!(
            $index < $slots,
            "{} index {} out of bounds for {} slots",
            $name,
            $index,
            $slots
        )
    };
}

// =============================================================================
// Bounded count
// =============================================================================

/// Assert that the logical element count does not exceed capacity.
///
/// **Invariant**: `0 ≤ len ≤ capacity`
///
/// Used in: `len()` after applying the wrap formula
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

// =============================================================================
// Sentinel gap
// =============================================================================

/// Assert that the producer never publishes into the slot the consumer is
/// about to read (the one-slot gap is kept).
///
/// **Invariant**: `(write + 1) mod slots != read` before a publish
///
/// Used in: `publish_write()`
macro_rules! debug_assert_gap_kept {
    ($next_write:expr, $read:expr) => {
        debug_assert!(
            $next_write != $read,
            "write index {} would overrun read index {}",
            $next_write,
            $read
        )
    };
}

/// Assert that the consumer only releases a slot the producer has published.
///
/// **Invariant**: `read != write` before a read publish
///
/// Used in: `publish_read()`
macro_rules! debug_assert_published {
    ($read:expr, $write:expr) => {
        debug_assert!(
            $read != $write,
            "read index {} advanced past write index {}",
            $read,
            $write
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_gap_kept;
pub(crate) use debug_assert_index_in_bounds;
pub(crate) use debug_assert_published;
