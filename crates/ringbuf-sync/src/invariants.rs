//! Debug assertion macros for ring buffer cursor invariants.
//!
//! Only active in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.
//!
//! Used by `RingBuffer<T>` while the state lock is held.

// =============================================================================
// Cursor Range
// =============================================================================

/// Assert that a cursor lies inside the backing array.
///
/// **Invariant**: `0 ≤ cursor < raw_capacity`
///
/// Used in: `write_locked()` / `read_locked()` after advancing `rear` / `front`
macro_rules! debug_assert_cursor_in_range {
    ($name:literal, $cursor:expr, $raw:expr) => {
        debug_assert!(
            $cursor < $raw,
            "cursor out of range: {} = {} with raw capacity {}",
            $name,
            $cursor,
            $raw
        )
    };
}

// =============================================================================
// Bounded Count (one slot sacrificed)
// =============================================================================

/// Assert that the occupied count never reaches the raw capacity.
///
/// **Invariant**: `(rear + raw - front) % raw ≤ raw - 1`
///
/// Used in: `write_locked()` after advancing `rear`
macro_rules! debug_assert_bounded_count {
    ($count:expr, $raw:expr) => {
        debug_assert!(
            $count < $raw,
            "bounded count violated: {} elements in a buffer of {} raw slots",
            $count,
            $raw
        )
    };
}

// =============================================================================
// Split Copy Accounting
// =============================================================================

/// Assert that the two copy segments add up to the planned transfer.
///
/// **Invariant**: `first + second == total`
///
/// Used in: `write_locked()` / `read_locked()` after the wraparound split
macro_rules! debug_assert_split {
    ($first:expr, $second:expr, $total:expr) => {
        debug_assert_eq!(
            $first + $second,
            $total,
            "split copy mismatch: {} + {} != {}",
            $first,
            $second,
            $total
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_cursor_in_range;
pub(crate) use debug_assert_split;
