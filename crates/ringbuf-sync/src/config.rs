use crate::RingError;
use std::time::Duration;

/// Timeout applied by [`RingBuffer::write`](crate::RingBuffer::write) and
/// [`RingBuffer::read`](crate::RingBuffer::read) when no explicit timeout is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Configuration for a [`RingBuffer`](crate::RingBuffer).
///
/// `raw_capacity` is the number of slots physically allocated. One slot is
/// always kept free to tell "empty" from "full", so the buffer holds at most
/// `raw_capacity - 1` elements at once. Use [`Config::with_usable_capacity`]
/// when you want to think in terms of elements held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of allocated slots (must be at least 2)
    pub raw_capacity: usize,
    /// Timeout used by the blocking calls that don't take one explicitly
    pub default_timeout: Duration,
}

impl Config {
    /// Creates a configuration allocating `raw_capacity` slots.
    pub const fn new(raw_capacity: usize) -> Self {
        Self {
            raw_capacity,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration able to hold exactly `usable` elements.
    ///
    /// `usize::MAX` has no room for the sentinel slot and is clamped to a raw
    /// capacity of `usize::MAX` (one element fewer than asked). Use
    /// [`Config::try_with_usable_capacity`] to reject that case instead.
    pub const fn with_usable_capacity(usable: usize) -> Self {
        Self::new(usable.saturating_add(1))
    }

    /// Like [`Config::with_usable_capacity`], but fails with
    /// [`RingError::CapacityOverflow`] when `usable + 1` overflows.
    pub const fn try_with_usable_capacity(usable: usize) -> Result<Self, RingError> {
        match usable.checked_add(1) {
            Some(raw) => Ok(Self::new(raw)),
            None => Err(RingError::CapacityOverflow { usable }),
        }
    }

    /// Sets the default timeout.
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Returns the maximum number of elements the buffer can hold at once.
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        self.raw_capacity.saturating_sub(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Small configuration (16 slots, 15 usable)
pub const SMALL_CONFIG: Config = Config::new(16);

/// Large configuration (1M slots)
pub const LARGE_CONFIG: Config = Config::new(1024 * 1024);
