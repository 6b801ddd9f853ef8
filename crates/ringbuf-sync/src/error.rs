//! Error types for ring buffer operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in ring buffer operations.
///
/// A short transfer (fewer elements moved than requested) is not an error;
/// the element count is returned in `Ok` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The buffer stayed full (write) or empty (read) for the whole timeout.
    /// Nothing was transferred.
    #[error("timed out after {waited:?} waiting on the ring buffer")]
    Timeout {
        /// The timeout that elapsed.
        waited: Duration,
    },

    /// Construction with fewer than two raw slots.
    #[error("raw capacity {raw} is too small (need at least 2 slots)")]
    CapacityTooSmall {
        /// The requested raw capacity.
        raw: usize,
    },

    /// A usable capacity so large that the sentinel slot cannot be added.
    #[error("usable capacity {usable} leaves no room for the sentinel slot")]
    CapacityOverflow {
        /// The requested usable capacity.
        usable: usize,
    },

    /// A transfer helper gave up after exhausting its retry policy.
    #[error("transfer incomplete: {transferred} of {requested} elements moved")]
    Incomplete {
        /// Elements moved before giving up.
        transferred: usize,
        /// Elements the caller asked for.
        requested: usize,
    },

    /// Payload length does not fit in a frame header.
    #[error("payload of {len} bytes is too large for a frame header")]
    PayloadTooLarge {
        /// The payload length.
        len: usize,
    },

    /// A received frame header announces more bytes than the receiver accepts.
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge {
        /// Length carried by the frame header.
        len: usize,
        /// Largest payload the receiver accepts.
        max: usize,
    },

    /// A received frame failed its CRC32 check.
    #[error("checksum mismatch: header says {expected:#010x}, payload has {actual:#010x}")]
    ChecksumMismatch {
        /// Checksum carried by the frame header.
        expected: u32,
        /// Checksum computed over the received payload.
        actual: u32,
    },
}

impl RingError {
    /// Returns `true` if retrying the same call may succeed (e.g., `Timeout`).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Incomplete { .. })
    }

    /// Returns `true` if this is a timeout.
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
