//! Retry loops for callers that need a whole slice moved.
//!
//! [`RingBuffer`] itself never retries: a call either moves what it can or
//! times out. Producers and consumers that must transfer an exact amount
//! keep calling until done, accumulating short transfers and treating
//! timeouts as retryable. These helpers are that loop.

use crate::{RingBuffer, RingError};
use std::time::Duration;
use tracing::debug;

/// How a transfer helper reacts to timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Give up after this many timeouts in a row. `None` retries forever.
    pub max_consecutive_timeouts: Option<u32>,
    /// Timeout passed to each individual read/write call.
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Retries forever, waiting up to `timeout` per attempt.
    pub const fn forever(timeout: Duration) -> Self {
        Self {
            max_consecutive_timeouts: None,
            timeout,
        }
    }

    /// Gives up after `max` consecutive timeouts.
    pub const fn bounded(max: u32, timeout: Duration) -> Self {
        Self {
            max_consecutive_timeouts: Some(max),
            timeout,
        }
    }

    fn exhausted(&self, consecutive: u32) -> bool {
        self.max_consecutive_timeouts
            .is_some_and(|max| consecutive >= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::forever(crate::DEFAULT_TIMEOUT)
    }
}

/// Writes all of `src`, retrying short writes and timeouts per `policy`.
///
/// Returns `Incomplete` with the number of elements already written if the
/// policy runs out of patience. Those elements stay in the buffer.
pub fn write_all<T: Copy>(
    ring: &RingBuffer<T>,
    src: &[T],
    policy: RetryPolicy,
) -> Result<(), RingError> {
    let mut written = 0;
    let mut timeouts = 0;

    while written < src.len() {
        match ring.write_timeout(&src[written..], policy.timeout) {
            Ok(n) => {
                written += n;
                timeouts = 0;
            }
            Err(RingError::Timeout { .. }) => {
                timeouts += 1;
                debug!(written, requested = src.len(), timeouts, "producer: timeout");
                if policy.exhausted(timeouts) {
                    return Err(RingError::Incomplete {
                        transferred: written,
                        requested: src.len(),
                    });
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Fills all of `dst`, retrying short reads and timeouts per `policy`.
///
/// Returns `Incomplete` with the number of elements already read into the
/// front of `dst` if the policy runs out of patience.
pub fn read_exact<T: Copy>(
    ring: &RingBuffer<T>,
    dst: &mut [T],
    policy: RetryPolicy,
) -> Result<(), RingError> {
    let requested = dst.len();
    let mut received = 0;
    let mut timeouts = 0;

    while received < requested {
        match ring.read_timeout(&mut dst[received..], policy.timeout) {
            Ok(n) => {
                received += n;
                timeouts = 0;
            }
            Err(RingError::Timeout { .. }) => {
                timeouts += 1;
                debug!(received, requested, timeouts, "consumer: timeout");
                if policy.exhausted(timeouts) {
                    return Err(RingError::Incomplete {
                        transferred: received,
                        requested,
                    });
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
