use crate::invariants::{debug_assert_bounded_count, debug_assert_cursor_in_range, debug_assert_split};
use crate::{Config, RingError};
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;

// =============================================================================
// SYNCHRONIZATION STRATEGY
// =============================================================================
//
// One mutex guards the whole shared state: the backing array and both
// cursors. Two condition variables hang off that mutex:
//
// - `space_available`: writers wait here while the buffer is full
// - `data_available`:  readers wait here while the buffer is empty
//
// ## Empty vs Full
//
// Cursors are wrapped indices in `[0, raw)`. One slot is never written so
// that the two states stay distinguishable:
// - empty: `front == rear`
// - full:  `(rear + 1) % raw == front`
// - occupied count: `(rear + raw - front) % raw`, at most `raw - 1`
//
// ## Write path
// 1. Lock, then wait on `space_available` while full (single deadline,
//    predicate re-checked after every wakeup)
// 2. Timeout while still full: return `Timeout`, nothing copied
// 3. Copy `min(free, len)` elements in at most two segments
//    (`rear..raw`, then `0..`)
// 4. Advance `rear`, then `notify_all` on `data_available`
//
// ## Read path
// Mirror image: wait on `data_available` while empty, copy from `front`,
// advance `front`, `notify_all` on `space_available`.
//
// The copy and the cursor update both happen before the notify and under
// the same lock, so a woken waiter always sees whole segments.
//
// =============================================================================

/// Bounded, blocking ring buffer for `Copy` elements.
///
/// Any number of threads may call [`write`](Self::write) and
/// [`read`](Self::read) concurrently. Transfers may be short: a call moves as
/// many elements as currently fit (or are available) and returns that count.
/// A call only fails when the buffer stays full (or empty) for the whole
/// timeout, in which case nothing is moved.
///
/// A buffer built with `raw_capacity` slots holds at most
/// `raw_capacity - 1` elements. Both figures are exposed through
/// [`raw_capacity`](Self::raw_capacity) and
/// [`usable_capacity`](Self::usable_capacity).
///
/// # Example
///
/// ```
/// use ringbuf_sync::{Config, RingBuffer};
///
/// let ring = RingBuffer::<u8>::new(Config::new(16));
/// assert_eq!(ring.write(b"hello").unwrap(), 5);
///
/// let mut out = [0u8; 8];
/// let n = ring.read(&mut out).unwrap();
/// assert_eq!(&out[..n], b"hello");
/// ```
pub struct RingBuffer<T> {
    state: Mutex<State<T>>,
    /// Signalled after a read frees slots
    space_available: Condvar,
    /// Signalled after a write publishes elements
    data_available: Condvar,
    config: Config,
}

/// Everything the lock protects.
struct State<T> {
    /// Fixed-size backing array. `Box<[T]>` because it never grows.
    storage: Box<[T]>,
    /// Next slot to read
    front: usize,
    /// Next slot to write
    rear: usize,
}

impl<T> State<T> {
    #[inline]
    fn raw(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    fn len(&self) -> usize {
        (self.rear + self.raw() - self.front) % self.raw()
    }

    #[inline]
    fn free(&self) -> usize {
        self.raw() - 1 - self.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.front == self.rear
    }

    #[inline]
    fn is_full(&self) -> bool {
        (self.rear + 1) % self.raw() == self.front
    }
}

impl<T: Copy> State<T> {
    /// Appends as much of `src` as fits. Returns the number of elements copied.
    fn write_locked(&mut self, src: &[T]) -> usize {
        let raw = self.raw();
        let rear = self.rear;
        let total = self.free().min(src.len());

        // Segment 1 runs up to the physical end, segment 2 wraps to index 0.
        let first = total.min(raw - rear);
        let second = total - first;
        debug_assert_split!(first, second, total);

        self.storage[rear..rear + first].copy_from_slice(&src[..first]);
        self.storage[..second].copy_from_slice(&src[first..total]);

        self.rear = (rear + total) % raw;
        debug_assert_cursor_in_range!("rear", self.rear, raw);
        debug_assert_bounded_count!(self.len(), raw);

        total
    }

    /// Removes up to `dst.len()` elements into `dst`. Returns the number copied.
    fn read_locked(&mut self, dst: &mut [T]) -> usize {
        let raw = self.raw();
        let front = self.front;
        let total = self.len().min(dst.len());

        let first = total.min(raw - front);
        let second = total - first;
        debug_assert_split!(first, second, total);

        dst[..first].copy_from_slice(&self.storage[front..front + first]);
        dst[first..total].copy_from_slice(&self.storage[..second]);

        self.front = (front + total) % raw;
        debug_assert_cursor_in_range!("front", self.front, raw);

        total
    }
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates a ring buffer with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.raw_capacity < 2`. Such a buffer could never hold an
    /// element. Use [`try_new`](Self::try_new) to get an error instead.
    pub fn new(config: Config) -> Self {
        match Self::try_new(config) {
            Ok(ring) => ring,
            Err(e) => panic!("invalid ring buffer config: {e}"),
        }
    }

    /// Creates a ring buffer, rejecting configurations with fewer than two
    /// raw slots.
    pub fn try_new(config: Config) -> Result<Self, RingError> {
        let raw = config.raw_capacity;
        if raw < 2 {
            return Err(RingError::CapacityTooSmall { raw });
        }

        let storage = vec![T::default(); raw].into_boxed_slice();

        Ok(Self {
            state: Mutex::new(State {
                storage,
                front: 0,
                rear: 0,
            }),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
            config,
        })
    }

    /// Shorthand for `RingBuffer::new(Config::new(raw_capacity))`.
    pub fn with_capacity(raw_capacity: usize) -> Self {
        Self::new(Config::new(raw_capacity))
    }
}

impl<T> RingBuffer<T> {
    // ---------------------------------------------------------------------
    // CAPACITY & STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of physically allocated slots.
    #[inline]
    pub fn raw_capacity(&self) -> usize {
        self.config.raw_capacity
    }

    /// Returns the maximum number of elements held at once (`raw - 1`).
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.config.usable_capacity()
    }

    /// Returns the timeout used by [`write`](Self::write) and [`read`](Self::read).
    #[inline]
    pub fn default_timeout(&self) -> Duration {
        self.config.default_timeout
    }

    /// Returns the configuration this buffer was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of buffered elements.
    ///
    /// This is a snapshot: other threads may change it right after return.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns the number of elements that could be written right now.
    pub fn free_slots(&self) -> usize {
        self.lock().free()
    }

    /// Returns true if no element is buffered (snapshot).
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns true if no element can be written (snapshot).
    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // Cursors only move after a copy completes, so a poisoned state is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Copy> RingBuffer<T> {
    // ---------------------------------------------------------------------
    // WRITE API
    // ---------------------------------------------------------------------

    /// Writes as much of `src` as fits, waiting up to the default timeout
    /// for space.
    pub fn write(&self, src: &[T]) -> Result<usize, RingError> {
        self.write_timeout(src, self.config.default_timeout)
    }

    /// Writes without waiting. Fails with `Timeout` if the buffer is full.
    pub fn try_write(&self, src: &[T]) -> Result<usize, RingError> {
        self.write_timeout(src, Duration::ZERO)
    }

    /// Writes as much of `src` as fits, waiting up to `timeout` for the
    /// buffer to stop being full.
    ///
    /// Returns the number of elements written, which may be less than
    /// `src.len()`. On timeout nothing is written.
    pub fn write_timeout(&self, src: &[T], timeout: Duration) -> Result<usize, RingError> {
        if src.is_empty() {
            return Ok(0);
        }

        let guard = self.lock();
        let (mut state, wait) = self
            .space_available
            .wait_timeout_while(guard, timeout, |s| s.is_full())
            .unwrap_or_else(PoisonError::into_inner);

        if wait.timed_out() {
            trace!(front = state.front, rear = state.rear, ?timeout, "write timed out");
            return Err(RingError::Timeout { waited: timeout });
        }

        let written = state.write_locked(src);
        trace!(
            front = state.front,
            rear = state.rear,
            requested = src.len(),
            written,
            "write"
        );

        self.data_available.notify_all();
        Ok(written)
    }

    // ---------------------------------------------------------------------
    // READ API
    // ---------------------------------------------------------------------

    /// Reads up to `dst.len()` elements, waiting up to the default timeout
    /// for data.
    pub fn read(&self, dst: &mut [T]) -> Result<usize, RingError> {
        self.read_timeout(dst, self.config.default_timeout)
    }

    /// Reads without waiting. Fails with `Timeout` if the buffer is empty.
    pub fn try_read(&self, dst: &mut [T]) -> Result<usize, RingError> {
        self.read_timeout(dst, Duration::ZERO)
    }

    /// Reads up to `dst.len()` elements, waiting up to `timeout` for the
    /// buffer to stop being empty.
    ///
    /// Returns the number of elements read into the front of `dst`, which may
    /// be less than `dst.len()`. On timeout nothing is read.
    pub fn read_timeout(&self, dst: &mut [T], timeout: Duration) -> Result<usize, RingError> {
        if dst.is_empty() {
            return Ok(0);
        }

        let guard = self.lock();
        let (mut state, wait) = self
            .data_available
            .wait_timeout_while(guard, timeout, |s| s.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        if wait.timed_out() {
            trace!(front = state.front, rear = state.rear, ?timeout, "read timed out");
            return Err(RingError::Timeout { waited: timeout });
        }

        let read = state.read_locked(dst);
        trace!(
            front = state.front,
            rear = state.rear,
            requested = dst.len(),
            read,
            "read"
        );

        self.space_available.notify_all();
        Ok(read)
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("RingBuffer")
            .field("raw_capacity", &state.raw())
            .field("front", &state.front)
            .field("rear", &state.rear)
            .field("len", &state.len())
            .finish()
    }
}
