//! Loom-based concurrency tests for the blocking protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings. A lost wakeup shows up
//! as a deadlock, a torn copy as a FIFO assertion failure.

#![cfg(feature = "loom")]

use loom::sync::{Arc, Condvar, Mutex};
use loom::thread;

/// Simplified blocking ring for loom testing.
///
/// Same cursor arithmetic and wait/notify discipline as `RingBuffer`, minus
/// timeouts (loom models untimed waits only) and with a tiny fixed array to
/// keep the state space manageable.
struct LoomRing {
    state: Mutex<LoomState>,
    space_available: Condvar,
    data_available: Condvar,
}

struct LoomState {
    storage: [u64; 3],
    front: usize,
    rear: usize,
}

impl LoomState {
    const RAW: usize = 3;

    fn len(&self) -> usize {
        (self.rear + Self::RAW - self.front) % Self::RAW
    }

    fn is_empty(&self) -> bool {
        self.front == self.rear
    }

    fn is_full(&self) -> bool {
        (self.rear + 1) % Self::RAW == self.front
    }
}

impl LoomRing {
    fn new() -> Self {
        Self {
            state: Mutex::new(LoomState {
                storage: [0; 3],
                front: 0,
                rear: 0,
            }),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
        }
    }

    /// Blocking bulk write; returns how many elements fit.
    fn write(&self, src: &[u64]) -> usize {
        let mut state = self.state.lock().unwrap();
        while state.is_full() {
            state = self.space_available.wait(state).unwrap();
        }

        let free = LoomState::RAW - 1 - state.len();
        let total = free.min(src.len());
        let rear = state.rear;
        let first = total.min(LoomState::RAW - rear);
        state.storage[rear..rear + first].copy_from_slice(&src[..first]);
        state.storage[..total - first].copy_from_slice(&src[first..total]);
        state.rear = (rear + total) % LoomState::RAW;

        self.data_available.notify_all();
        total
    }

    /// Blocking bulk read; returns how many elements were copied into `dst`.
    fn read(&self, dst: &mut [u64]) -> usize {
        let mut state = self.state.lock().unwrap();
        while state.is_empty() {
            state = self.data_available.wait(state).unwrap();
        }

        let total = state.len().min(dst.len());
        let front = state.front;
        let first = total.min(LoomState::RAW - front);
        dst[..first].copy_from_slice(&state.storage[front..front + first]);
        dst[first..total].copy_from_slice(&state.storage[..total - first]);
        state.front = (front + total) % LoomState::RAW;

        self.space_available.notify_all();
        total
    }
}

/// A writer pushing more than fits and a reader draining it: no lost
/// wakeups, FIFO preserved across the wrap.
#[test]
fn loom_blocking_spsc_fifo() {
    loom::model(|| {
        let ring = Arc::new(LoomRing::new());
        let ring2 = Arc::clone(&ring);

        let producer = thread::spawn(move || {
            let data = [10, 20, 30];
            let mut sent = 0;
            while sent < data.len() {
                sent += ring2.write(&data[sent..]);
            }
        });

        let mut received = Vec::new();
        let mut buf = [0u64; 2];
        while received.len() < 3 {
            let n = ring.read(&mut buf);
            received.extend_from_slice(&buf[..n]);
        }

        producer.join().unwrap();
        assert_eq!(received, vec![10, 20, 30]);
    });
}

/// Two writers and a reader draining one element at a time: both writers
/// finish and nothing is lost.
#[test]
fn loom_two_writers_one_reader() {
    loom::model(|| {
        let ring = Arc::new(LoomRing::new());

        let writers: Vec<_> = [1u64, 2]
            .into_iter()
            .map(|v| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    assert_eq!(ring.write(&[v]), 1);
                })
            })
            .collect();

        let mut received = Vec::new();
        let mut buf = [0u64; 1];
        while received.len() < 2 {
            let n = ring.read(&mut buf);
            received.extend_from_slice(&buf[..n]);
        }

        for w in writers {
            w.join().unwrap();
        }

        received.sort_unstable();
        assert_eq!(received, vec![1, 2]);
    });
}
