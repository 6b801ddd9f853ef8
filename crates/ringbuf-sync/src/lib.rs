//! ringbuf-sync - Bounded Blocking Ring Buffer
//!
//! A fixed-capacity circular buffer shared between producer and consumer
//! threads. Reads and writes move whole slices of `Copy` elements, block
//! while the buffer is empty (read) or full (write), and give up after a
//! timeout without moving anything.
//!
//! # Key Features
//!
//! - Bulk copy split into at most two contiguous segments at the wrap point
//! - One mutex, two condition variables (`space_available`, `data_available`)
//! - Short transfers are success: a call moves what it can and reports the count
//! - One slot kept free so two cursors can tell empty from full
//! - Caller-side retry loops and a length + CRC32 framing layer
//!
//! # Example
//!
//! ```
//! use ringbuf_sync::{Config, RingBuffer};
//! use std::time::Duration;
//!
//! // 16 raw slots hold at most 15 elements
//! let ring = RingBuffer::<u8>::new(Config::new(16));
//! assert_eq!(ring.usable_capacity(), 15);
//!
//! assert_eq!(ring.write(&[1; 10]).unwrap(), 10);
//! // Short write: only 5 slots were free
//! assert_eq!(ring.write(&[2; 10]).unwrap(), 5);
//! assert!(ring.is_full());
//!
//! // A full buffer times out instead of blocking forever
//! let err = ring.write_timeout(&[3], Duration::from_millis(1)).unwrap_err();
//! assert!(err.is_timeout());
//!
//! let mut out = [0u8; 15];
//! assert_eq!(ring.read(&mut out).unwrap(), 15);
//! assert!(ring.is_empty());
//! ```

mod config;
mod error;
mod frame;
mod invariants;
mod ring;
mod transfer;

pub use config::{Config, DEFAULT_TIMEOUT, LARGE_CONFIG, SMALL_CONFIG};
pub use error::RingError;
pub use frame::{recv_frame, recv_frame_with_limit, send_frame, FrameHeader};
pub use ring::RingBuffer;
pub use transfer::{read_exact, write_all, RetryPolicy};
