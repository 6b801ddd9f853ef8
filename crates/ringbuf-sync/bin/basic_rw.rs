//! Random chunked writes and reads against a 16-slot ring until it fills up.
//!
//! Run with: `cargo run -p ringbuf-sync --features demo --bin basic_rw`

use rand::Rng;
use ringbuf_sync::{RingBuffer, RingError, SMALL_CONFIG};
use std::time::Duration;

const ROUNDS: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for round in 0..ROUNDS {
        basic_rw(round)?;
    }
    Ok(())
}

fn basic_rw(round: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    let ring = RingBuffer::<u8>::new(SMALL_CONFIG.with_default_timeout(Duration::from_millis(100)));
    let raw = ring.raw_capacity();

    let mut src = vec![0u8; raw];
    rng.fill(&mut src[..]);
    let mut dst = vec![0u8; raw];

    println!("\n=== basic_rw round {} (raw capacity {}) ===", round, raw);

    while !ring.is_full() {
        let start = rng.gen_range(0..raw - 1);
        let count = rng.gen_range(0..raw / 3).min(raw - start);

        if count > 0 {
            let written = ring.write(&src[start..start + count])?;
            println!("WR: count = {}, actual = {}, total = {}", count, written, ring.len());
            if ring.is_full() {
                break;
            }
        }

        if rng.gen_bool(0.5) {
            continue;
        }

        let count = rng.gen_range(0..raw / 4);
        if count > 0 {
            match ring.read(&mut dst[..count]) {
                Ok(read) => {
                    println!("RD: count = {}, actual = {}, total = {}", count, read, ring.len());
                }
                Err(RingError::Timeout { waited }) => println!("RD: empty for {:?}", waited),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
