//! Producer/consumer integrity run across several ring sizes.
//!
//! The producer sends an 8-byte header (length + CRC32) followed by a 5 MiB
//! random payload in random chunks below 1 KiB. The consumer reads the
//! header, reassembles the payload with random-sized reads and checks the
//! CRC32.
//!
//! Run with: `cargo run -p ringbuf-sync --release --features demo --bin producer_consumer`

use rand::Rng;
use ringbuf_sync::{read_exact, write_all, Config, FrameHeader, RetryPolicy, RingBuffer, RingError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const PAYLOAD_LEN: usize = 5 * 1024 * 1024;
const MAX_CHUNK: usize = 1024;

const RING_SIZES: [usize; 6] = [
    1024,
    10 * 1024,
    128 * 1024,
    512 * 1024,
    1024 * 1024,
    2 * 1024 * 1024,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0;

    for raw in RING_SIZES {
        println!("\n********* RingBuffer test, raw capacity = {}", raw);

        let start = Instant::now();
        let passed = producer_consumer(raw)?;
        println!("Cost Time: {:.6} s", start.elapsed().as_secs_f64());

        if !passed {
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{} run(s) failed the checksum check", failures).into());
    }
    Ok(())
}

fn producer_consumer(raw: usize) -> Result<bool, RingError> {
    let ring = Arc::new(RingBuffer::<u8>::new(Config::new(raw)));
    let policy = RetryPolicy::forever(ring.default_timeout());

    let consumer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || consume(&ring, policy))
    };

    let producer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || produce(&ring, policy))
    };

    let sent = producer.join().expect("producer thread panicked")?;
    let passed = consumer.join().expect("consumer thread panicked")?;
    println!("producer: 0x{:x}, 0x{:08x}", sent.len, sent.checksum);
    Ok(passed)
}

fn produce(ring: &RingBuffer<u8>, policy: RetryPolicy) -> Result<FrameHeader, RingError> {
    let mut rng = rand::thread_rng();
    let mut payload = vec![0u8; PAYLOAD_LEN];
    rng.fill(&mut payload[..]);

    let header = FrameHeader::for_payload(&payload)?;
    write_all(ring, &header.to_bytes(), policy)?;

    let mut written = 0;
    while written < payload.len() {
        let count = rng.gen_range(0..MAX_CHUNK).min(payload.len() - written);
        match ring.write(&payload[written..written + count]) {
            Ok(n) => written += n,
            Err(RingError::Timeout { .. }) => println!("producer: timeout!"),
            Err(e) => return Err(e),
        }
    }

    Ok(header)
}

fn consume(ring: &RingBuffer<u8>, policy: RetryPolicy) -> Result<bool, RingError> {
    let mut rng = rand::thread_rng();

    let mut raw = [0u8; FrameHeader::SIZE];
    read_exact(ring, &mut raw, policy)?;
    let header = FrameHeader::from_bytes(raw);
    println!("consumer: 0x{:x}, 0x{:08x}", header.len, header.checksum);

    let mut payload = vec![0u8; header.len as usize];
    let mut received = 0;
    while received < payload.len() {
        let count = rng.gen_range(0..MAX_CHUNK).min(payload.len() - received);
        match ring.read(&mut payload[received..received + count]) {
            Ok(n) => received += n,
            Err(RingError::Timeout { .. }) => println!("consumer: timeout!"),
            Err(e) => return Err(e),
        }
    }
    println!("consumer: received finished!");

    let passed = header.verify(&payload);
    if passed {
        println!("consumer: PASS: check received data success!");
    } else {
        println!("consumer: ERROR: check received data fail!");
    }
    Ok(passed)
}
