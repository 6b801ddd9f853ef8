use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringbuf_sync::{Config, RingBuffer};
use std::sync::Arc;
use std::thread;

const TOTAL_BYTES: usize = 4 * 1024 * 1024; // 4 MiB per iteration
const CHUNK: usize = 1024;

fn bench_spsc_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_bytes");
    group.throughput(Throughput::Bytes(TOTAL_BYTES as u64));

    for raw in [1024usize, 10 * 1024, 128 * 1024, 1024 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(raw), &raw, |b, &raw| {
            let payload = vec![0xa5u8; TOTAL_BYTES];
            b.iter(|| {
                let ring = Arc::new(RingBuffer::<u8>::new(Config::new(raw)));

                let consumer = {
                    let ring = Arc::clone(&ring);
                    thread::spawn(move || {
                        let mut buf = vec![0u8; CHUNK];
                        let mut received = 0;
                        while received < TOTAL_BYTES {
                            if let Ok(n) = ring.read(&mut buf) {
                                black_box(&buf[..n]);
                                received += n;
                            }
                        }
                    })
                };

                let mut written = 0;
                while written < TOTAL_BYTES {
                    let end = (written + CHUNK).min(TOTAL_BYTES);
                    if let Ok(n) = ring.write(&payload[written..end]) {
                        written += n;
                    }
                }

                consumer.join().unwrap();
            });
        });
    }

    group.finish();
}

fn bench_uncontended_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    for chunk in [1usize, 16, 256, 4096] {
        group.throughput(Throughput::Elements(chunk as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            let ring = RingBuffer::<u64>::new(Config::with_usable_capacity(4096));
            let src = vec![7u64; chunk];
            let mut dst = vec![0u64; chunk];
            b.iter(|| {
                let n = ring.try_write(black_box(&src)).unwrap();
                let m = ring.try_read(&mut dst).unwrap();
                assert_eq!(n, m);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spsc_bytes, bench_uncontended_round_trip);
criterion_main!(benches);
