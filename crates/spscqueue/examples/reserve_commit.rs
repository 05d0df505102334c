use spscqueue::{Config, Queue};
use std::thread;
use std::time::Instant;

/// A fixed-size frame buffer reused in place by producer and consumer.
struct Frame {
    seq: u64,
    payload: Vec<u8>,
}

const FRAME_SIZE: usize = 4096;
const FRAMES: u64 = 200_000;

fn main() {
    println!("spscqueue Reserve/Commit Example");
    println!("================================\n");

    // Every slot owns a pre-allocated payload; nothing is allocated per frame.
    let config = Config::new(256);
    let queue = Queue::with_fill(config, || Frame {
        seq: 0,
        payload: vec![0; FRAME_SIZE],
    })
    .expect("valid configuration");
    let (mut tx, mut rx) = queue.split();

    println!("Configuration:");
    println!("  Capacity: {} frames", config.capacity);
    println!("  Frame size: {} bytes", FRAME_SIZE);
    println!("  Frames: {}\n", FRAMES);

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for seq in 0..FRAMES {
            loop {
                if let Some(frame) = tx.reserve() {
                    frame.seq = seq;
                    frame.payload.fill((seq % 251) as u8);
                    break;
                }
                thread::yield_now();
            }
            tx.commit();
        }
    });

    let mut bytes = 0u64;
    for seq in 0..FRAMES {
        loop {
            if let Some(frame) = rx.front() {
                assert_eq!(frame.seq, seq);
                assert_eq!(frame.payload[0], (seq % 251) as u8);
                bytes += frame.payload.len() as u64;
                break;
            }
            thread::yield_now();
        }
        rx.advance();
    }

    producer.join().unwrap();

    let duration = start.elapsed();
    println!("Results:");
    println!("  Frames received: {}", FRAMES);
    println!("  Duration: {:?}", duration);
    println!(
        "  Throughput: {:.1} MB/s",
        bytes as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
