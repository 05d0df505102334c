use spscqueue::{Config, Queue, WaitStrategy, LOW_CPU_CONFIG, LOW_LATENCY_CONFIG};
use std::thread;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOTAL_MESSAGES: u64 = 100_000_000; // 100M messages

fn run_benchmark(label: &str, config: Config) {
    let (mut tx, mut rx) = match Queue::<u64>::with_config(config) {
        Ok(queue) => queue.split(),
        Err(err) => {
            tracing::error!(%err, label, "invalid configuration");
            return;
        }
    };

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for i in 0..TOTAL_MESSAGES {
            tx.push(i);
        }
    });

    let mut checksum = 0u64;
    let mut expected = 0u64;
    let mut out_of_order = 0u64;
    for _ in 0..TOTAL_MESSAGES {
        let value = rx.pop();
        if value != expected {
            out_of_order += 1;
        }
        expected = value + 1;
        checksum = checksum.wrapping_add(value);
    }

    if producer.join().is_err() {
        tracing::error!(label, "producer thread panicked");
        return;
    }

    let duration = start.elapsed();
    let throughput = TOTAL_MESSAGES as f64 / duration.as_secs_f64();

    info!(
        label,
        capacity = config.capacity,
        wait_strategy = ?config.wait_strategy,
        millions_per_sec = %format!("{:.1}", throughput / 1_000_000.0),
        elapsed_ms = duration.as_millis() as u64,
        checksum,
        out_of_order,
        "benchmark complete"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(total_messages = TOTAL_MESSAGES, "spscqueue throughput benchmark (1P1C)");

    run_benchmark("default", Config::default());
    run_benchmark("small_ring", Config::new(64));
    run_benchmark("backoff", Config::new(1024).with_wait_strategy(WaitStrategy::Backoff));
    run_benchmark("low_latency", LOW_LATENCY_CONFIG);
    run_benchmark("low_cpu", LOW_CPU_CONFIG);
}
