//! spscqueue - Bounded Lock-Free Single-Producer Single-Consumer Queue
//!
//! A fixed-capacity ring buffer that hands values from exactly one producer
//! thread to exactly one consumer thread without locks.
//!
//! # Key Features
//!
//! - One sentinel slot (`capacity + 1` slots) tells full from empty with only
//!   two indices, no shared counter
//! - Each side caches the peer's index and reloads it only when the cache
//!   says there is no slack, so the steady-state hot path is a single
//!   Release store per operation
//! - Producer state, consumer state and storage on separate cache lines
//! - Blocking (`push` / `pop`), non-blocking (`offer` / `try_pop`) and
//!   in-place (`reserve` + `commit`, `front` + `advance`) APIs
//! - The single-producer / single-consumer contract is enforced by the
//!   non-`Clone` [`Producer`] and [`Consumer`] handles
//!
//! # Example
//!
//! ```
//! use std::thread;
//!
//! let (mut tx, mut rx) = spscqueue::channel::<u64>(64);
//!
//! let producer = thread::spawn(move || {
//!     for i in 0..1000 {
//!         tx.push(i);
//!     }
//! });
//!
//! for i in 0..1000 {
//!     assert_eq!(rx.pop(), i);
//! }
//! producer.join().unwrap();
//! ```

mod backoff;
mod config;
mod error;
mod handle;
mod invariants;
mod queue;

pub use backoff::{Backoff, WaitStrategy};
pub use config::{Config, LOW_CPU_CONFIG, LOW_LATENCY_CONFIG};
pub use error::{ConfigError, Full};
pub use handle::{channel, Consumer, Producer};
pub use queue::Queue;
