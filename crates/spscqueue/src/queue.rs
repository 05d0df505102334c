use crate::invariants::{
    debug_assert_bounded_count, debug_assert_gap_kept, debug_assert_index_in_bounds,
    debug_assert_published,
};
use crate::{Backoff, Config, ConfigError, Consumer, Full, Producer, WaitStrategy};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Sentinel Slot
//
// The backing store has `capacity + 1` slots and indices wrap modulo that
// length. One slot always stays unused, so with only two indices:
// - empty  ⟺ read == write
// - full   ⟺ next(write) == read
//
// ## Memory Ordering Protocol
//
// **Producer (write path):**
// 1. Load `write` with Relaxed (only producer writes it)
// 2. Compare next(write) with `read_cached` (UnsafeCell, producer-private)
// 3. Only if they are equal: load `read` with Acquire and refresh the cache
// 4. Write the slot at `write` (protected by the protocol, no ordering needed)
// 5. Store next(write) into `write` with Release (publishes the slot)
//
// **Consumer (read path):**
// 1. Load `read` with Relaxed (only consumer writes it)
// 2. Compare `read` with `write_cached` (UnsafeCell, consumer-private)
// 3. Only if they are equal: load `write` with Acquire and refresh the cache
// 4. Read / take the slot at `read`
// 5. Store next(read) into `read` with Release (hands the slot back)
//
// ## Single-Writer Invariants
//
// - `read_cached`: only touched by the producer
// - `write_cached`: only touched by the consumer
// - `slots[write]`: owned by the producer until `write` moves past it
// - `slots[read]`: owned by the consumer until `read` moves past it
//
// Every role method below is `unsafe` and requires that it is called from the
// one producer (or the one consumer). `Producer` / `Consumer` uphold this by
// being the only callers and taking `&mut self`.
//
// =============================================================================

/// Producer-hot state: the authoritative write index and the producer's
/// snapshot of the read index.
struct ProducerIndices {
    /// Next slot to write (written by producer, read by consumer)
    write: AtomicUsize,
    /// Producer's possibly stale view of `read`
    read_cached: UnsafeCell<usize>,
}

/// Consumer-hot state, symmetric to [`ProducerIndices`].
struct ConsumerIndices {
    /// Oldest unconsumed slot (written by consumer, read by producer)
    read: AtomicUsize,
    /// Consumer's possibly stale view of `write`
    write_cached: UnsafeCell<usize>,
}

/// Bounded single-producer single-consumer queue.
///
/// Slots always hold an initialized `T`: they are pre-filled at construction
/// (with `T::default()` or a caller supplied initializer) and every dequeue
/// that moves a value out leaves `T::default()` behind. This is what lets
/// [`Producer::reserve`] hand out the slot for in-place mutation.
///
/// Role operations live on the handles returned by [`Queue::split`]; the queue
/// itself only offers construction and observation.
#[repr(C)]
pub struct Queue<T> {
    // === PRODUCER HOT ===
    producer: CachePadded<ProducerIndices>,

    // === CONSUMER HOT ===
    consumer: CachePadded<ConsumerIndices>,

    // === DATA BUFFER ===
    slots: CachePadded<Box<[UnsafeCell<T>]>>,
    wait_strategy: WaitStrategy,
}

// Safety: values of T move between the producer and consumer threads, and
// every slot access is serialized by the Release/Acquire index protocol.
unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Send> Sync for Queue<T> {}

impl<T: Default> Queue<T> {
    /// Creates a queue able to hold `capacity` elements, every slot holding
    /// `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity + 1` overflows `usize`.
    pub fn new(capacity: usize) -> Self {
        match Self::with_config(Config::new(capacity)) {
            Ok(queue) => queue,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a queue from a configuration, every slot holding `T::default()`.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::build(config, T::default)
    }
}

impl<T> Queue<T> {
    /// Creates a queue for `capacity` elements whose slots are eagerly filled
    /// by calling `init` once per slot (`capacity + 1` times).
    ///
    /// Use this when `T` is an owning handle that producers mutate in place
    /// through [`Producer::reserve`].
    pub fn with_fill<F>(config: Config, init: F) -> Result<Self, ConfigError>
    where
        F: FnMut() -> T,
    {
        Self::build(config, init)
    }

    fn build<F>(config: Config, mut init: F) -> Result<Self, ConfigError>
    where
        F: FnMut() -> T,
    {
        let slots = config.slots()?;
        let storage: Box<[UnsafeCell<T>]> = (0..slots).map(|_| UnsafeCell::new(init())).collect();

        debug!(
            capacity = config.capacity,
            wait_strategy = ?config.wait_strategy,
            "spsc queue created"
        );

        Ok(Self {
            producer: CachePadded::new(ProducerIndices {
                write: AtomicUsize::new(0),
                read_cached: UnsafeCell::new(0),
            }),
            consumer: CachePadded::new(ConsumerIndices {
                read: AtomicUsize::new(0),
                write_cached: UnsafeCell::new(0),
            }),
            slots: CachePadded::new(storage),
            wait_strategy: config.wait_strategy,
        })
    }

    /// Re-initializes every backing slot with `init`.
    ///
    /// Needs exclusive access, so it runs before [`split`](Self::split) (or
    /// through `Arc::get_mut` once both handles are gone). Whatever the slots
    /// held, queued or not, is dropped.
    pub fn fill<F>(&mut self, mut init: F)
    where
        F: FnMut() -> T,
    {
        for slot in self.slots.iter_mut() {
            *slot.get_mut() = init();
        }
    }

    /// Splits the queue into its producer and consumer handles.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        debug!(capacity = self.capacity(), "spsc queue split into handles");
        let queue = Arc::new(self);
        (Producer::new(Arc::clone(&queue)), Consumer::new(queue))
    }

    // ---------------------------------------------------------------------
    // STATUS (any thread)
    // ---------------------------------------------------------------------

    /// Returns the maximum number of elements the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns the wait strategy used by blocking operations.
    #[inline]
    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait_strategy
    }

    /// Returns the number of queued elements.
    ///
    /// The two indices are loaded one after the other, so the result is a
    /// snapshot that may be stale by the time it is used. It is always in
    /// `0..=capacity`.
    pub fn len(&self) -> usize {
        let read = self.consumer.read.load(Ordering::Acquire);
        let write = self.producer.write.load(Ordering::Acquire);
        let len = if write >= read {
            write - read
        } else {
            self.slots.len() - (read - write)
        };
        debug_assert_bounded_count!(len, self.capacity());
        len
    }

    /// Returns true if no element is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if no slot is free. A zero-capacity queue is always full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    fn next(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() {
            0
        } else {
            next
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Returns true if the slot at `write` may be filled, i.e. `next_write`
    /// does not run into the consumer. Refreshes the cached read index only
    /// when the cache says there is no room.
    ///
    /// # Safety
    ///
    /// Must only be called by the producer.
    #[inline]
    unsafe fn has_room(&self, next_write: usize) -> bool {
        // SAFETY: read_cached is only touched by the producer.
        let read_cached = unsafe { &mut *self.producer.read_cached.get() };
        if next_write != *read_cached {
            return true;
        }
        // Slow path: the Acquire load synchronizes with the consumer's
        // Release store, so the slot it handed back is ours to overwrite.
        *read_cached = self.consumer.read.load(Ordering::Acquire);
        next_write != *read_cached
    }

    /// Blocking enqueue.
    ///
    /// # Safety
    ///
    /// Must only be called by the producer.
    pub(crate) unsafe fn push(&self, value: T) {
        let write = self.producer.write.load(Ordering::Relaxed);
        let next = self.next(write);

        // SAFETY: caller is the producer.
        if !unsafe { self.has_room(next) } {
            trace!(write, capacity = self.capacity(), "push waiting for a free slot");
            let mut backoff = Backoff::new();
            while !unsafe { self.has_room(next) } {
                self.wait_strategy.idle(&mut backoff);
            }
        }

        // SAFETY: has_room() confirmed the consumer is not at `write`, and
        // only the producer writes slots outside the published range.
        unsafe { *self.slots[write].get() = value };
        self.publish_write(next);
    }

    /// Non-blocking enqueue. Hands the value back if no slot is free.
    ///
    /// # Safety
    ///
    /// Must only be called by the producer.
    pub(crate) unsafe fn offer(&self, value: T) -> Result<(), Full<T>> {
        let write = self.producer.write.load(Ordering::Relaxed);
        let next = self.next(write);

        // SAFETY: caller is the producer.
        if !unsafe { self.has_room(next) } {
            return Err(Full(value));
        }

        // SAFETY: same as push().
        unsafe { *self.slots[write].get() = value };
        self.publish_write(next);
        Ok(())
    }

    /// Returns the unpublished slot at the write index, or `None` if no slot
    /// is free. Never moves the write index, so repeated calls return the
    /// same slot.
    ///
    /// # Safety
    ///
    /// Must only be called by the producer, and the returned pointer must not
    /// be used after the next `commit()`.
    pub(crate) unsafe fn reserve(&self) -> Option<*mut T> {
        let write = self.producer.write.load(Ordering::Relaxed);

        // SAFETY: caller is the producer.
        if unsafe { self.has_room(self.next(write)) } {
            Some(self.slots[write].get())
        } else {
            None
        }
    }

    /// Publishes the slot returned by the last successful `reserve()`.
    ///
    /// # Safety
    ///
    /// Must only be called by the producer.
    ///
    /// # Panics
    ///
    /// Panics if the producer's view of the queue has no free slot, which
    /// means no `reserve()` succeeded.
    pub(crate) unsafe fn commit(&self) {
        let write = self.producer.write.load(Ordering::Relaxed);
        let next = self.next(write);

        // SAFETY: read_cached is only touched by the producer.
        let read_cached = unsafe { *self.producer.read_cached.get() };
        assert!(
            next != read_cached,
            "commit() called without a successful reserve()"
        );
        self.publish_write(next);
    }

    #[inline]
    fn publish_write(&self, next: usize) {
        debug_assert_index_in_bounds!("write", next, self.slots.len());
        // SAFETY: read_cached is only touched by the producer, and only the
        // producer publishes writes.
        debug_assert_gap_kept!(next, unsafe { *self.producer.read_cached.get() });

        self.producer.write.store(next, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Returns true if the slot at `read` holds a published element.
    /// Refreshes the cached write index only when the cache says empty.
    ///
    /// # Safety
    ///
    /// Must only be called by the consumer.
    #[inline]
    unsafe fn has_item(&self, read: usize) -> bool {
        // SAFETY: write_cached is only touched by the consumer.
        let write_cached = unsafe { &mut *self.consumer.write_cached.get() };
        if read != *write_cached {
            return true;
        }
        // Slow path: the Acquire load synchronizes with the producer's
        // Release store, making the slot contents visible.
        *write_cached = self.producer.write.load(Ordering::Acquire);
        read != *write_cached
    }

    /// Blocking dequeue. Moves the value out, leaving `T::default()`.
    ///
    /// # Safety
    ///
    /// Must only be called by the consumer.
    pub(crate) unsafe fn pop(&self) -> T
    where
        T: Default,
    {
        let read = self.consumer.read.load(Ordering::Relaxed);

        // SAFETY: caller is the consumer.
        if !unsafe { self.has_item(read) } {
            trace!(read, "pop waiting for an element");
            let mut backoff = Backoff::new();
            while !unsafe { self.has_item(read) } {
                self.wait_strategy.idle(&mut backoff);
            }
        }

        // SAFETY: has_item() confirmed `read` is published and the producer
        // will not touch it until `read` moves on.
        let value = unsafe { mem::take(&mut *self.slots[read].get()) };
        self.publish_read(read);
        value
    }

    /// Non-blocking dequeue.
    ///
    /// # Safety
    ///
    /// Must only be called by the consumer.
    pub(crate) unsafe fn try_pop(&self) -> Option<T>
    where
        T: Default,
    {
        let read = self.consumer.read.load(Ordering::Relaxed);

        // SAFETY: caller is the consumer.
        if !unsafe { self.has_item(read) } {
            return None;
        }

        // SAFETY: same as pop().
        let value = unsafe { mem::take(&mut *self.slots[read].get()) };
        self.publish_read(read);
        Some(value)
    }

    /// Returns the oldest element without consuming it, or `None` if empty.
    ///
    /// # Safety
    ///
    /// Must only be called by the consumer, and the returned pointer must not
    /// be used after the next `advance()`.
    pub(crate) unsafe fn front(&self) -> Option<*const T> {
        let read = self.consumer.read.load(Ordering::Relaxed);

        // SAFETY: caller is the consumer.
        if unsafe { self.has_item(read) } {
            Some(self.slots[read].get().cast_const())
        } else {
            None
        }
    }

    /// Consumes the element returned by the last successful `front()`.
    ///
    /// # Safety
    ///
    /// Must only be called by the consumer.
    ///
    /// # Panics
    ///
    /// Panics if the consumer's view of the queue is empty, which means no
    /// `front()` succeeded.
    pub(crate) unsafe fn advance(&self) {
        let read = self.consumer.read.load(Ordering::Relaxed);

        // SAFETY: write_cached is only touched by the consumer.
        let write_cached = unsafe { *self.consumer.write_cached.get() };
        assert!(
            read != write_cached,
            "advance() called without a successful front()"
        );
        self.publish_read(read);
    }

    #[inline]
    fn publish_read(&self, read: usize) {
        // SAFETY: write_cached is only touched by the consumer, and only the
        // consumer publishes reads.
        debug_assert_published!(read, unsafe { *self.consumer.write_cached.get() });
        let next = self.next(read);
        debug_assert_index_in_bounds!("read", next, self.slots.len());

        self.consumer.read.store(next, Ordering::Release);
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("wait_strategy", &self.wait_strategy)
            .finish_non_exhaustive()
    }
}
