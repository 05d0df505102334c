use crate::{Full, Queue};
use std::fmt;
use std::sync::Arc;

/// Creates a queue for `capacity` elements and returns its two handles.
///
/// # Panics
///
/// Panics if `capacity + 1` overflows `usize`.
pub fn channel<T: Default>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    Queue::new(capacity).split()
}

/// The single producing side of a [`Queue`].
///
/// Not `Clone`, and every operation that touches producer state takes
/// `&mut self`, so at most one thread enqueues at a time. Move it to the
/// producer thread.
pub struct Producer<T> {
    queue: Arc<Queue<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(queue: Arc<Queue<T>>) -> Self {
        Self { queue }
    }

    /// Enqueues `value`, spinning per the queue's wait strategy while the
    /// queue is full.
    ///
    /// On a zero-capacity queue this never returns.
    #[inline]
    pub fn push(&mut self, value: T) {
        // SAFETY: `&mut self` on the only Producer makes this the sole producer.
        unsafe { self.queue.push(value) }
    }

    /// Enqueues `value` if a slot is free, otherwise returns it inside
    /// [`Full`] without touching the queue.
    ///
    /// # Example
    /// ```
    /// let (mut tx, _rx) = spscqueue::channel::<u32>(1);
    /// assert!(tx.offer(1).is_ok());
    /// assert_eq!(tx.offer(2).unwrap_err().into_inner(), 2);
    /// ```
    #[inline]
    pub fn offer(&mut self, value: T) -> Result<(), Full<T>> {
        // SAFETY: see push().
        unsafe { self.queue.offer(value) }
    }

    /// Borrows the next write slot for in-place construction, or returns
    /// `None` if the queue is full.
    ///
    /// The slot is not visible to the consumer until [`commit`](Self::commit).
    /// Calling `reserve` again before committing returns the same slot.
    ///
    /// # Example
    /// ```
    /// use spscqueue::{Config, Queue};
    ///
    /// let queue = Queue::with_fill(Config::new(4), || vec![0u8; 64]).unwrap();
    /// let (mut tx, mut rx) = queue.split();
    ///
    /// if let Some(buf) = tx.reserve() {
    ///     buf[0] = 42;
    ///     tx.commit();
    /// }
    /// assert_eq!(rx.front().map(|buf| buf[0]), Some(42));
    /// ```
    #[inline]
    pub fn reserve(&mut self) -> Option<&mut T> {
        // SAFETY: sole producer; the slot stays ours until the write index is
        // published, and the borrow of `self` ends before commit() can run.
        unsafe { self.queue.reserve().map(|slot| &mut *slot) }
    }

    /// Publishes the slot handed out by the last successful
    /// [`reserve`](Self::reserve).
    ///
    /// # Panics
    ///
    /// Panics if no slot was reserved, i.e. the producer last saw the queue
    /// as full.
    #[inline]
    pub fn commit(&mut self) {
        // SAFETY: see push().
        unsafe { self.queue.commit() }
    }

    /// Returns a snapshot of the number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no element is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Returns the queue capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Returns the shared queue, e.g. to observe `len()` from another thread.
    #[inline]
    pub fn queue(&self) -> &Arc<Queue<T>> {
        &self.queue
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("queue", &self.queue).finish()
    }
}

/// The single consuming side of a [`Queue`].
///
/// Like [`Producer`], not `Clone` and `&mut self` for every consumer
/// operation.
pub struct Consumer<T> {
    queue: Arc<Queue<T>>,
}

impl<T> Consumer<T> {
    pub(crate) fn new(queue: Arc<Queue<T>>) -> Self {
        Self { queue }
    }

    /// Dequeues the oldest element, spinning per the queue's wait strategy
    /// while the queue is empty. The slot is left holding `T::default()`.
    #[inline]
    pub fn pop(&mut self) -> T
    where
        T: Default,
    {
        // SAFETY: `&mut self` on the only Consumer makes this the sole consumer.
        unsafe { self.queue.pop() }
    }

    /// Dequeues the oldest element if there is one.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T>
    where
        T: Default,
    {
        // SAFETY: see pop().
        unsafe { self.queue.try_pop() }
    }

    /// Peeks at the oldest element without consuming it.
    ///
    /// Calling `front` again before [`advance`](Self::advance) returns the
    /// same element.
    #[inline]
    pub fn front(&mut self) -> Option<&T> {
        // SAFETY: sole consumer; the slot is published and stays ours until
        // the read index moves, which needs a fresh `&mut self`.
        unsafe { self.queue.front().map(|slot| &*slot) }
    }

    /// Consumes the element returned by the last successful
    /// [`front`](Self::front), handing its slot back to the producer. The
    /// value stays in the slot until the producer overwrites it.
    ///
    /// # Panics
    ///
    /// Panics if no element was peeked, i.e. the consumer last saw the queue
    /// as empty.
    #[inline]
    pub fn advance(&mut self) {
        // SAFETY: see pop().
        unsafe { self.queue.advance() }
    }

    /// Returns a snapshot of the number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no element is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Returns the queue capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Returns the shared queue, e.g. to observe `len()` from another thread.
    #[inline]
    pub fn queue(&self) -> &Arc<Queue<T>> {
        &self.queue
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("queue", &self.queue).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_one_queue() {
        let (tx, rx) = channel::<u8>(4);
        assert!(Arc::ptr_eq(tx.queue(), rx.queue()));
        assert_eq!(Arc::strong_count(tx.queue()), 2);
    }

    #[test]
    fn test_handles_are_send() {
        fn assert_send<S: Send>() {}
        assert_send::<Producer<String>>();
        assert_send::<Consumer<String>>();
    }

    #[test]
    fn test_reserve_returns_same_slot_until_commit() {
        let (mut tx, mut rx) = channel::<u64>(2);

        let first = tx.reserve().map(|slot| slot as *mut u64);
        let second = tx.reserve().map(|slot| slot as *mut u64);
        assert!(first.is_some());
        assert_eq!(first, second);

        *tx.reserve().unwrap() = 5;
        tx.commit();
        assert_eq!(rx.pop(), 5);
    }

    #[test]
    fn test_front_is_idempotent() {
        let (mut tx, mut rx) = channel::<u64>(2);
        tx.push(11);
        tx.push(12);

        assert_eq!(rx.front(), Some(&11));
        assert_eq!(rx.front(), Some(&11));
        rx.advance();
        assert_eq!(rx.front(), Some(&12));
        rx.advance();
        assert_eq!(rx.front(), None);
    }

    #[test]
    fn test_try_pop() {
        let (mut tx, mut rx) = channel::<u64>(2);
        assert_eq!(rx.try_pop(), None);
        tx.push(3);
        assert_eq!(rx.try_pop(), Some(3));
        assert_eq!(rx.try_pop(), None);
    }
}
