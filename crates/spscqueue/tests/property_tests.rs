//! Property-based tests: random single-threaded operation sequences are
//! replayed against both the queue and a `VecDeque` model, and the two must
//! agree on every observable result.

use proptest::prelude::*;
use spscqueue::channel;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
enum Op {
    Push(u32),
    Offer(u32),
    ReserveCommit(u32),
    Pop,
    TryPop,
    FrontAdvance,
    Front,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Push),
        any::<u32>().prop_map(Op::Offer),
        any::<u32>().prop_map(Op::ReserveCommit),
        Just(Op::Pop),
        Just(Op::TryPop),
        Just(Op::FrontAdvance),
        Just(Op::Front),
    ]
}

proptest! {
    /// The queue behaves like a bounded FIFO and len() stays in 0..=capacity.
    #[test]
    fn prop_matches_bounded_fifo_model(
        capacity in 0usize..16,
        ops in prop::collection::vec(op_strategy(), 1..200),
    ) {
        let (mut tx, mut rx) = channel::<u32>(capacity);
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                // Blocking ops are only issued when they cannot block.
                Op::Push(v) => {
                    if model.len() < capacity {
                        tx.push(v);
                        model.push_back(v);
                    }
                }
                Op::Offer(v) => {
                    let result = tx.offer(v);
                    if model.len() < capacity {
                        prop_assert!(result.is_ok());
                        model.push_back(v);
                    } else {
                        prop_assert_eq!(result.unwrap_err().into_inner(), v);
                    }
                }
                Op::ReserveCommit(v) => {
                    match tx.reserve() {
                        Some(slot) => {
                            prop_assert!(model.len() < capacity);
                            *slot = v;
                            tx.commit();
                            model.push_back(v);
                        }
                        None => prop_assert_eq!(model.len(), capacity),
                    }
                }
                Op::Pop => {
                    if let Some(expected) = model.pop_front() {
                        prop_assert_eq!(rx.pop(), expected);
                    }
                }
                Op::TryPop => prop_assert_eq!(rx.try_pop(), model.pop_front()),
                Op::FrontAdvance => {
                    let peeked = rx.front().copied();
                    prop_assert_eq!(peeked, model.front().copied());
                    if peeked.is_some() {
                        rx.advance();
                        model.pop_front();
                    }
                }
                Op::Front => prop_assert_eq!(rx.front().copied(), model.front().copied()),
            }

            prop_assert_eq!(tx.len(), model.len());
            prop_assert!(tx.len() <= capacity);
            prop_assert_eq!(rx.is_empty(), model.is_empty());
            prop_assert_eq!(tx.is_full(), model.len() == capacity);
        }
    }

    /// Filling to capacity rejects one more offer; one dequeue re-admits it.
    #[test]
    fn prop_full_then_one_pop(capacity in 1usize..64, start in any::<u16>()) {
        let (mut tx, mut rx) = channel::<u64>(capacity);
        let start = u64::from(start);

        for i in 0..capacity as u64 {
            prop_assert!(tx.offer(start + i).is_ok());
        }
        prop_assert_eq!(tx.len(), capacity);
        prop_assert!(tx.offer(0).is_err());

        prop_assert_eq!(rx.pop(), start);
        prop_assert!(tx.offer(0).is_ok());
        prop_assert_eq!(tx.len(), capacity);
    }

    /// Repeated front() without advance() keeps returning the same element.
    #[test]
    fn prop_front_is_idempotent(values in prop::collection::vec(any::<u32>(), 1..32), peeks in 1usize..8) {
        let (mut tx, mut rx) = channel::<u32>(values.len());
        for &v in &values {
            tx.push(v);
        }
        for &v in &values {
            for _ in 0..peeks {
                prop_assert_eq!(rx.front().copied(), Some(v));
            }
            rx.advance();
        }
        prop_assert!(rx.front().is_none());
    }
}
