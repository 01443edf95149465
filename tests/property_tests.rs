//! Property-based tests using proptest
//!
//! These tests drive a queue through random sequences of push, pop and update
//! operations while keeping a shadow map of handle to value, and verify that
//! the queue agrees with the shadow after every step.

use itertools::Itertools;
use mutable_priority_queue::{Error, Handle, MaxPriorityQueue, MutablePriorityQueue};
use proptest::prelude::*;

use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    /// Update the live handle selected by the index modulo the number of live handles.
    Update(usize, i32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::Push),
        Just(Op::Pop),
        (any::<usize>(), any::<i32>()).prop_map(|(idx, value)| Op::Update(idx, value)),
    ]
}

/// Replays `ops` against a max queue and checks it against a shadow map.
///
/// Also tracks which handle `push` must hand out next: the most recently
/// retired one, or a fresh one if none was retired.
fn check_against_shadow(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut mpq = MaxPriorityQueue::max();
    let mut shadow: HashMap<Handle, i32> = HashMap::new();
    let mut retired: Vec<Handle> = Vec::new();
    let mut fresh: usize = 0;
    let mut pushes = 0;
    let mut pops = 0;

    for op in ops {
        match op {
            Op::Push(value) => {
                let expected = match retired.pop() {
                    Some(handle) => handle,
                    None => {
                        fresh += 1;
                        Handle::from(fresh - 1)
                    }
                };
                let handle = mpq.push(value);
                prop_assert_eq!(handle, expected);
                prop_assert_eq!(mpq.value(handle), Ok(&value));
                shadow.insert(handle, value);
                pushes += 1;
            }
            Op::Pop => {
                if shadow.is_empty() {
                    prop_assert_eq!(mpq.pop(), Err(Error::EmptyQueue));
                    prop_assert_eq!(mpq.top_handle(), Err(Error::EmptyQueue));
                    continue;
                }
                let handle = mpq.top_handle().unwrap();
                let max = *shadow.values().max().unwrap();
                prop_assert_eq!(mpq.top(), Ok(&max));
                prop_assert_eq!(mpq.pop(), Ok(max));
                prop_assert_eq!(shadow.remove(&handle), Some(max));
                prop_assert_eq!(mpq.value(handle), Err(Error::InvalidHandle(handle)));
                retired.push(handle);
                pops += 1;
            }
            Op::Update(idx, value) => {
                if shadow.is_empty() {
                    prop_assert_eq!(
                        mpq.update(Handle::from(idx), value),
                        Err(Error::InvalidHandle(Handle::from(idx)))
                    );
                    continue;
                }
                let mut live = shadow.keys().cloned().collect::<Vec<_>>();
                live.sort();
                let handle = live[idx % live.len()];
                prop_assert_eq!(mpq.update(handle, value), Ok(()));
                shadow.insert(handle, value);
            }
        }

        prop_assert_eq!(mpq.len(), pushes - pops);
        prop_assert_eq!(mpq.len(), shadow.len());
        if let Ok(top) = mpq.top_handle() {
            prop_assert_eq!(mpq.value(top), mpq.top());
        }
        for (&handle, value) in shadow.iter() {
            prop_assert_eq!(mpq.value(handle), Ok(value));
        }
    }

    Ok(())
}

proptest! {
    #[test]
    fn operations_agree_with_shadow(ops in prop::collection::vec(op(), 0..200)) {
        check_against_shadow(ops)?;
    }

    #[test]
    fn pops_are_monotone(
        values in prop::collection::vec(any::<i32>(), 0..300),
        updates in prop::collection::vec((any::<usize>(), any::<i32>()), 0..100),
    ) {
        let mut mpq = MaxPriorityQueue::max();
        let handles = values.iter().map(|&value| mpq.push(value)).collect::<Vec<_>>();
        if !handles.is_empty() {
            for (idx, value) in updates {
                mpq.update(handles[idx % handles.len()], value).unwrap();
            }
        }
        let len = mpq.len();
        let drained = mpq.drain_top().collect::<Vec<_>>();
        prop_assert_eq!(drained.len(), len);
        prop_assert!(drained.iter().tuple_windows().all(|(a, b)| a >= b));
    }

    #[test]
    fn min_ordering_on_composite_values(
        entries in prop::collection::vec((any::<u16>(), "[a-z]{1,8}"), 1..100),
    ) {
        let mut mpq = MutablePriorityQueue::new(|a: &(u16, String), b: &(u16, String)| a.0 < b.0);
        for entry in entries.iter().cloned() {
            mpq.push(entry);
        }
        let expected = entries.iter().map(|entry| entry.0).min();
        prop_assert_eq!(mpq.top().ok().map(|entry| entry.0), expected);

        let drained = mpq.drain_top().map(|entry| entry.0).collect::<Vec<_>>();
        prop_assert!(drained.iter().tuple_windows().all(|(a, b)| a <= b));
    }

    #[test]
    fn reinserting_after_pop_reuses_handle(values in prop::collection::vec(any::<i64>(), 1..50), extra in any::<i64>()) {
        let mut mpq = MaxPriorityQueue::max();
        for &value in values.iter() {
            mpq.push(value);
        }
        let top = mpq.top_handle().unwrap();
        mpq.pop().unwrap();
        prop_assert!(!mpq.contains(top));
        prop_assert_eq!(mpq.push(extra), top);
        prop_assert_eq!(mpq.value(top), Ok(&extra));
    }
}

#[test]
fn scenario_handle_reuse() {
    let mut mpq = MutablePriorityQueue::new(|a: &i32, b: &i32| a > b);
    assert_eq!(mpq.push(4), Handle::from(0usize));
    assert_eq!(mpq.push(5), Handle::from(1usize));
    assert_eq!(mpq.top_handle(), Ok(Handle::from(1usize)));
    assert_eq!(mpq.pop(), Ok(5));
    assert_eq!(mpq.top_handle(), Ok(Handle::from(0usize)));
    assert_eq!(mpq.push(3), Handle::from(1usize));
    assert_eq!(mpq.top_handle(), Ok(Handle::from(0usize)));
    assert_eq!(mpq.pop(), Ok(4));
    assert_eq!(mpq.top_handle(), Ok(Handle::from(1usize)));
}

#[test]
fn scenario_update() {
    let mut mpq = MutablePriorityQueue::new(|a: &i32, b: &i32| a > b);
    assert_eq!(mpq.push(10), Handle::from(0usize));
    assert_eq!(mpq.push(20), Handle::from(1usize));
    assert_eq!(mpq.push(30), Handle::from(2usize));
    assert_eq!(mpq.top(), Ok(&30));
    mpq.update(Handle::from(2usize), 5).unwrap();
    assert_eq!(mpq.top(), Ok(&20));
    assert_eq!(mpq.drain_top().collect::<Vec<_>>(), vec![20, 10, 5]);
}

#[test]
fn invalid_access() {
    let mut mpq = MaxPriorityQueue::<i32>::max();
    assert_eq!(mpq.pop(), Err(Error::EmptyQueue));
    assert_eq!(mpq.top(), Err(Error::EmptyQueue));
    assert_eq!(mpq.value(Handle::from(99usize)), Err(Error::InvalidHandle(Handle::from(99usize))));
    mpq.push(1);
    assert_eq!(
        mpq.update(Handle::from(99usize), 2),
        Err(Error::InvalidHandle(Handle::from(99usize)))
    );
    let err: Box<dyn std::error::Error> = Box::new(Error::InvalidHandle(Handle::from(99usize)));
    assert_eq!(err.to_string(), "handle #99 is not active");
}
