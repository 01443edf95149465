//! A binary heap whose elements can be addressed and updated through handles.
//!
//! The heap array stores handles, not values. Values live in `Slots` which also
//! records the heap position of every handle. Every swap in the heap array updates
//! both positions in the same step, so `update` finds its element in constant time
//! and restores the heap order with a single sift walk.

use std::fmt;
use std::ops::Index;

use crate::slots::{Position, Slots, Values};
use crate::{Error, Handle, Result};

/// Decides which of two elements has to be retrieved first.
///
/// Implemented for every `Fn(&T, &T) -> bool` closure or function, and for the
/// zero-sized orderings `Greater` and `Less`.
pub trait Compare<T> {
    /// Returns `true` iff `a` must be retrieved before `b`.
    fn higher_priority(&self, a: &T, b: &T) -> bool;
}

impl<T, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Ordering that retrieves the greatest element first.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Greater;

impl<T: Ord> Compare<T> for Greater {
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Ordering that retrieves the least element first.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Less;

impl<T: Ord> Compare<T> for Less {
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Type alias for a `MutablePriorityQueue` that retrieves the greatest element first.
///
/// Only `max()` constructs it, so it cannot be built with the reverse ordering:
///
/// ```compile_fail
/// use mutable_priority_queue::MaxPriorityQueue;
///
/// let queue: MaxPriorityQueue<i32> = MaxPriorityQueue::min();
/// ```
pub type MaxPriorityQueue<T> = MutablePriorityQueue<T, Greater>;

/// Type alias for a `MutablePriorityQueue` that retrieves the least element first.
///
/// Only `min()` constructs it, so it cannot be built with the reverse ordering:
///
/// ```compile_fail
/// use mutable_priority_queue::MinPriorityQueue;
///
/// let queue: MinPriorityQueue<i32> = MinPriorityQueue::max();
/// ```
pub type MinPriorityQueue<T> = MutablePriorityQueue<T, Less>;

/// A mutable priority queue implementation.
///
/// Elements are ordered by the comparator given on construction:
/// `higher_priority(a, b)` returns `true` iff `a` has to be retrieved before `b`.
/// It must be a strict weak ordering and must not change while elements are stored.
/// The relative order of elements with equal priority is unspecified.
///
/// Pushing an element returns a `Handle` that stays valid until the element is popped.
/// Handles are local to the queue that issued them and should not be exchanged
/// between different queues.
///
/// | Operation    | Complexity |
/// |--------------|------------|
/// | `push`       | O(log n)   |
/// | `pop`        | O(log n)   |
/// | `update`     | O(log n)   |
/// | `top`        | O(1)       |
/// | `top_handle` | O(1)       |
/// | `value`      | O(1)       |
#[derive(Clone)]
pub struct MutablePriorityQueue<T, F> {
    /// Implicit binary tree of handles. The children of position `i` are `2i+1` and `2i+2`.
    heap: Vec<Handle>,
    /// Values and heap positions of all active handles.
    slots: Slots<T>,
    higher_priority: F,
}

impl<T: Ord> MutablePriorityQueue<T, Greater> {
    /// Creates a new queue that pops the greatest element first.
    #[inline]
    pub fn max() -> Self {
        MutablePriorityQueue::new(Greater)
    }
}

impl<T: Ord> MutablePriorityQueue<T, Less> {
    /// Creates a new queue that pops the least element first.
    #[inline]
    pub fn min() -> Self {
        MutablePriorityQueue::new(Less)
    }
}

impl<T, F> MutablePriorityQueue<T, F>
where
    F: Compare<T>,
{
    /// Creates a new, empty `MutablePriorityQueue` ordered by `higher_priority`.
    #[inline]
    pub fn new(higher_priority: F) -> Self {
        MutablePriorityQueue {
            heap: Vec::new(),
            slots: Slots::new(),
            higher_priority,
        }
    }

    /// Creates a new, empty `MutablePriorityQueue` with room for `capacity` elements
    /// in its heap array.
    #[inline]
    pub fn with_capacity(capacity: usize, higher_priority: F) -> Self {
        MutablePriorityQueue {
            heap: Vec::with_capacity(capacity),
            slots: Slots::new(),
            higher_priority,
        }
    }

    /// Returns the number of elements stored in this `MutablePriorityQueue`.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if this `MutablePriorityQueue` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `handle` refers to an element that is still stored.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.slots.is_active(handle)
    }

    #[inline]
    fn at(&self, pos: Position) -> Handle {
        self.heap[usize::from(pos)]
    }

    /// Returns true if the element of `a` must be retrieved before the element of `b`.
    #[inline]
    fn is_higher(&self, a: Handle, b: Handle) -> bool {
        self.higher_priority
            .higher_priority(self.slots.get(a), self.slots.get(b))
    }

    /// Exchanges two heap entries together with their position index entries.
    #[inline]
    fn swap(&mut self, a: Position, b: Position) {
        self.heap.swap(usize::from(a), usize::from(b));
        let (at_a, at_b) = (self.at(a), self.at(b));
        self.slots.set_position(at_a, a);
        self.slots.set_position(at_b, b);
    }

    /// Moves the element at `pos` towards the root while it has higher priority than its parent.
    ///
    /// Returns true if at least one swap was performed.
    fn sift_up(&mut self, mut pos: Position) -> bool {
        let mut moved = false;
        while let Some(parent) = pos.parent() {
            if !self.is_higher(self.at(pos), self.at(parent)) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
            moved = true;
        }
        moved
    }

    /// Moves the element at `pos` towards the leaves while a child has higher priority.
    fn sift_down(&mut self, mut pos: Position) {
        let len = self.len();
        loop {
            let left = pos.left_child();
            if usize::from(left) >= len {
                return;
            }
            let right = pos.right_child();
            let child = if usize::from(right) < len && self.is_higher(self.at(right), self.at(left))
            {
                right
            } else {
                left
            };
            if !self.is_higher(self.at(child), self.at(pos)) {
                return;
            }
            self.swap(pos, child);
            pos = child;
        }
    }

    /// Inserts the given element into the `MutablePriorityQueue` and returns a `Handle` to it
    /// that allows to directly address it.
    ///
    /// The most recently retired handle is reused if there is one.
    pub fn push(&mut self, value: T) -> Handle {
        let pos = Position::from(self.len());
        let handle = self.slots.allocate(value, pos);
        self.heap.push(handle);
        self.sift_up(pos);
        handle
    }

    /// Returns a reference to the element with the highest priority.
    #[inline]
    pub fn top(&self) -> Result<&T> {
        self.top_handle().map(|handle| self.slots.get(handle))
    }

    /// Returns a reference to the element with the highest priority without checking
    /// for emptiness.
    ///
    /// So use it very carefully!
    #[inline]
    pub unsafe fn top_unchecked(&self) -> &T {
        self.slots.get(*self.heap.get_unchecked(0))
    }

    /// Returns the handle of the element with the highest priority.
    #[inline]
    pub fn top_handle(&self) -> Result<Handle> {
        match self.heap.first() {
            Some(&handle) => Ok(handle),
            None => {
                debug!("top of empty priority queue requested");
                Err(Error::EmptyQueue)
            }
        }
    }

    /// Returns a reference to the element associated with the given handle.
    #[inline]
    pub fn value(&self, handle: Handle) -> Result<&T> {
        self.check_handle(handle)?;
        Ok(self.slots.get(handle))
    }

    fn check_handle(&self, handle: Handle) -> Result<()> {
        match self.contains(handle) {
            true => Ok(()),
            _ => {
                debug!("rejected inactive handle {}", handle);
                Err(Error::InvalidHandle(handle))
            }
        }
    }

    /// Removes the element with the highest priority from this `MutablePriorityQueue`
    /// and returns it.
    ///
    /// Its handle is retired and will be the next one issued by `push`.
    #[inline]
    pub fn pop(&mut self) -> Result<T> {
        match self.is_empty() {
            true => {
                debug!("pop from empty priority queue");
                Err(Error::EmptyQueue)
            }
            _ => unsafe { Ok(self.pop_unchecked()) },
        }
    }

    /// Removes the element with the highest priority without checking for emptiness
    /// and returns it.
    ///
    /// So use this method carefully!
    pub unsafe fn pop_unchecked(&mut self) -> T {
        let last = match self.heap.pop() {
            Some(handle) => handle,
            None => ::unreachable::unreachable(),
        };
        let root = match self.heap.is_empty() {
            true => last,
            _ => {
                let root = ::std::mem::replace(&mut self.heap[0], last);
                self.slots.set_position(last, Position::root());
                root
            }
        };
        let value = match self.slots.release(root) {
            Some(value) => value,
            None => ::unreachable::unreachable(),
        };
        self.sift_down(Position::root());
        value
    }

    /// Replaces the element associated with the given handle by `value` and restores
    /// the heap order.
    ///
    /// The new value may have higher or lower priority than the old one.
    #[inline]
    pub fn update(&mut self, handle: Handle, value: T) -> Result<()> {
        self.replace(handle, value).map(|_| ())
    }

    /// Replaces the element associated with the given handle by `value`, restores the
    /// heap order and returns the previous element.
    pub fn replace(&mut self, handle: Handle, value: T) -> Result<T> {
        self.check_handle(handle)?;
        let old = self.slots.set(handle, value);
        let pos = self.slots.position_of(handle);
        // A single changed value can only violate the order towards the parent
        // or towards the children, never both.
        if !self.sift_up(pos) {
            self.sift_down(pos);
        }
        Ok(old)
    }

    /// Removes all elements. Handle numbering starts over at zero.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// Iterate over the values in this `MutablePriorityQueue` by reference in unspecified order.
    #[inline]
    pub fn values(&self) -> Values<'_, T> {
        self.slots.values()
    }

    /// Iterate over the handles of all stored elements in heap order.
    ///
    /// The first handle is always the one returned by `top_handle`.
    #[inline]
    pub fn handles(&self) -> Handles<'_> {
        Handles {
            iter: self.heap.iter(),
        }
    }

    /// Iterate over values stored within a `MutablePriorityQueue` from highest to lowest
    /// priority. Drains the queue.
    #[inline]
    pub fn drain_top(self) -> DrainTop<T, F> {
        DrainTop { queue: self }
    }
}

impl<T, F> fmt::Debug for MutablePriorityQueue<T, F>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MutablePriorityQueue")
            .field("heap", &self.heap)
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T, F> Index<Handle> for MutablePriorityQueue<T, F>
where
    F: Compare<T>,
{
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.value(handle).expect("no element found for given handle")
    }
}

impl<T, F> Extend<T> for MutablePriorityQueue<T, F>
where
    F: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        self.heap.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

/// Iterator over the handles stored within a `MutablePriorityQueue` in heap order.
pub struct Handles<'a> {
    iter: ::std::slice::Iter<'a, Handle>,
}

impl<'a> Iterator for Handles<'a> {
    type Item = Handle;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().cloned()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Iterator over values stored within a `MutablePriorityQueue` from highest to lowest
/// priority. Drains the queue.
pub struct DrainTop<T, F> {
    queue: MutablePriorityQueue<T, F>,
}

impl<T, F> Iterator for DrainTop<T, F>
where
    F: Compare<T>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.queue.is_empty() {
            true => None,
            _ => unsafe { Some(self.queue.pop_unchecked()) },
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use super::*;
    use std::collections::BinaryHeap;
    use test::{black_box, Bencher};

    const SAMPLES: i64 = 100_000;

    fn setup_sample() -> Vec<i64> {
        setup_sample_sized(SAMPLES)
    }

    fn setup_sample_sized(n: i64) -> Vec<i64> {
        use rand::{sample, thread_rng};
        let mut rng = thread_rng();
        sample(&mut rng, 1..n + 1, n as usize)
    }

    fn setup_sample_record() -> Vec<Record> {
        setup_sample()
            .into_iter()
            .map(|val| val.into())
            .collect::<Vec<Record>>()
    }

    /// A value with an 80 byte payload that is ordered by `value` only.
    #[derive(Debug, Clone)]
    struct Record {
        value: i64,
        ext: [u8; 80],
    }

    impl From<i64> for Record {
        fn from(value: i64) -> Record {
            Record {
                value,
                ext: [0; 80],
            }
        }
    }

    impl PartialEq for Record {
        fn eq(&self, other: &Record) -> bool {
            self.value == other.value
        }
    }

    impl Eq for Record {}

    impl PartialOrd for Record {
        fn partial_cmp(&self, other: &Record) -> Option<::std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Record {
        fn cmp(&self, other: &Record) -> ::std::cmp::Ordering {
            self.value.cmp(&other.value)
        }
    }

    #[bench]
    fn mutable_priority_queue_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut mpq = MaxPriorityQueue::max();
            for &value in sample.iter() {
                black_box(mpq.push(value));
            }
        });
    }

    #[bench]
    fn mutable_priority_queue_push_record(bencher: &mut Bencher) {
        let sample = setup_sample_record();
        bencher.iter(|| {
            let mut mpq = MutablePriorityQueue::new(|a: &Record, b: &Record| a.value > b.value);
            for record in sample.iter() {
                black_box(mpq.push(record.clone()));
            }
        });
    }

    #[bench]
    fn binary_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut bh = BinaryHeap::new();
            for &value in sample.iter() {
                black_box(bh.push(value));
            }
        });
    }

    #[bench]
    fn binary_heap_push_record(bencher: &mut Bencher) {
        let sample = setup_sample_record();
        bencher.iter(|| {
            let mut bh = BinaryHeap::new();
            for record in sample.iter() {
                black_box(bh.push(record.clone()));
            }
        });
    }

    #[bench]
    fn mutable_priority_queue_pop(bencher: &mut Bencher) {
        let mut mpq = MaxPriorityQueue::max();
        mpq.extend(setup_sample());
        bencher.iter(|| {
            let mut mpq = mpq.clone();
            while let Ok(_) = black_box(mpq.pop()) {}
        });
    }

    #[bench]
    fn mutable_priority_queue_pop_record(bencher: &mut Bencher) {
        let mut mpq = MutablePriorityQueue::new(|a: &Record, b: &Record| a.value > b.value);
        mpq.extend(setup_sample_record());
        bencher.iter(|| {
            let mut mpq = mpq.clone();
            while let Ok(record) = mpq.pop() {
                black_box(record.ext);
            }
        });
    }

    #[bench]
    fn binary_heap_pop(bencher: &mut Bencher) {
        let bh = setup_sample().into_iter().collect::<BinaryHeap<_>>();
        bencher.iter(|| {
            let mut bh = bh.clone();
            while let Some(_) = black_box(bh.pop()) {}
        });
    }

    #[bench]
    fn binary_heap_pop_record(bencher: &mut Bencher) {
        let bh = setup_sample_record().into_iter().collect::<BinaryHeap<_>>();
        bencher.iter(|| {
            let mut bh = bh.clone();
            while let Some(record) = bh.pop() {
                black_box(record.ext);
            }
        });
    }

    #[bench]
    fn mutable_priority_queue_update(bencher: &mut Bencher) {
        let sample = setup_sample();
        let mut mpq = MaxPriorityQueue::max();
        let handles = sample.iter().map(|&value| mpq.push(value)).collect::<Vec<_>>();
        bencher.iter(|| {
            for (&handle, &value) in handles.iter().zip(sample.iter().rev()) {
                black_box(mpq.update(handle, value)).unwrap();
            }
        });
    }

    // Input size sweeps for comparing growth against `BinaryHeap`.

    fn push_sized(bencher: &mut Bencher, n: i64) {
        let sample = setup_sample_sized(n);
        bencher.iter(|| {
            let mut mpq = MaxPriorityQueue::max();
            for &value in sample.iter() {
                black_box(mpq.push(value));
            }
        });
    }

    fn pop_sized(bencher: &mut Bencher, n: i64) {
        let mut mpq = MaxPriorityQueue::max();
        mpq.extend(setup_sample_sized(n));
        bencher.iter(|| {
            let mut mpq = mpq.clone();
            while let Ok(_) = black_box(mpq.pop()) {}
        });
    }

    fn binary_heap_push_sized(bencher: &mut Bencher, n: i64) {
        let sample = setup_sample_sized(n);
        bencher.iter(|| {
            let mut bh = BinaryHeap::new();
            for &value in sample.iter() {
                black_box(bh.push(value));
            }
        });
    }

    fn binary_heap_pop_sized(bencher: &mut Bencher, n: i64) {
        let bh = setup_sample_sized(n).into_iter().collect::<BinaryHeap<_>>();
        bencher.iter(|| {
            let mut bh = bh.clone();
            while let Some(_) = black_box(bh.pop()) {}
        });
    }

    #[bench]
    fn mutable_priority_queue_push_1k(bencher: &mut Bencher) {
        push_sized(bencher, 1_000);
    }

    #[bench]
    fn mutable_priority_queue_push_10k(bencher: &mut Bencher) {
        push_sized(bencher, 10_000);
    }

    #[bench]
    fn mutable_priority_queue_push_1m(bencher: &mut Bencher) {
        push_sized(bencher, 1_000_000);
    }

    #[bench]
    fn mutable_priority_queue_pop_1k(bencher: &mut Bencher) {
        pop_sized(bencher, 1_000);
    }

    #[bench]
    fn mutable_priority_queue_pop_10k(bencher: &mut Bencher) {
        pop_sized(bencher, 10_000);
    }

    #[bench]
    fn mutable_priority_queue_pop_1m(bencher: &mut Bencher) {
        pop_sized(bencher, 1_000_000);
    }

    #[bench]
    fn binary_heap_push_1k(bencher: &mut Bencher) {
        binary_heap_push_sized(bencher, 1_000);
    }

    #[bench]
    fn binary_heap_push_10k(bencher: &mut Bencher) {
        binary_heap_push_sized(bencher, 10_000);
    }

    #[bench]
    fn binary_heap_push_1m(bencher: &mut Bencher) {
        binary_heap_push_sized(bencher, 1_000_000);
    }

    #[bench]
    fn binary_heap_pop_1k(bencher: &mut Bencher) {
        binary_heap_pop_sized(bencher, 1_000);
    }

    #[bench]
    fn binary_heap_pop_10k(bencher: &mut Bencher) {
        binary_heap_pop_sized(bencher, 10_000);
    }

    #[bench]
    fn binary_heap_pop_1m(bencher: &mut Bencher) {
        binary_heap_pop_sized(bencher, 1_000_000);
    }
}
