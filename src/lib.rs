#![deny(unused_imports)]
#![deny(missing_docs)]
#![cfg_attr(all(feature = "bench", test), feature(test))]

//! A mutable priority queue implementation for Rust.
//!
//! Like a binary heap, but every pushed element is given a `Handle` that stays
//! valid until the element is popped. The handle can be used to read the element
//! or to replace it with `update`, after which the heap restores its ordering
//! in logarithmic time. This is the classic decrease-key / increase-key operation.
//!
//! Elements are stored densely within a `Stash`. Handles of popped elements are
//! recycled: the most recently freed handle is the next one handed out.
//!
//! The ordering is given by a comparator `higher_priority(a, b)` that returns `true`
//! iff `a` must be retrieved before `b`.
//!
//! ```
//! use mutable_priority_queue::MutablePriorityQueue;
//!
//! let mut queue = MutablePriorityQueue::new(|a: &i32, b: &i32| a > b);
//! let a = queue.push(10);
//! let b = queue.push(20);
//! let c = queue.push(30);
//! assert_eq!(queue.top(), Ok(&30));
//!
//! queue.update(c, 5).unwrap();
//! assert_eq!(queue.top_handle(), Ok(b));
//! assert_eq!(queue.value(a), Ok(&10));
//! assert_eq!(queue.pop(), Ok(20));
//! ```

#[macro_use]
extern crate log;

#[cfg(all(feature = "bench", test))]
extern crate test;

use std::fmt;

mod queue;
mod slots;

pub use queue::{
    Compare, DrainTop, Greater, Handles, Less, MaxPriorityQueue, MinPriorityQueue,
    MutablePriorityQueue,
};
pub use slots::Values;

/// A handle to access stored elements within a mutable priority queue.
///
/// Handles stay the same while the element moves around in the heap.
/// Once the element is popped the handle is retired and may be issued
/// again by a later `push`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(usize);

impl From<usize> for Handle {
    fn from(val: usize) -> Handle {
        Handle(val)
    }
}

impl From<Handle> for usize {
    fn from(handle: Handle) -> usize {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can be caused while using `MutablePriorityQueue`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caused when using `top`, `top_handle` or `pop` on an empty queue.
    EmptyQueue,
    /// Caused when using a handle that was never issued or whose element was already popped.
    InvalidHandle(Handle),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::EmptyQueue => f.write_str("priority queue is empty"),
            Error::InvalidHandle(handle) => write!(f, "handle {} is not active", handle),
        }
    }
}

impl ::std::error::Error for Error {}

/// Generic `Result` type for `MutablePriorityQueue` methods.
pub type Result<T> = ::std::result::Result<T, Error>;
