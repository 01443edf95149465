//! Dense storage of the queue elements, addressed by `Handle`.
//!
//! Every slot of the underlying `Stash` is either occupied by a live element or
//! linked into the stash's free list. Freed indices are handed out again in
//! last-in-first-out order which keeps the range of active handles compact.
//!
//! Besides the value each slot records where its handle currently sits within the
//! heap array, so a handle can be located in the heap without searching.

use stash::Stash;

use crate::Handle;

/// An index into the heap array.
///
/// Kept apart from `Handle` so that a heap position is never mistaken for an element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position(usize);

impl Position {
    #[inline]
    pub fn root() -> Self {
        Position(0)
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Returns the parent position or `None` for the root.
    #[inline]
    pub fn parent(self) -> Option<Position> {
        match self.is_root() {
            true => None,
            _ => Some(Position((self.0 - 1) / 2)),
        }
    }

    #[inline]
    pub fn left_child(self) -> Position {
        Position(2 * self.0 + 1)
    }

    #[inline]
    pub fn right_child(self) -> Position {
        Position(2 * self.0 + 2)
    }
}

impl From<usize> for Position {
    #[inline]
    fn from(index: usize) -> Position {
        Position(index)
    }
}

impl From<Position> for usize {
    #[inline]
    fn from(pos: Position) -> usize {
        pos.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot<T> {
    value: T,
    pos: Position,
}

/// Value store and position index of a `MutablePriorityQueue`.
///
/// Apart from `is_active`, every method that takes a handle requires that handle to be
/// active. The queue validates handles before they reach this layer.
#[derive(Debug, Clone)]
pub struct Slots<T> {
    data: Stash<Slot<T>, Handle>,
    /// Number of distinct handles ever issued, i.e. the length of the value store
    /// including retired slots.
    issued: usize,
}

impl<T> Slots<T> {
    #[inline]
    pub fn new() -> Self {
        Slots {
            data: Stash::default(),
            issued: 0,
        }
    }

    /// Returns the number of active handles.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of slots including retired ones.
    #[cfg(test)]
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Returns true if `handle` was issued and has not been released since.
    #[inline]
    pub fn is_active(&self, handle: Handle) -> bool {
        self.data.get(handle).is_some()
    }

    #[inline]
    fn slot(&self, handle: Handle) -> &Slot<T> {
        debug_assert!(self.is_active(handle), "access to inactive handle {}", handle);
        unsafe { self.data.get_unchecked(handle) }
    }

    #[inline]
    fn slot_mut(&mut self, handle: Handle) -> &mut Slot<T> {
        debug_assert!(self.is_active(handle), "access to inactive handle {}", handle);
        unsafe { self.data.get_unchecked_mut(handle) }
    }

    /// Stores `value` and returns its handle.
    ///
    /// Reuses the most recently released handle if there is one,
    /// otherwise issues the next fresh one.
    pub fn allocate(&mut self, value: T, pos: Position) -> Handle {
        let handle = self.data.put(Slot { value, pos });
        if usize::from(handle) < self.issued {
            trace!("reissuing retired handle {}", handle);
        } else {
            self.issued += 1;
        }
        handle
    }

    /// Retires `handle` and returns the value it held.
    ///
    /// Returns `None` if the handle was not active.
    #[inline]
    pub fn release(&mut self, handle: Handle) -> Option<T> {
        self.data.take(handle).map(|slot| slot.value)
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> &T {
        &self.slot(handle).value
    }

    /// Overwrites the value of `handle` and returns the previous one.
    #[inline]
    pub fn set(&mut self, handle: Handle, value: T) -> T {
        ::std::mem::replace(&mut self.slot_mut(handle).value, value)
    }

    #[inline]
    pub fn position_of(&self, handle: Handle) -> Position {
        self.slot(handle).pos
    }

    #[inline]
    pub fn set_position(&mut self, handle: Handle, pos: Position) {
        self.slot_mut(handle).pos = pos;
    }

    /// Drops all values and forgets every issued handle.
    pub fn clear(&mut self) {
        self.data = Stash::default();
        self.issued = 0;
    }

    /// Iterate over the stored values in unspecified order.
    #[inline]
    pub fn values(&self) -> Values<'_, T> {
        Values {
            iter: self.data.values(),
        }
    }
}

/// Iterator over references to values stored within a `MutablePriorityQueue`.
pub struct Values<'a, T: 'a> {
    iter: ::stash::stash::Values<'a, Slot<T>>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|slot| &slot.value)
    }
}
