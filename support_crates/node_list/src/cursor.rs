//! Positions and cursors.
//!
//! A [`Position`] is a plain identity of an element (or of the end of a list).
//! It can be stored and copied freely but does not borrow the list, so all list operations taking one are `unsafe`.
//!
//! [`Cursor`] and [`CursorMut`] pair a position with a borrow of its list and are therefore safe to use.
//! Moving a cursor wraps around through the end position: moving forward from the last element reaches the end,
//! moving forward once more reaches the first element again.

use crate::list::List;
use crate::node::Link;
use allocators::{AllocError, Allocator};
use core::fmt::{Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::ptr;

/// The identity of an element in a [`List`] or of the list's end.
///
/// A position stays valid until the element it refers to is erased.
/// Inserting or erasing other elements, moving the list or swapping it with another one does not affect it.
/// The end position is shared by all lists and is valid for every one of them.
pub struct Position<T> {
    pub(crate) link: Link<T>,
}

impl<T> Position<T> {
    /// The position one past the last element of a list
    pub const END: Self = Self { link: None };

    pub(crate) const fn new(link: Link<T>) -> Self {
        Self { link }
    }

    pub fn is_end(&self) -> bool {
        self.link.is_none()
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        self.link == other.link
    }
}

impl<T> Eq for Position<T> {}

impl<T> Hash for Position<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.link.hash(state)
    }
}

impl<T> Debug for Position<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.link {
            None => f.write_str("Position(end)"),
            Some(node) => f.debug_tuple("Position").field(&node.as_ptr()).finish(),
        }
    }
}

/// A read-only cursor over a [`List`].
pub struct Cursor<'a, T, A: Allocator<Value = T>> {
    position: Position<T>,
    list: &'a List<T, A>,
}

impl<'a, T, A: Allocator<Value = T>> Cursor<'a, T, A> {
    pub(crate) fn new(position: Position<T>, list: &'a List<T, A>) -> Self {
        Self { position, list }
    }

    /// The position the cursor currently points at
    pub fn position(&self) -> Position<T> {
        self.position
    }

    pub fn is_end(&self) -> bool {
        self.position.is_end()
    }

    /// The element the cursor points at, or `None` if it is at the end.
    pub fn current(&self) -> Option<&'a T> {
        // Safety: the cursor only ever holds positions of its list and the list cannot be modified while borrowed
        unsafe { self.list.get(self.position) }
    }

    pub fn move_next(&mut self) {
        self.position = unsafe { self.list.next_position(self.position) };
    }

    pub fn move_prev(&mut self) {
        self.position = unsafe { self.list.prev_position(self.position) };
    }

    /// The element after the current one, or `None` if that is the end.
    pub fn peek_next(&self) -> Option<&'a T> {
        unsafe { self.list.get(self.list.next_position(self.position)) }
    }

    /// The element before the current one, or `None` if that is the end.
    pub fn peek_prev(&self) -> Option<&'a T> {
        unsafe { self.list.get(self.list.prev_position(self.position)) }
    }

    pub fn list(&self) -> &'a List<T, A> {
        self.list
    }
}

impl<T, A: Allocator<Value = T>> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Allocator<Value = T>> Copy for Cursor<'_, T, A> {}

impl<T, A: Allocator<Value = T>> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.position == other.position
    }
}

impl<T, A: Allocator<Value = T>> Eq for Cursor<'_, T, A> {}

impl<T: Debug, A: Allocator<Value = T>> Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("current", &self.current())
            .finish()
    }
}

/// A cursor over a [`List`] which can insert and remove elements.
pub struct CursorMut<'a, T, A: Allocator<Value = T>> {
    position: Position<T>,
    list: &'a mut List<T, A>,
}

impl<'a, T, A: Allocator<Value = T>> CursorMut<'a, T, A> {
    pub(crate) fn new(position: Position<T>, list: &'a mut List<T, A>) -> Self {
        Self { position, list }
    }

    pub fn position(&self) -> Position<T> {
        self.position
    }

    pub fn is_end(&self) -> bool {
        self.position.is_end()
    }

    /// The element the cursor points at, or `None` if it is at the end.
    pub fn current(&mut self) -> Option<&mut T> {
        unsafe { self.list.get_mut(self.position) }
    }

    pub fn move_next(&mut self) {
        self.position = unsafe { self.list.next_position(self.position) };
    }

    pub fn move_prev(&mut self) {
        self.position = unsafe { self.list.prev_position(self.position) };
    }

    pub fn peek_next(&mut self) -> Option<&mut T> {
        unsafe {
            let next = self.list.next_position(self.position);
            self.list.get_mut(next)
        }
    }

    pub fn peek_prev(&mut self) -> Option<&mut T> {
        unsafe {
            let prev = self.list.prev_position(self.position);
            self.list.get_mut(prev)
        }
    }

    /// Insert `value` in front of the current element and return the position of the new element.
    ///
    /// The cursor keeps pointing at the same element. At the end this appends to the list.
    pub fn insert_before(&mut self, value: T) -> Result<Position<T>, AllocError> {
        unsafe { self.list.insert(self.position, value) }
    }

    /// Insert `value` after the current element and return the position of the new element.
    ///
    /// The cursor keeps pointing at the same element. At the end this prepends to the list.
    pub fn insert_after(&mut self, value: T) -> Result<Position<T>, AllocError> {
        unsafe {
            let next = self.list.next_position(self.position);
            self.list.insert(next, value)
        }
    }

    /// Remove the current element and return it, moving the cursor to the following position.
    ///
    /// Returns `None` and does nothing if the cursor is at the end.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.position.is_end() {
            return None;
        }
        unsafe {
            let next = self.list.next_position(self.position);
            let value = self.list.erase(self.position);
            self.position = next;
            Some(value)
        }
    }

    /// A read-only cursor at the same position which borrows from this one.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.position, self.list)
    }

    pub fn list(&self) -> &List<T, A> {
        self.list
    }
}

impl<'a, T, A: Allocator<Value = T>> From<CursorMut<'a, T, A>> for Cursor<'a, T, A> {
    fn from(cursor: CursorMut<'a, T, A>) -> Self {
        Cursor::new(cursor.position, cursor.list)
    }
}

impl<T: Debug, A: Allocator<Value = T>> Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.position)
            .field("current", &self.as_cursor().current())
            .finish()
    }
}
