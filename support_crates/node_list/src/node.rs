//! Node layout of the list.
//!
//! Every list embeds exactly one [`BaseNode`] as its sentinel and owns any number of [`ValueNode`]s.
//! Links between nodes never own anything.
//! A link that is `None` refers to the sentinel of the list it belongs to, which keeps the chain circular without
//! having to store the sentinel's address anywhere (and thus allows moving the list freely).

use allocators::Allocator;
use core::ptr::NonNull;

/// A link to a neighbouring node where `None` denotes the sentinel.
pub(crate) type Link<T> = Option<NonNull<ValueNode<T>>>;

/// The part every node has in common: its neighbours.
pub(crate) struct BaseNode<T> {
    pub(crate) prev: Link<T>,
    pub(crate) next: Link<T>,
}

impl<T> BaseNode<T> {
    /// A sentinel of an empty list which points to itself in both directions.
    pub(crate) const fn sentinel() -> Self {
        Self::new(None, None)
    }

    pub(crate) const fn new(prev: Link<T>, next: Link<T>) -> Self {
        Self { prev, next }
    }
}

impl<T> Clone for BaseNode<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BaseNode<T> {}

/// A node holding one element of the list.
///
/// This is the type a list's allocator gets rebound to, so that its memory can be requested e.g. when sizing an
/// [`Arena`](allocators::Arena) for a list.
#[repr(C)]
pub struct ValueNode<T> {
    pub(crate) base: BaseNode<T>,
    pub(crate) value: T,
}

/// Releases the storage of a node that has been allocated but not yet constructed.
///
/// It is armed while the node's value is being produced so that a panic while doing so does not leak the storage.
pub(crate) struct UnconstructedNode<'a, A: Allocator> {
    allocator: &'a A,
    ptr: NonNull<A::Value>,
}

impl<'a, A: Allocator> UnconstructedNode<'a, A> {
    pub(crate) fn new(allocator: &'a A, ptr: NonNull<A::Value>) -> Self {
        Self { allocator, ptr }
    }

    /// Move `value` into the node storage, handing ownership of the storage to the caller.
    pub(crate) fn construct(self, value: A::Value) -> NonNull<A::Value> {
        // Safety: the storage was allocated for exactly one value and nothing lives in it yet
        unsafe { self.allocator.construct(self.ptr, value) };
        let ptr = self.ptr;
        core::mem::forget(self);
        ptr
    }
}

impl<A: Allocator> Drop for UnconstructedNode<'_, A> {
    fn drop(&mut self) {
        unsafe { self.allocator.deallocate(self.ptr, 1) }
    }
}
