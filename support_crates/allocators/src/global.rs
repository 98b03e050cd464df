use crate::{AllocError, Allocator};
use alloc::alloc::{alloc, dealloc};
use core::alloc::Layout;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::ptr::NonNull;

/// An allocator which gets its memory from the global heap.
///
/// It is stateless, so all `Global` handles are interchangeable and compare equal regardless of their value type.
/// This is the allocator containers use when no other one is given.
pub struct Global<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Global<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Allocator for Global<T> {
    type Value = T;
    type Rebind<U> = Global<U>;

    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // Safety: the layout has a non-zero size
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(AllocError::InsufficientMemory)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        match Layout::array::<T>(count) {
            Ok(layout) if layout.size() != 0 => dealloc(ptr.as_ptr().cast(), layout),
            // zero sized allocations never touched the heap
            _ => {}
        }
    }

    fn rebind<U>(&self) -> Global<U> {
        Global::new()
    }
}

impl<T> Clone for Global<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Global<T> {}

impl<T> Default for Global<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Global<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("Global")
    }
}

impl<T, U> PartialEq<Global<U>> for Global<T> {
    fn eq(&self, _other: &Global<U>) -> bool {
        true
    }
}

impl<T> Eq for Global<T> {}
