use core::alloc::LayoutError;
use core::ptr::{self, NonNull};
use thiserror_no_std::Error;

/// The error returned when an allocation fails
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum AllocError {
    #[error("the allocator has insufficient free memory to allocate the requested amount")]
    InsufficientMemory,
    #[error("the allocator is not bound to any backing memory")]
    Unbound,
    #[error("the requested layout could not be fulfilled")]
    LayoutError(#[from] LayoutError),
}

/// A typed allocator which containers use for every memory acquisition and release.
///
/// An allocator is parameterized by the type of value it hands out memory for.
/// Containers which store their elements inside of some internal node type obtain an allocator for that node type
/// through [`rebind()`](Allocator::rebind).
/// Rebinding never changes which memory resource is used; the rebound allocator is backed by exactly the same memory
/// as the original one.
///
/// Allocators are cheap handles and are cloned freely.
/// Whether a container hands its allocator over to another container on copy-assignment is decided by
/// [`PROPAGATE_ON_COPY_ASSIGNMENT`](Allocator::PROPAGATE_ON_COPY_ASSIGNMENT).
pub trait Allocator: Clone {
    /// The type of value this allocator allocates memory for
    type Value;

    /// The same allocator, but for values of type `U`
    type Rebind<U>: Allocator<Value = U>;

    /// Whether a container that is copy-assigned from another one should take over the other container's allocator.
    ///
    /// When this is `false`, the assigned-to container keeps its own allocator and copies all elements into memory
    /// from it.
    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;

    /// Allocate uninitialized memory for `count` consecutive values.
    ///
    /// Requesting zero values is allowed and returns a pointer that must not be dereferenced.
    fn allocate(&self, count: usize) -> Result<NonNull<Self::Value>, AllocError>;

    /// Return memory for `count` values to the allocator.
    ///
    /// # Safety
    /// The given memory must be *currently allocated* from this allocator or one that compares equal to it.
    ///
    /// This means that:
    /// - it was previously returned by [`allocate`](Allocator::allocate) with the same `count`
    /// - it has not yet been deallocated
    /// - no value is alive in it anymore
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, count: usize);

    /// Move `value` into the memory at `ptr`.
    ///
    /// # Safety
    /// `ptr` must point to allocated but uninitialized memory for one value.
    unsafe fn construct(&self, ptr: NonNull<Self::Value>, value: Self::Value) {
        ptr.as_ptr().write(value);
    }

    /// Run the destructor of the value at `ptr` without releasing its memory.
    ///
    /// # Safety
    /// `ptr` must point to an initialized value which is not used afterwards.
    unsafe fn destroy(&self, ptr: NonNull<Self::Value>) {
        ptr::drop_in_place(ptr.as_ptr());
    }

    /// Create an allocator for values of type `U` which is backed by the same memory as `self`.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// The allocator a copy of a container should use when the container is copy-constructed.
    fn select_on_copy_construction(&self) -> Self {
        self.clone()
    }
}
