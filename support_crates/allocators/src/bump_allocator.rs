use crate::{AllocError, Allocator, Arena};
use core::alloc::Layout;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

/// A typed allocator handle which allocates from an [`Arena`].
///
/// The handle only references its arena, it does not own anything.
/// It is `Copy` and can be rebound to any other value type, all of which keep allocating from the same arena.
/// Two handles compare equal exactly when they reference the same arena (by identity, not by content), in which
/// case memory allocated through one of them may be deallocated through the other.
///
/// Deallocation is a no-op because an arena never releases individual allocations.
/// The borrow on the arena ensures that the arena outlives every handle and every container built on one.
///
/// A [default](BumpAllocator::default) handle is *unbound* and refuses all allocations with
/// [`AllocError::Unbound`] until it is replaced by a bound one.
pub struct BumpAllocator<'arena, T, const N: usize> {
    arena: Option<&'arena Arena<N>>,
    _marker: PhantomData<fn() -> T>,
}

impl<'arena, T, const N: usize> BumpAllocator<'arena, T, N> {
    /// Create a handle which allocates from the given arena.
    pub const fn new(arena: &'arena Arena<N>) -> Self {
        Self {
            arena: Some(arena),
            _marker: PhantomData,
        }
    }

    /// Create a handle which is not bound to any arena.
    pub const fn unbound() -> Self {
        Self {
            arena: None,
            _marker: PhantomData,
        }
    }

    /// The arena this handle allocates from
    pub fn arena(&self) -> Option<&'arena Arena<N>> {
        self.arena
    }

    pub fn is_bound(&self) -> bool {
        self.arena.is_some()
    }
}

impl<'arena, T, const N: usize> Allocator for BumpAllocator<'arena, T, N> {
    type Value = T;
    type Rebind<U> = BumpAllocator<'arena, U, N>;

    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let arena = self.arena.ok_or(AllocError::Unbound)?;
        let layout = Layout::array::<T>(count)?;
        arena
            .reserve(layout.size(), layout.align())
            .map(NonNull::cast)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, _count: usize) {
        debug_assert!(
            self.arena
                .is_some_and(|arena| arena.contains(ptr.as_ptr().cast())),
            "deallocate was called with a pointer that does not point inside the arena"
        );
    }

    fn rebind<U>(&self) -> BumpAllocator<'arena, U, N> {
        BumpAllocator {
            arena: self.arena,
            _marker: PhantomData,
        }
    }
}

impl<T, const N: usize> Clone for BumpAllocator<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for BumpAllocator<'_, T, N> {}

impl<T, const N: usize> Default for BumpAllocator<'_, T, N> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T, const N: usize> Debug for BumpAllocator<'_, T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("arena", &self.arena.map(|arena| arena as *const Arena<N>))
            .finish()
    }
}

impl<'b, T, U, const N: usize, const M: usize> PartialEq<BumpAllocator<'b, U, M>>
    for BumpAllocator<'_, T, N>
{
    fn eq(&self, other: &BumpAllocator<'b, U, M>) -> bool {
        match (self.arena, other.arena) {
            (Some(this), Some(other)) => ptr::eq(
                (this as *const Arena<N>).cast::<u8>(),
                (other as *const Arena<M>).cast::<u8>(),
            ),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T, const N: usize> Eq for BumpAllocator<'_, T, N> {}

#[cfg(test)]
mod tests {
    use super::BumpAllocator;
    use crate::traits::tests as alloc_tests;
    use crate::{AllocError, Allocator, Arena};
    use core::mem;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Point {
        x: usize,
        y: usize,
    }

    #[test]
    fn can_alloc_single() {
        let arena = Arena::<64>::new();
        let allocator = BumpAllocator::<Point, 64>::new(&arena);
        alloc_tests::can_alloc_free_single(&allocator, Point { x: 1, y: 2 });
        assert_eq!(arena.used(), mem::size_of::<Point>());
    }

    #[test]
    fn allocs_dont_alias() {
        const ITEMS: usize = 20;
        let arena = Arena::<{ ITEMS * 16 }>::new();
        let allocator = BumpAllocator::new(&arena);

        let mut items = [Point { x: 0, y: 0 }; ITEMS];
        for (i, item) in items.iter_mut().enumerate() {
            *item = Point { x: i, y: i };
        }
        alloc_tests::allocs_dont_alias(&allocator, &items);
    }

    #[test]
    fn allocation_size_follows_value_type() {
        let arena = Arena::<256>::new();
        let words = BumpAllocator::<u64, 256>::new(&arena);
        words.allocate(4).unwrap();
        assert_eq!(arena.used(), 32);

        let bytes: BumpAllocator<u8, 256> = words.rebind();
        bytes.allocate(3).unwrap();
        assert_eq!(arena.used(), 35);

        // the rebound handle still honours the alignment of its own type
        let ptr = words.allocate(1).unwrap();
        assert_eq!(ptr.as_ptr() as usize % mem::align_of::<u64>(), 0);
        assert_eq!(arena.used(), 48);
    }

    #[test]
    fn deallocate_does_not_reclaim() {
        let arena = Arena::<64>::new();
        let allocator = BumpAllocator::<u32, 64>::new(&arena);
        let ptr = allocator.allocate(2).unwrap();
        unsafe { allocator.deallocate(ptr, 2) };
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn exhausted_arena_reports_error() {
        let arena = Arena::<16>::new();
        let allocator = BumpAllocator::<u64, 16>::new(&arena);
        allocator.allocate(2).unwrap();
        assert_eq!(allocator.allocate(1), Err(AllocError::InsufficientMemory));
    }

    #[test]
    fn unbound_handle_refuses_allocation() {
        let allocator = BumpAllocator::<u64, 16>::default();
        assert!(!allocator.is_bound());
        assert_eq!(allocator.allocate(1), Err(AllocError::Unbound));
        assert!(!allocator.rebind::<u8>().is_bound());
    }

    #[test]
    fn equality_is_arena_identity() {
        let arena_a = Arena::<32>::new();
        let arena_b = Arena::<32>::new();

        let a1 = BumpAllocator::<u8, 32>::new(&arena_a);
        let a2 = BumpAllocator::<u64, 32>::new(&arena_a);
        let b = BumpAllocator::<u8, 32>::new(&arena_b);

        assert_eq!(a1, a2);
        assert_eq!(a1, a1.rebind::<Point>());
        assert_ne!(a1, b);
        assert_ne!(a2, b);
    }

    #[test]
    fn equality_ignores_arena_content() {
        let arena_a = Arena::<32>::new();
        let arena_b = Arena::<32>::new();
        arena_a.reserve(8, 8).unwrap();
        arena_b.reserve(8, 8).unwrap();

        assert_ne!(
            BumpAllocator::<u8, 32>::new(&arena_a),
            BumpAllocator::<u8, 32>::new(&arena_b)
        );
    }

    #[test]
    fn unbound_handles_compare_equal_to_each_other_only() {
        let arena = Arena::<32>::new();
        let unbound = BumpAllocator::<u8, 32>::unbound();
        assert_eq!(unbound, BumpAllocator::<u16, 32>::default());
        assert_ne!(unbound, BumpAllocator::<u8, 32>::new(&arena));
    }

    #[test]
    fn arena_accessor_returns_referenced_arena() {
        let arena = Arena::<32>::new();
        let allocator = BumpAllocator::<u8, 32>::new(&arena);
        assert!(core::ptr::eq(allocator.arena().unwrap(), &arena));
    }
}
