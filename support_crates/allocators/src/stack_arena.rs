/// Create an [`Arena`](crate::Arena) laying on the stack together with a [`BumpAllocator`](crate::BumpAllocator)
/// handle bound to it.
///
/// # Usage Example
///
/// ## Create an arena and an allocator for `u64` values
/// ```rust
/// # use allocators::{stack_arena, Allocator};
/// #
/// // create an arena called `arena` and a handle called `allocator`
/// stack_arena!(arena, allocator: u64, 1024);
///
/// // use the handle to perform an allocation
/// let allocation = allocator.allocate(4);
/// assert!(allocation.is_ok());
/// assert_eq!(arena.used(), 32);
/// ```
///
/// ## Let the value type be inferred
/// ```rust
/// # use allocators::{stack_arena, Allocator};
/// #
/// stack_arena!(arena, allocator, 64);
///
/// let allocation = allocator.allocate(1).unwrap();
/// unsafe { allocator.construct(allocation, 0x55u8) };
/// assert_eq!(arena.used(), 1);
/// ```
#[macro_export]
macro_rules! stack_arena {
    ($arena:ident, $alloc:ident: $t:ty, $size:expr) => {
        let $arena = $crate::Arena::<{ $size }>::new();
        let $alloc = $crate::BumpAllocator::<$t, { $size }>::new(&$arena);
    };
    ($arena:ident, $alloc:ident, $size:expr) => {
        let $arena = $crate::Arena::<{ $size }>::new();
        let $alloc = $crate::BumpAllocator::<_, { $size }>::new(&$arena);
    };
}

#[cfg(test)]
mod test {
    use crate::Allocator;

    #[test]
    fn test_stack_arena_creation() {
        stack_arena!(_arena, _allocator: usize, 2048);
    }

    #[test]
    fn test_stack_arena_allocates_from_arena() {
        stack_arena!(arena, allocator: u32, 64);
        let ptr = allocator.allocate(2).unwrap();
        assert!(arena.contains(ptr.as_ptr().cast()));
        assert_eq!(arena.used(), 8);
    }
}
