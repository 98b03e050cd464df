use crate::AllocError;
use core::cell::{Cell, UnsafeCell};
use core::fmt::{Debug, Formatter};
use core::mem::MaybeUninit;
use core::ptr::NonNull;

/// A fixed-capacity arena which owns `N` bytes of backing memory.
///
/// Memory is handed out by bumping a marker through the backing memory.
/// Individual allocations are never given back; the whole arena is reclaimed at once when it is dropped which
/// invalidates everything that was built in it.
///
/// ```text
///   ┌──────────────────── storage (N bytes) ──────────────────┐
///   │                                                         │
/// [0xA, 0xA, pad, pad, 0xB, 0xB, 0xB, 0xB, ???, ???, ???, ???]
///                                          ^
///                              cursor ─────┘
/// ```
///
/// The arena is mutated through shared references so that any number of
/// [`BumpAllocator`](crate::BumpAllocator) handles can allocate from it at the same time.
/// It is not synchronized and therefore cannot be shared between threads.
#[repr(C, align(16))]
pub struct Arena<const N: usize> {
    storage: UnsafeCell<[MaybeUninit<u8>; N]>,
    cursor: Cell<usize>,
}

impl<const N: usize> Arena<N> {
    /// Create a new arena whose whole storage is still available.
    pub const fn new() -> Self {
        Self {
            storage: UnsafeCell::new([MaybeUninit::uninit(); N]),
            cursor: Cell::new(0),
        }
    }

    /// Reserve `size` bytes aligned to `align` bytes.
    ///
    /// Padding is inserted before the reserved region as needed to satisfy the alignment.
    /// If the padded request does not fit into the remaining storage, [`AllocError::InsufficientMemory`] is returned
    /// and the arena is left unchanged.
    ///
    /// # Panics
    /// This function panics if `align` is not a power of two.
    pub fn reserve(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        assert!(align.is_power_of_two(), "alignment must be a power of two");

        let base = self.storage.get().cast::<u8>();
        let cursor = self.cursor.get();

        // alignment is checked against the real address, so alignments above the arenas own one work too
        let unaligned = base as usize + cursor;
        let start = unaligned
            .checked_add(align - 1)
            .map(|addr| (addr & !(align - 1)) - base as usize);
        let end = start.and_then(|start| start.checked_add(size));

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) if end <= N => (start, end),
            _ => {
                log::debug!(
                    "arena at {:p} cannot fit {} bytes aligned to {} ({} of {} bytes used)",
                    self,
                    size,
                    align,
                    cursor,
                    N
                );
                return Err(AllocError::InsufficientMemory);
            }
        };

        self.cursor.set(end);

        // Safety: `start <= end <= N` so the resulting pointer lies inside the storage or directly behind it
        let region = unsafe { base.add(start) };
        log::trace!(
            "reserved {} bytes: {:p} -- {:p}",
            size,
            region,
            region.wrapping_add(size)
        );

        // Safety: the storage pointer is never null and neither is anything derived from it
        Ok(unsafe { NonNull::new_unchecked(region) })
    }

    /// Total size of the backing storage in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// How many bytes (including alignment padding) have already been reserved
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// How many bytes are still available for reservation, not accounting for padding
    pub fn remaining(&self) -> usize {
        N - self.cursor.get()
    }

    /// Whether `ptr` points into the storage of this arena (or directly behind it).
    pub fn contains(&self, ptr: *const u8) -> bool {
        let base = self.storage.get() as usize;
        (base..=base + N).contains(&(ptr as usize))
    }
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debug for Arena<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("storage", &self.storage.get())
            .field("capacity", &N)
            .field("used", &self.cursor.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;
    use crate::AllocError;

    #[test]
    fn fresh_arena_is_empty() {
        let arena = Arena::<64>::new();
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.remaining(), 64);
    }

    #[test]
    fn sequential_reservations_dont_overlap() {
        let arena = Arena::<64>::new();
        let a = arena.reserve(8, 8).unwrap();
        let b = arena.reserve(8, 8).unwrap();
        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 8);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn reservations_are_aligned() {
        let arena = Arena::<128>::new();
        arena.reserve(1, 1).unwrap();
        let word = arena.reserve(8, 8).unwrap();
        assert_eq!(word.as_ptr() as usize % 8, 0);
        // one byte plus seven bytes of padding plus the word itself
        assert_eq!(arena.used(), 16);

        arena.reserve(3, 1).unwrap();
        let wide = arena.reserve(16, 16).unwrap();
        assert_eq!(wide.as_ptr() as usize % 16, 0);
        assert_eq!(arena.used(), 48);
    }

    #[test]
    fn over_aligned_reservation_uses_real_address() {
        let arena = Arena::<256>::new();
        let page_aligned = arena.reserve(4, 64).unwrap();
        assert_eq!(page_aligned.as_ptr() as usize % 64, 0);
        assert!(arena.contains(page_aligned.as_ptr()));
    }

    #[test]
    fn exact_fit_succeeds() {
        let arena = Arena::<32>::new();
        assert!(arena.reserve(32, 1).is_ok());
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn exhaustion_is_reported_and_leaves_cursor_alone() {
        let arena = Arena::<32>::new();
        arena.reserve(24, 8).unwrap();
        assert_eq!(arena.reserve(16, 8), Err(AllocError::InsufficientMemory));
        assert_eq!(arena.used(), 24);
        // a smaller request still fits afterwards
        assert!(arena.reserve(8, 8).is_ok());
    }

    #[test]
    fn padding_counts_against_capacity() {
        let arena = Arena::<16>::new();
        arena.reserve(1, 1).unwrap();
        assert_eq!(
            arena.reserve(16, 1).unwrap_err(),
            AllocError::InsufficientMemory
        );
        assert_eq!(
            arena.reserve(8, 16).unwrap_err(),
            AllocError::InsufficientMemory
        );
        assert!(arena.reserve(8, 8).is_ok());
    }

    #[test]
    fn zero_sized_reservation_is_valid() {
        let arena = Arena::<8>::new();
        arena.reserve(8, 1).unwrap();
        let empty = arena.reserve(0, 1).unwrap();
        assert!(arena.contains(empty.as_ptr()));
        assert_eq!(arena.used(), 8);
    }

    #[test]
    #[should_panic]
    fn non_power_of_two_alignment_panics() {
        let arena = Arena::<8>::new();
        let _ = arena.reserve(1, 3);
    }

    #[test]
    fn contains_rejects_foreign_pointers() {
        let arena = Arena::<8>::new();
        let other = Arena::<8>::new();
        let ptr = other.reserve(1, 1).unwrap();
        assert!(!arena.contains(ptr.as_ptr()));
    }
}
