//! Memory allocation for allocator-aware containers
//!
//! The crate provides a typed [`Allocator`] contract together with two implementations of it:
//!
//! - [`Global`] which gets its memory from the global heap and is what containers use by default.
//! - [`BumpAllocator`] which is a cheap handle to a fixed-capacity [`Arena`] and never releases memory.
//!
//! # Example
//!
//! ```rust
//! use allocators::{Allocator, Arena, BumpAllocator};
//!
//! let arena = Arena::<256>::new();
//! let numbers = BumpAllocator::<u32, 256>::new(&arena);
//! let bytes = numbers.rebind::<u8>();
//!
//! // both handles allocate from the same arena and are therefore interchangeable
//! assert_eq!(numbers, bytes);
//! let ptr = numbers.allocate(4).unwrap();
//! unsafe { numbers.construct(ptr, 42) };
//! assert_eq!(arena.used(), 16);
//! ```
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod arena;
mod bump_allocator;
mod global;
mod stack_arena;
mod traits;

pub use arena::Arena;
pub use bump_allocator::BumpAllocator;
pub use global::Global;
pub use traits::{AllocError, Allocator};
