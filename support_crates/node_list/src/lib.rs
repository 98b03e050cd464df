//! A doubly linked list with pluggable allocators
//!
//! [`List`] is a circular doubly linked list anchored at a sentinel which is embedded in the list value itself.
//! Every node is allocated through an [`Allocator`](allocators::Allocator) that is rebound to the list's node type,
//! which makes it possible to place lists into a fixed size [`Arena`](allocators::Arena), e.g. on the stack.
//!
//! # Usage Example
//! ```rust
//! use allocators::stack_arena;
//! use node_list::{List, ValueNode};
//!
//! stack_arena!(arena, allocator: u32, { 4 * core::mem::size_of::<ValueNode<u32>>() });
//! let mut list = List::new_in(allocator);
//!
//! list.push_back(2).unwrap();
//! list.push_back(3).unwrap();
//! list.push_front(1).unwrap();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
//!
//! let mut cursor = list.cursor_front_mut();
//! cursor.move_next();
//! assert_eq!(cursor.remove_current(), Some(2));
//! assert_eq!(list.len(), 2);
//! ```
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod cursor;
mod iter;
mod list;
mod node;

pub use cursor::{Cursor, CursorMut, Position};
pub use iter::{IntoIter, Iter, IterMut};
pub use list::List;
pub use node::ValueNode;
