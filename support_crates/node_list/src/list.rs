use crate::cursor::{Cursor, CursorMut, Position};
use crate::iter::{IntoIter, Iter, IterMut};
use crate::node::{BaseNode, Link, UnconstructedNode, ValueNode};
use allocators::{AllocError, Allocator, Global};
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::mem;
use core::ptr;

/// A doubly linked list whose nodes are allocated from an [`Allocator`].
///
/// The list is circular and anchored at a sentinel node which is embedded in the list itself.
/// The sentinel marks the [end](List::end) position which lies between the last and the first element.
///
/// All node memory is requested from `A` rebound to the list's node type; the allocator given to the list is kept
/// around for [`allocator()`](List::allocator) and to decide what happens on copy-assignment
/// (see [`try_clone_from()`](List::try_clone_from)).
///
/// Elements can be addressed by [`Position`]s which stay valid until the element they refer to is erased, no matter
/// what else happens to the list.
pub struct List<T, A: Allocator<Value = T> = Global<T>> {
    sentinel: BaseNode<T>,
    len: usize,
    allocator: A,
    node_allocator: A::Rebind<ValueNode<T>>,
    _owns: PhantomData<ValueNode<T>>,
}

impl<T> List<T> {
    /// Create an empty list which allocates from the global heap.
    pub fn new() -> Self {
        Self::new_in(Global::new())
    }
}

impl<T, A: Allocator<Value = T>> List<T, A> {
    /// Create an empty list which allocates from the given allocator.
    pub fn new_in(allocator: A) -> Self {
        let node_allocator = allocator.rebind();
        Self {
            sentinel: BaseNode::sentinel(),
            len: 0,
            allocator,
            node_allocator,
            _owns: PhantomData,
        }
    }

    /// Create a list of `len` elements where the element at each index is produced by `f(index)`.
    ///
    /// If `f` panics or an allocation fails, every element produced so far is dropped and all memory is returned to
    /// the allocator before the panic resumes or the error is returned.
    pub fn from_fn_in<F>(len: usize, mut f: F, allocator: A) -> Result<Self, AllocError>
    where
        F: FnMut(usize) -> T,
    {
        let mut list = Self::new_in(allocator);
        for index in 0..len {
            let end = list.end();
            // Safety: the end position is valid for every list
            unsafe { list.insert_with(end, || f(index)) }?;
        }
        Ok(list)
    }

    /// Create a list of `len` default elements.
    pub fn with_len_in(len: usize, allocator: A) -> Result<Self, AllocError>
    where
        T: Default,
    {
        Self::from_fn_in(len, |_| T::default(), allocator)
    }

    /// Create a list of `len` clones of `value`.
    pub fn from_elem_in(len: usize, value: &T, allocator: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_fn_in(len, |_| value.clone(), allocator)
    }

    /// Create a list of `len` default elements using a default constructed allocator.
    pub fn with_len(len: usize) -> Result<Self, AllocError>
    where
        T: Default,
        A: Default,
    {
        Self::with_len_in(len, A::default())
    }

    /// Create a list of `len` clones of `value` using a default constructed allocator.
    pub fn from_elem(len: usize, value: &T) -> Result<Self, AllocError>
    where
        T: Clone,
        A: Default,
    {
        Self::from_elem_in(len, value, A::default())
    }

    /// The allocator this list was created with (or took over on copy-assignment)
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first element, or [`end()`](List::end) if the list is empty.
    pub fn begin(&self) -> Position<T> {
        Position::new(self.sentinel.next)
    }

    /// The position of the sentinel, one past the last element.
    ///
    /// It is valid for every list and never refers to an element.
    pub fn end(&self) -> Position<T> {
        Position::END
    }

    /// Position of the last element, or [`end()`](List::end) if the list is empty.
    pub fn last(&self) -> Position<T> {
        Position::new(self.sentinel.prev)
    }

    /// The position following `position`. The successor of the last element is `end()`, the one of `end()` is
    /// `begin()`.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn next_position(&self, position: Position<T>) -> Position<T> {
        Position::new(self.base(position.link).next)
    }

    /// The position preceding `position`. The predecessor of `begin()` is `end()`, the one of `end()` is the last
    /// element.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn prev_position(&self, position: Position<T>) -> Position<T> {
        Position::new(self.base(position.link).prev)
    }

    /// The element at `position`, or `None` for `end()`.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn get(&self, position: Position<T>) -> Option<&T> {
        position.link.map(|node| &(*node.as_ptr()).value)
    }

    /// The element at `position`, or `None` for `end()`.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn get_mut(&mut self, position: Position<T>) -> Option<&mut T> {
        position.link.map(|node| &mut (*node.as_ptr()).value)
    }

    /// Insert `value` in front of `position` and return the position of the new element.
    ///
    /// Inserting in front of `end()` appends to the list.
    /// If the node cannot be allocated the list stays unchanged.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn insert(
        &mut self,
        position: Position<T>,
        value: T,
    ) -> Result<Position<T>, AllocError> {
        self.insert_with(position, || value)
    }

    /// Insert the value produced by `make` in front of `position` and return the position of the new element.
    ///
    /// The node is allocated before `make` is called.
    /// If `make` panics the node's storage is released again and the list stays unchanged.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn insert_with<F>(
        &mut self,
        position: Position<T>,
        make: F,
    ) -> Result<Position<T>, AllocError>
    where
        F: FnOnce() -> T,
    {
        let next = position.link;
        let prev = self.base(next).prev;

        let storage = self.node_allocator.allocate(1)?;
        let storage = UnconstructedNode::new(&self.node_allocator, storage);
        let value = make();
        let node = storage.construct(ValueNode {
            base: BaseNode::new(prev, next),
            value,
        });

        // only link the node once it is completely built
        (*self.base_mut(prev)).next = Some(node);
        (*self.base_mut(next)).prev = Some(node);
        self.len += 1;

        Ok(Position::new(Some(node)))
    }

    /// Remove the element at `position` from the list and return it.
    ///
    /// # Panics
    /// This function panics if `position` is `end()`.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn erase(&mut self, position: Position<T>) -> T {
        let Some(node) = position.link else {
            panic!("the end position of a list cannot be erased");
        };

        let BaseNode { prev, next } = (*node.as_ptr()).base;
        (*self.base_mut(prev)).next = next;
        (*self.base_mut(next)).prev = prev;
        self.len -= 1;

        let value = ptr::read(ptr::addr_of!((*node.as_ptr()).value));
        self.node_allocator.deallocate(node, 1);
        value
    }

    /// Append an element to the back of the list.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        let end = self.end();
        // Safety: the end position is valid for every list
        unsafe { self.insert(end, value) }.map(drop)
    }

    /// Prepend an element to the front of the list.
    pub fn push_front(&mut self, value: T) -> Result<(), AllocError> {
        let begin = self.begin();
        // Safety: begin was just obtained from this list
        unsafe { self.insert(begin, value) }.map(drop)
    }

    /// Remove the last element and return it, or `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        unsafe {
            let last = self.prev_position(self.end());
            Some(self.erase(last))
        }
    }

    /// Remove the first element and return it, or `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        unsafe {
            let begin = self.begin();
            Some(self.erase(begin))
        }
    }

    pub fn front(&self) -> Option<&T> {
        // Safety: begin was just obtained from this list
        unsafe { self.get(self.begin()) }
    }

    pub fn back(&self) -> Option<&T> {
        unsafe { self.get(self.last()) }
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        let begin = self.begin();
        unsafe { self.get_mut(begin) }
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        let last = self.last();
        unsafe { self.get_mut(last) }
    }

    /// Drop all elements and return their memory to the allocator.
    pub fn clear(&mut self) {
        let mut current = self.sentinel.next;
        // detach the chain first so the list is consistent even if an element's destructor panics
        self.sentinel = BaseNode::sentinel();
        self.len = 0;

        while let Some(node) = current {
            unsafe {
                current = (*node.as_ptr()).base.next;
                self.node_allocator.destroy(node);
                self.node_allocator.deallocate(node, 1);
            }
        }
    }

    /// An iterator over references to all elements from front to back.
    ///
    /// Use `.rev()` to walk the list from back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.sentinel.next, self.sentinel.prev, self.len)
    }

    /// An iterator over mutable references to all elements from front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.sentinel.next, self.sentinel.prev, self.len)
    }

    /// A read-only cursor at the first element (or at the end if the list is empty).
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.begin(), self)
    }

    /// A read-only cursor at the last element (or at the end if the list is empty).
    pub fn cursor_back(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.last(), self)
    }

    /// A read-only cursor at the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.end(), self)
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut::new(self.begin(), self)
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut::new(self.last(), self)
    }

    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut::new(self.end(), self)
    }

    /// A read-only cursor at `position`.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn cursor_at(&self, position: Position<T>) -> Cursor<'_, T, A> {
        Cursor::new(position, self)
    }

    /// A cursor at `position` which can modify the list.
    ///
    /// # Safety
    /// `position` must have been obtained from this list and its element must not have been erased since.
    pub unsafe fn cursor_mut_at(&mut self, position: Position<T>) -> CursorMut<'_, T, A> {
        CursorMut::new(position, self)
    }

    /// Create a deep copy of this list whose nodes are allocated from `allocator`.
    ///
    /// If copying an element panics or an allocation fails, the partial copy is released before the panic resumes
    /// or the error is returned. This list is never modified.
    pub fn try_clone_in(&self, allocator: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut copy = Self::new_in(allocator);
        for value in self {
            let end = copy.end();
            // Safety: the end position is valid for every list
            unsafe { copy.insert_with(end, || value.clone()) }?;
        }
        Ok(copy)
    }

    /// Create a deep copy of this list.
    ///
    /// The copy uses the allocator selected by [`Allocator::select_on_copy_construction()`].
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        self.try_clone_in(self.allocator.select_on_copy_construction())
    }

    /// Replace the content of this list with a deep copy of `source`.
    ///
    /// If `A::PROPAGATE_ON_COPY_ASSIGNMENT` is set, this list takes over the allocator of `source`, otherwise it
    /// keeps its own.
    /// The copy is completely built before this list is touched, so if copying fails or panics this list keeps its
    /// previous content and allocator.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let allocator = if A::PROPAGATE_ON_COPY_ASSIGNMENT {
            log::debug!("propagating allocator on list copy-assignment");
            source.allocator.clone()
        } else {
            self.allocator.clone()
        };

        let mut copy = source.try_clone_in(allocator)?;
        // the previous chain is dropped together with `copy`, using the allocator it was built with
        mem::swap(self, &mut copy);
        Ok(())
    }

    /// Links of the node at `link`, or of the sentinel for `None`.
    ///
    /// # Safety
    /// `link` must be `None` or point to a node of this list.
    unsafe fn base(&self, link: Link<T>) -> &BaseNode<T> {
        match link {
            None => &self.sentinel,
            Some(node) => &(*node.as_ptr()).base,
        }
    }

    /// # Safety
    /// `link` must be `None` or point to a node of this list.
    unsafe fn base_mut(&mut self, link: Link<T>) -> *mut BaseNode<T> {
        match link {
            None => ptr::addr_of_mut!(self.sentinel),
            Some(node) => ptr::addr_of_mut!((*node.as_ptr()).base),
        }
    }
}

impl<T, A: Allocator<Value = T>> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Allocator<Value = T> + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator<Value = T>> Clone for List<T, A> {
    /// # Panics
    /// This function panics if the allocator cannot provide memory for the copy.
    /// Use [`try_clone()`](List::try_clone) to handle that case.
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|e| panic!("could not clone list: {e}"))
    }

    /// # Panics
    /// This function panics if the allocator cannot provide memory for the copy in which case `self` is left
    /// unchanged.
    /// Use [`try_clone_from()`](List::try_clone_from) to handle that case.
    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.try_clone_from(source) {
            panic!("could not copy-assign list: {e}");
        }
    }
}

impl<T: Debug, A: Allocator<Value = T>> Debug for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T, A, B> PartialEq<List<T, B>> for List<T, A>
where
    T: PartialEq,
    A: Allocator<Value = T>,
    B: Allocator<Value = T>,
{
    fn eq(&self, other: &List<T, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator<Value = T>> Eq for List<T, A> {}

impl<T, A: Allocator<Value = T>> Extend<T> for List<T, A> {
    /// # Panics
    /// This function panics if the allocator runs out of memory while extending.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(e) = self.push_back(value) {
                panic!("could not extend list: {e}");
            }
        }
    }
}

impl<T, A: Allocator<Value = T>> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator<Value = T>> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator<Value = T>> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Count the nodes reachable from the sentinel by following `next`.
#[cfg(test)]
pub(crate) fn reachable_nodes<T, A: Allocator<Value = T>>(list: &List<T, A>) -> usize {
    let mut count = 0;
    let mut current: Link<T> = list.sentinel.next;
    while let Some(node) = current {
        count += 1;
        current = unsafe { (*node.as_ptr()).base.next };
    }
    count
}
