#![allow(dead_code)]

use allocators::{AllocError, Allocator, Global};
use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Stats {
    outstanding: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

/// A heap allocator which keeps track of how many allocations are currently outstanding.
///
/// Handles created from one another (by cloning or rebinding) share their statistics and compare equal.
/// Allocations can be made to fail after a given number of successful ones.
#[derive(Debug)]
pub struct CountingAllocator<T, const PROPAGATE: bool = false> {
    stats: Rc<Stats>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, const PROPAGATE: bool> CountingAllocator<T, PROPAGATE> {
    pub fn new() -> Self {
        Self {
            stats: Rc::new(Stats::default()),
            _marker: PhantomData,
        }
    }

    /// The number of allocations that have not been deallocated yet
    pub fn outstanding(&self) -> usize {
        self.stats.outstanding.get()
    }

    /// Let all allocations after the next `n` ones fail, or none if `n` is `None`.
    pub fn fail_after(&self, n: Option<usize>) {
        self.stats.fail_after.set(n);
    }
}

impl<T, const PROPAGATE: bool> Allocator for CountingAllocator<T, PROPAGATE> {
    type Value = T;
    type Rebind<U> = CountingAllocator<U, PROPAGATE>;

    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = PROPAGATE;

    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        match self.stats.fail_after.get() {
            Some(0) => return Err(AllocError::InsufficientMemory),
            Some(n) => self.stats.fail_after.set(Some(n - 1)),
            None => {}
        }

        let ptr = Global::<T>::new().allocate(count)?;
        self.stats.outstanding.set(self.stats.outstanding.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        Global::<T>::new().deallocate(ptr, count);
        self.stats.outstanding.set(self.stats.outstanding.get() - 1);
    }

    fn rebind<U>(&self) -> CountingAllocator<U, PROPAGATE> {
        CountingAllocator {
            stats: self.stats.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, const PROPAGATE: bool> Clone for CountingAllocator<T, PROPAGATE> {
    fn clone(&self) -> Self {
        self.rebind()
    }
}

impl<T, U, const PROPAGATE: bool> PartialEq<CountingAllocator<U, PROPAGATE>>
    for CountingAllocator<T, PROPAGATE>
{
    fn eq(&self, other: &CountingAllocator<U, PROPAGATE>) -> bool {
        Rc::ptr_eq(&self.stats, &other.stats)
    }
}

thread_local! {
    static LIVE: Cell<usize> = Cell::new(0);
    static PANIC_AFTER: Cell<Option<usize>> = Cell::new(None);
}

/// An element type which counts its live instances and whose construction can be made to panic.
///
/// Both counters are thread local, so tests running in parallel don't see each other's values.
#[derive(Debug, PartialEq, Eq)]
pub struct Tracked(pub u32);

impl Tracked {
    pub fn new(value: u32) -> Self {
        PANIC_AFTER.with(|budget| match budget.get() {
            Some(0) => panic!("construction of Tracked({value}) failed on purpose"),
            Some(n) => budget.set(Some(n - 1)),
            None => {}
        });
        LIVE.with(|live| live.set(live.get() + 1));
        Self(value)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.0)
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get() - 1));
    }
}

/// The number of `Tracked` values currently alive on this thread
pub fn live() -> usize {
    LIVE.with(Cell::get)
}

/// Let every construction of a `Tracked` after the next `n` ones panic, or none if `n` is `None`.
pub fn panic_after(n: Option<usize>) {
    PANIC_AFTER.with(|budget| budget.set(n));
}

pub fn tracked(values: &[u32]) -> Vec<Tracked> {
    values.iter().copied().map(Tracked::new).collect()
}
