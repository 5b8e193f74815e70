//! Reusable scratch storage for the resolution pipeline.
//!
//! Every transient container a call needs is leased from a [`ScratchArena`]
//! by type. A [`Lease`] hands the container back, cleared, when it is dropped,
//! so early returns and unwinding release storage the same way as the normal
//! path. The arena is single-threaded; concurrent callers each own one.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;

/// A container that can be cleared and handed out again.
pub trait Scratch: Default + 'static {
    /// Empties the container while keeping its allocation.
    fn reset(&mut self);
}

impl<T: 'static> Scratch for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K: 'static, S: BuildHasher + Default + 'static> Scratch for HashSet<K, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K: 'static, V: 'static, S: BuildHasher + Default + 'static> Scratch for HashMap<K, V, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Typed free lists of cleared containers.
#[derive(Default)]
pub struct ScratchArena {
    /// `TypeId::of::<T>()` maps to a boxed `Vec<T>` of idle containers.
    pools: RefCell<FxHashMap<TypeId, Box<dyn Any>>>,
    outstanding: Cell<usize>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leases an empty `T`, reusing an idle one when available.
    pub fn acquire<T: Scratch>(&self) -> Lease<'_, T> {
        let value = self.with_free_list(|idle: &mut Vec<T>| idle.pop()).unwrap_or_default();
        self.outstanding.set(self.outstanding.get() + 1);
        Lease { arena: self, value }
    }

    /// Number of leases currently held.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Number of idle containers of type `T`.
    pub fn idle<T: Scratch>(&self) -> usize {
        self.with_free_list(|idle: &mut Vec<T>| idle.len())
    }

    fn release<T: Scratch>(&self, mut value: T) {
        value.reset();
        self.with_free_list(|idle: &mut Vec<T>| idle.push(value));
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
    }

    fn with_free_list<T: Scratch, R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut pools = self.pools.borrow_mut();
        let slot = pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<T>::new()));
        match slot.downcast_mut::<Vec<T>>() {
            Some(idle) => f(idle),
            // slots are keyed by their own type id
            None => f(&mut Vec::new()),
        }
    }
}

/// A container borrowed from a [`ScratchArena`], returned on drop.
pub struct Lease<'a, T: Scratch> {
    arena: &'a ScratchArena,
    value: T,
}

impl<T: Scratch> Deref for Lease<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Scratch> DerefMut for Lease<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Scratch> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        self.arena.release(std::mem::take(&mut self.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_lease_returns_cleared_container() {
        let arena = ScratchArena::new();
        {
            let mut numbers = arena.acquire::<Vec<u32>>();
            numbers.extend([1, 2, 3]);
            assert_eq!(arena.outstanding(), 1);
        }
        assert_eq!(arena.outstanding(), 0);
        assert_eq!(arena.idle::<Vec<u32>>(), 1);

        let numbers = arena.acquire::<Vec<u32>>();
        assert!(numbers.is_empty(), "Reused container must come back empty");
        assert!(numbers.capacity() >= 3, "Reused container should keep its allocation");
        assert_eq!(arena.idle::<Vec<u32>>(), 0);
    }

    #[test]
    fn test_pools_are_keyed_by_type() {
        let arena = ScratchArena::new();
        drop(arena.acquire::<Vec<u32>>());
        drop(arena.acquire::<FxHashSet<u32>>());
        assert_eq!(arena.idle::<Vec<u32>>(), 1);
        assert_eq!(arena.idle::<FxHashSet<u32>>(), 1);
        assert_eq!(arena.idle::<Vec<u64>>(), 0);
    }

    #[test]
    fn test_nested_leases_of_one_type() {
        let arena = ScratchArena::new();
        let first = arena.acquire::<Vec<u8>>();
        let second = arena.acquire::<Vec<u8>>();
        assert_eq!(arena.outstanding(), 2);
        drop(first);
        drop(second);
        assert_eq!(arena.idle::<Vec<u8>>(), 2);
    }

    #[test]
    fn test_lease_released_during_unwind() {
        let arena = ScratchArena::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut held = arena.acquire::<Vec<u8>>();
            held.push(1);
            panic!("abort the pipeline");
        }));
        assert!(outcome.is_err());
        assert_eq!(arena.outstanding(), 0);
        assert_eq!(arena.idle::<Vec<u8>>(), 1);
    }
}
