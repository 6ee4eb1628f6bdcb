//! Foreign buffer arena for the engine boundary.
//!
//! The engine reads a loaded problem from raw buffers that must stay
//! alive and unmoved from load until teardown. The arena owns those
//! buffers in a registry keyed by slot: rebinding a live key frees the
//! old buffer first, [`ForeignArena::release_all`] is the deterministic
//! teardown, and dropping the arena is only the backstop for callers
//! that skip it. Freeing is dropping the owning entry, so a double free
//! cannot be expressed.
#![allow(unsafe_code)]

use highs_sys::HighsInt;
use std::alloc::{self, Layout};
use std::collections::BTreeMap;
use std::fmt;
use std::ptr::NonNull;
use tracing::{debug, trace};

/// Named slots for the buffers a loaded problem occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BufferKey {
    ColCost,
    ColLower,
    ColUpper,
    RowStart,
    RowIndex,
    RowValue,
    RowLower,
    RowUpper,
    Integrality,
}

impl BufferKey {
    pub fn as_str(self) -> &'static str {
        match self {
            BufferKey::ColCost => "col_cost",
            BufferKey::ColLower => "col_lower",
            BufferKey::ColUpper => "col_upper",
            BufferKey::RowStart => "row_start",
            BufferKey::RowIndex => "row_index",
            BufferKey::RowValue => "row_value",
            BufferKey::RowLower => "row_lower",
            BufferKey::RowUpper => "row_upper",
            BufferKey::Integrality => "integrality",
        }
    }
}

/// One live foreign allocation: pointer, element count, layout.
struct ForeignBuf {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
}

impl ForeignBuf {
    /// Allocate an exactly-sized buffer and copy `values` into it.
    ///
    /// Allocation failure is terminal: the global out-of-memory handler
    /// is invoked and the process does not continue. Zero-length buffers
    /// allocate nothing and hand out a well-aligned dangling pointer.
    fn of<T: Copy>(values: &[T]) -> ForeignBuf {
        let Ok(layout) = Layout::array::<T>(values.len()) else {
            alloc::handle_alloc_error(Layout::new::<T>());
        };
        let ptr = if layout.size() == 0 {
            NonNull::<T>::dangling().cast::<u8>()
        } else {
            let raw = unsafe { alloc::alloc(layout) };
            let Some(ptr) = NonNull::new(raw) else {
                alloc::handle_alloc_error(layout);
            };
            unsafe {
                std::ptr::copy_nonoverlapping(
                    values.as_ptr(),
                    ptr.as_ptr().cast::<T>(),
                    values.len(),
                );
            }
            ptr
        };
        ForeignBuf {
            ptr,
            len: values.len(),
            layout,
        }
    }
}

impl Drop for ForeignBuf {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        }
    }
}

/// Registry of raw buffers handed to the engine.
pub struct ForeignArena {
    slots: BTreeMap<BufferKey, ForeignBuf>,
    replaced: u64,
}

// Buffers are exclusively owned heap allocations; moving the arena to
// another thread moves their ownership with it. No `Sync`: the registry
// has no internal locking.
unsafe impl Send for ForeignArena {}

impl ForeignArena {
    pub fn new() -> Self {
        ForeignArena {
            slots: BTreeMap::new(),
            replaced: 0,
        }
    }

    /// Allocate and fill a double buffer, registering it under `key`.
    ///
    /// Rebinding a live key frees the previous buffer first. The
    /// returned pointer stays valid until the key is released or
    /// rebound.
    pub fn bind_doubles(&mut self, key: BufferKey, values: &[f64]) -> *const f64 {
        self.bind(key, values)
    }

    /// Allocate and fill an engine-integer buffer, registering it under
    /// `key`.
    pub fn bind_ints(&mut self, key: BufferKey, values: &[HighsInt]) -> *const HighsInt {
        self.bind(key, values)
    }

    fn bind<T: Copy>(&mut self, key: BufferKey, values: &[T]) -> *const T {
        if let Some(old) = self.slots.remove(&key) {
            self.replaced += 1;
            debug!(
                component = "arena",
                operation = "replace",
                status = "success",
                key = key.as_str(),
                old_len = old.len,
                new_len = values.len(),
                "Rebinding live buffer"
            );
            drop(old);
        }
        let buf = ForeignBuf::of(values);
        let ptr = buf.ptr.as_ptr().cast::<T>().cast_const();
        trace!(
            component = "arena",
            operation = "bind",
            status = "success",
            key = key.as_str(),
            len = values.len(),
            "Bound buffer"
        );
        self.slots.insert(key, buf);
        ptr
    }

    /// Free the buffer bound to `key`. No-op when the key is not live.
    pub fn release(&mut self, key: BufferKey) {
        if self.slots.remove(&key).is_some() {
            trace!(
                component = "arena",
                operation = "release",
                status = "success",
                key = key.as_str(),
                "Released buffer"
            );
        }
    }

    /// Deterministic teardown: free every live buffer and clear the
    /// registry.
    pub fn release_all(&mut self) {
        let count = self.slots.len();
        self.slots.clear();
        if count > 0 {
            debug!(
                component = "arena",
                operation = "release_all",
                status = "success",
                released = count,
                "Released all buffers"
            );
        }
    }

    /// Number of live allocations.
    pub fn live(&self) -> usize {
        self.slots.len()
    }

    /// Number of rebinds that freed a previous buffer.
    pub fn replaced(&self) -> u64 {
        self.replaced
    }
}

impl Default for ForeignArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ForeignArena {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl fmt::Debug for ForeignArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignArena")
            .field("live", &self.slots.len())
            .field("replaced", &self.replaced)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEYS: [BufferKey; 9] = [
        BufferKey::ColCost,
        BufferKey::ColLower,
        BufferKey::ColUpper,
        BufferKey::RowStart,
        BufferKey::RowIndex,
        BufferKey::RowValue,
        BufferKey::RowLower,
        BufferKey::RowUpper,
        BufferKey::Integrality,
    ];

    fn read_doubles(ptr: *const f64, len: usize) -> Vec<f64> {
        unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec()
    }

    #[test]
    fn bound_buffer_holds_the_values() {
        let mut arena = ForeignArena::new();
        let values = [2.0, 3.0, -1.5];
        let ptr = arena.bind_doubles(BufferKey::ColCost, &values);

        assert_eq!(arena.live(), 1);
        assert_eq!(read_doubles(ptr, values.len()), values);
    }

    #[test]
    fn bound_int_buffer_holds_the_values() {
        let mut arena = ForeignArena::new();
        let values: [HighsInt; 5] = [0, 1, 3, 0, 1];
        let ptr = arena.bind_ints(BufferKey::RowStart, &values);

        assert_eq!(arena.live(), 1);
        let read = unsafe { std::slice::from_raw_parts(ptr, values.len()) };
        assert_eq!(read, values);
    }

    #[test]
    fn rebinding_replaces_without_leaking() {
        let mut arena = ForeignArena::new();
        arena.bind_doubles(BufferKey::ColCost, &[1.0, 2.0]);
        let ptr = arena.bind_doubles(BufferKey::ColCost, &[7.0]);

        assert_eq!(arena.live(), 1);
        assert_eq!(arena.replaced(), 1);
        assert_eq!(read_doubles(ptr, 1), vec![7.0]);
    }

    #[test]
    fn releasing_twice_is_a_no_op() {
        let mut arena = ForeignArena::new();
        arena.bind_doubles(BufferKey::RowLower, &[1.0]);
        arena.release(BufferKey::RowLower);
        assert_eq!(arena.live(), 0);
        arena.release(BufferKey::RowLower);
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn release_all_clears_the_registry() {
        let mut arena = ForeignArena::new();
        for key in KEYS {
            arena.bind_doubles(key, &[1.0, 2.0]);
        }
        assert_eq!(arena.live(), KEYS.len());

        arena.release_all();
        assert_eq!(arena.live(), 0);

        arena.release_all();
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn zero_length_bind_is_legal() {
        let mut arena = ForeignArena::new();
        let ptr = arena.bind_doubles(BufferKey::Integrality, &[]);
        assert!(!ptr.is_null());
        assert_eq!(arena.live(), 1);
        arena.release(BufferKey::Integrality);
        assert_eq!(arena.live(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Bind(usize, usize),
        Release(usize),
        ReleaseAll,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            ((0..KEYS.len()), (0usize..16)).prop_map(|(k, n)| Op::Bind(k, n)),
            (0..KEYS.len()).prop_map(Op::Release),
            Just(Op::ReleaseAll),
        ]
    }

    proptest! {
        #[test]
        fn any_operation_sequence_tears_down_clean(
            ops in proptest::collection::vec(op_strategy(), 0..64)
        ) {
            let mut arena = ForeignArena::new();
            let mut expected_live = std::collections::BTreeSet::new();

            for op in ops {
                match op {
                    Op::Bind(k, n) => {
                        arena.bind_doubles(KEYS[k], &vec![1.0; n]);
                        expected_live.insert(KEYS[k]);
                    }
                    Op::Release(k) => {
                        arena.release(KEYS[k]);
                        expected_live.remove(&KEYS[k]);
                    }
                    Op::ReleaseAll => {
                        arena.release_all();
                        expected_live.clear();
                    }
                }
                prop_assert_eq!(arena.live(), expected_live.len());
            }

            arena.release_all();
            prop_assert_eq!(arena.live(), 0);
        }
    }
}
