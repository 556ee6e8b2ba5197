use core::{
    fmt,
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr::{self, NonNull},
    slice,
};

use crate::{
    allocator::Allocator,
    errors::CapacityError,
    global_alloc::GLOBAL_ALLOC,
    iter::{Iter, IterMut},
};

use CapacityError::{AllocFailed, ZeroSizedElement};

/// A growable, contiguous, exclusively owned buffer of `T`.
///
/// Storage is a raw uninitialized block from [`GLOBAL_ALLOC`]: slots
/// `[0, len)` hold live values, slots `[len, capacity)` are never read and
/// never dropped. Appending doubles capacity when full (starting at 1), so
/// appends are amortized constant time; [`reserve`](DynArray::reserve)
/// allocates exactly what it is asked for.
///
/// Every operation that allocates returns a [`CapacityError`] on failure and
/// leaves the container untouched. Destruction drops live elements in index
/// order and then releases the block.
pub struct DynArray<T> {
    data: NonNull<T>,
    capacity: usize,
    len: usize,
}

unsafe impl<T: Send> Send for DynArray<T> {}
unsafe impl<T: Sync> Sync for DynArray<T> {}

const_assert!(size_of::<DynArray<u32>>() == size_of::<Option<DynArray<u32>>>());

impl<T> DynArray<T> {
    /// Creates an empty container. Does not allocate.
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            len: 0,
        }
    }

    /// Creates an empty container with exactly `capacity` slots allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        let mut this = Self::new();
        this.reserve(capacity)?;
        Ok(this)
    }

    /// Clones a slice into an exact-size allocation, preserving order.
    pub fn from_slice(values: &[T]) -> Result<Self, CapacityError>
    where
        T: Clone,
    {
        let mut this = Self::with_capacity(values.len())?;
        for value in values {
            unsafe { this.data.add(this.len).write(value.clone()) };
            this.len += 1;
        }
        Ok(this)
    }

    /// Moves the elements of an array into an exact-size allocation.
    pub fn from_array<const N: usize>(values: [T; N]) -> Result<Self, CapacityError> {
        let mut this = Self::with_capacity(N)?;
        unsafe { ptr::copy_nonoverlapping(values.as_ptr(), this.data.as_ptr(), N) };
        mem::forget(values);
        this.len = N;
        Ok(this)
    }

    /// Collects an iterator.
    ///
    /// A sequence that reports its exact length up front
    /// (`size_hint() == (n, Some(n))`) gets a single exact-size allocation;
    /// anything else is appended one value at a time under the doubling
    /// growth policy.
    pub fn from_iter<I>(values: I) -> Result<Self, CapacityError>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = values.into_iter();
        let mut this = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Self::with_capacity(lower)?,
            _ => Self::new(),
        };
        for value in iter {
            this.push(value)?;
        }
        Ok(this)
    }

    /// Deep-copies into fresh storage sized to `len()`, never reusing or
    /// aliasing this container's buffer.
    pub fn try_clone(&self) -> Result<Self, CapacityError>
    where
        T: Clone,
    {
        Self::from_slice(self.as_slice())
    }

    /// Takes the buffer, capacity and length out of this container, leaving
    /// it empty. Constant time; no element is touched.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }

    /// Unchecked access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynArray::len); anything else is
    /// undefined behavior.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        unsafe { self.data.add(index).as_ref() }
    }

    /// Unchecked mutable access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynArray::len); anything else is
    /// undefined behavior.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        unsafe { self.data.add(index).as_mut() }
    }

    /// Appends a value, growing if full, and returns a reference to it.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Result<&mut T, CapacityError> {
        if self.len == self.capacity {
            self.grow_for_push()?
        }
        let mut ptr = unsafe { self.data.add(self.len) };
        unsafe { ptr.write(value) };
        self.len += 1;
        Ok(unsafe { ptr.as_mut() })
    }

    /// Like [`push`](DynArray::push), but the value is produced only after
    /// storage for it is secured and is written straight into its slot.
    pub fn push_with<F>(&mut self, f: F) -> Result<&mut T, CapacityError>
    where
        F: FnOnce() -> T,
    {
        if self.len == self.capacity {
            self.grow_for_push()?
        }
        let mut ptr = unsafe { self.data.add(self.len) };
        unsafe { ptr.write(f()) };
        self.len += 1;
        Ok(unsafe { ptr.as_mut() })
    }

    /// Removes and returns the last element.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { self.data.add(self.len).read() })
    }

    /// Grows the allocation to exactly `capacity` slots.
    ///
    /// A request at or below the current capacity is a no-op. Otherwise the
    /// live elements are relocated in order into the new block by bitwise
    /// move (the old copies are never dropped) and the old block is released.
    /// On allocation failure the container is left exactly as it was.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), CapacityError> {
        if capacity <= self.capacity {
            return Ok(());
        }
        let new = match unsafe { GLOBAL_ALLOC.allocate_uninit::<T>(capacity) } {
            Some(ptr) => ptr,
            None => {
                return Err(if size_of::<T>() == 0 {
                    ZeroSizedElement
                } else {
                    AllocFailed {
                        new_capacity: capacity,
                    }
                });
            }
        };
        unsafe { ptr::copy_nonoverlapping(self.data.as_ptr(), new.as_ptr(), self.len) };
        if self.capacity != 0 {
            unsafe { GLOBAL_ALLOC.free_uninit(self.data, self.capacity) };
        }
        self.data = new;
        self.capacity = capacity;
        Ok(())
    }

    /// Clones a slice onto the end with at most one reservation.
    pub fn append_slice(&mut self, values: &[T]) -> Result<(), CapacityError>
    where
        T: Clone,
    {
        let required = self.len + values.len();
        if required > self.capacity {
            self.reserve(required.max(self.capacity * 2))?
        }
        for value in values {
            unsafe { self.data.add(self.len).write(value.clone()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Drops all live elements in index order. Keeps the allocation.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        unsafe { Self::drop_in_place(self.data, len) };
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.data, self.data.add(self.len)) }
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.data, self.data.add(self.len)) }
    }

    fn grow_for_push(&mut self) -> Result<(), CapacityError> {
        if self.capacity == 0 {
            self.reserve(1)
        } else {
            self.reserve(self.capacity * 2)
        }
    }

    /// # Safety
    ///
    /// `ptr..ptr + count` must be live elements; they are uninitialized
    /// afterwards.
    unsafe fn drop_in_place(ptr: NonNull<T>, count: usize) {
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), count)) }
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        unsafe { Self::drop_in_place(self.data, self.len) };
        if self.capacity != 0 {
            unsafe { GLOBAL_ALLOC.free_uninit(self.data, self.capacity) };
        }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { self.data.add(index).as_ref() }
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { self.data.add(index).as_mut() }
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<[T]> for DynArray<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq> Eq for DynArray<T> {}


#[cfg(test)]
mod proptests {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn appends_preserve_count_and_order(
            values in proptest::collection::vec(any::<i32>(), 0..256),
        ) {
            let mut arr = DynArray::new();
            for &value in &values {
                arr.push(value).unwrap();
            }
            prop_assert_eq!(arr.len(), values.len());
            prop_assert!(arr.capacity() >= arr.len());
            prop_assert_eq!(arr.as_slice(), values.as_slice());
        }

        #[test]
        fn capacity_follows_doubling_from_one(count in 0usize..128) {
            let mut arr = DynArray::new();
            for i in 0..count {
                arr.push(i).unwrap();
            }
            let expected = if count == 0 { 0 } else { count.next_power_of_two() };
            prop_assert_eq!(arr.capacity(), expected);
        }

        #[test]
        fn reserve_is_exact_and_preserves_contents(
            values in proptest::collection::vec(any::<u16>(), 0..64),
            target in 0usize..256,
        ) {
            let mut arr = DynArray::from_slice(&values).unwrap();
            let old_capacity = arr.capacity();
            arr.reserve(target).unwrap();
            let expected = if target > old_capacity { target } else { old_capacity };
            prop_assert_eq!(arr.capacity(), expected);
            prop_assert_eq!(arr.as_slice(), values.as_slice());
        }

        #[test]
        fn clone_then_diverge_never_aliases(
            values in proptest::collection::vec(any::<i32>(), 0..64),
            extra in any::<i32>(),
        ) {
            let original = DynArray::from_slice(&values).unwrap();
            let mut copy = original.try_clone().unwrap();
            copy.push(extra).unwrap();
            prop_assert_eq!(original.as_slice(), values.as_slice());
            prop_assert_eq!(copy.len(), values.len() + 1);
            prop_assert_eq!(copy[values.len()], extra);
        }
    }
}
