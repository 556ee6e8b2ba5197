use core::{iter::FusedIterator, marker::PhantomData, ptr::NonNull};

/// Shared iterator over the live elements of a
/// [`DynArray`](crate::DynArray), in index order.
///
/// Walks a start/end pointer pair captured when the iterator was created; any
/// operation on the source container that reallocates or changes its length
/// invalidates it, which the borrow on the container enforces.
pub struct Iter<'a, T> {
    ptr: NonNull<T>,
    end: NonNull<T>,
    _marker: PhantomData<&'a T>,
}

/// Exclusive counterpart of [`Iter`].
pub struct IterMut<'a, T> {
    ptr: NonNull<T>,
    end: NonNull<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iter<'a, T> {
    /// # Safety
    ///
    /// `ptr..end` must be a live, contiguous run of `T` that outlives `'a`
    /// and is not mutated while the iterator exists.
    pub(crate) unsafe fn new(ptr: NonNull<T>, end: NonNull<T>) -> Self {
        Self {
            ptr,
            end,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> IterMut<'a, T> {
    /// # Safety
    ///
    /// `ptr..end` must be a live, contiguous run of `T` that outlives `'a`
    /// and is not aliased while the iterator exists.
    pub(crate) unsafe fn new(ptr: NonNull<T>, end: NonNull<T>) -> Self {
        Self {
            ptr,
            end,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<&'a T> {
        if self.ptr == self.end {
            return None;
        }
        let item = unsafe { self.ptr.as_ref() };
        self.ptr = unsafe { self.ptr.add(1) };
        Some(item)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // byte distance over element size so zero-sized T cannot trip the
        // offset_from pointee-size assert; an empty run reports 0 either way
        let bytes = unsafe { self.end.as_ptr().byte_offset_from(self.ptr.as_ptr()) as usize };
        let len = bytes / size_of::<T>().max(1);
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.ptr == self.end {
            return None;
        }
        self.end = unsafe { self.end.sub(1) };
        Some(unsafe { self.end.as_ref() })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline(always)]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.ptr == self.end {
            return None;
        }
        let item = unsafe { self.ptr.as_mut() };
        self.ptr = unsafe { self.ptr.add(1) };
        Some(item)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let bytes = unsafe { self.end.as_ptr().byte_offset_from(self.ptr.as_ptr()) as usize };
        let len = bytes / size_of::<T>().max(1);
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.ptr == self.end {
            return None;
        }
        self.end = unsafe { self.end.sub(1) };
        Some(unsafe { self.end.as_mut() })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::DynArray;

    #[test]
    fn walks_in_index_order() {
        let arr = DynArray::from_array([10, 20, 30]).unwrap();
        let collected: Vec<i32> = arr.iter().copied().collect();
        assert_eq!(collected, [10, 20, 30]);
    }

    #[test]
    fn reports_exact_length() {
        let arr = DynArray::from_array([1, 2, 3, 4]).unwrap();
        let mut iter = arr.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn meets_in_the_middle() {
        let arr = DynArray::from_array([1, 2, 3]).unwrap();
        let mut iter = arr.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty_container_yields_nothing() {
        let arr: DynArray<u8> = DynArray::new();
        assert_eq!(arr.iter().next(), None);
    }

    #[test]
    fn zero_sized_elements_report_empty_length() {
        // containers of zero-sized T can only ever be empty (allocation
        // rejects them), and their iterators must say so without panicking
        let mut arr: DynArray<()> = DynArray::new();
        assert_eq!(arr.iter().size_hint(), (0, Some(0)));
        assert_eq!(arr.iter().len(), 0);
        assert_eq!(arr.iter().next(), None);
        assert_eq!(arr.iter_mut().size_hint(), (0, Some(0)));
        assert_eq!(arr.iter_mut().len(), 0);
    }

    #[test]
    fn mutation_through_iter_mut() {
        let mut arr = DynArray::from_array([1, 2, 3]).unwrap();
        for value in arr.iter_mut() {
            *value *= 10;
        }
        assert_eq!(arr.as_slice(), [10, 20, 30]);
    }

    #[test]
    fn mutation_through_iter_mut_in_reverse() {
        let mut arr = DynArray::from_array([1, 2, 3]).unwrap();
        for value in arr.iter_mut().rev() {
            *value += 1;
        }
        assert_eq!(arr.as_slice(), [2, 3, 4]);
    }
}
