use core::ptr::NonNull;

/// A provider of uninitialized memory blocks.
///
/// Block allocation and element lifetimes are separate concerns: a block
/// obtained here holds no live values until a caller constructs them in
/// place, and must hold none when it is freed.
pub trait Allocator {
    /// # Safety
    ///
    /// The returned block is uninitialized and must be freed through
    /// [`free_raw`](Allocator::free_raw) with the same size and alignment.
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// # Safety
    ///
    /// `ptr` must come from [`allocate_raw`](Allocator::allocate_raw) on this
    /// allocator with the same size and alignment, and must not be used
    /// afterwards.
    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize);

    /// Allocates an uninitialized block of `count` slots of `T`.
    ///
    /// Returns `None` when the allocator refuses the request or the byte size
    /// overflows.
    ///
    /// # Safety
    ///
    /// Same contract as [`allocate_raw`](Allocator::allocate_raw).
    unsafe fn allocate_uninit<T>(&self, count: usize) -> Option<NonNull<T>> {
        let size = size_of::<T>().checked_mul(count)?;
        let align = align_of::<T>();
        unsafe { self.allocate_raw(size, align).map(|ptr| ptr.cast::<T>()) }
    }

    /// # Safety
    ///
    /// `ptr` must come from [`allocate_uninit`](Allocator::allocate_uninit)
    /// on this allocator with the same `count`, and every slot must already
    /// be uninitialized (dropped or moved out).
    unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let size = size_of::<T>() * count;
        let align = align_of::<T>();
        unsafe { self.free_raw(ptr.cast::<u8>(), size, align) }
    }
}
