use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::Allocator;

/// The default allocation strategy, backed by `std::alloc`.
pub struct GlobalAlloc;

/// The single allocation provider used by this crate's containers.
pub static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl Allocator for GlobalAlloc {
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            return None;
        }
        let layout = Layout::from_size_align(size, align).ok()?;
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        let layout = match Layout::from_size_align(size, align) {
            Ok(l) => l,
            Err(_) => return,
        };
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let ptr = unsafe { GLOBAL_ALLOC.allocate_uninit::<u64>(4) }.unwrap();
        for i in 0..4 {
            unsafe { ptr.add(i).write(i as u64 * 7) };
        }
        for i in 0..4 {
            assert_eq!(unsafe { ptr.add(i).read() }, i as u64 * 7);
        }
        unsafe { GLOBAL_ALLOC.free_uninit(ptr, 4) };
    }

    #[test]
    fn zero_size_is_refused() {
        assert!(unsafe { GLOBAL_ALLOC.allocate_raw(0, 1) }.is_none());
        assert!(unsafe { GLOBAL_ALLOC.allocate_uninit::<()>(8) }.is_none());
    }

    #[test]
    fn overflowing_count_is_refused() {
        assert!(unsafe { GLOBAL_ALLOC.allocate_uninit::<u64>(usize::MAX / 2) }.is_none());
    }
}
