//! Growable contiguous storage built directly on raw allocation.
//!
//! [`DynArray`] owns a block of uninitialized slots obtained from the global
//! allocation provider and manages element lifetimes within it by hand:
//! construction in place on append, bitwise relocation on growth, in-order
//! drop on teardown. Every operation that can allocate is fallible and
//! returns a [`CapacityError`] instead of aborting.

#[macro_use]
mod macros;

mod allocator;
mod dyn_array;
mod errors;
mod global_alloc;
mod iter;

pub use allocator::Allocator;
pub use dyn_array::DynArray;
pub use errors::CapacityError;
pub use global_alloc::{GLOBAL_ALLOC, GlobalAlloc};
pub use iter::{Iter, IterMut};
