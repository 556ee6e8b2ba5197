/// Asserts a condition at compile time.
#[macro_export]
macro_rules! const_assert {
    ($check:expr $(,$msg:tt)*) => {
        const _: () = assert!($check $(,$msg)*);
    };
}

/// Constructs a [`DynArray`](crate::DynArray) from a literal list of values.
///
/// Allocates exactly once, sized to the number of values. Fallible like the
/// other allocating constructors.
#[macro_export]
macro_rules! dyn_array {
    () => {
        ::core::result::Result::<_, $crate::CapacityError>::Ok($crate::DynArray::new())
    };
    ($($elem:expr),+ $(,)?) => {
        $crate::DynArray::from_array([$($elem),+])
    };
}
