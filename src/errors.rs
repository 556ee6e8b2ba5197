use core::fmt;

/// Errors raised when a container cannot obtain storage.
///
/// Allocation failure is the only runtime failure mode; precondition
/// violations (out-of-range unchecked access) are undefined behavior by
/// contract and never reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityError {
    /// The allocation provider could not supply a block for the requested
    /// capacity. The container's prior state is unchanged.
    AllocFailed {
        /// The capacity, in elements, that was being requested.
        new_capacity: usize,
    },
    /// The element type is zero-sized; these containers do not support it.
    ZeroSizedElement,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed for capacity {new_capacity}")
            }
            Self::ZeroSizedElement => {
                write!(f, "zero sized element types are not supported")
            }
        }
    }
}

impl core::error::Error for CapacityError {}
