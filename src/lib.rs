//! Dense strided N-dimensional arrays with shared-buffer views.
//!
//! This crate provides one polymorphic container, [`NdArray`]: a dense,
//! strided, multidimensional array over a reference-counted buffer,
//! together with the layout and cursor machinery that lets any rectangular
//! slice of an array be a first-class array sharing storage with its
//! parent.
//!
//! # Core types
//!
//! - [`NdArray`]: the array handle — a [`Layout`] plus a shared buffer
//! - [`Layout`]: shape, strides, offset, and view flag; maps subscript
//!   tuples to flat buffer positions
//! - [`Interval`]: an inclusive `{start, stop, step}` range used to slice
//!   one axis
//! - [`Cursor`] / [`FlatCursor`]: traversal cursors yielding flat positions
//!   in well-defined orders; every operator walks one or two of these
//!
//! Element access is 0-indexed and row-major; negative subscripts, axes,
//! and interval endpoints wrap by Euclidean modulo. Binary elementwise
//! operations require exact shape equality (a scalar operand broadcasts;
//! nothing else does).
//!
//! # Example
//!
//! ```
//! use ndspan::{ops, shape, Interval, NdArray};
//!
//! let a = NdArray::from_slice(&[3, 1, 2], &[1i64, 2, 3, 4, 5, 6]).unwrap();
//!
//! // views share the parent's buffer; writes go through
//! let mut v = a.slice(&[Interval::new(1, 2), Interval::at(0), Interval::at(1).step_by(2)]);
//! v.set(&[0, 0, 0], 100);
//! assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 3, 100, 5, 6]);
//!
//! // reductions fold along an axis
//! let sums = ops::reduce_axis(&a, |x, acc: i64| acc + x, 2);
//! assert_eq!(sums.dims(), &[3, 1]);
//! assert_eq!(sums.iter().collect::<Vec<_>>(), vec![3, 103, 11]);
//!
//! // shape transformations allocate or alias per documented rules
//! let flat = shape::reshape(&a, &[6]).unwrap();
//! assert_eq!((&flat + 1).iter().collect::<Vec<_>>(), vec![2, 3, 4, 101, 6, 7]);
//! ```
//!
//! # Concurrency
//!
//! The crate is single-threaded by design: buffers are shared through
//! `Rc`, mutation is interior, and no synchronisation is provided.
//! Everything runs synchronously on the caller's thread.

pub mod arith;
pub mod array;
pub mod cursor;
pub mod interval;
pub mod layout;
pub mod ops;
pub mod scalar;
pub mod shape;

// ============================================================================
// Core types
// ============================================================================
pub use array::NdArray;
pub use cursor::{Cursor, FlatCursor};
pub use interval::Interval;
pub use layout::Layout;

// ============================================================================
// Traversal-driven operators
// ============================================================================
pub use ops::{
    all, all_axis, all_close, all_close_default, all_equal, all_match, any, any_axis, any_match,
    close, close_default, filter, filter_mask, find, find_mask, map, reduce, reduce_axis,
    reduce_axis_with, zip_map,
};

// ============================================================================
// Shape transformations
// ============================================================================
pub use shape::{
    append, append_flat, copy_into, insert, insert_flat, remove, remove_flat, reshape, resize,
    set_into, transpose,
};

// ============================================================================
// Operator sugar and math maps
// ============================================================================
pub use arith::{
    abs, acos, and, asin, atan, cos, cosh, eq, eq_scalar, exp, ge, ge_scalar, gt, gt_scalar, le,
    le_scalar, ln, log10, logical_not, lt, lt_scalar, ne, ne_scalar, or, powf, sin, sinh, sqrt,
    tan, tanh,
};

// ============================================================================
// Scalar helpers
// ============================================================================
pub use scalar::{Tolerance, Truthy};

// ============================================================================
// Error types
// ============================================================================

/// Errors surfaced by fallible array operations.
///
/// Degenerate layouts are not errors: operations that would produce one
/// return an empty array and callers detect it with
/// [`NdArray::is_empty`]. Allocation failure aborts the process, as is
/// conventional for the global allocator, and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdError {
    /// Binary elementwise operation, reshape, or concatenation given
    /// incompatible shapes.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<isize>, Vec<isize>),

    /// Source data length does not match the shape's element count.
    #[error("data length {got} does not match shape element count {want}")]
    LengthMismatch { want: usize, got: usize },

    /// Insert or remove position outside the target range.
    #[error("position {pos} out of range for extent {extent}")]
    OutOfRange { pos: isize, extent: isize },
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, NdError>;
