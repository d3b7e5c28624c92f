//! The layout descriptor: shape, strides, offset, and view flag.
//!
//! A [`Layout`] maps N-dimensional subscript tuples to flat positions in a
//! contiguous buffer. Every shape transformation in the crate is a layout
//! derivation: slicing multiplies strides by interval steps and advances
//! the offset, reduction removes an axis, transposition permutes the shape,
//! and append/insert/remove grow or shrink one axis. Layouts with a
//! non-positive extent on any axis are *empty* — a valid state, not an
//! error — and carry no storage obligation.

use smallvec::SmallVec;

use crate::interval::Interval;
use crate::scalar::modulo;

/// Inline-capacity storage for dims, strides, and subscript tuples.
/// Descriptors of rank <= 4 never touch the heap.
pub(crate) type Axes = SmallVec<[isize; 4]>;

/// Row-major strides for a shape: the last axis varies fastest.
pub(crate) fn row_major_strides(dims: &[isize]) -> Axes {
    let rank = dims.len();
    let mut strides: Axes = SmallVec::from_elem(1, rank);
    for i in (0..rank.saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Element count of a shape; zero if any extent is non-positive.
pub(crate) fn numel(dims: &[isize]) -> usize {
    if dims.is_empty() {
        return 0;
    }
    let mut count = 1usize;
    for &d in dims {
        if d <= 0 {
            return 0;
        }
        count *= d as usize;
    }
    count
}

/// Shape + strides + offset + view flag: the descriptor that turns
/// subscript tuples into flat buffer positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    dims: Axes,
    strides: Axes,
    offset: isize,
    count: usize,
    is_view: bool,
}

impl Layout {
    /// The empty layout: rank zero, count zero.
    pub fn empty() -> Self {
        Self {
            dims: Axes::new(),
            strides: Axes::new(),
            offset: 0,
            count: 0,
            is_view: false,
        }
    }

    /// Row-major layout over a fresh buffer of the given shape.
    ///
    /// A shape with any non-positive extent (or no axes at all) yields the
    /// empty layout.
    pub fn from_shape(dims: &[isize]) -> Self {
        let count = numel(dims);
        if count == 0 {
            return Self::empty();
        }
        Self {
            dims: Axes::from_slice(dims),
            strides: row_major_strides(dims),
            offset: 0,
            count,
            is_view: false,
        }
    }

    /// Derive a sub-layout by slicing with per-axis intervals.
    ///
    /// Each interval is wrapped into its axis extent and canonicalised to a
    /// positive step; a canonicalised interval with `start > stop` (or a
    /// zero step) makes the result empty. Axes beyond the given intervals
    /// keep the parent's extent and stride. The result always carries the
    /// view flag.
    pub fn slice(&self, intervals: &[Interval]) -> Self {
        if self.is_empty() {
            return Self {
                is_view: true,
                ..Self::empty()
            };
        }

        let rank = self.rank();
        let specified = intervals.len().min(rank);

        let mut dims = self.dims.clone();
        let mut strides = self.strides.clone();
        let mut offset = self.offset;

        for i in 0..specified {
            let itv = intervals[i].modulo(self.dims[i]).forward();
            if itv.step <= 0 || itv.start > itv.stop {
                return Self {
                    is_view: true,
                    ..Self::empty()
                };
            }
            dims[i] = (itv.stop - itv.start + itv.step) / itv.step;
            strides[i] = self.strides[i] * itv.step;
            offset += self.strides[i] * itv.start;
        }

        let count = numel(&dims);
        Self {
            dims,
            strides,
            offset,
            count,
            is_view: true,
        }
    }

    /// Derive the reduction shape: the given axis (wrapped by the rank) is
    /// removed; a rank-1 parent reduces to shape `{1}`. Strides are
    /// recomputed row-major over a fresh buffer.
    pub fn remove_axis(&self, axis: isize) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let rank = self.rank();
        let axis = modulo(axis, rank as isize) as usize;
        if rank == 1 {
            return Self::from_shape(&[1]);
        }
        let dims: Axes = self
            .dims
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, &d)| d)
            .collect();
        Self::from_shape(&dims)
    }

    /// Derive the transposed shape for a full axis permutation. Entries are
    /// wrapped by the rank; a wrong-length order or a repeated axis yields
    /// the empty layout. Strides are recomputed row-major, so the permuted
    /// layout describes a fresh contiguous buffer.
    pub fn permute(&self, order: &[isize]) -> Self {
        if self.is_empty() || order.len() != self.rank() {
            return Self::empty();
        }
        let rank = self.rank();
        let mut seen = vec![false; rank];
        let mut dims = Axes::with_capacity(rank);
        for &o in order {
            let ax = modulo(o, rank as isize) as usize;
            if seen[ax] {
                return Self::empty();
            }
            seen[ax] = true;
            dims.push(self.dims[ax]);
        }
        Self::from_shape(&dims)
    }

    /// Derive the shape with one axis grown (or shrunk, for negative
    /// `delta`). A non-positive resulting extent yields the empty layout.
    pub fn grow_axis(&self, axis: isize, delta: isize) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let axis = modulo(axis, self.rank() as isize) as usize;
        let mut dims = self.dims.clone();
        dims[axis] += delta;
        Self::from_shape(&dims)
    }

    /// Flat position of a subscript tuple: `offset + dot(strides, subs)`.
    ///
    /// Subscripts are wrapped into their axis extent by Euclidean modulo.
    /// When fewer subscripts than axes are given they address the trailing
    /// axes (missing leading subscripts are zero); surplus subscripts are
    /// ignored.
    pub fn flat_index(&self, subs: &[isize]) -> usize {
        let rank = self.rank();
        let used = rank.min(subs.len());
        let skip = rank - used;
        let mut idx = self.offset;
        for i in skip..rank {
            idx += self.strides[i] * modulo(subs[i - skip], self.dims[i]);
        }
        idx as usize
    }

    #[inline]
    pub fn dims(&self) -> &[isize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.is_view
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when the layout addresses a dense row-major block starting at
    /// position zero, which is what the fast cursor requires.
    pub fn is_contiguous(&self) -> bool {
        !self.is_empty()
            && self.offset == 0
            && self.strides[..] == row_major_strides(&self.dims)[..]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::empty()
    }
}
