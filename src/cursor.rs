//! Cursors: the traversal engine that yields flat buffer positions.
//!
//! A [`Cursor`] walks any layout in a caller-chosen axis order and is the
//! single place in the crate where subscript-to-flat-position arithmetic
//! lives; every operator that reads or writes an array opens one. A
//! [`FlatCursor`] is the fast path for contiguous non-view layouts and
//! produces identical position sequences without subscript bookkeeping.
//!
//! Cursors hold no reference to any buffer and never extend its lifetime;
//! they borrow only the layout.

use smallvec::SmallVec;

use crate::layout::{Axes, Layout};
use crate::scalar::modulo;

type Order = SmallVec<[usize; 4]>;

/// General cursor over a [`Layout`].
///
/// The traversal order is a permutation of the axes: `order[0]` is the
/// *major* (outermost, slowest-varying) axis and the last entry is the
/// innermost (fastest-varying) one. Unit steps carry right-to-left through
/// the order; inner axes reset to their lower bound plus one on carry,
/// while the major axis runs off its bound, taking the cursor out of
/// range. From the out-of-range state the inverse step re-enters range.
///
/// Bounds are exclusive on both sides and default to `start[i] - 1` below
/// and `dims[i]` above. The cursor is in range while the major subscript
/// lies strictly inside its bounds.
pub struct Cursor<'a> {
    layout: &'a Layout,
    order: Order,
    subs: Axes,
    start: Axes,
    lower: Axes,
    upper: Axes,
}

impl<'a> Cursor<'a> {
    /// Row-major cursor over the full layout.
    pub fn new(layout: &'a Layout) -> Self {
        Self::by_axis(layout, 0)
    }

    /// Cursor with the given axis (wrapped by the rank) as the major axis;
    /// the remaining axes are walked row-major among themselves.
    pub fn by_axis(layout: &'a Layout, axis: isize) -> Self {
        let rank = layout.rank();
        let mut order = Order::with_capacity(rank);
        if rank > 0 {
            let major = modulo(axis, rank as isize) as usize;
            order.push(major);
            order.extend((0..rank).filter(|&i| i != major));
        }
        Self::with_order(layout, order)
    }

    /// Cursor walking the axes in an explicit order: `order[0]` outermost,
    /// the last entry innermost. Entries are wrapped by the rank. An order
    /// whose length does not match the rank falls back to row-major.
    pub fn by_order(layout: &'a Layout, order: &[isize]) -> Self {
        let rank = layout.rank();
        if order.len() != rank {
            return Self::new(layout);
        }
        let order: Order = order
            .iter()
            .map(|&o| modulo(o, rank as isize) as usize)
            .collect();
        Self::with_order(layout, order)
    }

    fn with_order(layout: &'a Layout, order: Order) -> Self {
        let rank = layout.rank();
        let subs: Axes = SmallVec::from_elem(0, rank);
        let lower: Axes = SmallVec::from_elem(-1, rank);
        let upper: Axes = Axes::from_slice(layout.dims());
        Self {
            layout,
            order,
            start: subs.clone(),
            subs,
            lower,
            upper,
        }
    }

    /// Start the walk at the given subscripts instead of the origin. The
    /// lower bounds move to `start[i] - 1`, so inner-axis carries reset to
    /// the start position.
    pub fn with_start(mut self, start: &[isize]) -> Self {
        for (i, &s) in start.iter().take(self.subs.len()).enumerate() {
            self.subs[i] = s;
            self.start[i] = s;
            self.lower[i] = s - 1;
        }
        self
    }

    /// Override the exclusive per-axis bounds.
    pub fn with_bounds(mut self, lower: &[isize], upper: &[isize]) -> Self {
        for (i, &b) in lower.iter().take(self.lower.len()).enumerate() {
            self.lower[i] = b;
        }
        for (i, &b) in upper.iter().take(self.upper.len()).enumerate() {
            self.upper[i] = b;
        }
        self
    }

    /// Current subscript tuple.
    #[inline]
    pub fn subs(&self) -> &[isize] {
        &self.subs
    }

    /// Flat buffer position of the current subscripts:
    /// `offset + dot(strides, subs)`. Meaningful while the cursor is in
    /// range.
    #[inline]
    pub fn flat(&self) -> usize {
        let strides = self.layout.strides();
        let mut idx = self.layout.offset();
        for (i, &s) in self.subs.iter().enumerate() {
            idx += strides[i] * s;
        }
        idx as usize
    }

    /// True while the major subscript lies strictly inside its bounds.
    #[inline]
    pub fn in_range(&self) -> bool {
        if self.order.is_empty() {
            return false;
        }
        let major = self.order[0];
        self.lower[major] < self.subs[major] && self.subs[major] < self.upper[major]
    }

    /// Return the subscripts to the start position.
    pub fn reset(&mut self) {
        self.subs.copy_from_slice(&self.start);
    }

    /// One step forward in the traversal order.
    pub fn step_forward(&mut self) {
        let major = match self.order.first() {
            Some(&m) => m,
            None => return,
        };
        for i in (0..self.order.len()).rev() {
            let ax = self.order[i];
            if self.subs[ax] < self.upper[ax] {
                self.subs[ax] += 1;
            }
            if self.subs[ax] == self.upper[ax] {
                if ax != major {
                    self.subs[ax] = self.lower[ax] + 1;
                }
            } else {
                break;
            }
        }
    }

    /// One step backward in the traversal order.
    pub fn step_back(&mut self) {
        let major = match self.order.first() {
            Some(&m) => m,
            None => return,
        };
        for i in (0..self.order.len()).rev() {
            let ax = self.order[i];
            if self.subs[ax] > self.lower[ax] {
                self.subs[ax] -= 1;
            }
            if self.subs[ax] == self.lower[ax] {
                if ax != major {
                    self.subs[ax] = if self.upper[ax] != 0 { self.upper[ax] - 1 } else { 0 };
                }
            } else {
                break;
            }
        }
    }

    /// `n` repeated unit steps, forward for positive `n` and backward for
    /// negative.
    pub fn advance(&mut self, n: isize) {
        if n >= 0 {
            for _ in 0..n {
                self.step_forward();
            }
        } else {
            for _ in 0..-n {
                self.step_back();
            }
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if !self.in_range() {
            return None;
        }
        let pos = self.flat();
        self.step_forward();
        Some(pos)
    }
}

/// Fast cursor for contiguous, non-view layouts.
///
/// Iterates flat positions directly, either in plain row-major order or
/// with a chosen major axis, producing the same sequences as [`Cursor`]
/// on the same layout. Stepping is O(1) for any distance.
pub struct FlatCursor {
    count: isize,
    axis_stride: isize,
    axis_dim: isize,
    idx: isize,
}

impl FlatCursor {
    /// Row-major fast cursor. Returns `None` unless the layout is
    /// contiguous (see [`Layout::is_contiguous`]).
    pub fn new(layout: &Layout) -> Option<Self> {
        Self::by_axis(layout, 0)
    }

    /// Fast cursor with the given axis (wrapped by the rank) as the major
    /// axis. Returns `None` unless the layout is contiguous.
    pub fn by_axis(layout: &Layout, axis: isize) -> Option<Self> {
        if !layout.is_contiguous() {
            return None;
        }
        let rank = layout.rank();
        let axis = modulo(axis, rank as isize) as usize;
        Some(Self {
            count: layout.count() as isize,
            axis_stride: layout.strides()[axis],
            axis_dim: layout.dims()[axis],
            idx: 0,
        })
    }

    /// Flat position for the current step. Meaningful while in range.
    #[inline]
    pub fn flat(&self) -> usize {
        // Iteration index decomposes as (major, chunk, within-chunk); the
        // major subscript is slowest, everything else stays row-major.
        let lane = self.count / self.axis_dim;
        let major = self.idx / lane;
        let rem = self.idx % lane;
        let chunk = rem / self.axis_stride;
        let within = rem % self.axis_stride;
        (chunk * self.axis_stride * self.axis_dim + major * self.axis_stride + within) as usize
    }

    #[inline]
    pub fn in_range(&self) -> bool {
        0 <= self.idx && self.idx < self.count
    }

    pub fn reset(&mut self) {
        self.idx = 0;
    }

    /// Jump to the last position, for backward walks.
    pub fn seek_end(&mut self) {
        self.idx = self.count - 1;
    }

    #[inline]
    pub fn step_forward(&mut self) {
        self.advance(1);
    }

    #[inline]
    pub fn step_back(&mut self) {
        self.advance(-1);
    }

    /// Advance by `n` steps in O(1); the cursor saturates one position
    /// outside either end, from which the inverse step re-enters range.
    pub fn advance(&mut self, n: isize) {
        self.idx = (self.idx + n).clamp(-1, self.count);
    }
}

impl Iterator for FlatCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if !self.in_range() {
            return None;
        }
        let pos = self.flat();
        self.step_forward();
        Some(pos)
    }
}
