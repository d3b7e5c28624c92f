//! The array handle: a layout paired with a shared element buffer.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::interval::Interval;
use crate::layout::Layout;
use crate::{NdError, Result};

/// A dense, strided N-dimensional array.
///
/// An `NdArray` pairs a [`Layout`] with a reference-counted contiguous
/// buffer. [`Clone`] produces another handle over the *same* buffer;
/// [`NdArray::slice`] produces a *view* — a handle whose layout addresses a
/// rectangular subset of the parent's buffer. Writes through a view are
/// visible through every other handle sharing the buffer; that aliasing is
/// the point. The buffer is released when the last handle drops.
///
/// The crate is single-threaded by design: handles are `!Send`, and no
/// internal synchronisation exists.
///
/// Element access uses the wrapping subscript rules: subscripts are reduced
/// into their axis extent by Euclidean modulo (so `-1` addresses the last
/// position), missing leading subscripts are zero, and surplus subscripts
/// are ignored.
pub struct NdArray<T> {
    layout: Layout,
    data: Rc<RefCell<Vec<T>>>,
}

impl<T> NdArray<T> {
    /// The empty array: no shape, no storage.
    pub fn empty() -> Self {
        Self {
            layout: Layout::empty(),
            data: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn from_raw(layout: Layout, data: Vec<T>) -> Self {
        debug_assert_eq!(layout.count(), data.len());
        Self {
            layout,
            data: Rc::new(RefCell::new(data)),
        }
    }

    pub(crate) fn alias(layout: Layout, data: &Rc<RefCell<Vec<T>>>) -> Self {
        Self {
            layout,
            data: Rc::clone(data),
        }
    }

    pub(crate) fn buffer(&self) -> &Rc<RefCell<Vec<T>>> {
        &self.data
    }

    /// Array of the given shape from a vector in row-major element order.
    /// The vector length must equal the shape's element count.
    pub fn from_vec(dims: &[isize], data: Vec<T>) -> Result<Self> {
        let layout = Layout::from_shape(dims);
        if layout.count() != data.len() {
            return Err(NdError::LengthMismatch {
                want: layout.count(),
                got: data.len(),
            });
        }
        if layout.is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self::from_raw(layout, data))
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn dims(&self) -> &[isize] {
        self.layout.dims()
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Number of elements addressed by this handle's layout.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// True when this handle was derived by slicing and shares its buffer
    /// with an ancestor.
    #[inline]
    pub fn is_view(&self) -> bool {
        self.layout.is_view()
    }

    /// Slice by per-axis intervals, yielding a view over the same buffer.
    ///
    /// An empty interval list returns an alias of the whole array. Axes
    /// beyond the given intervals are taken in full. A degenerate interval
    /// yields an empty view.
    pub fn slice(&self, intervals: &[Interval]) -> Self {
        if intervals.is_empty() || self.is_empty() {
            return self.clone();
        }
        Self {
            layout: self.layout.slice(intervals),
            data: Rc::clone(&self.data),
        }
    }
}

impl<T: Clone + Default> NdArray<T> {
    /// Array of the given shape filled with `T::default()`.
    pub fn new(dims: &[isize]) -> Self {
        Self::full(dims, T::default())
    }
}

impl<T: Clone> NdArray<T> {
    /// Array of the given shape filled with `value`.
    ///
    /// A shape with any non-positive extent yields the empty array.
    pub fn full(dims: &[isize], value: T) -> Self {
        let layout = Layout::from_shape(dims);
        if layout.is_empty() {
            return Self::empty();
        }
        let count = layout.count();
        Self::from_raw(layout, vec![value; count])
    }

    /// Array of the given shape from a slice in row-major element order.
    pub fn from_slice(dims: &[isize], data: &[T]) -> Result<Self> {
        Self::from_vec(dims, data.to_vec())
    }

    /// Array of the given shape from elements of a foreign type, converted
    /// elementwise while filling.
    pub fn from_cast<U>(dims: &[isize], data: &[U]) -> Result<Self>
    where
        U: Clone + Into<T>,
    {
        Self::from_vec(dims, data.iter().cloned().map(Into::into).collect())
    }

    /// Array of the given shape with each element produced from its
    /// subscripts, visited in row-major order.
    pub fn from_fn(dims: &[isize], mut f: impl FnMut(&[isize]) -> T) -> Self {
        let layout = Layout::from_shape(dims);
        if layout.is_empty() {
            return Self::empty();
        }
        let mut data = Vec::with_capacity(layout.count());
        let mut cursor = Cursor::new(&layout);
        while cursor.in_range() {
            data.push(f(cursor.subs()));
            cursor.step_forward();
        }
        drop(cursor);
        Self::from_raw(layout, data)
    }

    /// Read the element at a subscript tuple, under the wrapping rules.
    ///
    /// Panics when the array is empty.
    pub fn get(&self, subs: &[isize]) -> T {
        let idx = self.layout.flat_index(subs);
        self.data.borrow()[idx].clone()
    }

    /// Write the element at a subscript tuple, under the wrapping rules.
    ///
    /// Panics when the array is empty.
    pub fn set(&mut self, subs: &[isize], value: T) {
        let idx = self.layout.flat_index(subs);
        self.data.borrow_mut()[idx] = value;
    }

    /// Elements in row-major order of this handle's layout.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        Cursor::new(&self.layout).map(move |pos| self.data.borrow()[pos].clone())
    }

    /// Gather elements by flat buffer position.
    ///
    /// The result is a fresh array shaped like `indices`, whose elements
    /// are read from this array's buffer at each index value. Flat
    /// positions are what [`crate::ops::find`] returns, so
    /// `a.take(&find(b, pred))` selects from `a` wherever the predicate
    /// held in `b`. Panics if an index is negative or past the buffer.
    pub fn take(&self, indices: &NdArray<isize>) -> Self {
        if indices.is_empty() || self.is_empty() {
            return Self::empty();
        }
        let buf = self.data.borrow();
        let data: Vec<T> = indices.iter().map(|i| buf[i as usize].clone()).collect();
        drop(buf);
        Self::from_raw(Layout::from_shape(indices.dims()), data)
    }

    /// Deep copy: a fresh contiguous buffer with this handle's elements in
    /// row-major order. The result is never a view and shares nothing.
    pub fn to_owned(&self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let data: Vec<T> = self.iter().collect();
        Self::from_raw(Layout::from_shape(self.dims()), data)
    }

    /// Broadcast a scalar to every element addressed by this handle.
    pub fn fill(&mut self, value: T) {
        if self.is_empty() {
            return;
        }
        let mut buf = self.data.borrow_mut();
        let mut cursor = Cursor::new(&self.layout);
        while cursor.in_range() {
            buf[cursor.flat()] = value.clone();
            cursor.step_forward();
        }
    }

    /// Assign from another array under the view-preservation rule: when
    /// this handle is a view and the shapes match, the elements are copied
    /// through into the shared buffer (the one way assignment writes
    /// through a view); otherwise this handle is rebound to share `src`'s
    /// buffer and layout.
    pub fn assign(&mut self, src: &NdArray<T>) {
        if self.layout.is_view() && self.layout.dims() == src.layout.dims() {
            let values: Vec<T> = src.iter().collect();
            let mut buf = self.data.borrow_mut();
            for (pos, value) in Cursor::new(&self.layout).zip(values) {
                buf[pos] = value;
            }
        } else {
            *self = src.clone();
        }
    }
}

/// Another handle over the same buffer; cheap, and never copies elements.
/// Use [`NdArray::to_owned`] for a deep copy.
impl<T> Clone for NdArray<T> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout.clone(),
            data: Rc::clone(&self.data),
        }
    }
}

impl<T> Default for NdArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whole-array equality: equal shapes and equal elements.
impl<T: PartialEq> PartialEq for NdArray<T> {
    fn eq(&self, other: &Self) -> bool {
        crate::ops::all_equal(self, other)
    }
}

impl<T: fmt::Debug> fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("dims", &self.layout.dims())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("is_view", &self.layout.is_view())
            .field("data", &self.data.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iota(dims: &[isize]) -> NdArray<i64> {
        let mut next = 0;
        NdArray::from_fn(dims, |_| {
            next += 1;
            next
        })
    }

    #[test]
    fn construction() {
        let a = NdArray::full(&[2, 3], 7i32);
        assert_eq!(a.len(), 6);
        assert_eq!(a.get(&[1, 2]), 7);

        let a = NdArray::from_slice(&[3, 1, 2], &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(a.get(&[1, 0, 1]), 4);

        assert!(NdArray::from_slice(&[2, 2], &[1, 2, 3]).is_err());
        assert!(NdArray::<i32>::full(&[2, 0], 1).is_empty());
    }

    #[test]
    fn foreign_type_construction_converts() {
        let a: NdArray<i64> = NdArray::from_cast(&[2, 2], &[1i32, 2, 3, 4]).unwrap();
        assert_eq!(a.get(&[1, 1]), 4i64);

        let f: NdArray<f64> = NdArray::from_cast(&[3], &[1.5f32, 2.5, 3.5]).unwrap();
        assert_eq!(f.get(&[0]), 1.5f64);
    }

    #[test]
    fn subscript_wrapping() {
        let a = iota(&[3, 1, 2]);
        assert_eq!(a.get(&[-1, 0, -1]), 6);
        // missing leading subscripts are zero
        assert_eq!(a.get(&[1]), 2);
        // surplus subscripts are ignored
        assert_eq!(a.get(&[1, 0, 1, 9]), 4);
    }

    #[test]
    fn clone_aliases_to_owned_copies() {
        let a = iota(&[2, 2]);
        let mut alias = a.clone();
        alias.set(&[0, 0], 100);
        assert_eq!(a.get(&[0, 0]), 100);

        let owned = a.to_owned();
        let mut a = a;
        a.set(&[1, 1], 200);
        assert_eq!(owned.get(&[1, 1]), 4);
        assert!(!owned.is_view());
    }

    #[test]
    fn fill_broadcasts_over_the_layout() {
        let a = iota(&[2, 3]);
        let mut row = a.slice(&[Interval::at(1)]);
        row.fill(0);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn assign_rebinds_non_views() {
        let a = iota(&[2, 2]);
        let b = iota(&[2, 2]);
        let mut c = a.clone();
        c.assign(&b);
        // c now shares b's buffer, a is untouched
        c.set(&[0, 0], 50);
        assert_eq!(b.get(&[0, 0]), 50);
        assert_eq!(a.get(&[0, 0]), 1);
    }

    #[test]
    fn assign_copies_through_matching_views() {
        let a = iota(&[2, 3]);
        let src = NdArray::from_slice(&[1, 3], &[7, 8, 9]).unwrap();
        let mut row = a.slice(&[Interval::at(0)]);
        row.assign(&src);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![7, 8, 9, 4, 5, 6]);
    }

    #[test]
    fn assign_with_shape_mismatch_rebinds_even_views() {
        let a = iota(&[2, 3]);
        let src = iota(&[2, 2]);
        let mut v = a.slice(&[Interval::at(0)]);
        v.assign(&src);
        assert_eq!(v.dims(), &[2, 2]);
        // a was not written through
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn take_gathers_by_flat_position() {
        let a = NdArray::from_slice(&[3, 1, 2], &[10, 11, 12, 13, 14, 15]).unwrap();
        let idx = NdArray::from_slice(&[3], &[2isize, 4, 5]).unwrap();
        let picked = a.take(&idx);
        assert_eq!(picked.dims(), &[3]);
        assert_eq!(picked.iter().collect::<Vec<_>>(), vec![12, 14, 15]);
    }

    #[test]
    fn whole_array_equality() {
        let a = iota(&[2, 2]);
        let b = iota(&[2, 2]);
        assert_eq!(a, b);
        assert_ne!(a, iota(&[4]));
        assert_eq!(NdArray::<i64>::empty(), NdArray::<i64>::empty());
    }
}
