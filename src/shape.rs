//! Shape transformations: reshape, resize, transpose, append, insert,
//! remove, and the two copy primitives.
//!
//! Each function either derives a new layout over the same buffer or walks
//! the source with cursors into a freshly allocated buffer; none of them
//! mutates its source, and a failed operation never leaves partial writes
//! in a destination.

use crate::cursor::Cursor;
use crate::layout::Layout;
use crate::scalar::modulo;
use crate::{NdArray, NdError, Result};

/// Give `arr` a new shape with the same element count.
///
/// Identical dims return an alias. A non-view source shares its buffer
/// under the new layout; a view is materialised into a fresh buffer by a
/// lock-step walk (the only way to reshape a strided view correctly).
/// Mismatched element counts fail with shape-mismatch.
pub fn reshape<T: Clone>(arr: &NdArray<T>, new_dims: &[isize]) -> Result<NdArray<T>> {
    if arr.is_empty() {
        return Ok(NdArray::empty());
    }
    let new_layout = Layout::from_shape(new_dims);
    if new_layout.count() != arr.len() {
        return Err(NdError::ShapeMismatch(
            arr.dims().to_vec(),
            new_dims.to_vec(),
        ));
    }
    if arr.dims() == new_dims {
        return Ok(arr.clone());
    }
    if arr.is_view() {
        let data: Vec<T> = arr.iter().collect();
        Ok(NdArray::from_raw(new_layout, data))
    } else {
        Ok(NdArray::alias(new_layout, arr.buffer()))
    }
}

/// Copy `arr` into a fresh buffer of a possibly different shape.
///
/// Old and new layouts are walked in lock-step until either is exhausted;
/// any remaining positions take `T::default()`. The result never aliases
/// the source.
pub fn resize<T: Clone + Default>(arr: &NdArray<T>, new_dims: &[isize]) -> NdArray<T> {
    let new_layout = Layout::from_shape(new_dims);
    if new_layout.is_empty() {
        return NdArray::empty();
    }
    if arr.is_empty() {
        return NdArray::new(new_dims);
    }
    if arr.dims() == new_dims {
        return arr.to_owned();
    }
    let keep = arr.len().min(new_layout.count());
    let mut data: Vec<T> = arr.iter().take(keep).collect();
    data.resize(new_layout.count(), T::default());
    NdArray::from_raw(new_layout, data)
}

/// Transpose by a full axis permutation.
///
/// The source is walked in the permuted axis order into a fresh contiguous
/// row-major buffer, so the result is never a view. A malformed order
/// (wrong length or repeated axis) yields the empty array.
pub fn transpose<T: Clone>(arr: &NdArray<T>, order: &[isize]) -> NdArray<T> {
    if arr.is_empty() {
        return NdArray::empty();
    }
    let new_layout = arr.layout().permute(order);
    if new_layout.is_empty() {
        return NdArray::empty();
    }
    let buf = arr.buffer().borrow();
    let data: Vec<T> = Cursor::by_order(arr.layout(), order)
        .map(|pos| buf[pos].clone())
        .collect();
    drop(buf);
    NdArray::from_raw(new_layout, data)
}

/// Concatenate `b` after `a` along `axis` (wrapped by the rank).
///
/// All extents except the one on `axis` must agree. An empty operand
/// yields a deep copy of the other.
pub fn append<T: Clone>(a: &NdArray<T>, b: &NdArray<T>, axis: isize) -> Result<NdArray<T>> {
    if a.is_empty() {
        return Ok(b.to_owned());
    }
    if b.is_empty() {
        return Ok(a.to_owned());
    }
    let rank = a.rank();
    if rank != b.rank() {
        return Err(NdError::ShapeMismatch(a.dims().to_vec(), b.dims().to_vec()));
    }
    let axis = modulo(axis, rank as isize) as usize;
    for i in 0..rank {
        if i != axis && a.dims()[i] != b.dims()[i] {
            return Err(NdError::ShapeMismatch(a.dims().to_vec(), b.dims().to_vec()));
        }
    }
    let new_layout = a.layout().grow_axis(axis as isize, b.dims()[axis]);
    if new_layout.is_empty() {
        return Ok(NdArray::empty());
    }
    Ok(interleave(a, b, &new_layout, axis, a.dims()[axis]))
}

/// Concatenate flattened: the result is 1-D with `a`'s elements followed by
/// `b`'s, in their respective row-major orders.
pub fn append_flat<T: Clone>(a: &NdArray<T>, b: &NdArray<T>) -> NdArray<T> {
    let mut data: Vec<T> = a.iter().collect();
    data.extend(b.iter());
    if data.is_empty() {
        return NdArray::empty();
    }
    let len = data.len() as isize;
    NdArray::from_raw(Layout::from_shape(&[len]), data)
}

/// Insert `b` into `a` along `axis` so that `b` occupies
/// `[position, position + b.dims[axis])` on that axis.
///
/// A negative position wraps from the end; `position` may equal the axis
/// extent (which appends); beyond that the call fails with out-of-range.
pub fn insert<T: Clone>(
    a: &NdArray<T>,
    b: &NdArray<T>,
    position: isize,
    axis: isize,
) -> Result<NdArray<T>> {
    if a.is_empty() {
        return Ok(b.to_owned());
    }
    if b.is_empty() {
        return Ok(a.to_owned());
    }
    let rank = a.rank();
    if rank != b.rank() {
        return Err(NdError::ShapeMismatch(a.dims().to_vec(), b.dims().to_vec()));
    }
    let axis = modulo(axis, rank as isize) as usize;
    for i in 0..rank {
        if i != axis && a.dims()[i] != b.dims()[i] {
            return Err(NdError::ShapeMismatch(a.dims().to_vec(), b.dims().to_vec()));
        }
    }
    let position = resolve_insert_pos(position, a.dims()[axis])?;
    let new_layout = a.layout().grow_axis(axis as isize, b.dims()[axis]);
    if new_layout.is_empty() {
        return Ok(NdArray::empty());
    }
    Ok(interleave_at(a, b, &new_layout, axis, position, b.dims()[axis]))
}

/// Insert `b`'s elements at a flat position of the flattened `a`. The
/// result is 1-D. Negative positions wrap from the end; `position` may
/// equal the element count.
pub fn insert_flat<T: Clone>(a: &NdArray<T>, b: &NdArray<T>, position: isize) -> Result<NdArray<T>> {
    let position = resolve_insert_pos(position, a.len() as isize)?;
    let mut data: Vec<T> = a.iter().collect();
    let tail = data.split_off(position as usize);
    data.extend(b.iter());
    data.extend(tail);
    if data.is_empty() {
        return Ok(NdArray::empty());
    }
    let len = data.len() as isize;
    Ok(NdArray::from_raw(Layout::from_shape(&[len]), data))
}

/// Remove `count` positions starting at `position` along `axis`.
///
/// The position wraps from the end when negative and must address an
/// existing position; `count` is clamped so the removal never runs past
/// the axis. Removing the whole axis yields the empty array.
pub fn remove<T: Clone>(
    arr: &NdArray<T>,
    position: isize,
    count: isize,
    axis: isize,
) -> Result<NdArray<T>> {
    if arr.is_empty() {
        return Ok(NdArray::empty());
    }
    let rank = arr.rank();
    let axis = modulo(axis, rank as isize) as usize;
    let extent = arr.dims()[axis];
    let position = resolve_pos(position, extent)?;
    let count = count.max(0).min(extent - position);
    if count == 0 {
        return Ok(arr.to_owned());
    }
    let new_layout = arr.layout().grow_axis(axis as isize, -count);
    if new_layout.is_empty() {
        return Ok(NdArray::empty());
    }
    let buf = arr.buffer().borrow();
    let mut data = Vec::with_capacity(new_layout.count());
    let mut cursor = Cursor::new(arr.layout());
    while cursor.in_range() {
        let s = cursor.subs()[axis];
        if s < position || s >= position + count {
            data.push(buf[cursor.flat()].clone());
        }
        cursor.step_forward();
    }
    drop(buf);
    Ok(NdArray::from_raw(new_layout, data))
}

/// Remove `count` elements starting at a flat position of the flattened
/// array. The result is 1-D; `count` is clamped like the axis variant.
pub fn remove_flat<T: Clone>(arr: &NdArray<T>, position: isize, count: isize) -> Result<NdArray<T>> {
    if arr.is_empty() {
        return Ok(NdArray::empty());
    }
    let total = arr.len() as isize;
    let position = resolve_pos(position, total)?;
    let count = count.max(0).min(total - position);
    let mut data: Vec<T> = arr.iter().collect();
    data.drain(position as usize..(position + count) as usize);
    if data.is_empty() {
        return Ok(NdArray::empty());
    }
    let len = data.len() as isize;
    Ok(NdArray::from_raw(Layout::from_shape(&[len]), data))
}

/// Elementwise copy from `src` into `dst`, each walked in its own default
/// order, for `min(src.len(), dst.len())` elements. Shapes are not
/// reconciled and `dst` keeps its layout.
pub fn copy_into<T: Clone>(src: &NdArray<T>, dst: &mut NdArray<T>) {
    if src.is_empty() || dst.is_empty() {
        return;
    }
    let n = src.len().min(dst.len());
    // Source values are collected first: src and dst may alias the same
    // buffer.
    let values: Vec<T> = src.iter().take(n).collect();
    let mut buf = dst.buffer().borrow_mut();
    for (pos, value) in Cursor::new(dst.layout()).zip(values) {
        buf[pos] = value;
    }
}

/// Copy `src` into `dst`, rebinding first when `dst` is not a view.
///
/// A non-view destination takes `src`'s shape over a fresh buffer (a
/// rebind — see `copy_into` for pure copy semantics); a view destination
/// is written through like `copy_into`.
pub fn set_into<T: Clone>(src: &NdArray<T>, dst: &mut NdArray<T>) {
    if dst.is_view() {
        copy_into(src, dst);
    } else {
        *dst = src.to_owned();
    }
}

/// Wrapped position that may also address one-past-the-end.
fn resolve_insert_pos(position: isize, extent: isize) -> Result<isize> {
    let resolved = if position < 0 && extent > 0 {
        modulo(position, extent)
    } else {
        position
    };
    if resolved < 0 || resolved > extent {
        return Err(NdError::OutOfRange {
            pos: position,
            extent,
        });
    }
    Ok(resolved)
}

/// Wrapped position that must address an existing index.
fn resolve_pos(position: isize, extent: isize) -> Result<isize> {
    let resolved = if position < 0 && extent > 0 {
        modulo(position, extent)
    } else {
        position
    };
    if resolved < 0 || resolved >= extent {
        return Err(NdError::OutOfRange {
            pos: position,
            extent,
        });
    }
    Ok(resolved)
}

fn interleave<T: Clone>(
    a: &NdArray<T>,
    b: &NdArray<T>,
    new_layout: &Layout,
    axis: usize,
    split: isize,
) -> NdArray<T> {
    interleave_at(a, b, new_layout, axis, split, new_layout.dims()[axis] - split)
}

/// Walk the output layout, drawing from `a` outside the band
/// `[position, position + width)` on `axis` and from `b` inside it.
fn interleave_at<T: Clone>(
    a: &NdArray<T>,
    b: &NdArray<T>,
    new_layout: &Layout,
    axis: usize,
    position: isize,
    width: isize,
) -> NdArray<T> {
    let a_buf = a.buffer().borrow();
    let b_buf = b.buffer().borrow();
    let mut a_cursor = Cursor::new(a.layout());
    let mut b_cursor = Cursor::new(b.layout());
    let mut out_cursor = Cursor::new(new_layout);
    let mut data = Vec::with_capacity(new_layout.count());
    while out_cursor.in_range() {
        let s = out_cursor.subs()[axis];
        if s >= position && s < position + width {
            data.push(b_buf[b_cursor.flat()].clone());
            b_cursor.step_forward();
        } else {
            data.push(a_buf[a_cursor.flat()].clone());
            a_cursor.step_forward();
        }
        out_cursor.step_forward();
    }
    drop(a_buf);
    drop(b_buf);
    NdArray::from_raw(new_layout.clone(), data)
}
