//! Traversal-driven operators: map, reduce, filter, find, and the
//! whole-array predicates.
//!
//! Every function here is a thin composition over the layout and cursor
//! machinery: derive a layout, open one or two cursors, apply a pure
//! per-element function. Contiguous non-view arrays take a direct pass
//! over the buffer; everything else goes through the general cursor.

use crate::cursor::Cursor;
use crate::layout::Layout;
use crate::scalar::{self, Tolerance, Truthy};
use crate::{NdArray, NdError, Result};
use num_traits::Signed;

/// Elementwise transformation into a fresh array of the same shape.
///
/// The result element type is whatever `f` returns, so this is also the
/// type-conversion primitive. Scalar-broadcast forms are closures:
/// `map(&a, |x| x + s)`.
pub fn map<T, U, F>(arr: &NdArray<T>, f: F) -> NdArray<U>
where
    F: Fn(&T) -> U,
{
    if arr.is_empty() {
        return NdArray::empty();
    }
    let buf = arr.buffer().borrow();
    let data: Vec<U> = if !arr.is_view() && arr.layout().is_contiguous() {
        buf.iter().map(&f).collect()
    } else {
        Cursor::new(arr.layout()).map(|pos| f(&buf[pos])).collect()
    };
    drop(buf);
    NdArray::from_raw(Layout::from_shape(arr.dims()), data)
}

/// Binary elementwise transformation; the shapes must match exactly (no
/// broadcasting).
pub fn zip_map<T1, T2, U, F>(a: &NdArray<T1>, b: &NdArray<T2>, f: F) -> Result<NdArray<U>>
where
    F: Fn(&T1, &T2) -> U,
{
    if a.dims() != b.dims() {
        return Err(NdError::ShapeMismatch(a.dims().to_vec(), b.dims().to_vec()));
    }
    if a.is_empty() {
        return Ok(NdArray::empty());
    }
    let a_buf = a.buffer().borrow();
    let b_buf = b.buffer().borrow();
    let contiguous = !a.is_view()
        && a.layout().is_contiguous()
        && !b.is_view()
        && b.layout().is_contiguous();
    let data: Vec<U> = if contiguous {
        a_buf.iter().zip(b_buf.iter()).map(|(x, y)| f(x, y)).collect()
    } else {
        Cursor::new(a.layout())
            .zip(Cursor::new(b.layout()))
            .map(|(pa, pb)| f(&a_buf[pa], &b_buf[pb]))
            .collect()
    };
    drop(a_buf);
    drop(b_buf);
    Ok(NdArray::from_raw(Layout::from_shape(a.dims()), data))
}

/// Whole-array fold in default row-major order.
///
/// The accumulator is seeded from the first element and `f` folds each
/// remaining element as `f(element, acc)`. An empty array yields the
/// accumulator type's default.
pub fn reduce<T, U, F>(arr: &NdArray<T>, f: F) -> U
where
    T: Clone,
    U: From<T> + Default,
    F: Fn(&T, U) -> U,
{
    if arr.is_empty() {
        return U::default();
    }
    let buf = arr.buffer().borrow();
    let mut cursor = Cursor::new(arr.layout());
    let mut acc = U::from(buf[cursor.flat()].clone());
    cursor.step_forward();
    while cursor.in_range() {
        acc = f(&buf[cursor.flat()], acc);
        cursor.step_forward();
    }
    acc
}

/// Fold along one axis (wrapped by the rank).
///
/// The output shape is the input shape with the axis removed (`{1}` for a
/// 1-D input). Each output element folds the `dims[axis]` values of its
/// lane, seeded from the lane's first element; the walk uses an axis-order
/// cursor with the reduction axis innermost so each lane's values are
/// consecutive.
pub fn reduce_axis<T, U, F>(arr: &NdArray<T>, f: F, axis: isize) -> NdArray<U>
where
    T: Clone,
    U: From<T>,
    F: Fn(&T, U) -> U,
{
    fold_axis(arr, axis, |first| U::from(first.clone()), f, true)
}

/// Fold along one axis with an explicit initial accumulator per lane.
pub fn reduce_axis_with<T, U, F>(arr: &NdArray<T>, init: U, f: F, axis: isize) -> NdArray<U>
where
    U: Clone,
    F: Fn(&T, U) -> U,
{
    fold_axis(arr, axis, |_| init.clone(), f, false)
}

fn fold_axis<T, U, Seed, F>(
    arr: &NdArray<T>,
    axis: isize,
    seed: Seed,
    f: F,
    seed_consumes_first: bool,
) -> NdArray<U>
where
    Seed: Fn(&T) -> U,
    F: Fn(&T, U) -> U,
{
    if arr.is_empty() {
        return NdArray::empty();
    }
    let rank = arr.rank() as isize;
    let axis = scalar::modulo(axis, rank);
    let out_layout = arr.layout().remove_axis(axis);
    let lane = arr.dims()[axis as usize];

    // Reduction axis innermost: its values are consecutive in the walk.
    let mut order: Vec<isize> = (0..rank).filter(|&i| i != axis).collect();
    order.push(axis);

    let buf = arr.buffer().borrow();
    let mut cursor = Cursor::by_order(arr.layout(), &order);
    let mut data = Vec::with_capacity(out_layout.count());
    while cursor.in_range() {
        let mut acc = seed(&buf[cursor.flat()]);
        let mut remaining = lane;
        if seed_consumes_first {
            cursor.step_forward();
            remaining -= 1;
        }
        for _ in 0..remaining {
            acc = f(&buf[cursor.flat()], acc);
            cursor.step_forward();
        }
        data.push(acc);
    }
    drop(buf);
    NdArray::from_raw(out_layout, data)
}

/// Elements satisfying a predicate, packed into a 1-D array in walk order.
/// No matches (or an empty input) yield the empty array.
pub fn filter<T, F>(arr: &NdArray<T>, pred: F) -> NdArray<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    if arr.is_empty() {
        return NdArray::empty();
    }
    let buf = arr.buffer().borrow();
    let mut data = Vec::new();
    for pos in Cursor::new(arr.layout()) {
        let value = &buf[pos];
        if pred(value) {
            data.push(value.clone());
        }
    }
    drop(buf);
    from_packed(data)
}

/// Elements of `arr` where the mask is truthy, packed 1-D. An empty mask
/// yields the empty array; a mask of any other mismatched shape is a
/// shape-mismatch error.
pub fn filter_mask<T, M>(arr: &NdArray<T>, mask: &NdArray<M>) -> Result<NdArray<T>>
where
    T: Clone,
    M: Truthy,
{
    if arr.is_empty() || mask.is_empty() {
        return Ok(NdArray::empty());
    }
    if arr.dims() != mask.dims() {
        return Err(NdError::ShapeMismatch(
            arr.dims().to_vec(),
            mask.dims().to_vec(),
        ));
    }
    let buf = arr.buffer().borrow();
    let mask_buf = mask.buffer().borrow();
    let mut data = Vec::new();
    for (pos, mask_pos) in Cursor::new(arr.layout()).zip(Cursor::new(mask.layout())) {
        if mask_buf[mask_pos].is_truthy() {
            data.push(buf[pos].clone());
        }
    }
    drop(buf);
    drop(mask_buf);
    Ok(from_packed(data))
}

/// Flat buffer positions of the elements satisfying a predicate, packed
/// 1-D. The positions address the shared buffer, so they remain valid for
/// [`NdArray::take`] on any array over a buffer of the same size.
pub fn find<T, F>(arr: &NdArray<T>, pred: F) -> NdArray<isize>
where
    F: Fn(&T) -> bool,
{
    if arr.is_empty() {
        return NdArray::empty();
    }
    let buf = arr.buffer().borrow();
    let mut data = Vec::new();
    for pos in Cursor::new(arr.layout()) {
        if pred(&buf[pos]) {
            data.push(pos as isize);
        }
    }
    drop(buf);
    from_packed(data)
}

/// Flat positions of `arr`'s elements where the mask is truthy.
pub fn find_mask<T, M>(arr: &NdArray<T>, mask: &NdArray<M>) -> Result<NdArray<isize>>
where
    M: Truthy,
{
    if arr.is_empty() || mask.is_empty() {
        return Ok(NdArray::empty());
    }
    if arr.dims() != mask.dims() {
        return Err(NdError::ShapeMismatch(
            arr.dims().to_vec(),
            mask.dims().to_vec(),
        ));
    }
    let mask_buf = mask.buffer().borrow();
    let mut data = Vec::new();
    for (pos, mask_pos) in Cursor::new(arr.layout()).zip(Cursor::new(mask.layout())) {
        if mask_buf[mask_pos].is_truthy() {
            data.push(pos as isize);
        }
    }
    drop(mask_buf);
    Ok(from_packed(data))
}

/// True when every element is truthy. Empty arrays reduce to the
/// accumulator default, i.e. `false`.
pub fn all<T: Truthy>(arr: &NdArray<T>) -> bool {
    if arr.is_empty() {
        return false;
    }
    let buf = arr.buffer().borrow();
    Cursor::new(arr.layout()).all(|pos| buf[pos].is_truthy())
}

/// True when any element is truthy; `false` for empty arrays.
pub fn any<T: Truthy>(arr: &NdArray<T>) -> bool {
    if arr.is_empty() {
        return false;
    }
    let buf = arr.buffer().borrow();
    Cursor::new(arr.layout()).any(|pos| buf[pos].is_truthy())
}

/// Per-lane `all` along an axis.
pub fn all_axis<T: Truthy>(arr: &NdArray<T>, axis: isize) -> NdArray<bool> {
    reduce_axis_with(arr, true, |v, acc| acc && v.is_truthy(), axis)
}

/// Per-lane `any` along an axis.
pub fn any_axis<T: Truthy>(arr: &NdArray<T>, axis: isize) -> NdArray<bool> {
    reduce_axis_with(arr, false, |v, acc| acc || v.is_truthy(), axis)
}

/// Elementwise tolerance comparison: `|a - b| <= atol + rtol * |b|`.
pub fn close<T>(a: &NdArray<T>, b: &NdArray<T>, atol: T, rtol: T) -> Result<NdArray<bool>>
where
    T: Copy + PartialOrd + Signed,
{
    zip_map(a, b, move |x, y| scalar::close(*x, *y, atol, rtol))
}

/// Elementwise tolerance comparison with the element type's defaults.
pub fn close_default<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<bool>>
where
    T: Copy + PartialOrd + Signed + Tolerance,
{
    close(a, b, T::default_atol(), T::default_rtol())
}

/// Short-circuiting lock-step test: true when the predicate holds for
/// every aligned pair. Mismatched shapes are `false`; two empty arrays
/// are `true`.
pub fn all_match<T1, T2, F>(a: &NdArray<T1>, b: &NdArray<T2>, pred: F) -> bool
where
    F: Fn(&T1, &T2) -> bool,
{
    if a.is_empty() && b.is_empty() {
        return true;
    }
    if a.is_empty() || b.is_empty() || a.dims() != b.dims() {
        return false;
    }
    let a_buf = a.buffer().borrow();
    let b_buf = b.buffer().borrow();
    Cursor::new(a.layout())
        .zip(Cursor::new(b.layout()))
        .all(|(pa, pb)| pred(&a_buf[pa], &b_buf[pb]))
}

/// Short-circuiting lock-step test: true when the predicate holds for any
/// aligned pair. Mismatched shapes and empty arrays are `false`.
pub fn any_match<T1, T2, F>(a: &NdArray<T1>, b: &NdArray<T2>, pred: F) -> bool
where
    F: Fn(&T1, &T2) -> bool,
{
    if a.is_empty() || b.is_empty() || a.dims() != b.dims() {
        return false;
    }
    let a_buf = a.buffer().borrow();
    let b_buf = b.buffer().borrow();
    Cursor::new(a.layout())
        .zip(Cursor::new(b.layout()))
        .any(|(pa, pb)| pred(&a_buf[pa], &b_buf[pb]))
}

/// Shape equality plus elementwise equality; `NdArray`'s `PartialEq`.
pub fn all_equal<T: PartialEq>(a: &NdArray<T>, b: &NdArray<T>) -> bool {
    all_match(a, b, |x, y| x == y)
}

/// True when every aligned pair is within tolerance.
pub fn all_close<T>(a: &NdArray<T>, b: &NdArray<T>, atol: T, rtol: T) -> bool
where
    T: Copy + PartialOrd + Signed,
{
    all_match(a, b, move |x, y| scalar::close(*x, *y, atol, rtol))
}

/// `all_close` with the element type's default tolerances.
pub fn all_close_default<T>(a: &NdArray<T>, b: &NdArray<T>) -> bool
where
    T: Copy + PartialOrd + Signed + Tolerance,
{
    all_close(a, b, T::default_atol(), T::default_rtol())
}

fn from_packed<T>(data: Vec<T>) -> NdArray<T> {
    if data.is_empty() {
        return NdArray::empty();
    }
    let len = data.len() as isize;
    NdArray::from_raw(Layout::from_shape(&[len]), data)
}
