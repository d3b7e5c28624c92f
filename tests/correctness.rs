use approx::assert_relative_eq;
use ndspan::{
    all_close_default, all_equal, all_match, any_match, append, append_flat, filter, find, insert,
    map, reduce, reduce_axis, remove, reshape, resize, transpose, zip_map, Interval, NdArray,
    NdError,
};

/// Row-major 1..=n over the given shape.
fn iota(dims: &[isize]) -> NdArray<i64> {
    let mut next = 0;
    NdArray::from_fn(dims, |_| {
        next += 1;
        next
    })
}

fn values<T: Clone>(arr: &NdArray<T>) -> Vec<T> {
    arr.iter().collect()
}

#[test]
fn construction_round_trip() {
    let a = iota(&[3, 1, 2]);
    assert_eq!(a.dims(), &[3, 1, 2]);
    assert_eq!(a.len(), 6);
    assert_eq!(values(&a), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(a.get(&[2, 0, 1]), 6);
}

#[test]
fn converted_construction() {
    let floats: NdArray<f64> = NdArray::from_cast(&[2, 2], &[1i32, 2, 3, 4]).unwrap();
    assert_relative_eq!(floats.get(&[1, 1]), 4.0);
}

#[test]
fn reshape_preserves_buffer_for_non_views() {
    let a = iota(&[3, 1, 2]);
    let same = reshape(&a, &[3, 1, 2]).unwrap();
    assert_eq!(same, a);

    let mut flat = reshape(&a, &[6]).unwrap();
    flat.set(&[5], 60);
    assert_eq!(a.get(&[2, 0, 1]), 60);

    // round trip restores the original shape over the same elements
    let back = reshape(&flat, &[3, 1, 2]).unwrap();
    assert_eq!(back, a);
}

#[test]
fn reshape_rejects_count_mismatch() {
    let a = iota(&[3, 1, 2]);
    match reshape(&a, &[4]) {
        Err(NdError::ShapeMismatch(from, to)) => {
            assert_eq!(from, vec![3, 1, 2]);
            assert_eq!(to, vec![4]);
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn resize_never_aliases() {
    let a = iota(&[3, 1, 2]);
    let mut grown = resize(&a, &[8]);
    assert_eq!(values(&grown), vec![1, 2, 3, 4, 5, 6, 0, 0]);
    grown.set(&[0], 99);
    assert_eq!(a.get(&[0, 0, 0]), 1);

    let shrunk = resize(&a, &[2, 2]);
    assert_eq!(values(&shrunk), vec![1, 2, 3, 4]);
}

#[test]
fn transpose_reorders_axes() {
    let a = iota(&[4, 2, 3, 2]);
    let t = transpose(&a, &[2, 0, 1, 3]);
    assert_eq!(t.dims(), &[3, 4, 2, 2]);
    let head: Vec<i64> = t.iter().take(8).collect();
    assert_eq!(head, vec![1, 2, 7, 8, 13, 14, 19, 20]);
}

#[test]
fn transpose_inverse_restores() {
    let a = iota(&[2, 3, 4]);
    let t = transpose(&a, &[1, 2, 0]);
    assert_eq!(t.dims(), &[3, 4, 2]);
    let back = transpose(&t, &[2, 0, 1]);
    assert_eq!(back, a);
}

#[test]
fn append_without_axis_flattens() {
    let a = iota(&[3, 1, 2]);
    let b = NdArray::from_slice(&[5], &[7i64, 8, 9, 10, 11]).unwrap();
    let r = append_flat(&a, &b);
    assert_eq!(r.dims(), &[11]);
    assert_eq!(values(&r), (1..=11).collect::<Vec<i64>>());
}

#[test]
fn append_along_axis_sums_extents() {
    let a = iota(&[2, 2, 3]);
    let b = iota(&[2, 1, 3]);
    let r = append(&a, &b, 1).unwrap();
    assert_eq!(r.dims(), &[2, 3, 3]);
    assert_eq!(
        values(&r),
        vec![1, 2, 3, 4, 5, 6, 1, 2, 3, 7, 8, 9, 10, 11, 12, 4, 5, 6]
    );

    assert!(append(&a, &iota(&[2, 1, 4]), 1).is_err());
    assert!(append(&a, &iota(&[2, 2]), 0).is_err());
}

#[test]
fn append_with_empty_operand_copies_the_other() {
    let a = iota(&[2, 2]);
    let r = append(&a, &NdArray::empty(), 0).unwrap();
    assert_eq!(r, a);
    assert!(!r.is_view());
}

#[test]
fn insert_places_a_band() {
    let a = iota(&[2, 2, 3]);
    let mut next = 12;
    let b = NdArray::from_fn(&[2, 2, 3], |_| {
        next += 1;
        next
    });
    let r = insert(&a, &b, 1, 1).unwrap();
    assert_eq!(r.dims(), &[2, 4, 3]);
    // the second row of each plane is b's first row for that plane
    assert_eq!(
        values(&r.slice(&[Interval::at(0), Interval::at(1)])),
        vec![13, 14, 15]
    );
    assert_eq!(
        values(&r.slice(&[Interval::at(1), Interval::at(1)])),
        vec![19, 20, 21]
    );
}

#[test]
fn remove_undoes_insert() {
    let a = iota(&[2, 2, 3]);
    let b = iota(&[2, 2, 3]);
    let r = remove(&insert(&a, &b, 1, 1).unwrap(), 1, 2, 1).unwrap();
    assert_eq!(r, a);
}

#[test]
fn remove_clamps_the_count() {
    let a = iota(&[2, 4, 3]);
    let r = remove(&a, 3, 99, 1).unwrap();
    assert_eq!(r.dims(), &[2, 3, 3]);
    assert!(matches!(
        remove(&a, 4, 1, 1),
        Err(NdError::OutOfRange { .. })
    ));
}

#[test]
fn map_and_zip_map_compose() {
    let a = iota(&[3, 1, 2]);
    let halves: NdArray<f64> = map(&a, |&x| x as f64 / 2.0);
    assert_relative_eq!(halves.get(&[2, 0, 1]), 3.0);

    let b = iota(&[3, 1, 2]);
    let prod = zip_map(&a, &b, |x, y| x * y).unwrap();
    assert_eq!(values(&prod), vec![1, 4, 9, 16, 25, 36]);

    assert!(zip_map(&a, &iota(&[6]), |x, y| x + y).is_err());
}

#[test]
fn reduce_whole_and_per_axis() {
    let a = iota(&[3, 1, 2]);
    assert_eq!(reduce(&a, |v, acc: i64| acc + v), 21);

    let s0 = reduce_axis(&a, |v, acc: i64| acc + v, 0);
    assert_eq!(s0.dims(), &[1, 2]);
    assert_eq!(values(&s0), vec![9, 12]);

    let s1 = reduce_axis(&a, |v, acc: i64| acc + v, 1);
    assert_eq!(s1.dims(), &[3, 2]);
    assert_eq!(values(&s1), vec![1, 2, 3, 4, 5, 6]);

    let s2 = reduce_axis(&a, |v, acc: i64| acc + v, 2);
    assert_eq!(s2.dims(), &[3, 1]);
    assert_eq!(values(&s2), vec![3, 7, 11]);
}

#[test]
fn reduce_with_a_different_accumulator_type() {
    let a = NdArray::from_slice(&[2, 3], &[1i32, 2, 3, 4, 5, 6]).unwrap();
    let joined = reduce(&a, |v, acc: f64| acc + f64::from(*v));
    assert_relative_eq!(joined, 21.0);
}

#[test]
fn filter_count_matches_predicate() {
    let a = iota(&[4, 3]);
    let big = filter(&a, |&x| x > 7);
    assert_eq!(big.len(), a.iter().filter(|&x| x > 7).count());
    assert_eq!(values(&big), vec![8, 9, 10, 11, 12]);
}

#[test]
fn find_positions_select_the_filtered_elements() {
    let a = NdArray::from_slice(&[3, 1, 2], &[1i64, 2, 3, 0, 5, 6]).unwrap();
    let positions = find(&a, |&x| x % 2 == 0);
    let gathered = a.take(&positions);
    let filtered = filter(&a, |&x| x % 2 == 0);
    assert_eq!(gathered, filtered);
}

#[test]
fn operators_compose_with_views() {
    let a = iota(&[3, 1, 2]);
    let v = a.slice(&[Interval::new(1, 2)]);
    let w = a.slice(&[Interval::new(0, 1)]);
    let sum = &v + &w;
    assert!(!sum.is_view());
    assert_eq!(values(&sum), vec![4, 6, 8, 10]);
}

#[test]
fn float_arithmetic_with_tolerances() {
    let a = NdArray::from_slice(&[2, 2], &[1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let b = &(&a * 3.0) / 3.0;
    assert!(all_close_default(&a, &b));

    let c = &a + 0.5;
    assert!(!all_close_default(&a, &c));
    assert_relative_eq!(c.get(&[0, 0]), 1.5);
}

#[test]
fn match_family_identities() {
    let a = iota(&[2, 3]);
    let b = iota(&[2, 3]);
    assert_eq!(all_match(&a, &b, |x, y| x == y), all_equal(&a, &b));
    assert!(!any_match(&a, &b, |x, y| x != y));

    // two empty arrays match fully and nothing matches partially
    let e = NdArray::<i64>::empty();
    assert!(all_equal(&e, &NdArray::empty()));
    assert!(!any_match(&e, &NdArray::empty(), |x, y| x == y));
    assert!(!all_equal(&a, &e));
}

#[test]
fn empty_arrays_propagate() {
    let e = NdArray::<i64>::empty();
    assert!(map(&e, |&x| x + 1).is_empty());
    assert!(filter(&e, |_| true).is_empty());
    assert!(find(&e, |_| true).is_empty());
    assert!(reshape(&e, &[3]).unwrap().is_empty());
    assert!(transpose(&e, &[0]).is_empty());
    assert_eq!(reduce(&e, |v, acc: i64| acc + v), 0);
}

#[test]
fn complex_elements_flow_through_the_engine() {
    use num_complex::Complex64;

    let a = NdArray::from_fn(&[2, 2], |s| Complex64::new(s[0] as f64, s[1] as f64));
    let doubled = map(&a, |z| *z * 2.0);
    assert_relative_eq!(doubled.get(&[1, 1]).re, 2.0);
    assert_relative_eq!(doubled.get(&[1, 1]).im, 2.0);

    let total = reduce(&a, |z, acc: Complex64| acc + *z);
    assert_relative_eq!(total.re, 2.0);
    assert_relative_eq!(total.im, 2.0);

    let conj = map(&a, |z| z.conj());
    let sums = zip_map(&a, &conj, |x, y| *x + *y).unwrap();
    assert_relative_eq!(sums.get(&[0, 1]).im, 0.0);
}
