//! Operator sugar over the traversal engine.
//!
//! Arithmetic and bitwise `std::ops` impls come in array⊗array and
//! array⊗scalar forms, all one-line delegations to [`ops::map`] and
//! [`ops::zip_map`]. Operator traits cannot return `Result`, so the
//! array⊗array forms panic on shape mismatch with the error's display
//! text; the named functions in [`crate::ops`] are the fallible surface.
//! Compound assignment rebinds the left side to the freshly computed
//! array, matching plain (non-view-preserving) assignment.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div, DivAssign,
    Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};

use num_traits::{Float, Signed};

use crate::ops;
use crate::scalar::Truthy;
use crate::{NdArray, Result};

fn checked<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl<'a, 'b, T> $trait<&'b NdArray<T>> for &'a NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self, rhs: &'b NdArray<T>) -> NdArray<T> {
                checked(ops::zip_map(self, rhs, |a, b| a.clone().$method(b.clone())))
            }
        }

        impl<T> $trait<NdArray<T>> for NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self, rhs: NdArray<T>) -> NdArray<T> {
                (&self).$method(&rhs)
            }
        }

        impl<'a, T> $trait<T> for &'a NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self, rhs: T) -> NdArray<T> {
                ops::map(self, move |a| a.clone().$method(rhs.clone()))
            }
        }

        impl<T> $trait<T> for NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self, rhs: T) -> NdArray<T> {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);
impl_binary_op!(Rem, rem);
impl_binary_op!(BitAnd, bitand);
impl_binary_op!(BitOr, bitor);
impl_binary_op!(BitXor, bitxor);
impl_binary_op!(Shl, shl);
impl_binary_op!(Shr, shr);

macro_rules! impl_compound_op {
    ($trait:ident, $method:ident, $op_trait:ident, $op_method:ident) => {
        impl<'a, T> $trait<&'a NdArray<T>> for NdArray<T>
        where
            T: Clone + $op_trait<Output = T>,
        {
            fn $method(&mut self, rhs: &'a NdArray<T>) {
                *self = checked(ops::zip_map(self, rhs, |a, b| {
                    a.clone().$op_method(b.clone())
                }));
            }
        }

        impl<T> $trait<T> for NdArray<T>
        where
            T: Clone + $op_trait<Output = T>,
        {
            fn $method(&mut self, rhs: T) {
                *self = ops::map(self, move |a| a.clone().$op_method(rhs.clone()));
            }
        }
    };
}

impl_compound_op!(AddAssign, add_assign, Add, add);
impl_compound_op!(SubAssign, sub_assign, Sub, sub);
impl_compound_op!(MulAssign, mul_assign, Mul, mul);
impl_compound_op!(DivAssign, div_assign, Div, div);
impl_compound_op!(RemAssign, rem_assign, Rem, rem);
impl_compound_op!(BitAndAssign, bitand_assign, BitAnd, bitand);
impl_compound_op!(BitOrAssign, bitor_assign, BitOr, bitor);
impl_compound_op!(BitXorAssign, bitxor_assign, BitXor, bitxor);
impl_compound_op!(ShlAssign, shl_assign, Shl, shl);
impl_compound_op!(ShrAssign, shr_assign, Shr, shr);

macro_rules! impl_unary_op {
    ($trait:ident, $method:ident) => {
        impl<'a, T> $trait for &'a NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self) -> NdArray<T> {
                ops::map(self, |a| a.clone().$method())
            }
        }

        impl<T> $trait for NdArray<T>
        where
            T: Clone + $trait<Output = T>,
        {
            type Output = NdArray<T>;

            fn $method(self) -> NdArray<T> {
                (&self).$method()
            }
        }
    };
}

impl_unary_op!(Neg, neg);
impl_unary_op!(Not, not);

macro_rules! impl_comparison {
    ($name:ident, $scalar_name:ident, $bound:ident, $op:tt) => {
        #[doc = concat!("Elementwise `", stringify!($op), "` against another array.")]
        pub fn $name<T: $bound>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<bool>> {
            ops::zip_map(a, b, |x, y| x $op y)
        }

        #[doc = concat!("Elementwise `", stringify!($op), "` against a scalar.")]
        pub fn $scalar_name<T: $bound>(a: &NdArray<T>, scalar: &T) -> NdArray<bool> {
            ops::map(a, |x| x $op scalar)
        }
    };
}

impl_comparison!(eq, eq_scalar, PartialEq, ==);
impl_comparison!(ne, ne_scalar, PartialEq, !=);
impl_comparison!(lt, lt_scalar, PartialOrd, <);
impl_comparison!(le, le_scalar, PartialOrd, <=);
impl_comparison!(gt, gt_scalar, PartialOrd, >);
impl_comparison!(ge, ge_scalar, PartialOrd, >=);

/// Elementwise logical AND of truthiness.
pub fn and<T1: Truthy, T2: Truthy>(a: &NdArray<T1>, b: &NdArray<T2>) -> Result<NdArray<bool>> {
    ops::zip_map(a, b, |x, y| x.is_truthy() && y.is_truthy())
}

/// Elementwise logical OR of truthiness.
pub fn or<T1: Truthy, T2: Truthy>(a: &NdArray<T1>, b: &NdArray<T2>) -> Result<NdArray<bool>> {
    ops::zip_map(a, b, |x, y| x.is_truthy() || y.is_truthy())
}

/// Elementwise logical negation of truthiness.
pub fn logical_not<T: Truthy>(arr: &NdArray<T>) -> NdArray<bool> {
    ops::map(arr, |x| !x.is_truthy())
}

/// Elementwise absolute value.
pub fn abs<T: Signed>(arr: &NdArray<T>) -> NdArray<T> {
    ops::map(arr, |x| x.abs())
}

/// Elementwise power.
pub fn powf<T: Float>(arr: &NdArray<T>, exponent: T) -> NdArray<T> {
    ops::map(arr, move |x| x.powf(exponent))
}

macro_rules! impl_float_map {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Elementwise `", stringify!($name), "`, delegating to the host float type.")]
            pub fn $name<T: Float>(arr: &NdArray<T>) -> NdArray<T> {
                ops::map(arr, |x| x.$name())
            }
        )*
    };
}

impl_float_map!(
    sqrt, exp, ln, log10, sin, cos, tan, asin, acos, atan, sinh, cosh, tanh,
);
