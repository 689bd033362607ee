//! Karatsuba multiplication of field elements without reduction.

use super::{FieldElement, soft::clmul64, split};
use core::ops::{BitXor, BitXorAssign};
use zeroize::Zeroize;

/// A multiplicand with the Karatsuba middle operand `lo ^ hi` precomputed.
///
/// Powers of `H` are stored in this form so each block costs three 64-bit carry-less multiplies.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Twisted {
    lo: u64,
    hi: u64,
    mid: u64,
}

impl From<FieldElement> for Twisted {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        let (lo, hi) = fe.halves();
        Self { lo, hi, mid: lo ^ hi }
    }
}

impl Zeroize for Twisted {
    fn zeroize(&mut self) {
        self.lo.zeroize();
        self.hi.zeroize();
        self.mid.zeroize();
    }
}

/// Unreduced 256-bit carry-less product, held as its three Karatsuba terms.
///
/// Products of several block/key pairs can be summed with `^` before a single call to
/// [`Product::combine`] and [`reduce`](super::reduce).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Product {
    hi: u128,
    mid: u128,
    lo: u128,
}

impl Product {
    /// Multiply `a` by `b`.
    #[must_use]
    pub fn mul(a: FieldElement, b: FieldElement) -> Self {
        Self::karatsuba(a, &Twisted::from(b))
    }

    #[inline]
    pub(crate) fn karatsuba(a: FieldElement, b: &Twisted) -> Self {
        Self::karatsuba_with(a, b, clmul64)
    }

    /// Three-multiply product using `clmul` for the 64x64 carry-less multiplies.
    ///
    /// Every backend goes through here; they differ only in the multiply they supply.
    #[inline(always)]
    pub(crate) fn karatsuba_with(
        a: FieldElement,
        b: &Twisted,
        clmul: impl Fn(u64, u64) -> u128,
    ) -> Self {
        let (a_lo, a_hi) = a.halves();
        Self {
            hi: clmul(a_hi, b.hi),
            mid: clmul(a_lo ^ a_hi, b.mid),
            lo: clmul(a_lo, b.lo),
        }
    }

    /// Recombine the terms into the 256-bit product `[v0, v1, v2, v3]`, least significant word
    /// first.
    #[inline]
    #[must_use]
    pub fn combine(self) -> [u64; 4] {
        let mid = self.mid ^ self.hi ^ self.lo;
        assemble(self.lo, mid, self.hi)
    }
}

impl BitXor for Product {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            hi: self.hi ^ rhs.hi,
            mid: self.mid ^ rhs.mid,
            lo: self.lo ^ rhs.lo,
        }
    }
}

impl BitXorAssign for Product {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

/// Four-multiply schoolbook product of `a` and `b` in the same layout as [`Product::combine`].
#[cfg(any(test, feature = "hazmat"))]
#[must_use]
pub fn schoolbook(a: FieldElement, b: FieldElement) -> [u64; 4] {
    let (a_lo, a_hi) = a.halves();
    let (b_lo, b_hi) = b.halves();
    let cross = clmul64(a_lo, b_hi) ^ clmul64(a_hi, b_lo);
    assemble(clmul64(a_lo, b_lo), cross, clmul64(a_hi, b_hi))
}

/// Lay out `hi * x^128 + mid * x^64 + lo` as four 64-bit words.
#[inline]
fn assemble(lo: u128, mid: u128, hi: u128) -> [u64; 4] {
    let (l0, l1) = split(lo);
    let (m0, m1) = split(mid);
    let (h0, h1) = split(hi);
    [l0, l1 ^ m0, h0 ^ m1, h1]
}
