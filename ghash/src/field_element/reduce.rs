//! Reduction of 256-bit carry-less products modulo `x^128 + x^127 + x^126 + x^121 + 1`.

use super::{FieldElement, soft::clmul64, split};

/// Folding constant: the reduction polynomial's low terms, reflected into the top byte.
const POLY: u64 = 0xC200_0000_0000_0000;

/// Reduce the 256-bit product `[v0, v1, v2, v3]` (least significant word first) to a field
/// element, dividing by `x^128` in the process.
///
/// Two folds by [`POLY`] push the low 128 bits into the high half. Only carry-less multiplies
/// and XORs on public positions are involved.
#[inline]
#[must_use]
pub fn reduce(v: [u64; 4]) -> FieldElement {
    reduce_with(v, clmul64)
}

/// [`reduce`] with the carry-less multiply supplied by the caller.
#[inline(always)]
pub(crate) fn reduce_with(v: [u64; 4], clmul: impl Fn(u64, u64) -> u128) -> FieldElement {
    let [v0, v1, v2, v3] = v;

    let (a0, a1) = split(clmul(v0, POLY));
    let b0 = v0 ^ a1;
    let b1 = v1 ^ a0;

    let (c0, c1) = split(clmul(b1, POLY));
    FieldElement::from_halves(v2 ^ b0 ^ c0, v3 ^ b1 ^ c1)
}
