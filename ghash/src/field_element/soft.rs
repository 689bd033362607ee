//! Portable constant-time carry-less multiplication.
//!
//! Method described at: <https://www.bearssl.org/constanttime.html#ghash-for-gcm>
//!
//! Integer multiplication is used with "holes" in the operands so carries never reach a bit the
//! result keeps. No table lookups or secret-dependent branches are involved.

use super::{FieldElement, common, karatsuba::Twisted};
use core::num::Wrapping;

/// Multiply `a` by `b` and reduce.
#[inline]
pub(super) fn mul(a: FieldElement, b: FieldElement) -> FieldElement {
    common::mul_with(a, b, clmul64)
}

/// Compute `(y + x) * h`.
#[inline]
pub(super) fn proc_block(h: &Twisted, y: FieldElement, x: FieldElement) -> FieldElement {
    common::fold_block(h, y, x, clmul64)
}

/// Fold `N` blocks into `y` with a single reduction.
#[inline]
pub(super) fn proc_par_blocks<const N: usize>(
    powers_of_h: &[Twisted; N],
    y: FieldElement,
    blocks: &[FieldElement; N],
) -> FieldElement {
    common::fold_par_blocks(powers_of_h, y, blocks, clmul64)
}

/// Full 128-bit carry-less product of two 64-bit values.
#[inline]
pub(super) fn clmul64(x: u64, y: u64) -> u128 {
    let lo = bmul64(x, y);
    // The reflected product holds the high half shifted by one bit.
    let hi = bmul64(x.reverse_bits(), y.reverse_bits()).reverse_bits() >> 1;
    u128::from(lo) | (u128::from(hi) << 64)
}

/// Low 64 bits of the carry-less product of `x` and `y`.
///
/// Each operand is split into four masks with a set bit every fourth position. Carries from the
/// integer multiplies land in the zero bits between them and are masked away.
#[inline]
fn bmul64(x: u64, y: u64) -> u64 {
    const M0: u64 = 0x1111_1111_1111_1111;
    const M1: u64 = 0x2222_2222_2222_2222;
    const M2: u64 = 0x4444_4444_4444_4444;
    const M3: u64 = 0x8888_8888_8888_8888;

    let x0 = Wrapping(x & M0);
    let x1 = Wrapping(x & M1);
    let x2 = Wrapping(x & M2);
    let x3 = Wrapping(x & M3);

    let y0 = Wrapping(y & M0);
    let y1 = Wrapping(y & M1);
    let y2 = Wrapping(y & M2);
    let y3 = Wrapping(y & M3);

    let z0 = (x0 * y0) ^ (x1 * y3) ^ (x2 * y2) ^ (x3 * y1);
    let z1 = (x0 * y1) ^ (x1 * y0) ^ (x2 * y3) ^ (x3 * y2);
    let z2 = (x0 * y2) ^ (x1 * y1) ^ (x2 * y0) ^ (x3 * y3);
    let z3 = (x0 * y3) ^ (x1 * y2) ^ (x2 * y1) ^ (x3 * y0);

    (z0.0 & M0) | (z1.0 & M1) | (z2.0 & M2) | (z3.0 & M3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Shift-and-add carry-less multiply.
    fn clmul64_naive(x: u64, y: u64) -> u128 {
        (0..64)
            .filter(|i| (y >> i) & 1 == 1)
            .fold(0u128, |acc, i| acc ^ (u128::from(x) << i))
    }

    #[test]
    fn clmul64_small() {
        assert_eq!(clmul64(0b11, 0b11), 0b101);
        assert_eq!(clmul64(0, u64::MAX), 0);
        assert_eq!(clmul64(1 << 63, 1 << 63), 1 << 126);
    }

    #[test]
    fn clmul64_all_ones() {
        assert_eq!(clmul64(u64::MAX, u64::MAX), clmul64_naive(u64::MAX, u64::MAX));
    }

    proptest! {
        #[test]
        fn clmul64_matches_naive(x in any::<u64>(), y in any::<u64>()) {
            prop_assert_eq!(clmul64(x, y), clmul64_naive(x, y));
        }

        #[test]
        fn par_blocks_match_serial(
            h in any::<u128>(),
            y in any::<u128>(),
            blocks in any::<[u128; 4]>(),
        ) {
            let h = FieldElement::from(h);
            let powers = [h * h * h * h, h * h * h, h * h, h].map(Twisted::from);
            let blocks = blocks.map(FieldElement::from);

            let serial = blocks
                .iter()
                .fold(FieldElement::from(y), |acc, &x| proc_block(&Twisted::from(h), acc, x));
            let par = proc_par_blocks(&powers, FieldElement::from(y), &blocks);

            prop_assert_eq!(u128::from(par), u128::from(serial));
        }
    }
}
