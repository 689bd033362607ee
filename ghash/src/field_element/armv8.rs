//! ARMv8 `PMULL`-accelerated carry-less multiplication.
//!
//! For more information about PMULL, see:
//! - <https://developer.arm.com/documentation/100069/0608/A64-SIMD-Vector-Instructions/PMULL--PMULL2--vector->
//! - <https://eprint.iacr.org/2015/688.pdf>

#![allow(unused_unsafe)]

use super::{FieldElement, common, karatsuba::Twisted};
use core::arch::aarch64::vmull_p64;

/// Multiply `a` by `b` and reduce.
///
/// # Safety
/// It is the caller's responsibility to ensure the host CPU is capable of PMULL and NEON
/// instructions.
#[target_feature(enable = "aes,neon")]
pub(super) unsafe fn mul(a: FieldElement, b: FieldElement) -> FieldElement {
    common::mul_with(a, b, |x, y| unsafe { clmul64(x, y) })
}

/// Compute `(y + x) * h`.
///
/// # Safety
/// It is the caller's responsibility to ensure the host CPU is capable of PMULL and NEON
/// instructions.
#[target_feature(enable = "aes,neon")]
pub(super) unsafe fn proc_block(h: &Twisted, y: FieldElement, x: FieldElement) -> FieldElement {
    common::fold_block(h, y, x, |a, b| unsafe { clmul64(a, b) })
}

/// Fold `N` blocks into `y` with a single reduction.
///
/// # Safety
/// It is the caller's responsibility to ensure the host CPU is capable of PMULL and NEON
/// instructions.
#[target_feature(enable = "aes,neon")]
pub(super) unsafe fn proc_par_blocks<const N: usize>(
    powers_of_h: &[Twisted; N],
    y: FieldElement,
    blocks: &[FieldElement; N],
) -> FieldElement {
    common::fold_par_blocks(powers_of_h, y, blocks, |a, b| unsafe { clmul64(a, b) })
}

/// `PMULL` on two 64-bit values.
///
/// # Safety
/// It is the caller's responsibility to ensure the host CPU is capable of PMULL and NEON
/// instructions.
#[inline]
#[target_feature(enable = "aes,neon")]
pub(super) unsafe fn clmul64(x: u64, y: u64) -> u128 {
    unsafe { vmull_p64(x, y) }
}
