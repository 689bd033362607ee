//! Intel `CLMUL`-accelerated carry-less multiplication for modern x86/x86_64 CPUs
//! (i.e. Intel Sandy Bridge-compatible or newer)
//!
//! Only the 64x64 multiply is hardware specific. The Karatsuba split and the reduction are the
//! shared ones in [`super::common`], compiled here with `pclmulqdq` enabled.

#![allow(unused_unsafe)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::{FieldElement, common, karatsuba::Twisted};

/// Multiply `a` by `b` and reduce.
///
/// # Safety
///
/// The SSE2 and pclmulqdq target features must be enabled.
#[target_feature(enable = "pclmulqdq,sse2")]
pub(super) unsafe fn mul(a: FieldElement, b: FieldElement) -> FieldElement {
    common::mul_with(a, b, |x, y| unsafe { clmul64(x, y) })
}

/// Compute `(y + x) * h`.
///
/// # Safety
///
/// The SSE2 and pclmulqdq target features must be enabled.
#[target_feature(enable = "pclmulqdq,sse2")]
pub(super) unsafe fn proc_block(h: &Twisted, y: FieldElement, x: FieldElement) -> FieldElement {
    common::fold_block(h, y, x, |a, b| unsafe { clmul64(a, b) })
}

/// Fold `N` blocks into `y`, accumulating unreduced products and reducing once.
///
/// # Safety
///
/// The SSE2 and pclmulqdq target features must be enabled.
#[target_feature(enable = "pclmulqdq,sse2")]
pub(super) unsafe fn proc_par_blocks<const N: usize>(
    powers_of_h: &[Twisted; N],
    y: FieldElement,
    blocks: &[FieldElement; N],
) -> FieldElement {
    common::fold_par_blocks(powers_of_h, y, blocks, |a, b| unsafe { clmul64(a, b) })
}

/// Full 128-bit carry-less product of two 64-bit values.
///
/// # Safety
///
/// The SSE2 and pclmulqdq target features must be enabled.
#[inline]
#[target_feature(enable = "pclmulqdq,sse2")]
pub(super) unsafe fn clmul64(x: u64, y: u64) -> u128 {
    let x = u128::from(x).to_le_bytes();
    let y = u128::from(y).to_le_bytes();
    let mut out = [0u8; 16];

    unsafe {
        let product = _mm_clmulepi64_si128(
            _mm_loadu_si128(x.as_ptr().cast()),
            _mm_loadu_si128(y.as_ptr().cast()),
            0x00,
        );
        _mm_storeu_si128(out.as_mut_ptr().cast(), product);
    }

    u128::from_le_bytes(out)
}
