//! Field operations shared by every backend.
//!
//! Each function takes the 64x64 carry-less multiply as a parameter. The portable backend passes
//! its masked-integer multiply; the SIMD backends pass `PCLMULQDQ`/`PMULL` from inside their
//! `#[target_feature]` functions, so the Karatsuba split and the reduction exist only once.

use super::{
    FieldElement,
    karatsuba::{Product, Twisted},
    reduce::reduce_with,
};

/// Compute `[H^N, ..., H^2, H^1]` with the supplied multiplication.
#[inline]
pub(super) fn powers_of_h<T, const N: usize>(h: T, mul: impl Fn(T, T) -> T) -> [T; N]
where
    T: Copy,
{
    let mut powers = [h; N];
    for i in (0..N.saturating_sub(1)).rev() {
        powers[i] = mul(powers[i + 1], h);
    }
    powers
}

/// `a * b`, reduced.
#[inline(always)]
pub(super) fn mul_with(
    a: FieldElement,
    b: FieldElement,
    clmul: impl Fn(u64, u64) -> u128 + Copy,
) -> FieldElement {
    reduce_with(
        Product::karatsuba_with(a, &Twisted::from(b), clmul).combine(),
        clmul,
    )
}

/// `(y + x) * h`.
#[inline(always)]
pub(super) fn fold_block(
    h: &Twisted,
    y: FieldElement,
    x: FieldElement,
    clmul: impl Fn(u64, u64) -> u128 + Copy,
) -> FieldElement {
    reduce_with(Product::karatsuba_with(y + x, h, clmul).combine(), clmul)
}

/// `(y + x_0) * H^N + x_1 * H^(N-1) + ... + x_(N-1) * H`.
///
/// The products are accumulated unreduced and reduced once.
#[inline(always)]
pub(super) fn fold_par_blocks<const N: usize>(
    powers_of_h: &[Twisted; N],
    y: FieldElement,
    blocks: &[FieldElement; N],
    clmul: impl Fn(u64, u64) -> u128 + Copy,
) -> FieldElement {
    let mut acc = Product::default();

    for i in 0..N {
        let mut x = blocks[i];
        if i == 0 {
            x = x + y;
        }
        acc ^= Product::karatsuba_with(x, &powers_of_h[i], clmul);
    }

    reduce_with(acc.combine(), clmul)
}
