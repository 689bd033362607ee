//! GHASH field element implementation.

mod common;
mod karatsuba;
mod reduce;
mod soft;

#[cfg(any(test, feature = "hazmat"))]
pub use karatsuba::schoolbook;
pub use karatsuba::Product;
pub use reduce::reduce;

use crate::{BLOCK_SIZE, Block};
use cfg_if::cfg_if;
use core::{
    fmt::{self, Debug},
    ops::{Add, Mul, MulAssign},
};
use karatsuba::Twisted;
use zeroize::Zeroize;

/// An element in GF(2^128).
///
/// # Representation
///
/// GHASH defines its field elements with a "bit-reflected" convention: the first bit of the first
/// byte of a block is the coefficient of `x^0`. This type stores the byte-reversal of that block,
/// read as a little-endian 128-bit integer, which is the representation POLYVAL uses
/// ([RFC8452 Appendix A]). In this form the reduction polynomial's folding constant is `0xC2` in
/// the top byte, and carry-less multiplication maps directly onto `PCLMULQDQ`/`PMULL`.
///
/// Multiplication implemented by [`Mul`] is the POLYVAL "dot" product, i.e. `a * b * x^-128`.
/// GHASH compensates for the `x^-128` factor by pre-multiplying `H` by `x` (see
/// [`FieldElement::mulx`]).
///
/// [RFC8452 Appendix A]: https://tools.ietf.org/html/rfc8452#appendix-A
#[derive(Clone, Copy, Default)]
#[cfg_attr(test, derive(Eq, PartialEq))]
#[repr(C, align(16))] // Make ABI and alignment compatible with SIMD registers
pub struct FieldElement([u8; BLOCK_SIZE]);

impl FieldElement {
    /// Reverse this field element at a byte-level of granularity.
    ///
    /// Converts between GHASH's block byte order and the internal representation.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Multiply this field element by `x`, reducing modulo the field polynomial.
    #[must_use]
    pub fn mulx(self) -> Self {
        let v = u128::from(self);
        let v_hi = v >> 127;
        ((v << 1) ^ v_hi ^ (v_hi << 127) ^ (v_hi << 126) ^ (v_hi << 121)).into()
    }

    /// Split into the low and high 64-bit halves.
    #[inline]
    pub(crate) fn halves(self) -> (u64, u64) {
        split(u128::from(self))
    }

    /// Assemble from low and high 64-bit halves.
    #[inline]
    pub(crate) fn from_halves(lo: u64, hi: u64) -> Self {
        (u128::from(lo) | (u128::from(hi) << 64)).into()
    }
}

/// Split a 128-bit value into its low and high 64-bit halves.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn split(x: u128) -> (u64, u64) {
    (x as u64, (x >> 64) as u64)
}

/// Powers of the hash key `H^N, ..., H^1`, stored in reverse order so that block `i` of a batch of
/// `N` is multiplied by `H^(N-i)`.
///
/// Each power is kept with its Karatsuba middle operand precomputed.
#[derive(Clone)]
pub(crate) struct PowersOfH<const N: usize> {
    twisted: [Twisted; N],
}

impl<const N: usize> PowersOfH<N> {
    fn from_elems(elems: [FieldElement; N]) -> Self {
        Self {
            twisted: elems.map(Twisted::from),
        }
    }

    /// `H^1`.
    #[inline]
    fn h_twisted(&self) -> &Twisted {
        &self.twisted[N - 1]
    }
}

impl<const N: usize> Zeroize for PowersOfH<N> {
    fn zeroize(&mut self) {
        self.twisted.zeroize();
    }
}

cfg_if! {
    if #[cfg(all(target_arch = "aarch64", not(ghash_backend = "soft")))] {
        // aarch64
        mod autodetect;
        mod armv8;
        pub(crate) use autodetect::{InitToken, init_intrinsics};
    } else if #[cfg(all(
        any(target_arch = "x86_64", target_arch = "x86"),
        not(ghash_backend = "soft")
    ))] {
        // x86/x86-64
        mod autodetect;
        mod x86;
        pub(crate) use autodetect::{InitToken, init_intrinsics};
    } else {
        // "soft" fallback implementation for other targets written in pure Rust

        // Stub intrinsics "detection"
        pub(crate) type InitToken = ();
        pub(crate) fn init_intrinsics() {}

        impl<const N: usize> PowersOfH<N> {
            /// Compute the first `N` powers of `h`.
            pub(crate) fn new(h: FieldElement, _has_intrinsics: InitToken) -> Self {
                Self::from_elems(common::powers_of_h(h, soft::mul))
            }

            /// Process an individual block.
            pub(crate) fn proc_block(
                &self,
                y: FieldElement,
                x: FieldElement,
                _has_intrinsics: InitToken,
            ) -> FieldElement {
                soft::proc_block(self.h_twisted(), y, x)
            }

            /// Process `N` blocks with a single reduction.
            pub(crate) fn proc_par_blocks(
                &self,
                y: FieldElement,
                blocks: &[FieldElement; N],
                _has_intrinsics: InitToken,
            ) -> FieldElement {
                soft::proc_par_blocks(&self.twisted, y, blocks)
            }
        }
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl From<Block> for FieldElement {
    #[inline]
    fn from(block: Block) -> Self {
        Self(block.into())
    }
}

impl From<&Block> for FieldElement {
    #[inline]
    fn from(block: &Block) -> Self {
        Self::from(*block)
    }
}

impl From<FieldElement> for Block {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        fe.0.into()
    }
}

impl From<[u8; BLOCK_SIZE]> for FieldElement {
    #[inline]
    fn from(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<FieldElement> for [u8; BLOCK_SIZE] {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        fe.0
    }
}

impl From<u128> for FieldElement {
    #[inline]
    fn from(x: u128) -> Self {
        Self(x.to_le_bytes())
    }
}

impl From<FieldElement> for u128 {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        u128::from_le_bytes(fe.0)
    }
}

impl Add for FieldElement {
    type Output = Self;

    /// Adds two field elements.
    ///
    /// In a binary field, addition is the equivalent operation to XOR.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        (u128::from(self) ^ u128::from(rhs)).into()
    }
}

impl Mul for FieldElement {
    type Output = Self;

    /// Carry-less Karatsuba multiplication followed by reduction.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        reduce(Product::mul(self, rhs).combine())
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
