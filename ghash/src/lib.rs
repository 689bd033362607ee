//! **GHASH**: universal hash over GF(2^128) used by AES-GCM for message
//! authentication (i.e. GMAC).
//!
//! ## Implementation Notes
//!
//! Field arithmetic is carried out in the byte-reversed representation used by
//! POLYVAL (RFC 8452), where the reduction polynomial is the "reverse" of
//! GHASH's and carry-less multiplication instructions apply directly. Each
//! input block is byte-reversed on the way in and the result on the way out.
//!
//! From RFC 8452 Appendix A:
//! <https://tools.ietf.org/html/rfc8452#appendix-A>
//!
//! > GHASH and POLYVAL both operate in GF(2^128), although with different
//! > irreducible polynomials: POLYVAL works modulo x^128 + x^127 + x^126 +
//! > x^121 + 1 and GHASH works modulo x^128 + x^7 + x^2 + x + 1.  Note
//! > that these irreducible polynomials are the "reverse" of each other.
//!
//! Runs of [`PAR_BLOCKS`] blocks are folded with precomputed powers of `H`
//! and a single reduction. On x86/x86_64 CPUs with `PCLMULQDQ` and ARMv8 CPUs
//! with `PMULL` the multiplies use those instructions; elsewhere a portable
//! constant-time implementation is used. Build with
//! `RUSTFLAGS='--cfg ghash_backend="soft"'` to force the portable path.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]

#[cfg(feature = "hazmat")]
pub mod hazmat;

mod field_element;

pub use universal_hash;

use crate::field_element::{FieldElement, InitToken, PowersOfH, init_intrinsics};
use universal_hash::{
    KeyInit, Reset, UhfBackend, UhfClosure, UniversalHash,
    common::{BlockSizeUser, KeySizeUser, ParBlocksSizeUser},
    consts::{U8, U16},
};
use zeroize::Zeroize;

/// Size of a GHASH block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Size of a GHASH key in bytes
pub const KEY_SIZE: usize = 16;

/// Number of blocks folded per reduction
pub const PAR_BLOCKS: usize = 8;

/// GHASH keys (16-bytes)
pub type Key = universal_hash::Key<GHash>;

/// GHASH blocks (16-bytes)
pub type Block = universal_hash::Block<GHash>;

/// GHASH parallel blocks (8 x 16-bytes)
pub type ParBlocks = universal_hash::ParBlocks<GHash>;

/// GHASH tags (16-bytes)
pub type Tag = universal_hash::Block<GHash>;

/// **GHASH**: universal hash over GF(2^128) used by AES-GCM.
///
/// The accumulator `Y` starts at zero and each block `X` updates it to
/// `Y = (Y ⊕ X) • H`. Callers are responsible for padding partial blocks
/// (see [`UniversalHash::update_padded`]).
#[derive(Clone)]
pub struct GHash {
    /// `H^8, ..., H^1` in the internal representation.
    powers: PowersOfH<PAR_BLOCKS>,

    /// Running accumulator.
    y: FieldElement,

    /// CPU feature detection result accessor.
    has_intrinsics: InitToken,
}

impl GHash {
    /// Initialize GHASH with the given `H` field element (i.e. hash key).
    #[must_use]
    pub fn new(h: &Key) -> Self {
        let has_intrinsics = init_intrinsics();

        let mut h = FieldElement::from(h);
        h.reverse();
        let mut h_polyval = h.mulx();
        h.zeroize();

        let powers = PowersOfH::new(h_polyval, has_intrinsics);
        h_polyval.zeroize();

        Self {
            powers,
            y: FieldElement::default(),
            has_intrinsics,
        }
    }
}

impl KeyInit for GHash {
    #[inline]
    fn new(h: &Key) -> Self {
        Self::new(h)
    }
}

impl KeySizeUser for GHash {
    type KeySize = U16;
}

impl BlockSizeUser for GHash {
    type BlockSize = U16;
}

impl ParBlocksSizeUser for GHash {
    type ParBlocksSize = U8;
}

impl UhfBackend for GHash {
    fn proc_block(&mut self, block: &Block) {
        let mut x = FieldElement::from(block);
        x.reverse();
        self.y = self.powers.proc_block(self.y, x, self.has_intrinsics);
    }

    fn proc_par_blocks(&mut self, blocks: &ParBlocks) {
        let mut xs = [FieldElement::default(); PAR_BLOCKS];
        for (x, block) in xs.iter_mut().zip(blocks.iter()) {
            *x = FieldElement::from(block);
            x.reverse();
        }

        self.y = self.powers.proc_par_blocks(self.y, &xs, self.has_intrinsics);
        xs.zeroize();
    }
}

impl UniversalHash for GHash {
    fn update_with_backend(&mut self, f: impl UhfClosure<BlockSize = Self::BlockSize>) {
        f.call(self);
    }

    /// Get GHASH output
    #[inline]
    fn finalize(self) -> Tag {
        let mut output = self.y;
        output.reverse();
        output.into()
    }
}

impl Reset for GHash {
    fn reset(&mut self) {
        self.y = FieldElement::default();
    }
}

impl Drop for GHash {
    fn drop(&mut self) {
        self.powers.zeroize();
        self.y.zeroize();
    }
}

opaque_debug::implement!(GHash);

#[cfg(test)]
mod tests {
    use crate::{BLOCK_SIZE, GHash, universal_hash::UniversalHash};
    use hex_literal::hex;

    //
    // Test vectors for GHASH from RFC 8452 Appendix A
    // <https://tools.ietf.org/html/rfc8452#appendix-A>
    //

    const H: [u8; BLOCK_SIZE] = hex!("25629347589242761d31f826ba4b757b");
    const X_1: [u8; BLOCK_SIZE] = hex!("4f4f95668c83dfb6401762bb2d01a262");
    const X_2: [u8; BLOCK_SIZE] = hex!("d1a24ddd2721d006bbe45f20d3c9f362");

    /// GHASH(H, X_1, X_2)
    const GHASH_RESULT: [u8; BLOCK_SIZE] = hex!("bd9b3997046731fb96251b91f9c99d7a");

    #[test]
    fn ghash_test_vector() {
        let mut ghash = GHash::new(&H.into());
        ghash.update(&[X_1.into(), X_2.into()]);

        let result = ghash.finalize();
        assert_eq!(&GHASH_RESULT[..], result.as_slice());
    }

    #[test]
    fn empty_input_is_zero() {
        let ghash = GHash::new(&H.into());
        assert_eq!(ghash.finalize().as_slice(), &[0u8; BLOCK_SIZE]);
    }
}
