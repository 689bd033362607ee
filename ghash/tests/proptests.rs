//! Property-based tests.

#![cfg(any(unix, windows))]

use ghash::{BLOCK_SIZE, GHash, KEY_SIZE, universal_hash::UniversalHash};
use proptest::prelude::*;

/// Bit-by-bit multiplication in GHASH's field (NIST SP 800-38D, Algorithm 1).
fn gf128_mul(x: u128, y: u128) -> u128 {
    const R: u128 = 0xE1 << 120;

    let mut z = 0;
    let mut v = y;
    for i in 0..128 {
        if (x >> (127 - i)) & 1 == 1 {
            z ^= v;
        }
        v = if v & 1 == 1 { (v >> 1) ^ R } else { v >> 1 };
    }
    z
}

/// GHASH over zero-padded `data` computed with [`gf128_mul`].
fn ghash_reference(key: [u8; KEY_SIZE], data: &[u8]) -> [u8; BLOCK_SIZE] {
    let h = u128::from_be_bytes(key);
    let mut y = 0;
    for chunk in data.chunks(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block[..chunk.len()].copy_from_slice(chunk);
        y = gf128_mul(y ^ u128::from_be_bytes(block), h);
    }
    y.to_be_bytes()
}

proptest! {
    #[test]
    fn matches_bitwise_reference(
        key in any::<[u8; KEY_SIZE]>(),
        data in prop::collection::vec(any::<u8>(), 0..400),
    ) {
        let mut ghash = GHash::new(&key.into());
        ghash.update_padded(&data);
        let actual = ghash.finalize();

        prop_assert_eq!(actual.as_slice(), &ghash_reference(key, &data)[..]);
    }

    #[test]
    fn split_updates_agree(
        key in any::<[u8; KEY_SIZE]>(),
        blocks in prop::collection::vec(any::<[u8; BLOCK_SIZE]>(), 0..40),
        split in any::<prop::sample::Index>(),
    ) {
        let blocks = blocks.into_iter().map(Into::into).collect::<Vec<_>>();
        let at = if blocks.is_empty() { 0 } else { split.index(blocks.len()) };

        let mut whole = GHash::new(&key.into());
        whole.update(&blocks);

        let mut parts = GHash::new(&key.into());
        parts.update(&blocks[..at]);
        parts.update(&blocks[at..]);

        prop_assert_eq!(whole.finalize(), parts.finalize());
    }
}

#[cfg(feature = "hazmat")]
mod hazmat {
    use super::*;
    use ghash::{
        Block,
        hazmat::{FieldElement, Product, reduce, schoolbook},
    };

    fn to_fe(block: &[u8; BLOCK_SIZE]) -> FieldElement {
        let mut fe = FieldElement::from(*block);
        fe.reverse();
        fe
    }

    proptest! {
        /// The batched path agrees with folding one `FieldElement` at a time through the
        /// portable `Add`/`Mul` impls.
        #[test]
        fn par_soft_equivalence(
            key in any::<[u8; KEY_SIZE]>(),
            blocks in prop::collection::vec(any::<[u8; BLOCK_SIZE]>(), 8..=24),
        ) {
            let mut ghash = GHash::new(&key.into());
            ghash.update_padded(&blocks.concat());
            let actual = ghash.finalize();

            let h = to_fe(&key).mulx();
            let mut y = FieldElement::default();
            for block in &blocks {
                y = (y + to_fe(block)) * h;
            }
            y.reverse();

            prop_assert_eq!(actual, Block::from(y));
        }

        #[test]
        fn karatsuba_schoolbook_equivalence(a in any::<u128>(), b in any::<u128>()) {
            let (a, b) = (FieldElement::from(a), FieldElement::from(b));
            let karatsuba = Product::mul(a, b).combine();
            prop_assert_eq!(karatsuba, schoolbook(a, b));
            prop_assert_eq!(u128::from(reduce(karatsuba)), u128::from(a * b));
        }
    }
}
