//! Constant-time 64-bit bitsliced AES after BearSSL's `aes_ct64`.
//!
//! Four blocks are processed per pass. Eight 64-bit words hold the state with bit `k` of every
//! byte gathered into word `k`, so the S-box becomes a fixed boolean circuit and no step indexes
//! memory with secret data.

use crate::{BLOCK_SIZE, Block, RoundKeys, key_schedule::MAX_ROUNDS};
use zeroize::Zeroize;

/// Number of blocks encrypted per bitsliced pass.
pub(crate) const PAR_BLOCKS: usize = 4;

/// Bitsliced state: eight 64-bit words.
type State = [u64; 8];

/// Round keys in bitsliced form, one [`State`] per round key.
#[derive(Clone, Default)]
pub(crate) struct BitslicedKeys {
    keys: [State; MAX_ROUNDS + 1],
    rounds: usize,
}

impl BitslicedKeys {
    pub(crate) fn new(round_keys: &RoundKeys) -> Self {
        let mut keys = [State::default(); MAX_ROUNDS + 1];
        for (sk, rk) in keys.iter_mut().zip(round_keys.as_slice()) {
            // Replicate the key across all four block slots.
            let (a, b) = interleave_in(&load_words(rk));
            *sk = [a, a, a, a, b, b, b, b];
            ortho(sk);
        }

        Self {
            keys,
            rounds: round_keys.rounds(),
        }
    }
}

impl Zeroize for BitslicedKeys {
    fn zeroize(&mut self) {
        self.keys.zeroize();
    }
}

/// Encrypt `blocks` in place, [`PAR_BLOCKS`] at a time.
pub(crate) fn encrypt_blocks(keys: &BitslicedKeys, blocks: &mut [Block]) {
    for chunk in blocks.chunks_mut(PAR_BLOCKS) {
        encrypt_par(keys, chunk);
    }
}

/// Encrypt up to [`PAR_BLOCKS`] blocks in one pass. Unused slots are zero.
fn encrypt_par(keys: &BitslicedKeys, blocks: &mut [Block]) {
    debug_assert!(blocks.len() <= PAR_BLOCKS);
    let mut q = State::default();

    for (i, block) in blocks.iter().enumerate() {
        (q[i], q[i + 4]) = interleave_in(&load_words(block));
    }
    ortho(&mut q);

    add_round_key(&mut q, &keys.keys[0]);
    for rk in &keys.keys[1..keys.rounds] {
        sbox(&mut q);
        shift_rows(&mut q);
        mix_columns(&mut q);
        add_round_key(&mut q, rk);
    }
    sbox(&mut q);
    shift_rows(&mut q);
    add_round_key(&mut q, &keys.keys[keys.rounds]);

    ortho(&mut q);
    for (i, block) in blocks.iter_mut().enumerate() {
        store_words(block, interleave_out(q[i], q[i + 4]));
    }
    q.zeroize();
}

/// `SubWord` from the key schedule: the S-box applied to each byte of `x`.
pub(crate) fn sub_word(x: u32) -> u32 {
    let mut q = State::default();
    q[0] = u64::from(x);
    ortho(&mut q);
    sbox(&mut q);
    ortho(&mut q);

    #[allow(clippy::cast_possible_truncation)]
    let out = q[0] as u32;
    q.zeroize();
    out
}

fn load_words(block: &[u8; BLOCK_SIZE]) -> [u32; 4] {
    core::array::from_fn(|i| {
        u32::from_le_bytes([
            block[4 * i],
            block[4 * i + 1],
            block[4 * i + 2],
            block[4 * i + 3],
        ])
    })
}

fn store_words(block: &mut [u8; BLOCK_SIZE], words: [u32; 4]) {
    for (bytes, word) in block.chunks_exact_mut(4).zip(words) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
}

#[inline(always)]
fn add_round_key(q: &mut State, rk: &State) {
    for (x, k) in q.iter_mut().zip(rk) {
        *x ^= k;
    }
}

/// Spread the bytes of one block over two words.
///
/// With input bytes `0123456789ABCDEF` read as little-endian words, the outputs are `08192A3B`
/// and `4C5D6E7F`.
#[inline(always)]
fn interleave_in(w: &[u32; 4]) -> (u64, u64) {
    let [x0, x1, x2, x3] = w.map(|x| {
        let mut x = u64::from(x);
        x |= x << 16;
        x &= 0x0000_FFFF_0000_FFFF;
        x |= x << 8;
        x & 0x00FF_00FF_00FF_00FF
    });
    (x0 | (x2 << 8), x1 | (x3 << 8))
}

/// Inverse of [`interleave_in`].
#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
fn interleave_out(q0: u64, q1: u64) -> [u32; 4] {
    [q0, q1, q0 >> 8, q1 >> 8].map(|x| {
        let mut x = x & 0x00FF_00FF_00FF_00FF;
        x |= x >> 8;
        x &= 0x0000_FFFF_0000_FFFF;
        (x as u32) | ((x >> 16) as u32)
    })
}

/// Exchange the bits of `q[i]` selected by `mask << shift` with the bits of `q[j]` selected by
/// `mask`.
#[inline(always)]
fn swap_bits(q: &mut State, i: usize, j: usize, mask: u64, shift: u32) {
    let (a, b) = (q[i], q[j]);
    let hi = mask << shift;
    q[i] = (a & mask) | ((b & mask) << shift);
    q[j] = ((a & hi) >> shift) | (b & hi);
}

/// Bytewise orthogonalization: bit `k` of the byte at rank `i` in `q[j]` moves to `q[k]` at rank
/// `8*i + j`.
///
/// This is an involution.
#[inline(always)]
fn ortho(q: &mut State) {
    for (i, j) in [(0, 1), (2, 3), (4, 5), (6, 7)] {
        swap_bits(q, i, j, 0x5555_5555_5555_5555, 1);
    }
    for (i, j) in [(0, 2), (1, 3), (4, 6), (5, 7)] {
        swap_bits(q, i, j, 0x3333_3333_3333_3333, 2);
    }
    for (i, j) in [(0, 4), (1, 5), (2, 6), (3, 7)] {
        swap_bits(q, i, j, 0x0F0F_0F0F_0F0F_0F0F, 4);
    }
}

#[inline(always)]
fn shift_rows(q: &mut State) {
    for x in q {
        *x = (*x & 0x0000_0000_0000_FFFF)
            | ((*x & 0x0000_0000_FFF0_0000) >> 4)
            | ((*x & 0x0000_0000_000F_0000) << 12)
            | ((*x & 0x0000_FF00_0000_0000) >> 8)
            | ((*x & 0x0000_00FF_0000_0000) << 8)
            | ((*x & 0xF000_0000_0000_0000) >> 12)
            | ((*x & 0x0FFF_0000_0000_0000) << 4);
    }
}

#[inline(always)]
fn mix_columns(q: &mut State) {
    let r = q.map(|x| x.rotate_left(48));
    let s: State = core::array::from_fn(|i| q[i] ^ r[i]);

    for i in 0..8 {
        let mut x = r[i] ^ s[i].rotate_right(32);
        x ^= if i == 0 { s[7] } else { s[i - 1] };
        // xtime: the carry out of bit 7 folds back in through 0x1b
        if matches!(i, 1 | 3 | 4) {
            x ^= s[7];
        }
        q[i] = x;
    }
}

/// Bitsliced AES S-box (Boyar–Peralta circuit).
///
/// Bit `k` of each of the 64 S-box inputs lives in `q[k]` at the same rank.
#[inline(always)]
fn sbox(q: &mut State) {
    let x0 = q[7];
    let x1 = q[6];
    let x2 = q[5];
    let x3 = q[4];
    let x4 = q[3];
    let x5 = q[2];
    let x6 = q[1];
    let x7 = q[0];

    // Top linear transformation
    let y14 = x3 ^ x5;
    let y13 = x0 ^ x6;
    let y9 = x0 ^ x3;
    let y8 = x0 ^ x5;
    let t0 = x1 ^ x2;
    let y1 = t0 ^ x7;
    let y4 = y1 ^ x3;
    let y12 = y13 ^ y14;
    let y2 = y1 ^ x0;
    let y5 = y1 ^ x6;
    let y3 = y5 ^ y8;
    let t1 = x4 ^ y12;
    let y15 = t1 ^ x5;
    let y20 = t1 ^ x1;
    let y6 = y15 ^ x7;
    let y10 = y15 ^ t0;
    let y11 = y20 ^ y9;
    let y7 = x7 ^ y11;
    let y17 = y10 ^ y11;
    let y19 = y10 ^ y8;
    let y16 = t0 ^ y11;
    let y21 = y13 ^ y16;
    let y18 = x0 ^ y16;

    // Non-linear section
    let t2 = y12 & y15;
    let t3 = y3 & y6;
    let t4 = t3 ^ t2;
    let t5 = y4 & x7;
    let t6 = t5 ^ t2;
    let t7 = y13 & y16;
    let t8 = y5 & y1;
    let t9 = t8 ^ t7;
    let t10 = y2 & y7;
    let t11 = t10 ^ t7;
    let t12 = y9 & y11;
    let t13 = y14 & y17;
    let t14 = t13 ^ t12;
    let t15 = y8 & y10;
    let t16 = t15 ^ t12;
    let t17 = t4 ^ t14;
    let t18 = t6 ^ t16;
    let t19 = t9 ^ t14;
    let t20 = t11 ^ t16;
    let t21 = t17 ^ y20;
    let t22 = t18 ^ y19;
    let t23 = t19 ^ y21;
    let t24 = t20 ^ y18;

    let t25 = t21 ^ t22;
    let t26 = t21 & t23;
    let t27 = t24 ^ t26;
    let t28 = t25 & t27;
    let t29 = t28 ^ t22;
    let t30 = t23 ^ t24;
    let t31 = t22 ^ t26;
    let t32 = t31 & t30;
    let t33 = t32 ^ t24;
    let t34 = t23 ^ t33;
    let t35 = t27 ^ t33;
    let t36 = t24 & t35;
    let t37 = t36 ^ t34;
    let t38 = t27 ^ t36;
    let t39 = t29 & t38;
    let t40 = t25 ^ t39;

    let t41 = t40 ^ t37;
    let t42 = t29 ^ t33;
    let t43 = t29 ^ t40;
    let t44 = t33 ^ t37;
    let t45 = t42 ^ t41;
    let z0 = t44 & y15;
    let z1 = t37 & y6;
    let z2 = t33 & x7;
    let z3 = t43 & y16;
    let z4 = t40 & y1;
    let z5 = t29 & y7;
    let z6 = t42 & y11;
    let z7 = t45 & y17;
    let z8 = t41 & y10;
    let z9 = t44 & y12;
    let z10 = t37 & y3;
    let z11 = t33 & y4;
    let z12 = t43 & y13;
    let z13 = t40 & y5;
    let z14 = t29 & y2;
    let z15 = t42 & y9;
    let z16 = t45 & y14;
    let z17 = t41 & y8;

    // Bottom linear transformation
    let t46 = z15 ^ z16;
    let t47 = z10 ^ z11;
    let t48 = z5 ^ z13;
    let t49 = z9 ^ z10;
    let t50 = z2 ^ z12;
    let t51 = z2 ^ z5;
    let t52 = z7 ^ z8;
    let t53 = z0 ^ z3;
    let t54 = z6 ^ z7;
    let t55 = z16 ^ z17;
    let t56 = z12 ^ t48;
    let t57 = t50 ^ t53;
    let t58 = z4 ^ t46;
    let t59 = z3 ^ t54;
    let t60 = t46 ^ t57;
    let t61 = z14 ^ t57;
    let t62 = t52 ^ t58;
    let t63 = t49 ^ t58;
    let t64 = z4 ^ t59;
    let t65 = t61 ^ t62;
    let t66 = z1 ^ t63;
    let s0 = t59 ^ t63;
    let s6 = t56 ^ !t62;
    let s7 = t48 ^ !t60;
    let t67 = t64 ^ t65;
    let s3 = t53 ^ t66;
    let s4 = t51 ^ t66;
    let s5 = t47 ^ t65;
    let s1 = t64 ^ !s3;
    let s2 = t55 ^ !t67;

    *q = [s7, s6, s5, s4, s3, s2, s1, s0];
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    /// First row of the FIPS-197 S-box table.
    const SBOX_ROW0: [u8; 16] = hex!("637c777bf26b6fc53001672bfed7ab76");

    #[test]
    fn sub_word_matches_table() {
        for (i, chunk) in SBOX_ROW0.chunks_exact(4).enumerate() {
            let base = 4 * i as u8;
            let x = u32::from_le_bytes([base, base + 1, base + 2, base + 3]);
            let expected = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            assert_eq!(sub_word(x), expected);
        }
    }

    #[test]
    fn sub_word_known_bytes() {
        // S(0x53) = 0xed, S(0xff) = 0x16, S(0x10) = 0xca, S(0x01) = 0x7c
        assert_eq!(
            sub_word(u32::from_le_bytes([0x53, 0xff, 0x10, 0x01])),
            u32::from_le_bytes([0xed, 0x16, 0xca, 0x7c])
        );
    }

    #[test]
    fn fips197_appendix_b() {
        let round_keys = RoundKeys::expand(&hex!("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
        let keys = BitslicedKeys::new(&round_keys);
        let mut blocks = [hex!("3243f6a8885a308d313198a2e0370734")];
        encrypt_blocks(&keys, &mut blocks);
        assert_eq!(blocks[0], hex!("3925841d02dc09fbdc118597196a0b32"));
    }

    proptest! {
        #[test]
        fn ortho_is_involution(q in any::<[u64; 8]>()) {
            let mut r = q;
            ortho(&mut r);
            ortho(&mut r);
            prop_assert_eq!(r, q);
        }

        #[test]
        fn interleave_round_trips(w in any::<[u32; 4]>()) {
            let (q0, q1) = interleave_in(&w);
            prop_assert_eq!(interleave_out(q0, q1), w);
        }

        #[test]
        fn slots_are_independent(
            key in any::<[u8; 16]>(),
            blocks in any::<[[u8; 16]; 4]>(),
        ) {
            let keys = BitslicedKeys::new(&RoundKeys::expand(&key).unwrap());

            let mut batch = blocks;
            encrypt_blocks(&keys, &mut batch);

            for (i, block) in blocks.iter().enumerate() {
                let mut single = [*block];
                encrypt_blocks(&keys, &mut single);
                prop_assert_eq!(single[0], batch[i]);
            }
        }
    }
}
