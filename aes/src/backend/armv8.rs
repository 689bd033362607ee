//! ARMv8 Cryptography Extensions backend.

#![allow(unsafe_op_in_unsafe_fn)]

use crate::{Block, RoundKeys, key_schedule::MAX_ROUNDS};
use core::arch::aarch64::*;

/// Encrypt each block with `AESE`/`AESMC`.
///
/// `AESE` performs AddRoundKey before SubBytes and ShiftRows, so the last round key is applied
/// with a plain XOR.
///
/// # Safety
/// It is the caller's responsibility to ensure the host CPU supports the AES extension.
#[target_feature(enable = "aes,neon")]
pub(super) unsafe fn encrypt_blocks(round_keys: &RoundKeys, blocks: &mut [Block]) {
    let rounds = round_keys.rounds();
    let mut rk = [vdupq_n_u8(0); MAX_ROUNDS + 1];
    for (dst, src) in rk.iter_mut().zip(round_keys.as_slice()) {
        *dst = vld1q_u8(src.as_ptr());
    }

    for block in blocks {
        let mut state = vld1q_u8(block.as_ptr());
        for k in &rk[..rounds - 1] {
            state = vaesmcq_u8(vaeseq_u8(state, *k));
        }
        state = vaeseq_u8(state, rk[rounds - 1]);
        state = veorq_u8(state, rk[rounds]);
        vst1q_u8(block.as_mut_ptr(), state);
    }

    for k in &mut rk {
        *k = vdupq_n_u8(0);
    }
}
