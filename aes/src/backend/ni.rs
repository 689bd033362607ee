//! AES-NI backend for x86/x86_64 CPUs.

#![allow(unsafe_op_in_unsafe_fn)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::{Block, RoundKeys, key_schedule::MAX_ROUNDS};

/// Encrypt each block with `AESENC`/`AESENCLAST`.
///
/// # Safety
///
/// The AES and SSE2 target features must be enabled.
#[target_feature(enable = "aes,sse2")]
pub(super) unsafe fn encrypt_blocks(round_keys: &RoundKeys, blocks: &mut [Block]) {
    let rounds = round_keys.rounds();
    let mut rk = [_mm_setzero_si128(); MAX_ROUNDS + 1];
    for (dst, src) in rk.iter_mut().zip(round_keys.as_slice()) {
        *dst = _mm_loadu_si128(src.as_ptr().cast());
    }

    for block in blocks {
        let mut state = _mm_loadu_si128(block.as_ptr().cast());
        state = _mm_xor_si128(state, rk[0]);
        for k in &rk[1..rounds] {
            state = _mm_aesenc_si128(state, *k);
        }
        state = _mm_aesenclast_si128(state, rk[rounds]);
        _mm_storeu_si128(block.as_mut_ptr().cast(), state);
    }

    for k in &mut rk {
        *k = _mm_setzero_si128();
    }
}
