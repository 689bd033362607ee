//! Autodetection for AES CPU intrinsics, with fallback to the bitsliced backend when they are
//! unavailable.

#[cfg(target_arch = "aarch64")]
use super::armv8 as intrinsics;
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
use super::ni as intrinsics;

use super::soft::{self, BitslicedKeys};
use crate::{Block, RoundKeys};

#[cfg(target_arch = "aarch64")]
cpufeatures::new!(detect_intrinsics, "aes");
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
cpufeatures::new!(detect_intrinsics, "aes", "sse2");

pub(crate) use detect_intrinsics::{InitToken, init as init_intrinsics};

pub(crate) fn has_intrinsics(token: InitToken) -> bool {
    token.get()
}

pub(crate) fn encrypt_blocks(
    round_keys: &RoundKeys,
    bitsliced: &BitslicedKeys,
    blocks: &mut [Block],
    token: InitToken,
) {
    if token.get() {
        // SAFETY: the CPU supports the required intrinsics
        unsafe { intrinsics::encrypt_blocks(round_keys, blocks) }
    } else {
        soft::encrypt_blocks(bitsliced, blocks);
    }
}
