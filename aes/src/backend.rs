//! AES backends.

pub(crate) mod soft;

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "aarch64", not(aes_backend = "soft")))] {
        mod armv8;
        mod autodetect;
        pub(crate) use autodetect::{InitToken, encrypt_blocks, has_intrinsics, init_intrinsics};
    } else if #[cfg(all(
        any(target_arch = "x86_64", target_arch = "x86"),
        not(aes_backend = "soft")
    ))] {
        mod ni;
        mod autodetect;
        pub(crate) use autodetect::{InitToken, encrypt_blocks, has_intrinsics, init_intrinsics};
    } else {
        use crate::{Block, RoundKeys};
        use soft::BitslicedKeys;

        // Stub intrinsics "detection"
        pub(crate) type InitToken = ();
        pub(crate) fn init_intrinsics() {}

        pub(crate) fn has_intrinsics(_token: InitToken) -> bool {
            false
        }

        pub(crate) fn encrypt_blocks(
            _round_keys: &RoundKeys,
            bitsliced: &BitslicedKeys,
            blocks: &mut [Block],
            _token: InitToken,
        ) {
            soft::encrypt_blocks(bitsliced, blocks);
        }
    }
}
