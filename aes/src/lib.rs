//! AES block encryption (FIPS-197) for 128, 192 and 256-bit keys.
//!
//! Only the forward cipher is provided: it is all that counter-mode constructions such as
//! AES-GCM need.
//!
//! ## Backends
//!
//! - **soft**: portable 64-bit bitsliced implementation after BearSSL's `aes_ct64`. Encrypts
//!   four blocks per pass and runs in constant time with respect to key and data.
//! - **AES-NI** on x86/x86_64 and the **ARMv8 Cryptography Extensions** on aarch64, selected
//!   at runtime with `cpufeatures`.
//!
//! Build with `RUSTFLAGS='--cfg aes_backend="soft"'` to force the portable backend.
//!
//! # Usage
//!
//! ```
//! use aes::Aes;
//! use hex_literal::hex;
//!
//! let cipher = Aes::new(&hex!("000102030405060708090a0b0c0d0e0f")).unwrap();
//! let mut block = hex!("00112233445566778899aabbccddeeff");
//! cipher.encrypt_block(&mut block);
//! assert_eq!(block, hex!("69c4e0d86a7b0430d8cdb78070b4c55a"));
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]

mod backend;
mod error;
mod key_schedule;

pub use crate::{
    error::InvalidKeyLength,
    key_schedule::{KeySize, RoundKeys},
};

use crate::backend::{InitToken, soft::BitslicedKeys};
use zeroize::Zeroize;

/// Size of an AES block in bytes
pub const BLOCK_SIZE: usize = 16;

/// AES block (16-bytes)
pub type Block = [u8; BLOCK_SIZE];

/// AES block cipher keyed with a 128, 192 or 256-bit key.
///
/// Encryption takes `&self`, so one instance can be shared between threads.
#[derive(Clone)]
pub struct Aes {
    /// Round keys in FIPS-197 byte order, used by the hardware backends.
    round_keys: RoundKeys,

    /// Round keys for the bitsliced backend; left zeroed when intrinsics are available.
    bitsliced: BitslicedKeys,

    /// CPU feature detection result accessor.
    has_intrinsics: InitToken,
}

impl Aes {
    /// Expand `key` for encryption.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes long.
    pub fn new(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        let has_intrinsics = backend::init_intrinsics();
        let round_keys = RoundKeys::expand(key)?;

        let bitsliced = if backend::has_intrinsics(has_intrinsics) {
            BitslicedKeys::default()
        } else {
            BitslicedKeys::new(&round_keys)
        };

        Ok(Self {
            round_keys,
            bitsliced,
            has_intrinsics,
        })
    }

    /// AES variant selected by the key length.
    #[must_use]
    pub fn key_size(&self) -> KeySize {
        self.round_keys.key_size()
    }

    /// Encrypt a single block in place.
    pub fn encrypt_block(&self, block: &mut Block) {
        self.encrypt_blocks(core::slice::from_mut(block));
    }

    /// Encrypt a run of independent blocks in place.
    ///
    /// Equivalent to calling [`Aes::encrypt_block`] on each, but lets the bitsliced backend
    /// fill all four of its lanes.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        backend::encrypt_blocks(
            &self.round_keys,
            &self.bitsliced,
            blocks,
            self.has_intrinsics,
        );
    }
}

impl Drop for Aes {
    fn drop(&mut self) {
        self.bitsliced.zeroize();
    }
}

opaque_debug::implement!(Aes);

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rejects_bad_key_lengths() {
        for len in [0, 1, 15, 17, 23, 25, 31, 33, 64] {
            assert_eq!(Aes::new(&[0u8; 64][..len]).err(), Some(InvalidKeyLength(len)));
        }
    }

    #[test]
    fn key_size_reported() {
        assert_eq!(Aes::new(&[0; 16]).unwrap().key_size(), KeySize::Aes128);
        assert_eq!(Aes::new(&[0; 24]).unwrap().key_size(), KeySize::Aes192);
        assert_eq!(Aes::new(&[0; 32]).unwrap().key_size(), KeySize::Aes256);
    }

    #[test]
    fn zero_key_zero_block() {
        let mut block = [0u8; BLOCK_SIZE];
        Aes::new(&[0; 16]).unwrap().encrypt_block(&mut block);
        assert_eq!(block, hex!("66e94bd4ef8a2c3b884cfa59ca342b2e"));
    }
}
