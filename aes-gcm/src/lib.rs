//! AES-GCM authenticated encryption ([NIST SP 800-38D]) for 128, 192 and 256-bit keys.
//!
//! Built from the [`aes`] block cipher and the [`ghash`] universal hash. Both run in constant
//! time in their portable backends and switch to AES-NI/PCLMULQDQ or the ARMv8 Cryptography
//! Extensions when the CPU offers them.
//!
//! # Usage
//!
//! ```
//! # #[cfg(feature = "alloc")]
//! # {
//! use aes_gcm::AesGcm;
//!
//! let cipher = AesGcm::new(&[0x42; 32]).unwrap();
//! let nonce = [0x24; 12]; // must be unique per message under this key
//!
//! let (ciphertext, tag) = cipher.encrypt(&nonce, b"header", b"plaintext message").unwrap();
//! let plaintext = cipher.decrypt(&nonce, b"header", &ciphertext, &tag).unwrap();
//! assert_eq!(&plaintext, b"plaintext message");
//!
//! // Truncated tags are accepted in the lengths SP 800-38D permits
//! assert!(cipher.decrypt(&nonce, b"header", &ciphertext, &tag[..12]).is_ok());
//! # }
//! ```
//!
//! # Decryption
//!
//! The tag is checked over the ciphertext before any of it is decrypted, so a forged message
//! never yields plaintext and the caller's buffer is left holding the ciphertext.
//!
//! [NIST SP 800-38D]: https://csrc.nist.gov/publications/detail/sp/800-38d/final

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod esp;

mod auth;
mod ctr;
mod error;
mod nonce;

pub use crate::{ctr::Counter, error::Error};
pub use aes::{self, KeySize};
pub use ghash;

use crate::{
    auth::Authenticator,
    ctr::{CHUNK_SIZE, Keystream},
    nonce::derive_j0,
};
use aes::Aes;
use ghash::GHash;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Size of an AES block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Recommended nonce size in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Full tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Tag lengths accepted when decrypting (SP 800-38D section 5.2.1.2)
pub const TAG_SIZES: [usize; 7] = [4, 8, 12, 13, 14, 15, 16];

/// Longest plaintext in bytes: `2^39 - 256` bits
pub const MAX_PLAINTEXT_LEN: u64 = (1 << 36) - 32;

/// Longest AAD in bytes: `2^64 - 1` bits, rounded down to whole bytes
pub const MAX_AAD_LEN: u64 = (1 << 61) - 1;

/// Longest nonce in bytes
pub const MAX_NONCE_LEN: u64 = (1 << 61) - 1;

/// AES block (16-bytes)
pub type Block = [u8; BLOCK_SIZE];

/// Authentication tag (16-bytes)
pub type Tag = [u8; TAG_SIZE];

/// AES-GCM keyed with a 128, 192 or 256-bit key.
///
/// Holds the AES key schedule and the GHASH key with its precomputed powers. All operations take
/// `&self` and keep per-message state on the stack, so one instance can serve several threads.
#[derive(Clone)]
pub struct AesGcm {
    aes: Aes,
    ghash: GHash,
}

impl AesGcm {
    /// Initialize AES-GCM with the given key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes long.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let aes = Aes::new(key)?;

        let mut h = [0u8; BLOCK_SIZE];
        aes.encrypt_block(&mut h);
        let ghash = GHash::new(&h.into());
        h.zeroize();

        Ok(Self { aes, ghash })
    }

    /// AES variant selected by the key length.
    #[must_use]
    pub fn key_size(&self) -> KeySize {
        self.aes.key_size()
    }

    /// Encrypt `buffer` in place and return the full 16-byte tag.
    ///
    /// Truncate the tag by taking a prefix of one of the lengths in [`TAG_SIZES`].
    ///
    /// # Errors
    ///
    /// - [`Error::MessageTooLong`] if `buffer` or `aad` exceeds the GCM limits
    /// - [`Error::InvalidNonceLength`] if `nonce` is empty or too long
    ///
    /// Nothing is written to `buffer` when an error is returned.
    pub fn encrypt_in_place_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
    ) -> Result<Tag, Error> {
        check_lengths(aad, buffer)?;
        let (mut keystream, mut auth) = self.begin(nonce, aad)?;

        for chunk in buffer.chunks_mut(CHUNK_SIZE) {
            keystream.apply(chunk)?;
            auth.update(chunk);
        }

        Ok(auth.finish())
    }

    /// Verify `tag` over `buffer` and, if it matches, decrypt `buffer` in place.
    ///
    /// `tag` may be truncated to any length in [`TAG_SIZES`]. The comparison runs in constant
    /// time.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTagLength`] if `tag` has a length outside [`TAG_SIZES`]
    /// - [`Error::MessageTooLong`] if `buffer` or `aad` exceeds the GCM limits
    /// - [`Error::InvalidNonceLength`] if `nonce` is empty or too long
    /// - [`Error::Authentication`] if the tag does not match
    ///
    /// `buffer` still holds the ciphertext when an error is returned.
    pub fn decrypt_in_place_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error> {
        check_tag_len(tag)?;
        check_lengths(aad, buffer)?;
        let (mut keystream, mut auth) = self.begin(nonce, aad)?;

        auth.update(buffer);
        verify(auth.finish(), tag)?;
        keystream.apply(buffer)
    }

    /// Decrypt `buffer` in a single pass, then report whether `tag` matched.
    ///
    /// <div class="warning">
    /// The buffer holds the decrypted data even when [`Error::Authentication`] is returned.
    /// That plaintext is unauthenticated and must not be acted upon or released.
    /// </div>
    ///
    /// # Errors
    ///
    /// Same as [`AesGcm::decrypt_in_place_detached`].
    #[cfg(feature = "hazmat")]
    pub fn decrypt_in_place_unverified(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error> {
        check_tag_len(tag)?;
        check_lengths(aad, buffer)?;
        let (mut keystream, mut auth) = self.begin(nonce, aad)?;

        for chunk in buffer.chunks_mut(CHUNK_SIZE) {
            auth.update(chunk);
            keystream.apply(chunk)?;
        }

        verify(auth.finish(), tag)
    }

    /// Encrypt `plaintext` into a new buffer and return it with the full tag.
    ///
    /// # Errors
    ///
    /// Same as [`AesGcm::encrypt_in_place_detached`].
    #[cfg(feature = "alloc")]
    pub fn encrypt(
        &self,
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, Tag), Error> {
        let mut buffer = plaintext.to_vec();
        let tag = self.encrypt_in_place_detached(nonce, aad, &mut buffer)?;
        Ok((buffer, tag))
    }

    /// Verify and decrypt `ciphertext` into a new buffer.
    ///
    /// # Errors
    ///
    /// Same as [`AesGcm::decrypt_in_place_detached`].
    #[cfg(feature = "alloc")]
    pub fn decrypt(
        &self,
        nonce: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let mut buffer = ciphertext.to_vec();
        self.decrypt_in_place_detached(nonce, aad, &mut buffer, tag)?;
        Ok(buffer)
    }

    /// Derive `J0`, then set up the data keystream and an authenticator that has absorbed `aad`.
    fn begin(&self, nonce: &[u8], aad: &[u8]) -> Result<(Keystream<'_>, Authenticator), Error> {
        let j0 = derive_j0(&self.ghash, nonce)?;

        let mut tag_mask = j0;
        self.aes.encrypt_block(&mut tag_mask);

        let keystream = Keystream::new(&self.aes, Counter::after_j0(&j0));
        let auth = Authenticator::new(&self.ghash, tag_mask, aad);
        tag_mask.zeroize();

        Ok((keystream, auth))
    }
}

opaque_debug::implement!(AesGcm);

/// Encrypt `plaintext` under `key` in one call.
///
/// # Errors
///
/// See [`AesGcm::new`] and [`AesGcm::encrypt_in_place_detached`].
#[cfg(feature = "alloc")]
pub fn aes_gcm_encrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Tag), Error> {
    AesGcm::new(key)?.encrypt(nonce, aad, plaintext)
}

/// Verify and decrypt `ciphertext` under `key` in one call.
///
/// # Errors
///
/// See [`AesGcm::new`] and [`AesGcm::decrypt_in_place_detached`].
#[cfg(feature = "alloc")]
pub fn aes_gcm_decrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, Error> {
    AesGcm::new(key)?.decrypt(nonce, aad, ciphertext, tag)
}

fn check_tag_len(tag: &[u8]) -> Result<(), Error> {
    if TAG_SIZES.contains(&tag.len()) {
        Ok(())
    } else {
        Err(Error::InvalidTagLength(tag.len()))
    }
}

fn check_lengths(aad: &[u8], data: &[u8]) -> Result<(), Error> {
    if within(data.len(), MAX_PLAINTEXT_LEN) && within(aad.len(), MAX_AAD_LEN) {
        Ok(())
    } else {
        Err(Error::MessageTooLong)
    }
}

fn within(len: usize, max: u64) -> bool {
    u64::try_from(len).is_ok_and(|len| len <= max)
}

/// Compare the leading `tag.len()` bytes of `expected` with `tag` in constant time.
fn verify(mut expected: Tag, tag: &[u8]) -> Result<(), Error> {
    let ok = expected[..tag.len()].ct_eq(tag);
    expected.zeroize();

    if bool::from(ok) {
        Ok(())
    } else {
        Err(Error::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_lengths() {
        for len in 0..=32 {
            let tag = [0u8; 32];
            assert_eq!(
                check_tag_len(&tag[..len]).is_ok(),
                TAG_SIZES.contains(&len),
                "{len}"
            );
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn length_limits() {
        assert!(within(0, MAX_PLAINTEXT_LEN));
        assert!(within((1 << 36) - 32, MAX_PLAINTEXT_LEN));
        assert!(!within((1 << 36) - 31, MAX_PLAINTEXT_LEN));
        assert!(within((1 << 61) - 1, MAX_AAD_LEN));
        assert!(!within(1 << 61, MAX_AAD_LEN));
    }

    #[test]
    fn truncated_comparison() {
        let expected = [0xa5; TAG_SIZE];
        assert_eq!(verify(expected, &[0xa5; 12]), Ok(()));

        let mut wrong = [0xa5; 12];
        wrong[11] ^= 0x80;
        assert_eq!(verify(expected, &wrong), Err(Error::Authentication));
    }

    #[test]
    fn send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AesGcm>();
    }
}
