//! Error types.

use crate::{MAX_AAD_LEN, MAX_PLAINTEXT_LEN};

/// Errors returned by AES-GCM operations.
///
/// None of the variants carry secret data. [`Error::Authentication`] says nothing
/// about where a forgery differed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Key was not 16, 24 or 32 bytes (or, for ESP, 20, 28 or 36 bytes of keying material).
    #[error("invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// Nonce was empty or longer than `2^61 - 1` bytes.
    #[error("invalid nonce length")]
    InvalidNonceLength,

    /// Tag or ICV length not in the allowed set.
    #[error("invalid tag length: {0} bytes")]
    InvalidTagLength(usize),

    /// Plaintext or AAD exceeds the GCM limits.
    #[error(
        "message too long: plaintext is limited to {} bytes and AAD to {} bytes",
        MAX_PLAINTEXT_LEN,
        MAX_AAD_LEN
    )]
    MessageTooLong,

    /// The 32-bit block counter ran out for this nonce.
    #[error("counter space exhausted")]
    CounterExhausted,

    /// The tag did not match the ciphertext, AAD and nonce.
    #[error("authentication failed: tag mismatch")]
    Authentication,
}

impl From<aes::InvalidKeyLength> for Error {
    fn from(err: aes::InvalidKeyLength) -> Self {
        Self::InvalidKeyLength(err.0)
    }
}
