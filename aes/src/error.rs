//! Error types.

/// The key passed to [`Aes::new`](crate::Aes::new) or
/// [`RoundKeys::expand`](crate::RoundKeys::expand) was not 16, 24 or 32 bytes long.
///
/// Carries the rejected length.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
pub struct InvalidKeyLength(pub usize);
