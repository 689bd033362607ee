//! FIPS-197 key expansion.

use crate::{BLOCK_SIZE, InvalidKeyLength, backend::soft::sub_word};
use zeroize::Zeroize;

/// Largest number of rounds (AES-256).
pub(crate) const MAX_ROUNDS: usize = 14;

/// Round constants, one per key-expansion step that applies `RotWord`.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// AES variant, selected by key length.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Select the variant for a key of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyLength`] unless `len` is 16, 24 or 32.
    pub const fn from_key_len(len: usize) -> Result<Self, InvalidKeyLength> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            _ => Err(InvalidKeyLength(len)),
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Number of rounds.
    #[must_use]
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }
}

/// Expanded AES key: `rounds + 1` round keys of 16 bytes each, in FIPS-197 byte order.
///
/// Zeroized on drop.
#[derive(Clone)]
pub struct RoundKeys {
    keys: [[u8; BLOCK_SIZE]; MAX_ROUNDS + 1],
    key_size: KeySize,
}

impl RoundKeys {
    /// Expand `key` into its round keys.
    ///
    /// `SubWord` goes through the bitsliced S-box so no step of the expansion indexes memory
    /// with key-dependent values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes long.
    pub fn expand(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        let key_size = KeySize::from_key_len(key.len())?;
        let nk = key_size.key_len() / 4;
        let total = 4 * (key_size.rounds() + 1);

        // Words are little-endian: byte 0 of the key is the low byte of `w[0]`.
        let mut w = [0u32; 4 * (MAX_ROUNDS + 1)];
        for (word, bytes) in w.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let (mut j, mut k) = (0, 0);
        for i in nk..total {
            let mut tmp = w[i - 1];
            if j == 0 {
                // RotWord is a right rotation in little-endian order
                tmp = sub_word(tmp.rotate_right(8)) ^ u32::from(RCON[k]);
            } else if nk > 6 && j == 4 {
                tmp = sub_word(tmp);
            }
            w[i] = w[i - nk] ^ tmp;

            j += 1;
            if j == nk {
                j = 0;
                k += 1;
            }
        }

        let mut keys = [[0u8; BLOCK_SIZE]; MAX_ROUNDS + 1];
        for (round_key, words) in keys.iter_mut().zip(w[..total].chunks_exact(4)) {
            for (bytes, word) in round_key.chunks_exact_mut(4).zip(words) {
                bytes.copy_from_slice(&word.to_le_bytes());
            }
        }
        w.zeroize();

        Ok(Self { keys, key_size })
    }

    /// Variant these keys were expanded for.
    #[must_use]
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// Number of rounds.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.key_size.rounds()
    }

    /// The `rounds + 1` round keys.
    #[must_use]
    pub fn as_slice(&self) -> &[[u8; BLOCK_SIZE]] {
        &self.keys[..=self.rounds()]
    }
}

impl Drop for RoundKeys {
    fn drop(&mut self) {
        self.keys.zeroize();
    }
}

opaque_debug::implement!(RoundKeys);

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn key_sizes() {
        assert_eq!(KeySize::from_key_len(16), Ok(KeySize::Aes128));
        assert_eq!(KeySize::from_key_len(24), Ok(KeySize::Aes192));
        assert_eq!(KeySize::from_key_len(32), Ok(KeySize::Aes256));
        assert_eq!(KeySize::from_key_len(0), Err(InvalidKeyLength(0)));
        assert_eq!(KeySize::from_key_len(20), Err(InvalidKeyLength(20)));
        assert_eq!(KeySize::from_key_len(33), Err(InvalidKeyLength(33)));
    }

    #[test]
    fn round_key_count() {
        for (len, rounds) in [(16, 10), (24, 12), (32, 14)] {
            let keys = RoundKeys::expand(&[0u8; 32][..len]).unwrap();
            assert_eq!(keys.rounds(), rounds);
            assert_eq!(keys.as_slice().len(), rounds + 1);
        }
    }

    /// FIPS-197 Appendix A.1
    #[test]
    fn expand_aes128() {
        let keys = RoundKeys::expand(&hex!("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
        let rk = keys.as_slice();
        assert_eq!(rk[0], hex!("2b7e151628aed2a6abf7158809cf4f3c"));
        assert_eq!(rk[1], hex!("a0fafe1788542cb123a339392a6c7605"));
        assert_eq!(rk[10], hex!("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }

    /// FIPS-197 Appendix A.2
    #[test]
    fn expand_aes192() {
        let keys =
            RoundKeys::expand(&hex!("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b")).unwrap();
        let rk = keys.as_slice();
        // w[6..10]
        assert_eq!(rk[1][8..], hex!("fe0c91f72402f5a5"));
        assert_eq!(rk[2][..8], hex!("ec12068e6c827f6b"));
        // w[48..52]
        assert_eq!(rk[12], hex!("e98ba06f448c773c8ecc720401002202"));
    }

    /// FIPS-197 Appendix A.3
    #[test]
    fn expand_aes256() {
        let keys = RoundKeys::expand(&hex!(
            "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"
        ))
        .unwrap();
        let rk = keys.as_slice();
        assert_eq!(rk[2], hex!("9ba354118e6925afa51a8b5f2067fcde"));
        // w[12] = w[4] ^ SubWord(w[11]), without RotWord or Rcon
        assert_eq!(rk[3], hex!("a8b09c1a93d194cdbe49846eb75d5b9a"));
        assert_eq!(rk[14], hex!("fe4890d1e6188d0b046df344706c631e"));
    }
}
