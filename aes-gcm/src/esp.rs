//! AES-GCM for IPsec ESP ([RFC 4106]).
//!
//! The SA keying material is the AES key followed by a 4-byte salt. Each packet carries an
//! 8-byte explicit IV, and the GCM nonce is `salt || explicit IV`. The ICV is the GCM tag
//! truncated to 8, 12 or 16 bytes.
//!
//! Inner transport checksums are not computed during decryption. After
//! [`EspGcm::open_in_place`] succeeds, run a [`Checksum`] over the plaintext, or use
//! [`EspGcm::open_in_place_checksummed`] which does exactly that.
//!
//! [RFC 4106]: https://www.rfc-editor.org/rfc/rfc4106

use crate::{AesGcm, Error, NONCE_SIZE};
use zeroize::Zeroize;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 4;

/// Explicit IV length in bytes.
pub const EXPLICIT_IV_SIZE: usize = 8;

/// ICV lengths permitted by RFC 4106.
pub const ICV_SIZES: [usize; 3] = [8, 12, 16];

/// Build the GCM nonce `salt || explicit_iv`.
#[must_use]
pub fn nonce(salt: &[u8; SALT_SIZE], explicit_iv: &[u8; EXPLICIT_IV_SIZE]) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[..SALT_SIZE].copy_from_slice(salt);
    nonce[SALT_SIZE..].copy_from_slice(explicit_iv);
    nonce
}

/// AES-GCM keyed for one ESP security association.
#[derive(Clone)]
pub struct EspGcm {
    cipher: AesGcm,
    salt: [u8; SALT_SIZE],
    icv_size: usize,
}

impl EspGcm {
    /// Key from `keying_material` (`key || salt`: 20, 28 or 36 bytes) with an ICV of
    /// `icv_size` bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKeyLength`] with the keying material length if it is not 20, 28 or 36
    /// - [`Error::InvalidTagLength`] if `icv_size` is not in [`ICV_SIZES`]
    pub fn new(keying_material: &[u8], icv_size: usize) -> Result<Self, Error> {
        if !ICV_SIZES.contains(&icv_size) {
            return Err(Error::InvalidTagLength(icv_size));
        }

        let invalid_key = || Error::InvalidKeyLength(keying_material.len());
        let key_len = keying_material
            .len()
            .checked_sub(SALT_SIZE)
            .ok_or_else(invalid_key)?;
        let (key, salt) = keying_material.split_at(key_len);

        let cipher = AesGcm::new(key).map_err(|_| invalid_key())?;
        let salt = salt.try_into().map_err(|_| invalid_key())?;

        Ok(Self {
            cipher,
            salt,
            icv_size,
        })
    }

    /// ICV length in bytes.
    #[must_use]
    pub fn icv_size(&self) -> usize {
        self.icv_size
    }

    /// Encrypt `payload` in place and write the ICV to `icv_out`.
    ///
    /// `aad` is the ESP header (SPI and sequence number) as RFC 4106 section 5 lays it out.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTagLength`] if `icv_out` is not [`EspGcm::icv_size`] bytes
    /// - any error of [`AesGcm::encrypt_in_place_detached`]
    pub fn seal_in_place(
        &self,
        explicit_iv: &[u8; EXPLICIT_IV_SIZE],
        aad: &[u8],
        payload: &mut [u8],
        icv_out: &mut [u8],
    ) -> Result<(), Error> {
        if icv_out.len() != self.icv_size {
            return Err(Error::InvalidTagLength(icv_out.len()));
        }

        let mut tag = self.cipher.encrypt_in_place_detached(
            &nonce(&self.salt, explicit_iv),
            aad,
            payload,
        )?;
        icv_out.copy_from_slice(&tag[..self.icv_size]);
        tag.zeroize();
        Ok(())
    }

    /// Verify `icv` and decrypt `payload` in place.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTagLength`] if `icv` is not [`EspGcm::icv_size`] bytes
    /// - [`Error::Authentication`] if the ICV does not match; `payload` is left untouched
    /// - any other error of [`AesGcm::decrypt_in_place_detached`]
    pub fn open_in_place(
        &self,
        explicit_iv: &[u8; EXPLICIT_IV_SIZE],
        aad: &[u8],
        payload: &mut [u8],
        icv: &[u8],
    ) -> Result<(), Error> {
        if icv.len() != self.icv_size {
            return Err(Error::InvalidTagLength(icv.len()));
        }

        self.cipher
            .decrypt_in_place_detached(&nonce(&self.salt, explicit_iv), aad, payload, icv)
    }

    /// [`EspGcm::open_in_place`], then the RFC 1071 checksum of the decrypted `payload`.
    ///
    /// The checksum is only computed once the ICV has been verified.
    ///
    /// # Errors
    ///
    /// Same as [`EspGcm::open_in_place`].
    pub fn open_in_place_checksummed(
        &self,
        explicit_iv: &[u8; EXPLICIT_IV_SIZE],
        aad: &[u8],
        payload: &mut [u8],
        icv: &[u8],
    ) -> Result<u16, Error> {
        self.open_in_place(explicit_iv, aad, payload, icv)?;

        let mut checksum = Checksum::new();
        checksum.update(payload);
        Ok(checksum.finalize())
    }
}

impl Drop for EspGcm {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

opaque_debug::implement!(EspGcm);

/// Streaming Internet checksum ([RFC 1071]): the one's-complement of the one's-complement sum
/// of big-endian 16-bit words.
///
/// Input may be split at any byte boundary; an odd trailing byte is carried to the next
/// [`Checksum::update`] and zero-padded at the end.
///
/// [RFC 1071]: https://www.rfc-editor.org/rfc/rfc1071
#[derive(Clone, Copy, Debug, Default)]
pub struct Checksum {
    sum: u64,
    pending: Option<u8>,
}

impl Checksum {
    /// Empty checksum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `data` to the sum.
    pub fn update(&mut self, mut data: &[u8]) {
        if let Some(hi) = self.pending.take() {
            match data.split_first() {
                Some((&lo, rest)) => {
                    self.sum += u64::from(u16::from_be_bytes([hi, lo]));
                    data = rest;
                }
                None => {
                    self.pending = Some(hi);
                    return;
                }
            }
        }

        let mut words = data.chunks_exact(2);
        for word in &mut words {
            self.sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
        }
        self.pending = words.remainder().first().copied();
        self.sum = u64::from(fold(self.sum));
    }

    /// One's-complement sum of everything added so far, with carries folded in.
    #[must_use]
    pub fn sum(&self) -> u16 {
        let sum = match self.pending {
            Some(hi) => self.sum + u64::from(u16::from_be_bytes([hi, 0])),
            None => self.sum,
        };
        fold(sum)
    }

    /// The checksum: the complement of [`Checksum::sum`].
    ///
    /// Over data that already contains a correct checksum field this is zero.
    #[must_use]
    pub fn finalize(self) -> u16 {
        !self.sum()
    }
}

/// Fold carries back into the low 16 bits.
#[allow(clippy::cast_possible_truncation)]
fn fold(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    sum as u16
}
