//! Pre-counter block (`J0`) derivation.

use crate::{BLOCK_SIZE, Block, Error, MAX_NONCE_LEN, NONCE_SIZE};
use ghash::{GHash, universal_hash::UniversalHash};

/// Derive `J0` from a nonce of any permitted length.
///
/// A 96-bit nonce is used directly as `nonce || 0^31 || 1`. Any other length is hashed:
/// `GHASH(nonce || 0-pad || 0^64 || [len(nonce)]_64)`.
pub(crate) fn derive_j0(ghash: &GHash, nonce: &[u8]) -> Result<Block, Error> {
    let len = u64::try_from(nonce.len()).map_err(|_| Error::InvalidNonceLength)?;
    if len == 0 || len > MAX_NONCE_LEN {
        return Err(Error::InvalidNonceLength);
    }

    let mut j0 = [0u8; BLOCK_SIZE];
    if nonce.len() == NONCE_SIZE {
        j0[..NONCE_SIZE].copy_from_slice(nonce);
        j0[BLOCK_SIZE - 1] = 1;
        return Ok(j0);
    }

    let mut ghash = ghash.clone();
    ghash.update_padded(nonce);
    j0[8..].copy_from_slice(&(len * 8).to_be_bytes());
    ghash.update(&[j0.into()]);
    Ok(ghash.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn ghash() -> GHash {
        // H for the key feffe9928665731c6d6a8f9467308308
        GHash::new(&hex!("b83b533708bf535d0aa6e52980d53b78").into())
    }

    #[test]
    fn ninety_six_bit_nonce() {
        let j0 = derive_j0(&ghash(), &hex!("cafebabefacedbaddecaf888")).unwrap();
        assert_eq!(j0, hex!("cafebabefacedbaddecaf88800000001"));
    }

    #[test]
    fn rejects_empty_nonce() {
        assert_eq!(derive_j0(&ghash(), &[]), Err(Error::InvalidNonceLength));
    }

    #[test]
    fn short_nonce_is_hashed() {
        let j0 = derive_j0(&ghash(), &hex!("cafebabefacedbad")).unwrap();
        assert_ne!(j0[..8], hex!("cafebabefacedbad"));
        assert_ne!(j0, derive_j0(&ghash(), &hex!("cafebabefacedbae")).unwrap());
    }
}
