//! GCM authenticator: GHASH over AAD, ciphertext and the length block, masked with `E(K, J0)`.

use crate::{BLOCK_SIZE, Block, Tag};
use ghash::{GHash, universal_hash::UniversalHash};
use zeroize::Zeroizing;

/// Per-message tag computation.
///
/// Construction folds the AAD; [`Authenticator::update`] folds ciphertext; [`Authenticator::finish`]
/// consumes the state, so data cannot be added after the tag is produced.
pub(crate) struct Authenticator {
    ghash: GHash,
    aad_len: u64,
    data_len: u64,
    tag_mask: Zeroizing<Block>,
}

impl Authenticator {
    /// Start a message authenticated under the hash key in `ghash`.
    pub(crate) fn new(ghash: &GHash, tag_mask: Block, aad: &[u8]) -> Self {
        let mut ghash = ghash.clone();
        ghash.update_padded(aad);

        Self {
            ghash,
            aad_len: aad.len() as u64,
            data_len: 0,
            tag_mask: Zeroizing::new(tag_mask),
        }
    }

    /// Fold ciphertext into the hash.
    ///
    /// Every call but the last must cover a whole number of blocks, since partial blocks are
    /// zero-padded.
    pub(crate) fn update(&mut self, ciphertext: &[u8]) {
        self.ghash.update_padded(ciphertext);
        self.data_len += ciphertext.len() as u64;
    }

    /// Fold `[len(A)]_64 || [len(C)]_64` (in bits) and mask the result.
    pub(crate) fn finish(self) -> Tag {
        let Self {
            mut ghash,
            aad_len,
            data_len,
            tag_mask,
        } = self;

        let mut lengths = [0u8; BLOCK_SIZE];
        lengths[..8].copy_from_slice(&(aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(data_len * 8).to_be_bytes());
        ghash.update(&[lengths.into()]);

        let mut tag: Tag = ghash.finalize().into();
        for (t, m) in tag.iter_mut().zip(tag_mask.iter()) {
            *t ^= m;
        }
        tag
    }
}
