//! Counter mode: 32-bit big-endian counter blocks and the keystream built from them.

use crate::{BLOCK_SIZE, Block, Error, NONCE_SIZE};
use aes::Aes;
use zeroize::Zeroize;

/// Number of blocks encrypted per keystream batch.
pub(crate) const CHUNK_BLOCKS: usize = 8;

/// Bytes per keystream batch.
pub(crate) const CHUNK_SIZE: usize = CHUNK_BLOCKS * BLOCK_SIZE;

/// GCM counter block generator: a 96-bit prefix followed by a 32-bit big-endian counter.
///
/// Only the low 32 bits ever change. The counter carries a budget of remaining blocks and
/// returns [`Error::CounterExhausted`] once it is spent instead of wrapping onto a value that
/// was already used.
#[derive(Clone, Copy, Debug)]
pub struct Counter {
    block: Block,
    remaining: u64,
}

impl Counter {
    /// Count from `initial` up to and including `0xFFFFFFFF`.
    #[must_use]
    pub fn new(prefix: &[u8; NONCE_SIZE], initial: u32) -> Self {
        let mut block = [0u8; BLOCK_SIZE];
        block[..NONCE_SIZE].copy_from_slice(prefix);
        block[NONCE_SIZE..].copy_from_slice(&initial.to_be_bytes());

        Self {
            block,
            remaining: (1 << 32) - u64::from(initial),
        }
    }

    /// Data counter for the pre-counter block `j0`: starts at `inc32(j0)`.
    ///
    /// `j0` is reserved for the tag mask, so `2^32 - 2` blocks remain. When `j0` came from
    /// GHASH its counter field is arbitrary and the count wraps modulo `2^32` like `inc32`.
    pub(crate) fn after_j0(j0: &Block) -> Self {
        let mut counter = Self {
            block: *j0,
            remaining: (1 << 32) - 2,
        };
        counter.set_ctr(counter.ctr().wrapping_add(1));
        counter
    }

    /// Return the current counter block and advance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CounterExhausted`] once the budget is spent.
    pub fn next_block(&mut self) -> Result<Block, Error> {
        if self.remaining == 0 {
            return Err(Error::CounterExhausted);
        }

        let block = self.block;
        self.remaining -= 1;
        self.set_ctr(self.ctr().wrapping_add(1));
        Ok(block)
    }

    /// Number of blocks left before the counter is exhausted.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn ctr(&self) -> u32 {
        u32::from_be_bytes([self.block[12], self.block[13], self.block[14], self.block[15]])
    }

    fn set_ctr(&mut self, ctr: u32) {
        self.block[NONCE_SIZE..].copy_from_slice(&ctr.to_be_bytes());
    }
}

/// AES-CTR keystream, generated [`CHUNK_BLOCKS`] blocks at a time.
pub(crate) struct Keystream<'a> {
    aes: &'a Aes,
    counter: Counter,
    buf: [Block; CHUNK_BLOCKS],
}

impl<'a> Keystream<'a> {
    pub(crate) fn new(aes: &'a Aes, counter: Counter) -> Self {
        Self {
            aes,
            counter,
            buf: [[0; BLOCK_SIZE]; CHUNK_BLOCKS],
        }
    }

    /// XOR the next `data.len()` keystream bytes into `data`.
    ///
    /// Every call but the last must cover a whole number of blocks: the unused tail of a partial
    /// block is discarded.
    pub(crate) fn apply(&mut self, data: &mut [u8]) -> Result<(), Error> {
        for chunk in data.chunks_mut(CHUNK_SIZE) {
            let keystream = &mut self.buf[..chunk.len().div_ceil(BLOCK_SIZE)];
            for block in keystream.iter_mut() {
                *block = self.counter.next_block()?;
            }
            self.aes.encrypt_blocks(keystream);

            for (byte, k) in chunk.iter_mut().zip(keystream.iter().flatten()) {
                *byte ^= k;
            }
        }

        Ok(())
    }
}

impl Drop for Keystream<'_> {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}
