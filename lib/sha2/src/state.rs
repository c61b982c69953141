//! Incremental hashing engine.
//!
//! Whole bytes are absorbed by [`HashState::update`]; a final sub-byte tail
//! can only be passed to the finalizing call, which consumes the state.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::{Algorithm, InitialValues, K32, K64};
use crate::compress::{NarrowLanes, WideLanes};
use crate::digest::Digest;
use crate::error::Error;

/// Largest block size of the family (SHA-384/512), in bytes.
pub const MAX_BLOCK_SIZE: usize = 128;

/// Lane set of a state, by word width.
#[derive(Clone)]
pub(crate) enum Words {
    Narrow(NarrowLanes),
    Wide(WideLanes),
}

impl Words {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        match algorithm.initial_hash_values() {
            InitialValues::Narrow(h) => Words::Narrow(NarrowLanes::new(&K32, h)),
            InitialValues::Wide(h) => Words::Wide(WideLanes::new(&K64, h)),
        }
    }

    fn compress_blocks(&mut self, blocks: &[u8]) {
        match self {
            Words::Narrow(lanes) => lanes.compress_blocks(blocks),
            Words::Wide(lanes) => lanes.compress_blocks(blocks),
        }
    }

    fn write_digest(&self, out: &mut [u8]) {
        match self {
            Words::Narrow(lanes) => lanes.write_digest(out),
            Words::Wide(lanes) => lanes.write_digest(out),
        }
    }
}

impl Zeroize for Words {
    fn zeroize(&mut self) {
        match self {
            Words::Narrow(lanes) => lanes.zeroize(),
            Words::Wide(lanes) => lanes.zeroize(),
        }
    }
}

/// Running state of one SHA-2 computation.
///
/// Dropping the state zeroes it.
#[derive(Clone)]
pub struct HashState {
    pub(crate) algorithm: Algorithm,
    /// Total bits absorbed so far, wrapping.
    pub(crate) message_bits: u64,
    pub(crate) words: Words,
    /// Partial block; the first `buffered()` bytes are live.
    pub(crate) chunk: [u8; MAX_BLOCK_SIZE],
}

impl HashState {
    /// Creates a fresh state for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            message_bits: 0,
            words: Words::new(algorithm),
            chunk: [0u8; MAX_BLOCK_SIZE],
        }
    }

    /// Creates a fresh state from a numeric algorithm tag.
    pub fn from_tag(tag: u32) -> Result<Self, Error> {
        Algorithm::from_tag(tag).map(Self::new)
    }

    /// Algorithm this state hashes with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Digest size in bytes.
    pub fn output_size(&self) -> usize {
        self.algorithm.output_size()
    }

    /// Block size in bytes.
    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    /// Total number of bits absorbed so far.
    pub fn message_bits(&self) -> u64 {
        self.message_bits
    }

    /// Number of bytes waiting in the partial block.
    pub(crate) fn buffered(&self) -> usize {
        ((self.message_bits / 8) % self.block_size() as u64) as usize
    }

    /// Returns the state to its freshly-initialized form, keeping the algorithm.
    pub fn reset(&mut self) {
        *self = Self::new(self.algorithm);
    }

    /// Absorbs `data`.
    pub fn update(&mut self, mut data: &[u8]) {
        let block_size = self.block_size();
        let mut offset = self.buffered();
        self.message_bits = self
            .message_bits
            .wrapping_add((data.len() as u64).wrapping_mul(8));

        if offset > 0 {
            let take = (block_size - offset).min(data.len());
            self.chunk[offset..offset + take].copy_from_slice(&data[..take]);
            offset += take;
            data = &data[take..];
            if offset < block_size {
                return;
            }
            self.words.compress_blocks(&self.chunk[..block_size]);
        }

        let whole = data.len() - data.len() % block_size;
        if whole > 0 {
            self.words.compress_blocks(&data[..whole]);
        }

        let rest = &data[whole..];
        self.chunk[..rest.len()].copy_from_slice(rest);
    }

    /// Absorbs the first `bits / 8` bytes of `data`.
    ///
    /// `bits` must be a multiple of 8; a sub-byte tail can only be passed to
    /// [`finalize_bits`](Self::finalize_bits).
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than `bits / 8` bytes.
    pub fn update_bits(&mut self, data: &[u8], bits: usize) {
        debug_assert_eq!(bits % 8, 0, "update_bits takes whole bytes only");
        self.update(&data[..bits / 8]);
    }

    /// Pads and returns the digest.
    pub fn finalize(self) -> Digest {
        self.finalize_bits(&[], 0)
    }

    /// Absorbs the first `bits` bits of `trailing`, pads and returns the digest.
    ///
    /// Sub-byte residue is taken from the most significant bits of
    /// `trailing[bits / 8]`.
    ///
    /// # Panics
    ///
    /// Panics if `trailing` holds fewer than `bits` bits.
    pub fn finalize_bits(mut self, trailing: &[u8], bits: usize) -> Digest {
        let mut digest = Digest::zeroed(self.output_size());
        self.pad(trailing, bits);
        self.words.write_digest(digest.as_mut_bytes());
        digest
    }

    /// Like [`finalize_bits`](Self::finalize_bits), writing into `out`.
    ///
    /// Returns the number of bytes written.
    pub fn finalize_into(mut self, trailing: &[u8], bits: usize, out: &mut [u8]) -> Result<usize, Error> {
        let size = self.output_size();
        if out.len() < size {
            return Err(Error::BufferTooSmall {
                needed: size,
                available: out.len(),
            });
        }
        self.pad(trailing, bits);
        self.words.write_digest(&mut out[..size]);
        Ok(size)
    }

    fn pad(&mut self, trailing: &[u8], bits: usize) {
        let whole = bits / 8;
        let residue = (bits % 8) as u32;
        self.update(&trailing[..whole]);

        let block_size = self.block_size();
        let mut offset = self.buffered();

        // Keep the residual bits, set the one after them, clear the rest
        let marker = 0x80u8 >> residue;
        let last = if residue > 0 { trailing[whole] } else { 0 };
        self.chunk[offset] = (last | marker) & !(marker - 1);
        offset += 1;
        self.chunk[offset..block_size].fill(0);

        // Length field is 64 bits for 64-byte blocks, 128 for 128-byte blocks
        if offset > block_size - block_size / 8 {
            self.words.compress_blocks(&self.chunk[..block_size]);
            self.chunk[..block_size].fill(0);
        }

        self.message_bits = self.message_bits.wrapping_add(u64::from(residue));
        self.chunk[block_size - 8..block_size].copy_from_slice(&self.message_bits.to_be_bytes());
        self.words.compress_blocks(&self.chunk[..block_size]);
    }

    /// Zeroes the state. It must be [`reset`](Self::reset) before reuse.
    pub fn wipe(&mut self) {
        log::trace!("sha2: wiping {} state", self.algorithm);
        self.zeroize();
    }
}

impl Zeroize for HashState {
    fn zeroize(&mut self) {
        self.message_bits.zeroize();
        self.words.zeroize();
        self.chunk.zeroize();
    }
}

impl Drop for HashState {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for HashState {}

impl fmt::Debug for HashState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashState")
            .field("algorithm", &self.algorithm)
            .field("message_bits", &self.message_bits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abc_all_algorithms() {
        let expected = [
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7",
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
            "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa",
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23",
        ];
        for (algorithm, hex) in Algorithm::ALL.iter().zip(expected) {
            let mut state = HashState::new(*algorithm);
            state.update(b"abc");
            assert_eq!(format!("{:x}", state.finalize()), hex, "{}", algorithm);
        }
    }

    #[test]
    fn test_buffered_tracks_message_bits() {
        let mut state = HashState::new(Algorithm::Sha256);
        state.update(&[0u8; 70]);
        assert_eq!(state.message_bits(), 560);
        assert_eq!(state.buffered(), 6);
        state.update(&[0u8; 58]);
        assert_eq!(state.buffered(), 0);
    }

    #[test]
    fn test_padding_spills_into_second_block() {
        // 56 bytes leaves no room for the length in a 64-byte block
        let data = [0x61u8; 56];
        let mut split = HashState::new(Algorithm::Sha256);
        split.update(&data[..55]);
        let a = split.finalize_bits(&data[55..], 8);

        let mut whole = HashState::new(Algorithm::Sha256);
        whole.update(&data);
        assert_eq!(a, whole.finalize());
    }

    #[test]
    fn test_finalize_into_checks_buffer() {
        let state = HashState::new(Algorithm::Sha384);
        let mut out = [0u8; 47];
        assert_eq!(
            state.finalize_into(&[], 0, &mut out),
            Err(Error::BufferTooSmall { needed: 48, available: 47 })
        );

        let state = HashState::new(Algorithm::Sha512_224);
        let mut out = [0xffu8; 64];
        assert_eq!(state.finalize_into(b"abc", 24, &mut out), Ok(28));
        assert_eq!(out[..4], [0x46, 0x34, 0x27, 0x0f]);
        assert_eq!(out[28], 0xff);
    }

    #[test]
    fn test_residue_ignores_low_bits() {
        // Only the top 3 bits of the final byte count
        let a = HashState::new(Algorithm::Sha224).finalize_bits(&[0b1010_0000], 3);
        let b = HashState::new(Algorithm::Sha224).finalize_bits(&[0b1011_1111], 3);
        assert_eq!(a, b);
        let c = HashState::new(Algorithm::Sha224).finalize_bits(&[0b1000_0000], 3);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reset_and_wipe() {
        let mut state = HashState::new(Algorithm::Sha512);
        state.update(b"garbage");
        state.wipe();
        assert_eq!(state.message_bits(), 0);
        state.reset();
        state.update(b"abc");
        assert_eq!(state.finalize(), crate::digest(Algorithm::Sha512, b"abc"));
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(HashState::from_tag(2).map(|s| s.output_size()), Ok(48));
        assert!(matches!(HashState::from_tag(42), Err(Error::InvalidAlgorithm(42))));
    }

    #[test]
    fn test_clone_forks_computation() {
        let mut state = HashState::new(Algorithm::Sha256);
        state.update(b"ab");
        let fork = state.clone();
        state.update(b"c");
        assert_eq!(fork.message_bits(), 16);
        assert_eq!(state.finalize(), crate::digest(Algorithm::Sha256, b"abc"));
    }
}
