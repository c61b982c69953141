//! Block compression.
//!
//! One generic FIPS 180-4 compression function serves both word widths. On
//! x86_64 CPUs with the SHA extensions the 32-bit family is routed through
//! SHA-NI instead; the choice is made once per process.

pub mod cpu;
#[cfg(target_arch = "x86_64")]
mod x86;

use spin::Once;
use zeroize::Zeroize;

use crate::word::Word;
use cpu::CpuFeatures;

/// Compression strategy in use by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Generic Rust implementation
    Portable,
    /// x86_64 SHA extensions (32-bit algorithms only)
    ShaNi,
}

static BACKEND: Once<Backend> = Once::new();

/// Returns the compression backend, probing the CPU on first use.
pub fn backend() -> Backend {
    *BACKEND.call_once(select_backend)
}

fn select_backend() -> Backend {
    let features = cpu::features();
    let backend = if !cfg!(feature = "force-soft") && features.contains(CpuFeatures::SHA_NI) {
        Backend::ShaNi
    } else {
        Backend::Portable
    };
    log::debug!("sha2: {:?} compression selected (cpu: {:?})", backend, features);
    backend
}

/// Round constants, running hash values and per-block scratch for one word
/// width. `R` is the round count: 64 for `u32`, 80 for `u64`.
#[derive(Clone)]
pub(crate) struct Lanes<W: Word, const R: usize> {
    /// Round constants
    pub(crate) k: [W; R],
    /// Message schedule (scratch)
    pub(crate) w: [W; R],
    /// Hash values H0..H7
    pub(crate) h: [W; 8],
    /// Working registers a..h (scratch)
    pub(crate) work: [W; 8],
}

pub(crate) type NarrowLanes = Lanes<u32, 64>;
pub(crate) type WideLanes = Lanes<u64, 80>;

impl<W: Word, const R: usize> Lanes<W, R> {
    pub(crate) fn new(k: &[W; R], h: &[W; 8]) -> Self {
        Self {
            k: *k,
            w: [W::ZERO; R],
            h: *h,
            work: [W::ZERO; 8],
        }
    }

    /// Bytes per block.
    pub(crate) const BLOCK_SIZE: usize = 16 * W::BYTES;

    /// Compresses one block of `16 * W::BYTES` bytes into `h`.
    pub(crate) fn compress_portable(&mut self, block: &[u8]) {
        debug_assert_eq!(block.len(), Self::BLOCK_SIZE);
        let Lanes { k, w, h, work } = self;

        for (slot, bytes) in w.iter_mut().zip(block.chunks_exact(W::BYTES)) {
            *slot = W::from_be_slice(bytes);
        }
        for i in 16..R {
            w[i] = w[i - 16]
                .add(w[i - 7])
                .add(w[i - 15].small_sigma0())
                .add(w[i - 2].small_sigma1());
        }

        *work = *h;
        for i in 0..R {
            let [a, b, c, d, e, f, g, hh] = *work;
            let ch = g ^ (e & (f ^ g));
            let maj = (a & b) | (c & (a | b));
            let t1 = hh.add(e.big_sigma1()).add(ch).add(k[i]).add(w[i]);
            let t2 = a.big_sigma0().add(maj);
            *work = [t1.add(t2), a, b, c, d.add(t1), e, f, g];
        }

        for (acc, v) in h.iter_mut().zip(work.iter()) {
            *acc = acc.add(*v);
        }
    }

    /// Writes `h` big-endian into `out`, truncated to `out.len()` bytes.
    pub(crate) fn write_digest(&self, out: &mut [u8]) {
        let mut full = [0u8; 64];
        for (word, bytes) in self.h.iter().zip(full.chunks_exact_mut(W::BYTES)) {
            word.write_be(bytes);
        }
        out.copy_from_slice(&full[..out.len()]);
    }
}

impl<W: Word, const R: usize> Zeroize for Lanes<W, R> {
    fn zeroize(&mut self) {
        self.k.zeroize();
        self.w.zeroize();
        self.h.zeroize();
        self.work.zeroize();
    }
}

impl NarrowLanes {
    /// Compresses every 64-byte block of `blocks`.
    pub(crate) fn compress_blocks(&mut self, blocks: &[u8]) {
        debug_assert_eq!(blocks.len() % Self::BLOCK_SIZE, 0);
        #[cfg(target_arch = "x86_64")]
        {
            if backend() == Backend::ShaNi {
                // SAFETY: ShaNi is only selected when cpuid reports SHA, SSE2,
                // SSSE3 and SSE4.1.
                unsafe { x86::compress_blocks(&mut self.h, &self.k, blocks) };
                return;
            }
        }
        for block in blocks.chunks_exact(Self::BLOCK_SIZE) {
            self.compress_portable(block);
        }
    }
}

impl WideLanes {
    /// Compresses every 128-byte block of `blocks`.
    pub(crate) fn compress_blocks(&mut self, blocks: &[u8]) {
        debug_assert_eq!(blocks.len() % Self::BLOCK_SIZE, 0);
        for block in blocks.chunks_exact(Self::BLOCK_SIZE) {
            self.compress_portable(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{K32, K64};

    const H256: [u32; 8] = [
        0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
        0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
    ];

    fn abc_block(len: usize) -> [u8; 128] {
        // "abc" padded for a block of `len` bytes
        let mut block = [0u8; 128];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[len - 1] = 24;
        block
    }

    #[test]
    fn test_single_block_sha256() {
        let mut lanes = NarrowLanes::new(&K32, &H256);
        lanes.compress_portable(&abc_block(64)[..64]);
        assert_eq!(lanes.h[0], 0xba7816bf);
        assert_eq!(lanes.h[7], 0xf20015ad);
    }

    #[test]
    fn test_single_block_sha512() {
        let iv: [u64; 8] = [
            0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
            0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
        ];
        let mut lanes = WideLanes::new(&K64, &iv);
        lanes.compress_blocks(&abc_block(128));
        assert_eq!(lanes.h[0], 0xddaf35a193617aba);
        assert_eq!(lanes.h[7], 0x2a9ac94fa54ca49f);
    }

    #[test]
    fn test_dispatch_matches_portable() {
        let mut blocks = [0u8; 64 * 5];
        fastrand::fill(&mut blocks);

        let mut fast = NarrowLanes::new(&K32, &H256);
        fast.compress_blocks(&blocks);

        let mut slow = NarrowLanes::new(&K32, &H256);
        for block in blocks.chunks_exact(64) {
            slow.compress_portable(block);
        }
        assert_eq!(fast.h, slow.h);
    }

    #[test]
    fn test_backend_is_stable() {
        assert_eq!(backend(), backend());
        if cfg!(feature = "force-soft") {
            assert_eq!(backend(), Backend::Portable);
        }
    }

    #[test]
    fn test_write_digest_truncates() {
        let lanes = NarrowLanes::new(&K32, &H256);
        let mut out = [0u8; 6];
        lanes.write_digest(&mut out);
        assert_eq!(out, [0x6a, 0x09, 0xe6, 0x67, 0xbb, 0x67]);
    }
}
