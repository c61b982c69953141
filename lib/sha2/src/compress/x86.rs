//! SHA-256 compression with the x86_64 SHA extensions.
//!
//! State is kept in the ABEF/CDGH register layout expected by
//! `sha256rnds2`; each `rounds4!` step consumes four schedule words.

use core::arch::x86_64::*;

#[target_feature(enable = "sha,sse2,ssse3,sse4.1")]
unsafe fn schedule(v0: __m128i, v1: __m128i, v2: __m128i, v3: __m128i) -> __m128i {
    let t1 = _mm_sha256msg1_epu32(v0, v1);
    let t2 = _mm_alignr_epi8(v3, v2, 4);
    let t3 = _mm_add_epi32(t1, t2);
    _mm_sha256msg2_epu32(t3, v3)
}

macro_rules! rounds4 {
    ($abef:ident, $cdgh:ident, $rest:expr, $k:expr, $i:expr) => {{
        let kv = _mm_loadu_si128($k.as_ptr().add(4 * $i) as *const __m128i);
        let t1 = _mm_add_epi32($rest, kv);
        $cdgh = _mm_sha256rnds2_epu32($cdgh, $abef, t1);
        let t2 = _mm_shuffle_epi32(t1, 0x0E);
        $abef = _mm_sha256rnds2_epu32($abef, $cdgh, t2);
    }};
}

macro_rules! schedule_rounds4 {
    ($abef:ident, $cdgh:ident, $w0:expr, $w1:expr, $w2:expr, $w3:expr, $w4:expr, $k:expr, $i:expr) => {{
        $w4 = schedule($w0, $w1, $w2, $w3);
        rounds4!($abef, $cdgh, $w4, $k, $i);
    }};
}

/// Compresses every 64-byte block of `blocks` into `state`.
///
/// # Safety
///
/// The CPU must support SHA, SSE2, SSSE3 and SSE4.1.
#[target_feature(enable = "sha,sse2,ssse3,sse4.1")]
pub(super) unsafe fn compress_blocks(state: &mut [u32; 8], k: &[u32; 64], blocks: &[u8]) {
    // Big-endian word loads
    let mask = _mm_set_epi64x(
        0x0C0D_0E0F_0809_0A0Bu64 as i64,
        0x0405_0607_0001_0203u64 as i64,
    );

    let state_ptr = state.as_ptr() as *const __m128i;
    let dcba = _mm_loadu_si128(state_ptr);
    let efgh = _mm_loadu_si128(state_ptr.add(1));

    let cdab = _mm_shuffle_epi32(dcba, 0xB1);
    let efgh = _mm_shuffle_epi32(efgh, 0x1B);
    let mut abef = _mm_alignr_epi8(cdab, efgh, 8);
    let mut cdgh = _mm_blend_epi16(efgh, cdab, 0xF0);

    for block in blocks.chunks_exact(64) {
        let abef_save = abef;
        let cdgh_save = cdgh;

        let data = block.as_ptr() as *const __m128i;
        let mut w0 = _mm_shuffle_epi8(_mm_loadu_si128(data), mask);
        let mut w1 = _mm_shuffle_epi8(_mm_loadu_si128(data.add(1)), mask);
        let mut w2 = _mm_shuffle_epi8(_mm_loadu_si128(data.add(2)), mask);
        let mut w3 = _mm_shuffle_epi8(_mm_loadu_si128(data.add(3)), mask);
        let mut w4;

        rounds4!(abef, cdgh, w0, k, 0);
        rounds4!(abef, cdgh, w1, k, 1);
        rounds4!(abef, cdgh, w2, k, 2);
        rounds4!(abef, cdgh, w3, k, 3);
        schedule_rounds4!(abef, cdgh, w0, w1, w2, w3, w4, k, 4);
        schedule_rounds4!(abef, cdgh, w1, w2, w3, w4, w0, k, 5);
        schedule_rounds4!(abef, cdgh, w2, w3, w4, w0, w1, k, 6);
        schedule_rounds4!(abef, cdgh, w3, w4, w0, w1, w2, k, 7);
        schedule_rounds4!(abef, cdgh, w4, w0, w1, w2, w3, k, 8);
        schedule_rounds4!(abef, cdgh, w0, w1, w2, w3, w4, k, 9);
        schedule_rounds4!(abef, cdgh, w1, w2, w3, w4, w0, k, 10);
        schedule_rounds4!(abef, cdgh, w2, w3, w4, w0, w1, k, 11);
        schedule_rounds4!(abef, cdgh, w3, w4, w0, w1, w2, k, 12);
        schedule_rounds4!(abef, cdgh, w4, w0, w1, w2, w3, k, 13);
        schedule_rounds4!(abef, cdgh, w0, w1, w2, w3, w4, k, 14);
        schedule_rounds4!(abef, cdgh, w1, w2, w3, w4, w0, k, 15);

        abef = _mm_add_epi32(abef, abef_save);
        cdgh = _mm_add_epi32(cdgh, cdgh_save);
    }

    let feba = _mm_shuffle_epi32(abef, 0x1B);
    let dchg = _mm_shuffle_epi32(cdgh, 0xB1);
    let dcba = _mm_blend_epi16(feba, dchg, 0xF0);
    let hgef = _mm_alignr_epi8(dchg, feba, 8);

    let state_ptr = state.as_mut_ptr() as *mut __m128i;
    _mm_storeu_si128(state_ptr, dcba);
    _mm_storeu_si128(state_ptr.add(1), hgef);
}
