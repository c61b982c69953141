//! Differential tests against the `sha2` crate.

use sha2::digest::generic_array::GenericArray;
use sha2::Digest as _;
use splax_sha2::{Algorithm, HashState};

fn reference(algorithm: Algorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha224 => sha2::Sha224::digest(data).to_vec(),
        Algorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
        Algorithm::Sha384 => sha2::Sha384::digest(data).to_vec(),
        Algorithm::Sha512 => sha2::Sha512::digest(data).to_vec(),
        Algorithm::Sha512_224 => sha2::Sha512_224::digest(data).to_vec(),
        Algorithm::Sha512_256 => sha2::Sha512_256::digest(data).to_vec(),
    }
}

#[test]
fn test_random_chunking() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_5a2a);
    for algorithm in Algorithm::ALL {
        for _ in 0..50 {
            let mut data = vec![0u8; rng.usize(0..2048)];
            rng.fill(&mut data);

            let mut state = HashState::new(algorithm);
            let mut rest = &data[..];
            while !rest.is_empty() {
                let take = rng.usize(0..=rest.len().min(300));
                state.update(&rest[..take]);
                rest = &rest[take..];
            }
            assert_eq!(
                state.finalize().as_bytes(),
                &reference(algorithm, &data)[..],
                "{} over {} bytes",
                algorithm,
                data.len()
            );
        }
    }
}

#[test]
fn test_every_length_up_to_three_blocks() {
    let data: Vec<u8> = (0..384u32).map(|i| (i * 31 + 7) as u8).collect();
    for algorithm in Algorithm::ALL {
        for len in 0..=3 * algorithm.block_size() {
            assert_eq!(
                splax_sha2::digest(algorithm, &data[..len]).as_bytes(),
                &reference(algorithm, &data[..len])[..],
                "{} length {}",
                algorithm,
                len
            );
        }
    }
}

// =============================================================================
// Bit-granular input
// =============================================================================

/// Initial hash values, as published in FIPS 180-4.
enum Iv {
    Narrow([u32; 8]),
    Wide([u64; 8]),
}

fn iv(algorithm: Algorithm) -> Iv {
    match algorithm {
        Algorithm::Sha224 => Iv::Narrow([
            0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939,
            0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
        ]),
        Algorithm::Sha256 => Iv::Narrow([
            0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
            0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
        ]),
        Algorithm::Sha384 => Iv::Wide([
            0xcbbb9d5dc1059ed8, 0x629a292a367cd507, 0x9159015a3070dd17, 0x152fecd8f70e5939,
            0x67332667ffc00b31, 0x8eb44a8768581511, 0xdb0c2e0d64f98fa7, 0x47b5481dbefa4fa4,
        ]),
        Algorithm::Sha512 => Iv::Wide([
            0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
            0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
        ]),
        Algorithm::Sha512_224 => Iv::Wide([
            0x8c3d37c819544da2, 0x73e1996689dcd4d6, 0x1dfab7ae32ff9c82, 0x679dd514582f9fcf,
            0x0f6d2b697bd44da8, 0x77e36f7304c48942, 0x3f9d85a86a1d36c8, 0x1112e6ad91d692a1,
        ]),
        Algorithm::Sha512_256 => Iv::Wide([
            0x22312194fc2bf72c, 0x9f555fa3c84c64c2, 0x2393b86b6f53b151, 0x963877195940eabd,
            0x96283ee2a88effe3, 0xbe5e1e2553863992, 0x2b0199fc2c85b8aa, 0x0eb72ddc81c52ca2,
        ]),
    }
}

/// Message of `bits` bits, packed MSB-first and padded by hand.
fn pad_bits(data: &[u8], bits: usize, block: usize) -> Vec<u8> {
    let mut msg = data[..(bits + 7) / 8].to_vec();
    let residue = bits % 8;
    if residue == 0 {
        msg.push(0x80);
    } else if let Some(last) = msg.last_mut() {
        *last = (*last & (0xffu8 << (8 - residue))) | (0x80 >> residue);
    }
    let length_field = block / 8;
    while msg.len() % block != block - length_field {
        msg.push(0);
    }
    msg.extend_from_slice(&vec![0u8; length_field - 8]);
    msg.extend_from_slice(&(bits as u64).to_be_bytes());
    msg
}

/// Digest of the first `bits` bits of `data`, computed with the `sha2`
/// compression functions over hand-built padding.
fn reference_bits(algorithm: Algorithm, data: &[u8], bits: usize) -> Vec<u8> {
    let padded = pad_bits(data, bits, algorithm.block_size());
    let mut out: Vec<u8> = match iv(algorithm) {
        Iv::Narrow(mut state) => {
            for block in padded.chunks_exact(64) {
                sha2::compress256(&mut state, &[GenericArray::clone_from_slice(block)]);
            }
            state.iter().flat_map(|w| w.to_be_bytes()).collect()
        }
        Iv::Wide(mut state) => {
            for block in padded.chunks_exact(128) {
                sha2::compress512(&mut state, &[GenericArray::clone_from_slice(block)]);
            }
            state.iter().flat_map(|w| w.to_be_bytes()).collect()
        }
    };
    out.truncate(algorithm.output_size());
    out
}

#[test]
fn test_pad_bits_matches_byte_padding() {
    // Sanity check of the reference itself
    for algorithm in Algorithm::ALL {
        assert_eq!(
            reference_bits(algorithm, b"abc", 24),
            reference(algorithm, b"abc"),
            "{}",
            algorithm
        );
    }
}

#[test]
fn test_single_bit_message() {
    // One set bit: 0x80 packed, 1 bit long
    for algorithm in Algorithm::ALL {
        let ours = HashState::new(algorithm).finalize_bits(&[0x80], 1);
        assert_eq!(ours.as_bytes(), &reference_bits(algorithm, &[0x80], 1)[..], "{}", algorithm);
        assert_ne!(ours, HashState::new(algorithm).finalize_bits(&[0x00], 1));
    }
}

#[test]
fn test_trailing_bits() {
    let mut data = [0u8; 300];
    fastrand::Rng::with_seed(7).fill(&mut data);

    let lengths = [
        1, 3, 7, 9, 15,
        8 * 55 + 3, 8 * 55 + 7, 8 * 56 + 1, 8 * 63 + 7, 8 * 64 + 5,
        8 * 111 + 2, 8 * 111 + 7, 8 * 112 + 1, 8 * 127 + 4, 8 * 200 + 6,
    ];
    for algorithm in Algorithm::ALL {
        for bits in lengths {
            let ours = HashState::new(algorithm).finalize_bits(&data, bits);
            assert_eq!(
                ours.as_bytes(),
                &reference_bits(algorithm, &data, bits)[..],
                "{} {} bits",
                algorithm,
                bits
            );
        }
    }
}

#[test]
fn test_trailing_bits_after_update() {
    let data = [0xc5u8; 300];
    for algorithm in Algorithm::ALL {
        for bits in [8 * 129 + 3, 8 * 250 + 5] {
            let mut state = HashState::new(algorithm);
            state.update(&data[..100]);
            let ours = state.finalize_bits(&data[100..], bits - 800);
            assert_eq!(
                ours.as_bytes(),
                &reference_bits(algorithm, &data, bits)[..],
                "{} {} bits",
                algorithm,
                bits
            );
        }
    }
}
