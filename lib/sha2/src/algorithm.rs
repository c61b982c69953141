//! SHA-2 algorithm catalog.
//!
//! Static per-algorithm parameters: word width, block size, output size,
//! initial hash values and round constants (FIPS 180-4).

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Round constants for the 64-bit algorithms (first 64 bits of the fractional
/// parts of the cube roots of the first 80 primes).
#[rustfmt::skip]
pub(crate) const K64: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

/// Round constants for the 32-bit algorithms: the high halves of the first
/// 64 entries of [`K64`].
pub(crate) const K32: [u32; 64] = {
    let mut k = [0u32; 64];
    let mut i = 0;
    while i < 64 {
        k[i] = (K64[i] >> 32) as u32;
        i += 1;
    }
    k
};

const H224: [u32; 8] = [
    0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939,
    0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
];

const H256: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
    0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const H384: [u64; 8] = [
    0xcbbb9d5dc1059ed8, 0x629a292a367cd507, 0x9159015a3070dd17, 0x152fecd8f70e5939,
    0x67332667ffc00b31, 0x8eb44a8768581511, 0xdb0c2e0d64f98fa7, 0x47b5481dbefa4fa4,
];

const H512: [u64; 8] = [
    0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
    0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
];

const H512_224: [u64; 8] = [
    0x8c3d37c819544da2, 0x73e1996689dcd4d6, 0x1dfab7ae32ff9c82, 0x679dd514582f9fcf,
    0x0f6d2b697bd44da8, 0x77e36f7304c48942, 0x3f9d85a86a1d36c8, 0x1112e6ad91d692a1,
];

const H512_256: [u64; 8] = [
    0x22312194fc2bf72c, 0x9f555fa3c84c64c2, 0x2393b86b6f53b151, 0x963877195940eabd,
    0x96283ee2a88effe3, 0xbe5e1e2553863992, 0x2b0199fc2c85b8aa, 0x0eb72ddc81c52ca2,
];

/// A SHA-2 variant.
///
/// The discriminants are the stable tags used by the marshal format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Algorithm {
    /// SHA-224, 28-byte output
    Sha224 = 0,
    /// SHA-256, 32-byte output
    Sha256 = 1,
    /// SHA-384, 48-byte output
    Sha384 = 2,
    /// SHA-512, 64-byte output
    Sha512 = 3,
    /// SHA-512/224, 28-byte output
    Sha512_224 = 4,
    /// SHA-512/256, 32-byte output
    Sha512_256 = 5,
}

/// Word width of the internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordWidth {
    /// 32-bit words, 64 rounds
    Bits32,
    /// 64-bit words, 80 rounds
    Bits64,
}

/// Initial hash values of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialValues {
    /// 32-bit family
    Narrow(&'static [u32; 8]),
    /// 64-bit family
    Wide(&'static [u64; 8]),
}

/// Round constant table of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundConstants {
    /// 64 entries, 32-bit family
    Narrow(&'static [u32; 64]),
    /// 80 entries, 64-bit family
    Wide(&'static [u64; 80]),
}

impl Algorithm {
    /// Every supported algorithm, in tag order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha512_224,
        Algorithm::Sha512_256,
    ];

    /// Looks up an algorithm by its numeric tag.
    pub const fn from_tag(tag: u32) -> Result<Self, Error> {
        match tag {
            0 => Ok(Algorithm::Sha224),
            1 => Ok(Algorithm::Sha256),
            2 => Ok(Algorithm::Sha384),
            3 => Ok(Algorithm::Sha512),
            4 => Ok(Algorithm::Sha512_224),
            5 => Ok(Algorithm::Sha512_256),
            _ => Err(Error::InvalidAlgorithm(tag)),
        }
    }

    /// Numeric tag of this algorithm.
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Digest size in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            Algorithm::Sha224 => 28,
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
            Algorithm::Sha512_224 => 28,
            Algorithm::Sha512_256 => 32,
        }
    }

    /// Block size in bytes.
    pub const fn block_size(self) -> usize {
        match self.word_width() {
            WordWidth::Bits32 => 64,
            WordWidth::Bits64 => 128,
        }
    }

    /// Word width of the internal state.
    pub const fn word_width(self) -> WordWidth {
        match self {
            Algorithm::Sha224 | Algorithm::Sha256 => WordWidth::Bits32,
            _ => WordWidth::Bits64,
        }
    }

    /// Initial hash values H0..H7.
    pub const fn initial_hash_values(self) -> InitialValues {
        match self {
            Algorithm::Sha224 => InitialValues::Narrow(&H224),
            Algorithm::Sha256 => InitialValues::Narrow(&H256),
            Algorithm::Sha384 => InitialValues::Wide(&H384),
            Algorithm::Sha512 => InitialValues::Wide(&H512),
            Algorithm::Sha512_224 => InitialValues::Wide(&H512_224),
            Algorithm::Sha512_256 => InitialValues::Wide(&H512_256),
        }
    }

    /// Round constant table.
    pub const fn round_constants(self) -> RoundConstants {
        match self.word_width() {
            WordWidth::Bits32 => RoundConstants::Narrow(&K32),
            WordWidth::Bits64 => RoundConstants::Wide(&K64),
        }
    }

    /// Conventional name, e.g. `"SHA-512/256"`.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Sha224 => "SHA-224",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha384 => "SHA-384",
            Algorithm::Sha512 => "SHA-512",
            Algorithm::Sha512_224 => "SHA-512/224",
            Algorithm::Sha512_256 => "SHA-512/256",
        }
    }
}

/// Digest size in bytes for a raw algorithm tag.
pub fn algorithm_output_size(tag: u32) -> Result<usize, Error> {
    Algorithm::from_tag(tag).map(Algorithm::output_size)
}

impl TryFrom<u32> for Algorithm {
    type Error = Error;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Algorithm::from_tag(tag)
    }
}

impl From<Algorithm> for u32 {
    fn from(algorithm: Algorithm) -> u32 {
        algorithm.tag()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Accepts the conventional names case-insensitively, with or without
    /// the dash after `SHA`, and `-`/`_` in place of the `/` of the
    /// truncated variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let rest = match s.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("sha") => &s[3..],
            _ => return Err(Error::UnknownAlgorithmName),
        };
        let rest = rest.strip_prefix('-').unwrap_or(rest);
        match rest {
            "224" => Ok(Algorithm::Sha224),
            "256" => Ok(Algorithm::Sha256),
            "384" => Ok(Algorithm::Sha384),
            "512" => Ok(Algorithm::Sha512),
            "512/224" | "512_224" | "512-224" => Ok(Algorithm::Sha512_224),
            "512/256" | "512_256" | "512-256" => Ok(Algorithm::Sha512_256),
            _ => Err(Error::UnknownAlgorithmName),
        }
    }
}
