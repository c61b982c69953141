//! Word abstraction shared by the 32- and 64-bit algorithms.

use core::fmt::Debug;
use core::ops::{BitAnd, BitOr, BitXor, Not, Shr};

use zeroize::Zeroize;

/// A SHA-2 state word together with the rotate/shift amounts of its family.
///
/// Each `[u32; 3]` is `[rotr, rotr, rotr]` for the Σ functions and
/// `[rotr, rotr, shr]` for the σ functions.
pub(crate) trait Word:
    Copy
    + Debug
    + Eq
    + Zeroize
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shr<u32, Output = Self>
{
    /// Size in bytes
    const BYTES: usize;
    const ZERO: Self;
    /// Σ0, applied to `a`
    const BIG_SIGMA0: [u32; 3];
    /// Σ1, applied to `e`
    const BIG_SIGMA1: [u32; 3];
    /// σ0, message schedule
    const SMALL_SIGMA0: [u32; 3];
    /// σ1, message schedule
    const SMALL_SIGMA1: [u32; 3];

    fn add(self, rhs: Self) -> Self;
    fn rotr(self, n: u32) -> Self;

    /// Reads `BYTES` big-endian bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;
    /// Writes `BYTES` big-endian bytes.
    fn write_be(self, out: &mut [u8]);
    /// Reads `BYTES` native-endian bytes.
    fn from_ne_slice(bytes: &[u8]) -> Self;
    /// Writes `BYTES` native-endian bytes.
    fn write_ne(self, out: &mut [u8]);

    #[inline(always)]
    fn big_sigma0(self) -> Self {
        let [a, b, c] = Self::BIG_SIGMA0;
        self.rotr(a) ^ self.rotr(b) ^ self.rotr(c)
    }

    #[inline(always)]
    fn big_sigma1(self) -> Self {
        let [a, b, c] = Self::BIG_SIGMA1;
        self.rotr(a) ^ self.rotr(b) ^ self.rotr(c)
    }

    #[inline(always)]
    fn small_sigma0(self) -> Self {
        let [a, b, c] = Self::SMALL_SIGMA0;
        self.rotr(a) ^ self.rotr(b) ^ (self >> c)
    }

    #[inline(always)]
    fn small_sigma1(self) -> Self {
        let [a, b, c] = Self::SMALL_SIGMA1;
        self.rotr(a) ^ self.rotr(b) ^ (self >> c)
    }
}

macro_rules! impl_word {
    ($ty:ty, $sum0:expr, $sum1:expr, $sig0:expr, $sig1:expr) => {
        impl Word for $ty {
            const BYTES: usize = core::mem::size_of::<$ty>();
            const ZERO: Self = 0;
            const BIG_SIGMA0: [u32; 3] = $sum0;
            const BIG_SIGMA1: [u32; 3] = $sum1;
            const SMALL_SIGMA0: [u32; 3] = $sig0;
            const SMALL_SIGMA1: [u32; 3] = $sig1;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                self.rotate_right(n)
            }

            #[inline(always)]
            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::BYTES]);
                <$ty>::from_be_bytes(raw)
            }

            #[inline(always)]
            fn write_be(self, out: &mut [u8]) {
                out[..Self::BYTES].copy_from_slice(&self.to_be_bytes());
            }

            fn from_ne_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::BYTES]);
                <$ty>::from_ne_bytes(raw)
            }

            fn write_ne(self, out: &mut [u8]) {
                out[..Self::BYTES].copy_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_word!(u32, [2, 13, 22], [6, 11, 25], [7, 18, 3], [17, 19, 10]);
impl_word!(u64, [28, 34, 39], [14, 18, 41], [1, 8, 7], [19, 61, 6]);
