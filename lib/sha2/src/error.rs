//! Error types.

use core::fmt;

/// Errors returned by the hashing, HMAC and codec operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Algorithm tag does not name a supported SHA-2 variant
    InvalidAlgorithm(u32),
    /// Algorithm name does not name a supported SHA-2 variant
    UnknownAlgorithmName,
    /// Caller-provided buffer cannot hold the result
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes provided
        available: usize,
    },
    /// Marshalled state could not be decoded
    MalformedState(MalformedState),
    /// Hex input has an odd number of digits
    OddHexLength,
    /// Hex input contains a character outside `[0-9a-fA-F]`
    InvalidHexCharacter {
        /// Offending character
        c: char,
        /// Position in the input
        index: usize,
    },
}

/// Reasons a marshalled state blob is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedState {
    /// Blob ends before a declared field
    Truncated,
    /// Leading version tag is not understood
    UnknownVersion(i32),
    /// Algorithm tag inside the blob is not understood
    UnknownAlgorithm(u32),
    /// Stored block size disagrees with the stored algorithm
    BlockSizeMismatch,
    /// Stored HMAC output size disagrees with the stored algorithm
    OutputSizeMismatch,
    /// Boolean flag byte is neither 0 nor 1
    InvalidFlag(u8),
    /// Stored bit count is not a whole number of bytes
    MisalignedLength(u64),
}

impl From<MalformedState> for Error {
    fn from(reason: MalformedState) -> Self {
        Error::MalformedState(reason)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAlgorithm(tag) => write!(f, "Invalid algorithm tag: {}", tag),
            Error::UnknownAlgorithmName => write!(f, "Unknown algorithm name"),
            Error::BufferTooSmall { needed, available } => {
                write!(f, "Buffer too small: need {} bytes, got {}", needed, available)
            }
            Error::MalformedState(reason) => write!(f, "Malformed state: {}", reason),
            Error::OddHexLength => write!(f, "Hex string has odd length"),
            Error::InvalidHexCharacter { c, index } => {
                write!(f, "Invalid hex character {:?} at position {}", c, index)
            }
        }
    }
}

impl fmt::Display for MalformedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedState::Truncated => write!(f, "truncated"),
            MalformedState::UnknownVersion(v) => write!(f, "unknown version {}", v),
            MalformedState::UnknownAlgorithm(tag) => write!(f, "unknown algorithm tag {}", tag),
            MalformedState::BlockSizeMismatch => write!(f, "block size does not match algorithm"),
            MalformedState::OutputSizeMismatch => write!(f, "output size does not match algorithm"),
            MalformedState::InvalidFlag(b) => write!(f, "invalid flag byte {:#04x}", b),
            MalformedState::MisalignedLength(bits) => {
                write!(f, "message length {} bits is not byte aligned", bits)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
