//! Digest output.

use core::fmt;

use subtle::ConstantTimeEq;

/// Largest digest of the family (SHA-512), in bytes.
pub const MAX_OUTPUT_SIZE: usize = 64;

/// A finished hash or MAC, stored inline.
#[derive(Clone, Copy)]
pub struct Digest {
    bytes: [u8; MAX_OUTPUT_SIZE],
    len: usize,
}

impl Digest {
    pub(crate) fn zeroed(len: usize) -> Self {
        debug_assert!(len <= MAX_OUTPUT_SIZE);
        Self {
            bytes: [0u8; MAX_OUTPUT_SIZE],
            len,
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }

    /// Digest bytes, exactly `len()` of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Digest size in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the digest holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Constant-time comparison against an expected value.
    pub fn verify(&self, expected: &[u8]) -> bool {
        self.as_bytes().ct_eq(expected).into()
    }

    /// Lowercase hex rendering.
    #[cfg(feature = "alloc")]
    pub fn to_hex(&self) -> alloc::string::String {
        crate::hex::encode_lower(self.as_bytes())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Digest {}

impl PartialEq<[u8]> for Digest {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:x})", self)
    }
}
