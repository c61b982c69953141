//! # Splax SHA-2
//!
//! SHA-2 family hash functions and HMAC for both kernel (no_std) and
//! userspace (std) environments.
//!
//! ## Algorithms
//!
//! - **SHA-224 / SHA-256**: 32-bit words, 64-byte blocks
//! - **SHA-384 / SHA-512**: 64-bit words, 128-byte blocks
//! - **SHA-512/224 / SHA-512/256**: truncated SHA-512 with their own IVs
//! - **HMAC** over any of the above
//!
//! ## Design
//!
//! - One generic compression function over 32- and 64-bit words
//! - SHA-NI acceleration for the 32-bit family, detected once per process
//! - Bit-granular final input
//! - Hash and HMAC states can be marshalled, stored and resumed later
//! - No dynamic allocation in core operations
//! - States are zeroed on drop
//!
//! ## Usage
//!
//! ```rust
//! use splax_sha2::{Algorithm, HashState};
//!
//! let mut state = HashState::new(Algorithm::Sha256);
//! state.update(b"ab");
//! state.update(b"c");
//! let digest = state.finalize();
//! assert_eq!(
//!     format!("{:x}", digest),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod algorithm;
pub mod compress;
pub mod digest;
pub mod error;
pub mod hmac;
pub mod marshal;
pub mod state;
mod word;

#[cfg(feature = "alloc")]
pub mod hex;
#[cfg(feature = "std")]
pub mod stream;

pub use algorithm::{algorithm_output_size, Algorithm, WordWidth};
pub use compress::Backend;
pub use digest::{Digest, MAX_OUTPUT_SIZE};
pub use error::{Error, MalformedState};
pub use hmac::HmacState;
pub use state::{HashState, MAX_BLOCK_SIZE};

#[cfg(feature = "std")]
pub use stream::{checksum_file, checksum_stream};

/// One-shot hash of `data`.
pub fn digest(algorithm: Algorithm, data: &[u8]) -> Digest {
    let mut state = HashState::new(algorithm);
    state.update(data);
    state.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_matches_streaming() {
        let mut state = HashState::new(Algorithm::Sha384);
        state.update(b"hello ");
        state.update(b"world");
        assert_eq!(state.finalize(), digest(Algorithm::Sha384, b"hello world"));
    }
}
