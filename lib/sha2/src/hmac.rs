//! HMAC (RFC 2104) over the SHA-2 family.
//!
//! The inner pad is absorbed lazily on the first update, and a finished
//! state keeps its pads so it can authenticate the next message.

use core::fmt;
use core::mem;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::Algorithm;
use crate::digest::Digest;
use crate::error::{Error, MalformedState};
use crate::marshal::{Reader, Writer};
use crate::state::{HashState, MAX_BLOCK_SIZE};

/// Version written by [`HmacState::marshal`].
pub const HMAC_MARSHAL_VERSION: i32 = 0;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Keyed HMAC computation.
#[derive(Clone)]
pub struct HmacState {
    state: HashState,
    output_bits: usize,
    /// Inner pad already absorbed into `state`
    initialized: bool,
    inner_pad: [u8; MAX_BLOCK_SIZE],
    outer_pad: [u8; MAX_BLOCK_SIZE],
}

impl HmacState {
    /// Creates an HMAC state keyed with the whole of `key`.
    pub fn new(algorithm: Algorithm, key: &[u8]) -> Self {
        Self::with_key_bits(algorithm, key, key.len() * 8)
    }

    /// Creates an HMAC state keyed with the first `key_bits` bits of `key`.
    ///
    /// Keys longer than one block are hashed first.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds fewer than `key_bits` bits.
    pub fn with_key_bits(algorithm: Algorithm, key: &[u8], key_bits: usize) -> Self {
        let block = algorithm.block_size();
        let mut key_block = [0u8; MAX_BLOCK_SIZE];

        if key_bits > block * 8 {
            let digest = HashState::new(algorithm).finalize_bits(key, key_bits);
            key_block[..digest.len()].copy_from_slice(digest.as_bytes());
        } else {
            let n = key_bits / 8;
            key_block[..n].copy_from_slice(&key[..n]);
            let residue = key_bits % 8;
            if residue != 0 {
                key_block[n] = key[n] << (8 - residue);
            }
        }

        let mut inner_pad = [IPAD; MAX_BLOCK_SIZE];
        let mut outer_pad = [OPAD; MAX_BLOCK_SIZE];
        for ((i, o), k) in inner_pad.iter_mut().zip(outer_pad.iter_mut()).zip(key_block.iter()) {
            *i ^= k;
            *o ^= k;
        }
        key_block.zeroize();

        Self {
            state: HashState::new(algorithm),
            output_bits: algorithm.output_size() * 8,
            initialized: false,
            inner_pad,
            outer_pad,
        }
    }

    /// Creates an HMAC state from a numeric algorithm tag.
    pub fn from_tag(tag: u32, key: &[u8], key_bits: usize) -> Result<Self, Error> {
        let algorithm = Algorithm::from_tag(tag)?;
        Ok(Self::with_key_bits(algorithm, key, key_bits))
    }

    /// One-shot MAC of `data` under `key`.
    pub fn mac(algorithm: Algorithm, key: &[u8], data: &[u8]) -> Digest {
        let mut hmac = Self::new(algorithm, key);
        hmac.update(data);
        hmac.finalize()
    }

    /// Underlying hash algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.state.algorithm()
    }

    /// MAC size in bytes.
    pub fn output_size(&self) -> usize {
        self.output_bits / 8
    }

    fn absorb_inner_pad(&mut self) {
        if !self.initialized {
            self.state.reset();
            let block = self.state.block_size();
            self.state.update(&self.inner_pad[..block]);
            self.initialized = true;
        }
    }

    /// Absorbs `data`.
    pub fn update(&mut self, data: &[u8]) {
        self.absorb_inner_pad();
        self.state.update(data);
    }

    /// Absorbs the first `bits / 8` bytes of `data`; see
    /// [`HashState::update_bits`].
    pub fn update_bits(&mut self, data: &[u8], bits: usize) {
        self.absorb_inner_pad();
        self.state.update_bits(data, bits);
    }

    /// Finishes the current message and returns its MAC.
    pub fn finalize(&mut self) -> Digest {
        self.finalize_bits(&[], 0)
    }

    /// Absorbs the first `bits` bits of `trailing` and returns the MAC.
    ///
    /// The state is ready for a new message afterwards.
    pub fn finalize_bits(&mut self, trailing: &[u8], bits: usize) -> Digest {
        self.absorb_inner_pad();
        let algorithm = self.algorithm();
        let block = algorithm.block_size();

        let inner = mem::replace(&mut self.state, HashState::new(algorithm))
            .finalize_bits(trailing, bits);
        self.state.update(&self.outer_pad[..block]);
        let outer = mem::replace(&mut self.state, HashState::new(algorithm))
            .finalize_bits(inner.as_bytes(), self.output_bits);

        self.initialized = false;
        outer
    }

    /// Like [`finalize_bits`](Self::finalize_bits), writing into `out`.
    pub fn finalize_into(&mut self, trailing: &[u8], bits: usize, out: &mut [u8]) -> Result<usize, Error> {
        let size = self.output_size();
        if out.len() < size {
            return Err(Error::BufferTooSmall {
                needed: size,
                available: out.len(),
            });
        }
        let mac = self.finalize_bits(trailing, bits);
        out[..size].copy_from_slice(mac.as_bytes());
        Ok(size)
    }

    /// Finishes the message with `trailing` and compares the MAC against
    /// `tag` in constant time.
    pub fn verify(&mut self, trailing: &[u8], tag: &[u8]) -> bool {
        self.finalize_bits(trailing, trailing.len() * 8).verify(tag)
    }

    /// Bytes [`marshal`](Self::marshal) will write for the current state.
    pub fn marshalled_size(&self) -> usize {
        4 + self.state.marshalled_size() + 8 + 1 + 2 * self.state.block_size()
    }

    /// Serializes the state into `buf`, returning the number of bytes written.
    ///
    /// The blob contains both key pads.
    pub fn marshal(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let needed = self.marshalled_size();
        if buf.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        let mut w = Writer::new(buf);
        self.write_to(&mut w);
        Ok(w.position())
    }

    /// Serializes the state into a new vector.
    #[cfg(feature = "alloc")]
    pub fn to_bytes(&self) -> alloc::vec::Vec<u8> {
        let mut buf = alloc::vec![0u8; self.marshalled_size()];
        self.write_to(&mut Writer::new(&mut buf));
        buf
    }

    fn write_to(&self, w: &mut Writer<'_>) {
        let block = self.state.block_size();
        w.i32(HMAC_MARSHAL_VERSION);
        self.state.write_to(w);
        w.u64(self.output_bits as u64);
        w.u8(u8::from(self.initialized));
        w.bytes(&self.inner_pad[..block]);
        w.bytes(&self.outer_pad[..block]);
    }

    /// Restores a state from a blob written by [`marshal`](Self::marshal).
    ///
    /// Returns the state and the number of bytes consumed.
    pub fn unmarshal(buf: &[u8]) -> Result<(HmacState, usize), Error> {
        let mut r = Reader::new(buf);
        match Self::read_from(&mut r) {
            Ok(hmac) => Ok((hmac, r.position())),
            Err(reason) => {
                log::debug!("sha2: rejecting marshalled hmac state: {}", reason);
                Err(reason.into())
            }
        }
    }

    fn read_from(r: &mut Reader<'_>) -> Result<HmacState, MalformedState> {
        let version = r.i32()?;
        if version != HMAC_MARSHAL_VERSION {
            return Err(MalformedState::UnknownVersion(version));
        }

        let state = HashState::read_from(r)?;
        let algorithm = state.algorithm();

        let output_bits = r.u64()?;
        if output_bits != (algorithm.output_size() * 8) as u64 {
            return Err(MalformedState::OutputSizeMismatch);
        }

        let initialized = match r.u8()? {
            0 => false,
            1 => true,
            flag => return Err(MalformedState::InvalidFlag(flag)),
        };

        let block = algorithm.block_size();
        let mut inner_pad = [0u8; MAX_BLOCK_SIZE];
        let mut outer_pad = [0u8; MAX_BLOCK_SIZE];
        inner_pad[..block].copy_from_slice(r.take(block)?);
        outer_pad[..block].copy_from_slice(r.take(block)?);

        Ok(HmacState {
            state,
            output_bits: algorithm.output_size() * 8,
            initialized,
            inner_pad,
            outer_pad,
        })
    }

    /// Zeroes the state and both key pads.
    pub fn wipe(&mut self) {
        log::trace!("sha2: wiping hmac {} state", self.algorithm());
        self.zeroize();
    }
}

impl Zeroize for HmacState {
    fn zeroize(&mut self) {
        self.state.zeroize();
        self.initialized = false;
        self.inner_pad.zeroize();
        self.outer_pad.zeroize();
    }
}

impl Drop for HmacState {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for HmacState {}

impl fmt::Debug for HmacState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacState")
            .field("algorithm", &self.algorithm())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
