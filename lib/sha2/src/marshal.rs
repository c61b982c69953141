//! Suspend/resume format for hash states.
//!
//! All integers are native-endian and fixed width, so a blob is only valid on
//! the machine family that wrote it.
//!
//! ```text
//! i32 version | u32 algorithm | u64 message_bits | k[R] | w[R] (v0 only)
//!   | h[8] | u64 block_size | partial block
//! ```
//!
//! Version 1 stores only the live bytes of the partial block. Version 0 also
//! carries the message schedule and a full block of buffer; it is accepted
//! but never written.

use crate::algorithm::{Algorithm, WordWidth};
use crate::compress::Lanes;
use crate::error::{Error, MalformedState};
use crate::state::{HashState, Words, MAX_BLOCK_SIZE};
use crate::word::Word;

/// Version written by [`HashState::marshal`].
pub const MARSHAL_VERSION: i32 = 1;

/// Older layout, still accepted by [`HashState::unmarshal`].
pub const LEGACY_MARSHAL_VERSION: i32 = 0;

/// Appends fixed-width fields to a buffer already known to be large enough.
pub(crate) struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    pub(crate) fn i32(&mut self, v: i32) {
        self.bytes(&v.to_ne_bytes());
    }

    pub(crate) fn u32(&mut self, v: u32) {
        self.bytes(&v.to_ne_bytes());
    }

    pub(crate) fn u64(&mut self, v: u64) {
        self.bytes(&v.to_ne_bytes());
    }

    pub(crate) fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn words<W: Word>(&mut self, words: &[W]) {
        for word in words {
            word.write_ne(&mut self.buf[self.pos..]);
            self.pos += W::BYTES;
        }
    }
}

/// Consumes fixed-width fields, failing with `Truncated` past the end.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn skip(&mut self, n: usize) -> Result<(), MalformedState> {
        self.take(n).map(|_| ())
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], MalformedState> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(MalformedState::Truncated)?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], MalformedState> {
        let mut raw = [0u8; N];
        raw.copy_from_slice(self.take(N)?);
        Ok(raw)
    }

    pub(crate) fn i32(&mut self) -> Result<i32, MalformedState> {
        self.array().map(i32::from_ne_bytes)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, MalformedState> {
        self.array().map(u32::from_ne_bytes)
    }

    pub(crate) fn u64(&mut self) -> Result<u64, MalformedState> {
        self.array().map(u64::from_ne_bytes)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, MalformedState> {
        self.array().map(|[b]: [u8; 1]| b)
    }

    fn words<W: Word>(&mut self, out: &mut [W]) -> Result<(), MalformedState> {
        let raw = self.take(out.len() * W::BYTES)?;
        for (word, bytes) in out.iter_mut().zip(raw.chunks_exact(W::BYTES)) {
            *word = W::from_ne_slice(bytes);
        }
        Ok(())
    }
}

/// Fixed header: version, algorithm, message_bits.
const HEADER_SIZE: usize = 4 + 4 + 8;

impl<W: Word, const R: usize> Lanes<W, R> {
    fn marshalled_size() -> usize {
        (R + 8) * W::BYTES
    }

    fn write_to(&self, w: &mut Writer<'_>) {
        w.words(&self.k);
        w.words(&self.h);
    }

    fn read_from(r: &mut Reader<'_>, version: i32) -> Result<Self, MalformedState> {
        let mut lanes = Self::new(&[W::ZERO; R], &[W::ZERO; 8]);
        r.words(&mut lanes.k)?;
        if version == LEGACY_MARSHAL_VERSION {
            // Scratch only; recomputed for every block
            r.skip(R * W::BYTES)?;
        }
        r.words(&mut lanes.h)?;
        Ok(lanes)
    }
}

impl HashState {
    /// Bytes [`marshal`](Self::marshal) will write for the current state.
    pub fn marshalled_size(&self) -> usize {
        let lanes = match &self.words {
            Words::Narrow(_) => Lanes::<u32, 64>::marshalled_size(),
            Words::Wide(_) => Lanes::<u64, 80>::marshalled_size(),
        };
        HEADER_SIZE + lanes + 8 + self.buffered()
    }

    /// Serializes the state into `buf`, returning the number of bytes written.
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

    pub(crate) fn write_to(&self, w: &mut Writer<'_>) {
        w.i32(MARSHAL_VERSION);
        w.u32(self.algorithm.tag());
        w.u64(self.message_bits);
        match &self.words {
            Words::Narrow(lanes) => lanes.write_to(w),
            Words::Wide(lanes) => lanes.write_to(w),
        }
        w.u64(self.block_size() as u64);
        w.bytes(&self.chunk[..self.buffered()]);
    }

    /// Restores a state from a blob written by [`marshal`](Self::marshal)
    /// (or by the legacy version 0 layout).
    ///
    /// Returns the state and the number of bytes consumed.
    pub fn unmarshal(buf: &[u8]) -> Result<(HashState, usize), Error> {
        let mut r = Reader::new(buf);
        match Self::read_from(&mut r) {
            Ok(state) => Ok((state, r.position())),
            Err(reason) => {
                log::debug!("sha2: rejecting marshalled state: {}", reason);
                Err(reason.into())
            }
        }
    }

    pub(crate) fn read_from(r: &mut Reader<'_>) -> Result<HashState, MalformedState> {
        let version = r.i32()?;
        if version != MARSHAL_VERSION && version != LEGACY_MARSHAL_VERSION {
            return Err(MalformedState::UnknownVersion(version));
        }

        let tag = r.u32()?;
        let algorithm =
            Algorithm::from_tag(tag).map_err(|_| MalformedState::UnknownAlgorithm(tag))?;
        let message_bits = r.u64()?;
        if message_bits % 8 != 0 {
            return Err(MalformedState::MisalignedLength(message_bits));
        }

        let words = match algorithm.word_width() {
            WordWidth::Bits32 => Words::Narrow(Lanes::read_from(r, version)?),
            WordWidth::Bits64 => Words::Wide(Lanes::read_from(r, version)?),
        };

        let block_size = algorithm.block_size();
        if r.u64()? != block_size as u64 {
            return Err(MalformedState::BlockSizeMismatch);
        }

        let partial_len = if version == LEGACY_MARSHAL_VERSION {
            block_size
        } else {
            ((message_bits / 8) % block_size as u64) as usize
        };
        let mut chunk = [0u8; MAX_BLOCK_SIZE];
        chunk[..partial_len].copy_from_slice(r.take(partial_len)?);

        Ok(HashState {
            algorithm,
            message_bits,
            words,
            chunk,
        })
    }
}
