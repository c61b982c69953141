//! Checksums of readers and files.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use crate::algorithm::Algorithm;
use crate::digest::Digest;
use crate::state::HashState;

/// Read size when the filesystem does not suggest one.
const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Hashes everything `reader` yields until end of stream.
///
/// Interrupted reads are retried; any other I/O error aborts the checksum.
pub fn checksum_stream<R: Read>(reader: R, algorithm: Algorithm) -> io::Result<Digest> {
    checksum_with_buffer(reader, algorithm, DEFAULT_BUFFER_SIZE)
}

/// Hashes the contents of the file at `path`.
///
/// Reads in units of the filesystem's preferred block size.
pub fn checksum_file(path: impl AsRef<Path>, algorithm: Algorithm) -> io::Result<Digest> {
    let file = File::open(path)?;
    let size = preferred_block_size(&file);
    checksum_with_buffer(file, algorithm, size)
}

fn checksum_with_buffer<R: Read>(mut reader: R, algorithm: Algorithm, size: usize) -> io::Result<Digest> {
    let mut state = HashState::new(algorithm);
    let mut buf = vec![0u8; size];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => state.update(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(state.finalize())
}

#[cfg(unix)]
fn preferred_block_size(file: &File) -> usize {
    use std::os::unix::fs::MetadataExt;

    file.metadata()
        .ok()
        .map(|meta| meta.blksize() as usize)
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_BUFFER_SIZE)
}

#[cfg(not(unix))]
fn preferred_block_size(_file: &File) -> usize {
    DEFAULT_BUFFER_SIZE
}
