//! File and stream checksums.

use std::io::{Seek, SeekFrom, Write};

use splax_sha2::{checksum_file, checksum_stream, digest, Algorithm};

#[test]
fn test_checksum_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let data: Vec<u8> = (0..100_000u32).map(|i| (i ^ (i >> 8)) as u8).collect();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    for algorithm in Algorithm::ALL {
        let sum = checksum_file(file.path(), algorithm).unwrap();
        assert_eq!(sum, digest(algorithm, &data), "{}", algorithm);
    }
}

#[test]
fn test_checksum_empty_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let sum = checksum_file(file.path(), Algorithm::Sha224).unwrap();
    assert_eq!(
        format!("{:x}", sum),
        "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
    );
}

#[test]
fn test_checksum_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = checksum_file(dir.path().join("absent"), Algorithm::Sha256).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_checksum_open_handle() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"abc").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let sum = checksum_stream(&mut file, Algorithm::Sha256).unwrap();
    assert_eq!(
        format!("{:x}", sum),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
