//! Hex conversion for digests and keys.

use alloc::string::String;
use alloc::vec::Vec;

use ::hex::FromHexError;

use crate::error::Error;

fn map_error(err: FromHexError, needed: usize, available: usize) -> Error {
    match err {
        FromHexError::InvalidHexCharacter { c, index } => Error::InvalidHexCharacter { c, index },
        FromHexError::OddLength => Error::OddHexLength,
        FromHexError::InvalidStringLength => Error::BufferTooSmall { needed, available },
    }
}

/// Lowercase hex encoding of `data`.
pub fn encode_lower(data: &[u8]) -> String {
    ::hex::encode(data)
}

/// Uppercase hex encoding of `data`.
pub fn encode_upper(data: &[u8]) -> String {
    ::hex::encode_upper(data)
}

/// Decodes a hex string. Mixed case is accepted; odd length is an error.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    let input = input.as_ref();
    ::hex::decode(input).map_err(|err| map_error(err, input.len() / 2, input.len() / 2))
}

/// Decodes a hex string into `out`, returning the number of bytes written.
pub fn decode_into(input: impl AsRef<[u8]>, out: &mut [u8]) -> Result<usize, Error> {
    let input = input.as_ref();
    if input.len() % 2 != 0 {
        return Err(Error::OddHexLength);
    }
    let needed = input.len() / 2;
    let available = out.len();
    if available < needed {
        return Err(Error::BufferTooSmall { needed, available });
    }
    ::hex::decode_to_slice(input, &mut out[..needed])
        .map_err(|err| map_error(err, needed, available))?;
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_cases() {
        let data = [0x00, 0x9f, 0xa0, 0xff];
        assert_eq!(encode_lower(&data), "009fa0ff");
        assert_eq!(encode_upper(&data), "009FA0FF");
        assert_eq!(encode_lower(&[]), "");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode("DeadBEEF"), Ok(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("abc"), Err(Error::OddHexLength));
        assert_eq!(
            decode("0g"),
            Err(Error::InvalidHexCharacter { c: 'g', index: 1 })
        );
    }

    #[test]
    fn test_decode_into() {
        let mut out = [0u8; 4];
        assert_eq!(decode_into("0102", &mut out), Ok(2));
        assert_eq!(out, [1, 2, 0, 0]);
        assert_eq!(
            decode_into("0102030405", &mut out),
            Err(Error::BufferTooSmall { needed: 5, available: 4 })
        );
        assert_eq!(decode_into("012", &mut out), Err(Error::OddHexLength));
    }

    #[test]
    fn test_digest_round_trip() {
        let digest = crate::digest(crate::Algorithm::Sha224, b"abc");
        let text = digest.to_hex();
        assert_eq!(decode(&text).unwrap(), digest.as_bytes());
        assert_eq!(text, format!("{:x}", digest));
        assert_eq!(encode_upper(digest.as_bytes()), format!("{:X}", digest));
    }
}
