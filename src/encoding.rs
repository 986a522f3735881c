//! Hex encoding shared by hashes, keys, signatures and addresses.
//!
//! Input is accepted with or without a `0x` prefix and in any letter case.
//! Output is always lowercase with a `0x` prefix.

use crate::error::{Result, SignError};

/// Trim surrounding whitespace and strip one optional `0x`/`0X` prefix.
pub fn normalize(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decode hex of any length.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(normalize(input))?)
}

/// Decode hex into exactly `N` bytes, naming `field` in the length error.
pub fn decode_fixed<const N: usize>(input: &str, field: &'static str) -> Result<[u8; N]> {
    let bytes = decode(input)?;
    to_array(&bytes, field)
}

/// Copy a slice into a fixed-size array, checking its length.
pub fn to_array<const N: usize>(bytes: &[u8], field: &'static str) -> Result<[u8; N]> {
    if bytes.len() != N {
        return Err(SignError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(bytes);
    Ok(arr)
}

/// Encode bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_optional() {
        assert_eq!(decode("0xdeadbeef").unwrap(), decode("deadbeef").unwrap());
        assert_eq!(decode("0XDEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("  0xAbCd \n").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(decode("0xzz"), Err(SignError::InvalidHex(_))));
        assert!(matches!(decode("abc"), Err(SignError::InvalidHex(_))));
    }

    #[test]
    fn test_fixed_length() {
        let arr: [u8; 2] = decode_fixed("0x0102", "test").unwrap();
        assert_eq!(arr, [1, 2]);

        let err = decode_fixed::<2>("010203", "test").unwrap_err();
        assert!(matches!(
            err,
            SignError::InvalidLength { expected: 2, actual: 3, .. }
        ));

        // A bare prefix decodes to zero bytes.
        assert!(matches!(
            decode_fixed::<2>("0x", "test"),
            Err(SignError::InvalidLength { actual: 0, .. })
        ));
    }

    #[test]
    fn test_encode_prefixed() {
        assert_eq!(encode_prefixed(&[0xAB, 0x01]), "0xab01");
        assert_eq!(encode_prefixed(&[]), "0x");
    }
}
