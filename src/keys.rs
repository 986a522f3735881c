//! secp256k1 private keys and the addresses derived from them.

use crate::encoding;
use crate::error::{Result, SignError};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// The size of a private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// The size of an address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// A secp256k1 private key.
///
/// The wrapped key is zeroized on drop and is never serialized.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Parse a key from hex, with or without `0x`.
    ///
    /// Errors never include any part of the input.
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(encoding::normalize(input))
                .map_err(|_| SignError::InvalidKey("not a hex string".to_string()))?,
        );
        Self::from_slice(&bytes)
    }

    /// Create a key from exactly 32 big-endian bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(SignError::InvalidKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| SignError::InvalidKey("scalar out of range".to_string()))?;
        Ok(Self { signing_key })
    }

    /// Derive the address controlled by this key.
    pub fn address(&self) -> Address {
        Address::from_verifying_key(self.signing_key.verifying_key())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// A 20-byte account address derived from a public key.
///
/// Equality compares bytes, so two hex spellings that differ only in case
/// are the same address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Derive the address of a public key: the last 20 bytes of the
    /// Keccak-256 hash of the uncompressed point without its `0x04` tag.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// EIP-55 mixed-case checksum encoding with a `0x` prefix.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        encoding::decode_fixed(s, "address").map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEB3_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_known_addresses() {
        let one = format!("{:064x}", 1);
        let key = PrivateKey::from_hex(&one).unwrap();
        assert_eq!(
            key.address().to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );

        let key = PrivateKey::from_hex(WEB3_KEY).unwrap();
        assert_eq!(
            key.address().to_string(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_prefix_optional() {
        let with = PrivateKey::from_hex(WEB3_KEY).unwrap();
        let without = PrivateKey::from_hex(&WEB3_KEY[2..]).unwrap();
        assert_eq!(with.address(), without.address());
    }

    #[test]
    fn test_rejects_invalid_keys() {
        // Zero is not a valid scalar.
        assert!(matches!(
            PrivateKey::from_hex(&"00".repeat(32)),
            Err(SignError::InvalidKey(_))
        ));
        // Curve order n is out of range.
        let n = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(PrivateKey::from_hex(n).is_err());
        // Short and non-hex input.
        assert!(PrivateKey::from_hex(&"11".repeat(31)).is_err());
        assert!(PrivateKey::from_hex("not a key").is_err());
    }

    #[test]
    fn test_error_does_not_echo_key() {
        let secret = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f36231g";
        let err = PrivateKey::from_hex(secret).unwrap_err().to_string();
        assert!(!err.contains("4c0883a6"));
        assert!(!err.contains("position"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PrivateKey::from_hex(WEB3_KEY).unwrap();
        let shown = format!("{:?}", key);
        assert!(!shown.contains("4c0883a6"));
        assert!(shown.contains("0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"));
    }

    #[test]
    fn test_address_parse_is_case_insensitive() {
        let checksum: Address = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23".parse().unwrap();
        let lower: Address = "2c7536e3605d9c16a7a3d7b1898e529396a65c23".parse().unwrap();
        assert_eq!(checksum, lower);
        assert_eq!(lower.to_string(), "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23");
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(PrivateKey::generate().address(), PrivateKey::generate().address());
    }
}
