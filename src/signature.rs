//! Recoverable ECDSA signatures over content hashes.

use crate::encoding;
use crate::error::{Result, SignError};
use crate::hash::ContentHash;
use crate::keys::{Address, PrivateKey};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The size of a recoverable signature: `r ‖ s ‖ v`.
pub const SIGNATURE_SIZE: usize = 65;

/// A 65-byte recoverable secp256k1 signature.
///
/// Signatures produced here always carry `v` in `{0, 1}` and a low `s`.
/// Parsed signatures may also use the `27`/`28` convention.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    /// Sign a content hash. Nonces follow RFC 6979, so the same hash and
    /// key always produce the same signature.
    pub fn sign(hash: &ContentHash, key: &PrivateKey) -> Result<Self> {
        let (signature, recovery_id) = key
            .signing_key()
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|e| SignError::InvalidKey(e.to_string()))?;

        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(Self(bytes))
    }

    /// Create a signature from exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        encoding::to_array(bytes, "signature").map(Self)
    }

    /// Get the raw bytes of the signature.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// The recovery indicator byte as stored.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Recover the address that produced this signature over `hash`.
    ///
    /// Any well-formed signature recovers to some address; whether it is
    /// the expected signer is for the caller to decide.
    pub fn recover_address(&self, hash: &ContentHash) -> Result<Address> {
        let recovery_id = self.recovery_id()?;
        let signature = EcdsaSignature::from_slice(&self.0[..64])
            .map_err(|_| SignError::InvalidSignature("r or s out of range".to_string()))?;
        let key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &signature, recovery_id)
            .map_err(|_| SignError::InvalidSignature("no public key recovers".to_string()))?;
        Ok(Address::from_verifying_key(&key))
    }

    fn recovery_id(&self) -> Result<RecoveryId> {
        let v = match self.v() {
            v @ 27..=30 => v - 27,
            v => v,
        };
        RecoveryId::from_byte(v).ok_or_else(|| {
            SignError::InvalidSignature(format!("invalid recovery indicator {}", self.v()))
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::encode_prefixed(&self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl FromStr for Signature {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        encoding::decode_fixed(s, "signature").map(Self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;

    fn test_key() -> PrivateKey {
        PrivateKey::from_hex("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
            .unwrap()
    }

    #[test]
    fn test_sign_and_recover() {
        let key = test_key();
        let hash = hash_bytes(b"hello");

        let signature = Signature::sign(&hash, &key).unwrap();
        assert!(signature.v() <= 1);
        assert_eq!(signature.recover_address(&hash).unwrap(), key.address());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = test_key();
        let hash = hash_bytes(b"Test document content");

        let first = Signature::sign(&hash, &key).unwrap();
        let second = Signature::sign(&hash, &key).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_hash_recovers_other_address() {
        let key = test_key();
        let signature = Signature::sign(&hash_bytes(b"original"), &key).unwrap();

        // Recovery still succeeds, it just names somebody else.
        let recovered = signature.recover_address(&hash_bytes(b"tampered")).unwrap();
        assert_ne!(recovered, key.address());
    }

    #[test]
    fn test_electrum_recovery_indicator() {
        let key = test_key();
        let hash = hash_bytes(b"hello");
        let signature = Signature::sign(&hash, &key).unwrap();

        let mut bytes = *signature.as_bytes();
        bytes[64] += 27;
        let electrum = Signature::from_slice(&bytes).unwrap();
        assert_eq!(electrum.recover_address(&hash).unwrap(), key.address());
    }

    #[test]
    fn test_invalid_recovery_indicator() {
        let key = test_key();
        let hash = hash_bytes(b"hello");
        let mut bytes = *Signature::sign(&hash, &key).unwrap().as_bytes();
        bytes[64] = 9;

        let result = Signature::from_slice(&bytes).unwrap().recover_address(&hash);
        assert!(matches!(result, Err(SignError::InvalidSignature(_))));
    }

    #[test]
    fn test_zero_signature_fails_recovery() {
        let signature = Signature::from_slice(&[0u8; SIGNATURE_SIZE]).unwrap();
        let result = signature.recover_address(&hash_bytes(b"hello"));
        assert!(matches!(result, Err(SignError::InvalidSignature(_))));
    }

    #[test]
    fn test_parse_lengths() {
        let signature = Signature::sign(&hash_bytes(b"hello"), &test_key()).unwrap();
        let text = signature.to_string();

        assert_eq!(text.len(), 2 + 130);
        assert_eq!(text.parse::<Signature>().unwrap(), signature);
        assert_eq!(text[2..].parse::<Signature>().unwrap(), signature);

        assert!(matches!(
            text[..text.len() - 2].parse::<Signature>(),
            Err(SignError::InvalidLength { expected: 65, actual: 64, .. })
        ));
    }
}
