//! The signature envelope and its JSON form.

use crate::error::{Result, SignError};
use crate::hash::ContentHash;
use crate::keys::Address;
use crate::signature::Signature;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Descriptive data about the signed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    /// File name of the signed document.
    pub name: String,

    /// Free text entered by the signer.
    pub description: String,

    /// When the envelope was created, in UTC.
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
}

impl Metadata {
    /// Metadata stamped with the current time, truncated to whole seconds.
    pub fn now<N: Into<String>, D: Into<String>>(name: N, description: D) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }
}

/// A signed statement about one file's exact content.
///
/// `signer` is the address derived at signing time. Nothing re-checks it
/// on load; use [`crate::Verifier`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DocumentEnvelope {
    /// Name, description and creation time.
    pub metadata: Metadata,

    /// SHA-256 of the signed file, written as `fileHash`.
    pub file_hash: ContentHash,

    /// Recoverable signature over `file_hash`.
    pub signature: Signature,

    /// Address of the key that produced `signature`.
    pub signer: Address,
}

impl DocumentEnvelope {
    /// Assemble an envelope from its parts. No signature check is made.
    pub fn new(
        metadata: Metadata,
        file_hash: ContentHash,
        signature: Signature,
        signer: Address,
    ) -> Self {
        Self {
            metadata,
            file_hash,
            signature,
            signer,
        }
    }

    /// Serialize the envelope to pretty JSON with 2-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an envelope from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SignError::MalformedEnvelope(e.to_string()))
    }

    /// Save the envelope to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load an envelope from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;
    use crate::keys::PrivateKey;
    use chrono::TimeZone;

    fn sample() -> DocumentEnvelope {
        let key = PrivateKey::from_hex(&format!("{:064x}", 7)).unwrap();
        let hash = hash_bytes(b"Test document content");
        let signature = Signature::sign(&hash, &key).unwrap();
        let metadata = Metadata {
            name: "contract.pdf".to_string(),
            description: "Quarterly agreement".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        };
        DocumentEnvelope::new(metadata, hash, signature, key.address())
    }

    #[test]
    fn test_json_layout() {
        let envelope = sample();
        let json = envelope.to_json().unwrap();

        let expected = format!(
            "{{\n  \"metadata\": {{\n    \"name\": \"contract.pdf\",\n    \"description\": \"Quarterly agreement\",\n    \"timestamp\": \"2024-03-01T12:30:00Z\"\n  }},\n  \"fileHash\": \"{}\",\n  \"signature\": \"{}\",\n  \"signer\": \"{}\"\n}}",
            envelope.file_hash, envelope.signature, envelope.signer
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_roundtrip() {
        let envelope = sample();
        let restored = DocumentEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(restored, envelope);
    }

    #[test]
    fn test_subsecond_timestamp_roundtrip() {
        let mut envelope = sample();
        envelope.metadata.timestamp = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let restored = DocumentEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(restored, envelope);
    }

    #[test]
    fn test_missing_signer_is_malformed() {
        let json = sample().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("signer");

        let result = DocumentEnvelope::from_json(&value.to_string());
        assert!(matches!(result, Err(SignError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_extra_field_is_malformed() {
        let json = sample().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["metadata"]["author"] = serde_json::json!("mallory");

        let result = DocumentEnvelope::from_json(&value.to_string());
        assert!(matches!(result, Err(SignError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_mistyped_fields_are_malformed() {
        let json = sample().to_json().unwrap();

        let mut short_hash: serde_json::Value = serde_json::from_str(&json).unwrap();
        short_hash["fileHash"] = serde_json::json!("0x1234");
        assert!(DocumentEnvelope::from_json(&short_hash.to_string()).is_err());

        let mut numeric: serde_json::Value = serde_json::from_str(&json).unwrap();
        numeric["metadata"]["timestamp"] = serde_json::json!(1700000000);
        assert!(DocumentEnvelope::from_json(&numeric.to_string()).is_err());
    }

    #[test]
    fn test_metadata_now_has_whole_seconds() {
        let metadata = Metadata::now("a.txt", "");
        assert_eq!(metadata.timestamp.timestamp_subsec_nanos(), 0);
    }
}
