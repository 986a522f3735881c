//! Signer recovery and verification.

use crate::envelope::DocumentEnvelope;
use crate::error::{Result, SignError};
use crate::flow::{Prompt, Stage};
use crate::hash::{hash_bytes, hash_file, hash_reader, ContentHash};
use crate::keys::Address;
use crate::signature::Signature;
use std::io::Read;
use std::path::Path;
use tracing::info;

const HASH_PROMPT: Prompt = Prompt::new("Enter the hash that has been signed:");
const SIGNATURE_PROMPT: Prompt = Prompt::new("Enter the signature of the hash:");

#[derive(Debug)]
enum RecoverState {
    EnterHash,
    EnterSignature {
        hash: ContentHash,
    },
    Done {
        hash: ContentHash,
        signature: Signature,
        signer: Address,
    },
}

/// Asks for a hash and a signature, then recovers the signer address.
///
/// Recovery runs as soon as the signature is entered. A signature that
/// parses but recovers no key is rejected like any other bad input.
#[derive(Debug)]
pub struct RecoverFlow {
    state: RecoverState,
}

impl RecoverFlow {
    pub fn new() -> Self {
        Self {
            state: RecoverState::EnterHash,
        }
    }

    /// The hash entered so far.
    pub fn hash(&self) -> Option<ContentHash> {
        match self.state {
            RecoverState::EnterHash => None,
            RecoverState::EnterSignature { hash } | RecoverState::Done { hash, .. } => Some(hash),
        }
    }

    /// The accepted signature, once recovery succeeded.
    pub fn signature(&self) -> Option<Signature> {
        match self.state {
            RecoverState::Done { signature, .. } => Some(signature),
            _ => None,
        }
    }

    /// The recovered signer, once both answers were accepted.
    pub fn recovered(&self) -> Option<Address> {
        match self.state {
            RecoverState::Done { signer, .. } => Some(signer),
            _ => None,
        }
    }
}

impl Default for RecoverFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for RecoverFlow {
    fn prompt(&self) -> Prompt {
        match self.state {
            RecoverState::EnterHash => HASH_PROMPT,
            _ => SIGNATURE_PROMPT,
        }
    }

    fn submit(&mut self, answer: &str) -> Result<()> {
        match self.state {
            RecoverState::EnterHash => {
                let hash: ContentHash = answer.parse()?;
                self.state = RecoverState::EnterSignature { hash };
            }
            RecoverState::EnterSignature { hash } => {
                let signature: Signature = answer.parse()?;
                let signer = signature.recover_address(&hash)?;
                info!(%signer, "signer recovered");
                self.state = RecoverState::Done {
                    hash,
                    signature,
                    signer,
                };
            }
            RecoverState::Done { .. } => {}
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, RecoverState::Done { .. })
    }

    fn summary(&self) -> String {
        match self.recovered() {
            Some(signer) => format!("Recovered address: {}\n", signer),
            None => String::new(),
        }
    }

    fn retry_hint(&self, _error: &SignError) -> String {
        match self.state {
            RecoverState::EnterHash => "Invalid hash, try again".to_string(),
            _ => "Invalid signature, try again".to_string(),
        }
    }
}

/// The verify operation: recover, and optionally compare with an
/// expected signer.
///
/// Without an expected signer this behaves exactly like [`RecoverFlow`]
/// and only tells who signed.
#[derive(Debug, Default)]
pub struct VerifyFlow {
    recover: RecoverFlow,
    expected: Option<Address>,
}

impl VerifyFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report whether the recovered signer is `expected`.
    pub fn expecting(expected: Address) -> Self {
        Self {
            recover: RecoverFlow::new(),
            expected: Some(expected),
        }
    }

    /// The signer to compare against, if any.
    pub fn expected(&self) -> Option<Address> {
        self.expected
    }

    pub fn recovered(&self) -> Option<Address> {
        self.recover.recovered()
    }

    /// `Some(true)` when an expected signer was given and matches.
    pub fn matches(&self) -> Option<bool> {
        Some(self.recovered()? == self.expected?)
    }
}

impl Stage for VerifyFlow {
    fn prompt(&self) -> Prompt {
        self.recover.prompt()
    }

    fn submit(&mut self, answer: &str) -> Result<()> {
        self.recover.submit(answer)
    }

    fn is_terminal(&self) -> bool {
        self.recover.is_terminal()
    }

    fn summary(&self) -> String {
        let mut out = self.recover.summary();
        if let (Some(expected), Some(matches)) = (self.expected, self.matches()) {
            if matches {
                out.push_str(&format!("Signature is valid for {}\n", expected));
            } else {
                out.push_str(&format!("Signature does NOT match expected signer {}\n", expected));
            }
        }
        out
    }

    fn retry_hint(&self, error: &SignError) -> String {
        self.recover.retry_hint(error)
    }
}

/// Result of checking an envelope against a document.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// The document hash that was verified.
    pub document_hash: ContentHash,

    /// The signer the envelope claims.
    pub claimed: Address,

    /// The signer the signature actually recovers to.
    pub recovered: Address,
}

impl VerificationResult {
    /// Whether the envelope's signer field is backed by its signature.
    pub fn is_valid(&self) -> bool {
        self.claimed == self.recovered
    }

    /// Turn a signer mismatch into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(SignError::SignerMismatch {
                claimed: self.claimed.to_string(),
                recovered: self.recovered.to_string(),
            })
        }
    }
}

/// Verifier for document envelopes.
pub struct Verifier;

impl Verifier {
    /// Verify an envelope against a byte slice.
    pub fn verify_bytes(data: &[u8], envelope: &DocumentEnvelope) -> Result<VerificationResult> {
        Self::verify_with_hash(hash_bytes(data), envelope)
    }

    /// Verify an envelope file against a document file.
    pub fn verify_file<P: AsRef<Path>, Q: AsRef<Path>>(
        path: P,
        envelope_path: Q,
    ) -> Result<VerificationResult> {
        let envelope = DocumentEnvelope::load(envelope_path)?;
        let actual_hash = hash_file(path)?;
        Self::verify_with_hash(actual_hash, &envelope)
    }

    /// Verify an envelope using a reader (streaming).
    pub fn verify_reader<R: Read>(
        reader: &mut R,
        envelope: &DocumentEnvelope,
    ) -> Result<VerificationResult> {
        let actual_hash = hash_reader(reader)?;
        Self::verify_with_hash(actual_hash, envelope)
    }

    /// Verify an envelope against a known hash.
    pub fn verify_with_hash(
        actual_hash: ContentHash,
        envelope: &DocumentEnvelope,
    ) -> Result<VerificationResult> {
        if actual_hash != envelope.file_hash {
            return Err(SignError::HashMismatch {
                expected: envelope.file_hash.to_string(),
                actual: actual_hash.to_string(),
            });
        }

        let recovered = envelope.signature.recover_address(&actual_hash)?;
        Ok(VerificationResult {
            document_hash: actual_hash,
            claimed: envelope.signer,
            recovered,
        })
    }

    /// Quick check that the envelope is valid for the bytes.
    pub fn is_valid_bytes(data: &[u8], envelope: &DocumentEnvelope) -> bool {
        Self::verify_bytes(data, envelope)
            .map(|r| r.is_valid())
            .unwrap_or(false)
    }
}
