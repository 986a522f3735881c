//! Document signing: the interactive sign flow and a non-interactive builder.

use crate::envelope::{DocumentEnvelope, Metadata};
use crate::error::Result;
use crate::flow::{Prompt, Stage};
use crate::hash::{hash_bytes, hash_reader, ContentHash};
use crate::keys::{Address, PrivateKey};
use crate::signature::Signature;
use std::io::Read;
use tracing::info;

const KEY_PROMPT: Prompt = Prompt::new("Enter your private key:")
    .placeholder("CaFe...")
    .masked();

const DESCRIPTION_PROMPT: Prompt =
    Prompt::new("Describe what you are signing:").placeholder("optional");

#[derive(Debug)]
enum SignState {
    EnterKey,
    EnterDescription {
        signer: Address,
        signature: Signature,
    },
    Done(DocumentEnvelope),
}

/// The sign operation as a flow [`Stage`].
///
/// The key is parsed, used and dropped within the key step; only the
/// derived address and the signature are kept.
#[derive(Debug)]
pub struct SignFlow {
    name: String,
    file_hash: ContentHash,
    state: SignState,
}

impl SignFlow {
    /// Start a sign flow for a file whose content hash is already known.
    pub fn new<N: Into<String>>(name: N, file_hash: ContentHash) -> Self {
        Self {
            name: name.into(),
            file_hash,
            state: SignState::EnterKey,
        }
    }

    /// Start a sign flow over in-memory file content.
    pub fn for_bytes<N: Into<String>>(name: N, data: &[u8]) -> Self {
        Self::new(name, hash_bytes(data))
    }

    /// The content hash being signed.
    pub fn file_hash(&self) -> &ContentHash {
        &self.file_hash
    }

    /// The signer address, once a key has been accepted.
    pub fn signer(&self) -> Option<Address> {
        match &self.state {
            SignState::EnterKey => None,
            SignState::EnterDescription { signer, .. } => Some(*signer),
            SignState::Done(envelope) => Some(envelope.signer),
        }
    }

    /// The finished envelope.
    pub fn envelope(&self) -> Option<&DocumentEnvelope> {
        match &self.state {
            SignState::Done(envelope) => Some(envelope),
            _ => None,
        }
    }

    pub fn into_envelope(self) -> Option<DocumentEnvelope> {
        match self.state {
            SignState::Done(envelope) => Some(envelope),
            _ => None,
        }
    }
}

impl Stage for SignFlow {
    fn prompt(&self) -> Prompt {
        match self.state {
            SignState::EnterKey => KEY_PROMPT,
            _ => DESCRIPTION_PROMPT,
        }
    }

    fn submit(&mut self, answer: &str) -> Result<()> {
        match &self.state {
            SignState::EnterKey => {
                let key = PrivateKey::from_hex(answer)?;
                let signer = key.address();
                let signature = Signature::sign(&self.file_hash, &key)?;
                info!(%signer, file = %self.name, "file hash signed");
                self.state = SignState::EnterDescription { signer, signature };
            }
            SignState::EnterDescription { signer, signature } => {
                let envelope = DocumentEnvelope::new(
                    Metadata::now(self.name.clone(), answer.trim()),
                    self.file_hash,
                    *signature,
                    *signer,
                );
                self.state = SignState::Done(envelope);
            }
            SignState::Done(_) => {}
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, SignState::Done(_))
    }

    fn summary(&self) -> String {
        match &self.state {
            SignState::Done(envelope) => format!(
                "File processed: {}\nYour signer address is:\n{}\nThe SHA-256 hash of your file is:\n{}\nYour signature of the hash is:\n{}\n",
                envelope.metadata.name, envelope.signer, envelope.file_hash, envelope.signature
            ),
            _ => String::new(),
        }
    }

    fn retry_hint(&self, _error: &crate::SignError) -> String {
        match self.state {
            SignState::EnterKey => "Invalid key, try again".to_string(),
            _ => "Invalid description, try again".to_string(),
        }
    }
}

/// A builder for signing without prompting.
#[derive(Debug)]
pub struct Signer<'a> {
    key: &'a PrivateKey,
    description: String,
}

impl<'a> Signer<'a> {
    /// Create a new signer with the given key.
    pub fn new(key: &'a PrivateKey) -> Self {
        Self {
            key,
            description: String::new(),
        }
    }

    /// Set the envelope description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Sign a byte slice.
    pub fn sign_bytes(&self, name: &str, data: &[u8]) -> Result<DocumentEnvelope> {
        self.sign_hash(name, hash_bytes(data))
    }

    /// Sign data from a reader (streaming).
    pub fn sign_reader<R: Read>(&self, name: &str, reader: &mut R) -> Result<DocumentEnvelope> {
        let hash = hash_reader(reader)?;
        self.sign_hash(name, hash)
    }

    /// Sign a precomputed content hash.
    pub fn sign_hash(&self, name: &str, file_hash: ContentHash) -> Result<DocumentEnvelope> {
        let signature = Signature::sign(&file_hash, self.key)?;
        Ok(DocumentEnvelope::new(
            Metadata::now(name, self.description.clone()),
            file_hash,
            signature,
            self.key.address(),
        ))
    }
}
