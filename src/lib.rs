//! # signdocs
//!
//! Sign a document's exact bytes with a secp256k1 key and recover the
//! signer's address from the signature later.
//!
//! ## Wire format
//!
//! - **SHA-256** of the file content is what gets signed
//! - **65-byte recoverable ECDSA** signatures (`r ‖ s ‖ v`, `v ∈ {0, 1}`)
//! - **Addresses** are the last 20 bytes of Keccak-256 of the public key,
//!   displayed with the EIP-55 checksum
//! - **JSON envelopes** bind file name, description, timestamp, hash,
//!   signature and signer
//!
//! ## Quick Start
//!
//! ### Sign a Document
//!
//! ```rust
//! use signdocs::{PrivateKey, Signer};
//!
//! let key = PrivateKey::generate();
//! let envelope = Signer::new(&key)
//!     .with_description("Quarterly agreement")
//!     .sign_bytes("contract.txt", b"Important document content")
//!     .unwrap();
//!
//! println!("{}", envelope.to_json().unwrap());
//! ```
//!
//! ### Recover the Signer
//!
//! ```rust
//! use signdocs::{hash_bytes, PrivateKey, Signature};
//!
//! let key = PrivateKey::generate();
//! let hash = hash_bytes(b"hello");
//! let signature = Signature::sign(&hash, &key).unwrap();
//!
//! assert_eq!(signature.recover_address(&hash).unwrap(), key.address());
//! ```
//!
//! ### Drive a Flow
//!
//! Interactive operations are [`flow::Stage`]s fed one event at a time.
//!
//! ```rust
//! use signdocs::flow::{FlowStatus, InputFlow};
//! use signdocs::{hash_bytes, PrivateKey, RecoverFlow, Signature};
//!
//! let key = PrivateKey::generate();
//! let hash = hash_bytes(b"hello");
//! let signature = Signature::sign(&hash, &key).unwrap();
//!
//! let flow = InputFlow::new(RecoverFlow::new());
//! let (flow, _) = flow.submit_line(&hash.to_string());
//! let (flow, _) = flow.submit_line(&signature.to_string());
//!
//! assert_eq!(flow.status(), FlowStatus::Completed);
//! assert_eq!(flow.stage().recovered(), Some(key.address()));
//! ```

pub mod driver;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod flow;
pub mod hash;
pub mod keys;
pub mod signature;
pub mod signer;
pub mod verifier;

// Re-export main types for convenience
pub use driver::Terminal;
pub use envelope::{DocumentEnvelope, Metadata};
pub use error::{Result, SignError};
pub use hash::{hash_bytes, hash_file, hash_reader, ContentHash};
pub use keys::{Address, PrivateKey};
pub use signature::Signature;
pub use signer::{SignFlow, Signer};
pub use verifier::{RecoverFlow, VerificationResult, Verifier, VerifyFlow};
