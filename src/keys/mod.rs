//! Private key resolution and Curve25519 key derivation.
//!
//! The server's private key never appears in the network description
//! itself. The description names a secret source instead, and this module
//! resolves that source into the raw base64 secret and derives the
//! matching public key that members use to reach the server.

pub mod keypair;
pub mod source;

pub use keypair::{is_valid_public_key, KeyPair};
pub use source::{EnvVarSource, FileSource, PrivateKeySource, SecretSource};

/// Errors raised while resolving or decoding key material
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("private key not found in {source_desc}: {reason}")]
    KeyNotFound { source_desc: String, reason: String },
    #[error("unsupported private key source '{0}'")]
    UnsupportedKeySource(String),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
}
