//! Curve25519 key pairs in the base64 encoding WireGuard uses.

use super::KeyError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use x25519_dalek::{PublicKey, StaticSecret};

/// Length in bytes of a raw WireGuard key
pub const KEY_LEN: usize = 32;

/// X25519 key pair derived from a base64 private key
pub struct KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    /// Decode a base64 private key (as produced by `wg genkey`) and derive its public key
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let bytes = decode_key(encoded)?;
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        Ok(Self { secret, public })
    }

    /// Public key as base64, the form written to `PublicKey =` lines
    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public.as_bytes())
    }

    /// Private key as base64
    pub fn private_key_base64(&self) -> String {
        BASE64.encode(self.secret.to_bytes())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_key_base64())
            .finish_non_exhaustive()
    }
}

/// Check that a string is a base64-encoded 32-byte key
pub fn is_valid_public_key(encoded: &str) -> bool {
    decode_key(encoded).is_ok()
}

fn decode_key(encoded: &str) -> Result<[u8; KEY_LEN], KeyError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| KeyError::InvalidKeyMaterial(format!("not valid base64: {}", e)))?;

    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
        KeyError::InvalidKeyMaterial(format!(
            "expected {} bytes, got {}",
            KEY_LEN,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 7748 section 6.1 test vectors
    const ALICE_PRIVATE: &str = "dwdtCnMYpX08FsFyUbJmRd9ML4frwJkqsXf7pR25LCo=";
    const ALICE_PUBLIC: &str = "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=";
    const BOB_PRIVATE: &str = "XasIfmJKikt54X+Lg4AO5m87sSkmGLb9HC+LJ/+I4Os=";
    const BOB_PUBLIC: &str = "3p7bfXt9wbTTW2HC7OQ1Nz+DQ8hbeGdNrfx+FG+IK08=";

    #[test]
    fn test_public_key_derivation() {
        let alice = KeyPair::from_base64(ALICE_PRIVATE).unwrap();
        assert_eq!(alice.public_key_base64(), ALICE_PUBLIC);
        assert_eq!(alice.private_key_base64(), ALICE_PRIVATE);

        let bob = KeyPair::from_base64(BOB_PRIVATE).unwrap();
        assert_eq!(bob.public_key_base64(), BOB_PUBLIC);
    }

    #[test]
    fn test_invalid_key_material() {
        assert!(matches!(
            KeyPair::from_base64("not base64!"),
            Err(KeyError::InvalidKeyMaterial(_))
        ));
        // 16 bytes of zeros
        assert!(matches!(
            KeyPair::from_base64("AAAAAAAAAAAAAAAAAAAAAA=="),
            Err(KeyError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let alice = KeyPair::from_base64(ALICE_PRIVATE).unwrap();
        let debug = format!("{:?}", alice);
        assert!(debug.contains(ALICE_PUBLIC));
        assert!(!debug.contains(ALICE_PRIVATE));
    }

    #[test]
    fn test_is_valid_public_key() {
        assert!(is_valid_public_key(BOB_PUBLIC));
        assert!(!is_valid_public_key(""));
        assert!(!is_valid_public_key("AAAAAAAAAAAAAAAAAAAAAA=="));
    }
}
