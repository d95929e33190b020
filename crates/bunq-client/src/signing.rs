//! Client key pair used for the installation handshake and request signing

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use crate::error::{BunqError, Result};

/// Key size bunq expects for client keys
pub const CLIENT_KEY_BITS: usize = 2048;

/// RSA key pair registered with bunq at installation
pub struct KeyPair {
    signing_key: SigningKey<Sha256>,
    public_key_pem: String,
}

impl KeyPair {
    /// Generate a fresh key pair.
    ///
    /// This is CPU heavy; async callers should run it on the blocking pool.
    pub fn generate(bits: usize) -> Result<Self> {
        let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
            .map_err(|e| BunqError::Signing(format!("Key generation failed: {}", e)))?;
        Self::from_private_key(private_key)
    }

    /// Build a key pair around an existing private key
    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self> {
        let public_key_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| BunqError::Signing(format!("Public key encoding failed: {}", e)))?;

        Ok(Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
            public_key_pem,
        })
    }

    /// PEM encoded public key sent as `client_public_key`
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Base64 RSA-SHA256 signature over a request body
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        let signature = self
            .signing_key
            .try_sign(body)
            .map_err(|e| BunqError::Signing(e.to_string()))?;
        Ok(STANDARD.encode(signature.to_bytes()))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key_pem", &self.public_key_pem)
            .finish()
    }
}
