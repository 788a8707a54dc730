//! Salted digest hashing for stored verification codes

use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Salt size in bytes (128 bits)
const SALT_BYTES: usize = 16;

/// Hashes plaintext codes into salted, irreversible digests.
///
/// The digest is SHA-256 over plaintext, per-code salt and a server-side
/// secret, so an attacker holding only the store cannot brute-force codes
/// offline without also obtaining the secret.
#[derive(Debug, Clone)]
pub struct CodeHasher {
    secret: String,
}

impl CodeHasher {
    /// Create a hasher with the given server-side secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hash a plaintext code with a fresh random salt
    ///
    /// # Returns
    ///
    /// `(digest, salt)`, both hex encoded. Hashing the same plaintext twice
    /// yields different digests because the salt is fresh per call.
    pub fn hash(&self, plaintext: &str) -> (String, String) {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let digest = self.digest(plaintext, &salt);
        (digest, salt)
    }

    /// Recompute the digest for a plaintext and stored salt and compare it
    /// to the stored digest in constant time
    pub fn verify(&self, plaintext: &str, digest: &str, salt: &str) -> bool {
        let computed = self.digest(plaintext, salt);
        constant_time_eq(computed.as_bytes(), digest.as_bytes())
    }

    fn digest(&self, plaintext: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hasher.update(salt.as_bytes());
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}
