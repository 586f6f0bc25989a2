//! # SIMLAB Credentials
//!
//! Salted PBKDF2-HMAC-SHA256 password hashing.
//!
//! The stored form is `salt || digest`: 32 lowercase hex characters of salt
//! followed by the 64 hex characters of the derived key. The salt's *hex
//! text* is what feeds the derivation, which keeps hashes produced by earlier
//! deployments of the lab verifiable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Rounds used when no explicit count is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SALT_BYTES: usize = 16;
const SALT_HEX_LEN: usize = SALT_BYTES * 2;
const DIGEST_BYTES: usize = 32;

/// Hashes and verifies passwords with a fixed iteration count.
///
/// The count is not encoded in the stored form, so changing it invalidates
/// every existing hash.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Produces a fresh stored form with a random salt.
    pub fn hash(&self, password: &str) -> String {
        let salt = hex::encode(rand::random::<[u8; SALT_BYTES]>());
        let digest = self.derive(password, &salt);
        format!("{salt}{}", hex::encode(digest))
    }

    /// Returns `true` only if `stored` is well formed and was produced from
    /// `password`. Malformed input is a mismatch, never a panic.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let (Some(salt), Some(digest_hex)) =
            (stored.get(..SALT_HEX_LEN), stored.get(SALT_HEX_LEN..))
        else {
            return false;
        };
        let Ok(expected) = hex::decode(digest_hex) else {
            return false;
        };
        if expected.len() != DIGEST_BYTES {
            return false;
        }

        let actual = self.derive(password, salt);
        actual[..].ct_eq(&expected[..]).into()
    }

    fn derive(&self, password: &str, salt: &str) -> [u8; DIGEST_BYTES] {
        let mut digest = [0u8; DIGEST_BYTES];
        pbkdf2_hmac::<Sha256>(
            password.as_bytes(),
            salt.as_bytes(),
            self.iterations,
            &mut digest,
        );
        digest
    }
}

/// Hashes with [`DEFAULT_ITERATIONS`].
pub fn hash_password(password: &str) -> String {
    PasswordHasher::default().hash(password)
}

/// Verifies against [`DEFAULT_ITERATIONS`].
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHasher::default().verify(password, stored)
}
