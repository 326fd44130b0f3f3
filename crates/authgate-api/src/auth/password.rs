//! Deterministic password hashing
//!
//! PBKDF2-HMAC-SHA256 keyed with the server-wide secret and a fixed
//! iteration count. The same input always yields the same output, so
//! verification is recompute-and-compare; there is no separate verify
//! primitive. Rotating the server secret invalidates every stored password
//! at once, which is an accepted operational constraint.

use base64::Engine;
use sha2::Sha256;

/// PBKDF2 iteration count.
const PBKDF2_ITERATIONS: u32 = 1000;

/// Derived key length in bytes.
const HASH_LEN: usize = 32;

/// Hash a plaintext password into its stored representation.
pub fn hash_password(password: &str, secret: &str) -> String {
    let mut derived = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        secret.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut derived,
    );
    base64::engine::general_purpose::STANDARD.encode(derived)
}
