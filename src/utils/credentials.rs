//! Password salting, hashing and verification.
//!
//! Credentials are stored as a single `digest~salt` string: a base64
//! PBKDF2-HMAC-SHA256 digest (100 iterations, 32 bytes) and the base64
//! 16-byte random salt, joined by `~`. Base64 never produces `~`, so
//! splitting on the first occurrence is unambiguous.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const ITERATIONS: u32 = 100;
const SEPARATOR: char = '~';

/// A stored credential that cannot be parsed or re-derived. This is a
/// data-integrity problem, never a wrong password: callers must fail
/// closed and reject the authentication attempt.
#[derive(Debug, thiserror::Error)]
#[error("stored credential is malformed")]
pub struct MalformedCredential;

/// Fresh random salt, base64-encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    BASE64.encode(salt)
}

fn derive(password: &str, salt_bytes: &[u8]) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt_bytes, ITERATIONS, &mut digest);
    digest
}

/// One-way digest of `password` under a stored (base64) salt.
pub fn hash_password(password: &str, salt: &str) -> Result<String, MalformedCredential> {
    let salt_bytes = BASE64.decode(salt).map_err(|_| MalformedCredential)?;
    Ok(BASE64.encode(derive(password, &salt_bytes)))
}

/// Hash `password` under a fresh salt and return the `digest~salt`
/// composite ready for storage.
pub fn seal(password: &str) -> String {
    let salt = generate_salt();
    // The salt was just generated, so re-deriving cannot fail.
    let digest = hash_password(password, &salt).expect("freshly generated salt");
    format!("{digest}{SEPARATOR}{salt}")
}

/// Check `password` against a stored `digest~salt` composite.
///
/// The digest comparison runs in constant time so timing does not leak
/// how many prefix bytes matched.
pub fn verify(password: &str, stored: &str) -> Result<bool, MalformedCredential> {
    let (digest_b64, salt) = stored.split_once(SEPARATOR).ok_or(MalformedCredential)?;
    let expected = BASE64.decode(digest_b64).map_err(|_| MalformedCredential)?;
    let salt_bytes = BASE64.decode(salt).map_err(|_| MalformedCredential)?;

    let actual = derive(password, &salt_bytes);
    Ok(constant_time_eq(&actual, &expected))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
