//! One-time verification codes.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Generate a random numeric code, zero-padded to `CODE_LENGTH` digits.
pub fn generate_code() -> String {
    let upper = 10u32.pow(CODE_LENGTH as u32);
    let value = rand::thread_rng().gen_range(0..upper);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Hash a secret using SHA-256.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
