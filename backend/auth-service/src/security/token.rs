//! Opaque token and OTP generation.
//!
//! Refresh and reset tokens are random alphanumeric strings handed to the
//! client once; only their SHA-256 hex digest is persisted, so a database
//! dump cannot be replayed as live tokens.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

pub const REFRESH_TOKEN_LENGTH: usize = 48;
pub const RESET_TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric token of the given length.
pub fn generate_opaque_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a six-digit verification code, zero-padded.
pub fn generate_otp() -> String {
    format!("{:06}", thread_rng().gen_range(0..1_000_000))
}

/// SHA-256 hex digest of a token, the only form that touches storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_token_shape() {
        let token = generate_opaque_token(REFRESH_TOKEN_LENGTH);
        assert_eq!(token.len(), REFRESH_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(
            generate_opaque_token(RESET_TOKEN_LENGTH),
            generate_opaque_token(RESET_TOKEN_LENGTH)
        );
    }

    #[test]
    fn test_otp_is_six_digits() {
        for _ in 0..32 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let digest = hash_token("abc123");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token("abc123"));
        assert_ne!(digest, hash_token("abc124"));
    }
}
