//! Password hashing and strength policy.
//!
//! Argon2id with per-password random salt, serialized in PHC string format.
//! Verification parses the parameters back out of the stored hash, so cost
//! changes roll out without invalidating existing credentials.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AuthError, Result};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash a password after checking the strength policy.
pub fn hash_password(password: &str) -> Result<String> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a candidate password against a stored PHC hash.
///
/// A malformed stored hash is an internal error, not a failed match.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Internal(format!("Stored password hash is malformed: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Composition policy: length bounds plus uppercase, lowercase, digit and
/// special character classes.
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if !has_upper {
        return Err(AuthError::WeakPassword(
            "must contain an uppercase letter".into(),
        ));
    }
    if !has_lower {
        return Err(AuthError::WeakPassword(
            "must contain a lowercase letter".into(),
        ));
    }
    if !has_digit {
        return Err(AuthError::WeakPassword("must contain a digit".into()));
    }
    if !has_special {
        return Err(AuthError::WeakPassword(
            "must contain a special character".into(),
        ));
    }

    Ok(())
}
