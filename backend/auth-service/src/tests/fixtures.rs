/// Test fixtures and helpers for auth-service tests.

use chrono::Utc;
use crypto_core::Role;
use uuid::Uuid;

use crate::models::Account;

pub const TEST_EMAIL: &str = "alice@college.edu";
pub const TEST_PASSWORD: &str = "Passw0rd!";

/// Weak passwords that the strength policy must reject.
pub fn weak_passwords() -> Vec<&'static str> {
    vec![
        "Sh0rt!",          // too short
        "nouppercase123!", // no uppercase
        "NOLOWERCASE123!", // no lowercase
        "NoDigitsHere!",   // no digit
        "NoSpecialChar1",  // no special character
        "12345678",        // only digits
    ]
}

/// A verified member account with no pending tokens.
pub fn verified_account(email: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        role: Role::Member,
        verified: true,
        otp_code: None,
        otp_expires_at: None,
        refresh_token_hash: None,
        refresh_expires_at: None,
        reset_token_hash: None,
        reset_expires_at: None,
        created_at: now,
        updated_at: now,
    }
}
