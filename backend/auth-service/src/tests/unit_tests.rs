/// Pure unit tests for auth-service core logic (no database required).

use actix_web::ResponseError;

use crate::error::AuthError;
use crate::models::CurrentUserResponse;
use crate::security::password;
use crate::tests::fixtures::*;

// ============================================================================
// Password Policy Tests
// ============================================================================

#[test]
fn test_reference_password_accepted() {
    // GIVEN: The documented minimum-strength password
    // WHEN: We hash it
    let result = password::hash_password(TEST_PASSWORD);

    // THEN: It passes the policy and produces a PHC hash
    let hash = result.expect("reference password should pass the policy");
    assert!(hash.starts_with("$argon2"));
}

#[test]
fn test_weak_password_catalog_rejected() {
    for weak in weak_passwords() {
        // GIVEN: A password violating one policy rule
        // WHEN: We attempt to hash it
        let result = password::hash_password(weak);

        // THEN: It is rejected as weak
        assert!(
            matches!(result, Err(AuthError::WeakPassword(_))),
            "{weak:?} should be rejected as weak"
        );
    }
}

// ============================================================================
// Error Contract Tests
// ============================================================================

#[test]
fn test_error_status_codes() {
    let cases: Vec<(AuthError, u16)> = vec![
        (AuthError::Validation("bad".into()), 400),
        (AuthError::WeakPassword("weak".into()), 400),
        (AuthError::OtpMissing, 400),
        (AuthError::OtpExpired, 400),
        (AuthError::OtpMismatch, 400),
        (AuthError::InvalidCredentials, 401),
        (AuthError::TokenInvalid, 401),
        (AuthError::Unauthenticated, 401),
        (AuthError::NotVerified, 403),
        (AuthError::Forbidden, 403),
        (AuthError::NotFound, 404),
        (AuthError::DuplicateIdentity, 409),
        (AuthError::Database("boom".into()), 500),
        (AuthError::Internal("boom".into()), 500),
    ];

    for (err, expected) in cases {
        assert_eq!(
            err.status_code().as_u16(),
            expected,
            "{} should map to {expected}",
            err.kind()
        );
    }
}

#[test]
fn test_error_kinds_are_stable() {
    // The kind strings are part of the wire contract.
    assert_eq!(AuthError::InvalidCredentials.kind(), "invalid_credentials");
    assert_eq!(AuthError::TokenInvalid.kind(), "token_invalid");
    assert_eq!(AuthError::DuplicateIdentity.kind(), "duplicate_identity");
    assert_eq!(AuthError::OtpExpired.kind(), "otp_expired");
    assert_eq!(AuthError::NotVerified.kind(), "not_verified");
}

#[test]
fn test_error_response_body_shape() {
    // GIVEN: A client-facing error
    let err = AuthError::InvalidCredentials;

    // WHEN: It is rendered as a response
    let resp = err.error_response();

    // THEN: Status matches the contract
    assert_eq!(resp.status().as_u16(), 401);
}

// ============================================================================
// Response DTO Tests
// ============================================================================

#[test]
fn test_current_user_response_omits_secrets() {
    // GIVEN: An account row with secret material
    let mut account = verified_account(TEST_EMAIL);
    account.refresh_token_hash = Some("deadbeef".to_string());

    // WHEN: It is mapped to the outward DTO and serialized
    let dto = CurrentUserResponse::from(&account);
    let json = serde_json::to_string(&dto).unwrap();

    // THEN: Identity fields are present, secrets are not
    assert!(json.contains(TEST_EMAIL));
    assert!(json.contains("member"));
    assert!(!json.contains("deadbeef"));
    assert!(!json.contains("argon2"));
}
