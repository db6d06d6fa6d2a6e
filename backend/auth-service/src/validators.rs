//! Input shape validation for identifiers and codes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AuthError, Result};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static OTP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid otp regex"));

/// Validate email shape and, when configured, membership in the campus domain.
pub fn validate_email(email: &str, allowed_domain: Option<&str>) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".into()));
    }
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err(AuthError::Validation("Invalid email address".into()));
    }
    if let Some(domain) = allowed_domain {
        let suffix = format!("@{}", domain.trim_start_matches('@'));
        if !email.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
            return Err(AuthError::Validation(format!(
                "Email must belong to the {} domain",
                domain
            )));
        }
    }
    Ok(())
}

/// A verification code must be exactly six decimal digits.
pub fn validate_otp_shape(code: &str) -> Result<()> {
    if !OTP_REGEX.is_match(code) {
        return Err(AuthError::Validation(
            "Verification code must be 6 digits".into(),
        ));
    }
    Ok(())
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Mask an email for log output: keep the first character and the domain.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap_or('*');
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_passes() {
        assert!(validate_email("alice@college.edu", None).is_ok());
        assert!(validate_email("  bob.smith+tag@college.edu  ", None).is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert!(validate_email("", None).is_err());
        assert!(validate_email("not-an-email", None).is_err());
        assert!(validate_email("missing@tld", None).is_err());
    }

    #[test]
    fn test_domain_restriction() {
        assert!(validate_email("alice@college.edu", Some("college.edu")).is_ok());
        assert!(validate_email("alice@COLLEGE.EDU", Some("college.edu")).is_ok());
        assert!(validate_email("alice@gmail.com", Some("college.edu")).is_err());
    }

    #[test]
    fn test_otp_shape() {
        assert!(validate_otp_shape("123456").is_ok());
        assert!(validate_otp_shape("12345").is_err());
        assert!(validate_otp_shape("12345a").is_err());
        assert!(validate_otp_shape("1234567").is_err());
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@college.edu"), "a***@college.edu");
        assert_eq!(mask_email("garbage"), "***");
    }
}
