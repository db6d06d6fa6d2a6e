//! Shared cryptographic primitives for CampusHub services.
//!
//! Holds the JWT access-token module and the account `Role` enumeration
//! carried inside token claims. Refresh and reset tokens are opaque random
//! strings owned by the auth service; they never pass through this crate.

pub mod jwt;

pub use jwt::{
    generate_access_token, initialize_jwt_keys, initialize_jwt_validation_only, validate_token,
    Claims, Role,
};
