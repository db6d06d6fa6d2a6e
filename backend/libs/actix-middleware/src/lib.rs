//! Shared actix-web middleware for CampusHub services.
//!
//! `JwtAuthMiddleware` verifies the bearer access token and attaches the
//! authenticated identity to the request; `RequireAdmin` composes after it
//! and rejects non-admin roles. The composition order is fixed: a role is
//! only trustworthy once the token signature has been validated.

mod error;
mod jwt_auth;
mod require_admin;

pub use error::GateError;
pub use jwt_auth::{AuthUser, JwtAuthMiddleware};
pub use require_admin::RequireAdmin;
