//! CampusHub Auth Service
//!
//! Owns account authentication and the session-token lifecycle: OTP-gated
//! signup, credential sign-in issuing an access/refresh token pair,
//! refresh-token rotation, single-use password reset, and role-gated
//! authorization for administrative routes.
//!
//! Resource CRUD (notices, posts, events, placements, study materials) lives
//! in its own services and consumes this one through the bearer-token
//! middleware in `actix-middleware`.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod security;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use config::Settings;
pub use error::{AuthError, Result};

use services::AuthService;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}
