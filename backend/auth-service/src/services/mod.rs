pub mod auth;
pub mod mailer;

pub use auth::{AuthService, TokenPair};
pub use mailer::EmailService;
