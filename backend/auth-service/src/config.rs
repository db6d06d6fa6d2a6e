use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// RSA private key in PEM format, used to sign access tokens.
    pub private_key_pem: String,
    /// RSA public key in PEM format, used to validate access tokens.
    pub public_key_pem: String,
}

/// SMTP delivery settings. When `smtp_host` is empty the mailer runs in
/// no-op mode and logs outbound messages instead of sending them.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// When set, signup is restricted to emails in this domain.
    pub allowed_email_domain: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        // Local development convenience; production injects real env vars.
        dotenvy::dotenv().ok();

        let server = ServerSettings {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8084".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        };

        let database = DatabaseSettings {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
        };

        let jwt = JwtSettings {
            private_key_pem: env::var("JWT_PRIVATE_KEY_PEM")
                .context("JWT_PRIVATE_KEY_PEM must be set")?,
            public_key_pem: env::var("JWT_PUBLIC_KEY_PEM")
                .context("JWT_PUBLIC_KEY_PEM must be set")?,
        };

        let email = EmailSettings {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_address: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "CampusHub <no-reply@campushub.app>".to_string()),
        };

        let auth = AuthSettings {
            allowed_email_domain: env::var("ALLOWED_EMAIL_DOMAIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        };

        Ok(Settings {
            server,
            database,
            jwt,
            email,
            auth,
        })
    }
}
