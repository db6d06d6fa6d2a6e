//! Outbound email delivery over SMTP.
//!
//! When no SMTP host is configured the service runs in no-op mode: messages
//! are logged instead of sent. Local development and the test suites rely
//! on this.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailSettings;
use crate::error::{AuthError, Result};
use crate::validators::mask_email;

#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl EmailService {
    pub fn new(settings: &EmailSettings) -> Result<Self> {
        let from = settings
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AuthError::Internal(format!("Invalid SMTP from address: {e}")))?;

        let transport = if settings.smtp_host.is_empty() {
            tracing::warn!("SMTP host not configured; email delivery disabled");
            None
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
                .map_err(|e| AuthError::Internal(format!("SMTP transport setup failed: {e}")))?
                .port(settings.smtp_port)
                .credentials(Credentials::new(
                    settings.smtp_username.clone(),
                    settings.smtp_password.clone(),
                ));
            Some(builder.build())
        };

        Ok(Self { transport, from })
    }

    /// Whether a real transport is configured.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send_otp_email(&self, recipient: &str, code: &str) -> Result<()> {
        let body = format!(
            "Your CampusHub verification code is {code}.\n\n\
             It expires in 10 minutes. If you did not request it, ignore this message.\n"
        );
        self.send(recipient, "Your CampusHub verification code", body)
            .await
    }

    pub async fn send_reset_email(&self, recipient: &str, token: &str) -> Result<()> {
        let body = format!(
            "A password reset was requested for your CampusHub account.\n\n\
             Reset token: {token}\n\n\
             The token is valid for 30 minutes and can be used once. If you did\n\
             not request a reset, no action is needed.\n"
        );
        self.send(recipient, "Reset your CampusHub password", body)
            .await
    }

    async fn send(&self, recipient: &str, subject: &str, body: String) -> Result<()> {
        let Some(transport) = &self.transport else {
            tracing::info!(
                recipient = %mask_email(recipient),
                subject,
                "Email delivery disabled; message dropped"
            );
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AuthError::Internal(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AuthError::Internal(format!("Failed to build email: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AuthError::Internal(format!("Email delivery failed: {e}")))?;

        tracing::info!(recipient = %mask_email(recipient), subject, "Email sent");
        Ok(())
    }
}
