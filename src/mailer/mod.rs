use async_trait::async_trait;
use serde_json::json;

use crate::config::MailerSettings;

/// A password-reset email ready for delivery
///
/// The reset URL embeds the plaintext token; this struct must never be
/// logged whole.
pub struct PasswordResetEmail {
    pub to: String,
    pub display_name: String,
    pub reset_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, email: &PasswordResetEmail) -> Result<(), MailerError>;
}

/// Delivers mail through an HTTP mail API
pub struct HttpMailer {
    client: reqwest::Client,
    settings: MailerSettings,
}

impl HttpMailer {
    pub fn new(settings: MailerSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_password_reset(&self, email: &PasswordResetEmail) -> Result<(), MailerError> {
        let body = json!({
            "from": self.settings.from_address,
            "to": email.to,
            "subject": "Reset your password",
            "text": format!(
                "Hi {},\n\nA password reset was requested for your account. \
                 Open the link below to choose a new password. The link is \
                 valid for a limited time and can be used once.\n\n{}\n\n\
                 If you did not request this, you can ignore this email.",
                email.display_name, email.reset_url
            ),
        });

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailerError::Delivery(format!(
                "mail API returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Development fallback that writes reset links to the log instead of
/// sending mail
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &PasswordResetEmail) -> Result<(), MailerError> {
        tracing::info!(to = %email.to, url = %email.reset_url, "password reset link (mailer not configured)");
        Ok(())
    }
}
