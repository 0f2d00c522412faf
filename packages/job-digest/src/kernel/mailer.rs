//! Report delivery over SMTPS. Sender and recipient are the same account.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::traits::BaseMailer;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    account: Mailbox,
}

impl SmtpMailer {
    /// Connects over implicit TLS (SMTPS, port 465 by convention).
    pub fn new(host: &str, port: u16, user: String, password: String) -> Result<Self> {
        let account: Mailbox = user
            .parse()
            .context("EMAIL_USER is not a valid email address")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .context("Failed to configure SMTP relay")?
            .port(port)
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self { transport, account })
    }
}

#[async_trait]
impl BaseMailer for SmtpMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.account.clone())
            .to(self.account.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build report message")?;

        self.transport
            .send(message)
            .await
            .context("Failed to send report email")?;

        info!(to = %self.account, subject = %subject, "Report email sent");
        Ok(())
    }
}
