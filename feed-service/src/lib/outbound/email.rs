use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::RunEnvironment;
use crate::config::SmtpConfig;
use crate::domain::auth::email::EmailDeliveryError;
use crate::domain::auth::email::EmailTemplate;
use crate::domain::auth::ports::EmailSender;
use crate::domain::user::models::EmailAddress;

/// SMTP email sender over a STARTTLS relay.
///
/// Outside production no transport is built and every send is skipped.
#[derive(Clone)]
pub struct SmtpEmailSender {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// # Errors
    /// * `InvalidAddress` - The sender address cannot be parsed
    /// * `SendFailed` - The relay transport cannot be configured
    pub fn new(
        config: &SmtpConfig,
        environment: RunEnvironment,
    ) -> Result<Self, EmailDeliveryError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| EmailDeliveryError::InvalidAddress(format!("{}: {}", config.from, e)))?;

        let transport = match environment {
            RunEnvironment::Development => None,
            RunEnvironment::Production => Some(
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| EmailDeliveryError::SendFailed(e.to_string()))?
                    .port(config.port)
                    .credentials(Credentials::new(
                        config.username.clone(),
                        config.password.clone(),
                    ))
                    .build(),
            ),
        };

        Ok(Self { transport, from })
    }

    fn build_message(
        &self,
        template: &EmailTemplate,
        recipient: &EmailAddress,
    ) -> Result<Message, EmailDeliveryError> {
        let to: Mailbox = recipient
            .as_str()
            .parse()
            .map_err(|e| EmailDeliveryError::InvalidAddress(format!("{}: {}", recipient, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(template.subject())
            .header(ContentType::TEXT_HTML)
            .body(template.html_body())
            .map_err(|e| EmailDeliveryError::MessageBuildFailed(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(
        &self,
        template: &EmailTemplate,
        recipient: &EmailAddress,
    ) -> Result<(), EmailDeliveryError> {
        let message = self.build_message(template, recipient)?;

        let Some(transport) = &self.transport else {
            tracing::info!(
                template = template.id(),
                recipient = %recipient,
                "skipping email sending outside production"
            );
            return Ok(());
        };

        let response = transport.send(message).await.map_err(|e| {
            tracing::error!(
                template = template.id(),
                recipient = %recipient,
                error = %e,
                "failed to send email"
            );
            EmailDeliveryError::SendFailed(e.to_string())
        })?;

        tracing::debug!(
            template = template.id(),
            recipient = %recipient,
            code = %response.code(),
            "email sent"
        );

        Ok(())
    }
}
