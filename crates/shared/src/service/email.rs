use crate::{
    abstract_trait::{EmailRequest, EmailServiceTrait},
    config::EmailConfig,
    errors::ServiceError,
    utils::render_email,
};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{error, info};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// SMTP delivery of rendered HTML emails over STARTTLS.
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: Mailbox,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());

        let mailer = SmtpTransport::starttls_relay(&config.smtp_server)
            .map_err(|e| anyhow::anyhow!("Failed to create SMTP relay: {e}"))?
            .credentials(creds)
            .port(config.smtp_port)
            .build();

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid sender address '{}': {e}", config.from))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl EmailServiceTrait for EmailService {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        let body = render_email(&req.data)
            .map_err(|e| ServiceError::Internal(format!("Failed to render email template: {e}")))?;

        let to: Mailbox = req.to.parse().map_err(|e| {
            error!("❌ Invalid recipient email: {}", e);
            ServiceError::validation(format!("Invalid recipient email: {}", req.to))
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&req.subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| {
                error!("❌ Failed to build email: {}", e);
                ServiceError::Internal(format!("Failed to build email: {e}"))
            })?;

        match self.mailer.send(email).await {
            Ok(_) => {
                info!("✅ Email sent to {}", req.to);
                Ok(())
            }
            Err(e) => {
                error!("❌ Failed to send email to {}: {}", req.to, e);
                Err(ServiceError::Internal(format!("Failed to send email: {e}")))
            }
        }
    }

    async fn test_connection(&self) -> Result<bool, ServiceError> {
        self.mailer.test_connection().await.map_err(|e| {
            error!("❌ SMTP connection test failed: {}", e);
            ServiceError::Internal(format!("SMTP connection failed: {e}"))
        })
    }
}
