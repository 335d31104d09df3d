use crate::{
    abstract_trait::{EmailRequest, EmailToolServiceTrait},
    domain::{
        Capability, Requester,
        requests::{OrderConfirmationEmailRequest, RecipientEmailRequest, SimpleEmailRequest},
        responses::ApiResponse,
    },
    errors::ServiceError,
    service::{Notification, Notifier},
    utils::{EmailTemplateData, Method, ServiceTracer, TracingContext, generate_random_string},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use validator::Validate;

/// Admin-only synchronous sends, so operators see SMTP failures directly.
#[derive(Clone)]
pub struct EmailToolService {
    notifier: Notifier,
    tracer: ServiceTracer,
}

impl EmailToolService {
    pub async fn new(notifier: Notifier, registry: &Arc<Mutex<Registry>>) -> Self {
        let tracer =
            ServiceTracer::registered("email-tool-service", "email_tool_service", registry).await;
        Self { notifier, tracer }
    }

    fn start(&self, operation: &'static str, to: &str) -> TracingContext {
        self.tracer.start(
            operation,
            Method::Post,
            vec![
                KeyValue::new("component", "email"),
                KeyValue::new("email.to", to.to_string()),
            ],
        )
    }

    fn sent(requester: &Requester, to: &str) -> ApiResponse<()> {
        info!("📧 {} sent a test email to {to}", requester.username);
        ApiResponse::success(format!("Email sent successfully to {to}"), ())
    }

    fn display_name(req: &RecipientEmailRequest) -> String {
        req.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("there")
            .to_string()
    }

    async fn simple(
        &self,
        requester: &Requester,
        req: &SimpleEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Admin)?;
        req.validate()?;

        let request = EmailRequest {
            to: req.to.clone(),
            subject: req.subject.clone(),
            data: EmailTemplateData {
                title: req.subject.clone(),
                message: req.message.clone(),
                button: String::new(),
                link: String::new(),
            },
        };
        self.notifier.email().send(&request).await?;

        Ok(Self::sent(requester, &req.to))
    }

    async fn welcome(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Admin)?;
        req.validate()?;

        self.notifier
            .deliver(&Notification::Welcome {
                to: req.to.clone(),
                name: Self::display_name(req),
            })
            .await?;

        Ok(Self::sent(requester, &req.to))
    }

    async fn password_reset(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Admin)?;
        req.validate()?;

        let token = generate_random_string(32)
            .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {e}")))?;

        self.notifier
            .deliver(&Notification::PasswordReset {
                to: req.to.clone(),
                name: Self::display_name(req),
                token,
            })
            .await?;

        Ok(Self::sent(requester, &req.to))
    }

    async fn order_confirmation(
        &self,
        requester: &Requester,
        req: &OrderConfirmationEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Admin)?;
        req.validate()?;

        self.notifier
            .deliver(&Notification::OrderConfirmation {
                to: req.to.clone(),
                name: "there".into(),
                order_id: req.order_id,
                total: req.total,
            })
            .await?;

        Ok(Self::sent(requester, &req.to))
    }

    async fn connection(&self, requester: &Requester) -> Result<ApiResponse<bool>, ServiceError> {
        requester.require(Capability::Admin)?;

        let connected = self.notifier.email().test_connection().await?;
        let message = if connected {
            "SMTP connection successful"
        } else {
            "SMTP server rejected the connection"
        };

        Ok(ApiResponse::success(message, connected))
    }
}

#[async_trait]
impl EmailToolServiceTrait for EmailToolService {
    async fn send_simple(
        &self,
        requester: &Requester,
        req: &SimpleEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.start("send_simple_email", &req.to);
        let result = self.simple(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn send_welcome(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.start("send_welcome_email", &req.to);
        let result = self.welcome(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn send_password_reset(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.start("send_reset_email", &req.to);
        let result = self.password_reset(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn send_order_confirmation(
        &self,
        requester: &Requester,
        req: &OrderConfirmationEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.start("send_order_confirmation_email", &req.to);
        let result = self.order_confirmation(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn test_connection(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<bool>, ServiceError> {
        let ctx = self.tracer.start(
            "test_smtp_connection",
            Method::Get,
            vec![KeyValue::new("component", "email")],
        );
        let result = self.connection(requester).await;
        self.tracer.finish(ctx, result).await
    }
}
