use crate::{
    abstract_trait::{DynEmailService, EmailRequest},
    errors::ServiceError,
    utils::{EmailTemplateData, format_vnd},
};
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Welcome {
        to: String,
        name: String,
    },
    PasswordReset {
        to: String,
        name: String,
        token: String,
    },
    OrderConfirmation {
        to: String,
        name: String,
        order_id: i64,
        total: Decimal,
    },
}

impl Notification {
    fn recipient(&self) -> &str {
        match self {
            Notification::Welcome { to, .. }
            | Notification::PasswordReset { to, .. }
            | Notification::OrderConfirmation { to, .. } => to,
        }
    }
}

/// Turns domain events into templated emails. Delivery from request paths
/// goes through [`Notifier::dispatch`] so a mail outage never fails the caller.
#[derive(Clone)]
pub struct Notifier {
    email: DynEmailService,
    frontend_url: String,
}

impl Notifier {
    pub fn new(email: DynEmailService, frontend_url: impl Into<String>) -> Self {
        Self {
            email,
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn email(&self) -> &DynEmailService {
        &self.email
    }

    pub fn render(&self, notification: &Notification) -> EmailRequest {
        let (subject, data) = match notification {
            Notification::Welcome { name, .. } => (
                "Welcome to Marketplace".to_string(),
                EmailTemplateData {
                    title: "Welcome to Marketplace".into(),
                    message: format!(
                        "Hi {name}, your account is ready. Start browsing products from sellers near you."
                    ),
                    button: "Start shopping".into(),
                    link: self.frontend_url.clone(),
                },
            ),
            Notification::PasswordReset { name, token, .. } => (
                "Reset your password".to_string(),
                EmailTemplateData {
                    title: "Password reset".into(),
                    message: format!(
                        "Hi {name}, we received a request to reset your password. The link expires in 30 minutes. If you did not ask for this, ignore this email."
                    ),
                    button: "Reset password".into(),
                    link: format!("{}/reset-password?token={token}", self.frontend_url),
                },
            ),
            Notification::OrderConfirmation {
                name,
                order_id,
                total,
                ..
            } => (
                format!("Order Confirmation #{order_id}"),
                EmailTemplateData {
                    title: format!("Order Confirmation #{order_id}"),
                    message: format!(
                        "Hi {name}, thank you for your order. Total: {}.",
                        format_vnd(*total)
                    ),
                    button: "View order".into(),
                    link: format!("{}/orders/{order_id}", self.frontend_url),
                },
            ),
        };

        EmailRequest {
            to: notification.recipient().to_string(),
            subject,
            data,
        }
    }

    /// Sends and waits for the result.
    pub async fn deliver(&self, notification: &Notification) -> Result<(), ServiceError> {
        let request = self.render(notification);
        self.email.send(&request).await
    }

    /// Sends on a detached task. Failures are logged only.
    pub fn dispatch(&self, notification: Notification) -> JoinHandle<()> {
        let notifier = self.clone();

        tokio::spawn(async move {
            match notifier.deliver(&notification).await {
                Ok(()) => info!("📧 Notification sent to {}", notification.recipient()),
                Err(e) => error!(
                    "❌ Failed to send notification to {}: {e}",
                    notification.recipient()
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::MockEmailServiceTrait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn notifier(mock: MockEmailServiceTrait) -> Notifier {
        Notifier::new(Arc::new(mock), "http://shop.test/")
    }

    #[test]
    fn order_confirmation_carries_id_total_and_link() {
        let request = notifier(MockEmailServiceTrait::new()).render(&Notification::OrderConfirmation {
            to: "buyer@example.com".into(),
            name: "Buyer".into(),
            order_id: 42,
            total: dec!(1234500),
        });

        assert_eq!(request.to, "buyer@example.com");
        assert_eq!(request.subject, "Order Confirmation #42");
        assert!(request.data.message.contains("1.234.500 VND"));
        assert_eq!(request.data.link, "http://shop.test/orders/42");
    }

    #[test]
    fn reset_link_embeds_token() {
        let request = notifier(MockEmailServiceTrait::new()).render(&Notification::PasswordReset {
            to: "a@example.com".into(),
            name: "A".into(),
            token: "abc123".into(),
        });

        assert_eq!(
            request.data.link,
            "http://shop.test/reset-password?token=abc123"
        );
    }

    #[tokio::test]
    async fn dispatch_sends_rendered_request() {
        let mut mock = MockEmailServiceTrait::new();
        mock.expect_send()
            .withf(|req| req.to == "new@example.com" && req.subject == "Welcome to Marketplace")
            .times(1)
            .returning(|_| Ok(()));

        let handle = notifier(mock).dispatch(Notification::Welcome {
            to: "new@example.com".into(),
            name: "New".into(),
        });

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_swallows_delivery_failure() {
        let mut mock = MockEmailServiceTrait::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(ServiceError::Internal("smtp down".into())));

        let handle = notifier(mock).dispatch(Notification::Welcome {
            to: "new@example.com".into(),
            name: "New".into(),
        });

        assert!(handle.await.is_ok());
    }
}
