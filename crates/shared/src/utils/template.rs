use askama::{Error, Template};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmailTemplateData {
    pub title: String,
    pub message: String,
    pub button: String,
    pub link: String,
}

#[derive(Template, Debug)]
#[template(path = "email.html")]
pub struct EmailTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub button: &'a str,
    pub link: &'a str,
}

impl<'a> From<&'a EmailTemplateData> for EmailTemplate<'a> {
    fn from(data: &'a EmailTemplateData) -> Self {
        EmailTemplate {
            title: data.title.as_str(),
            message: data.message.as_str(),
            button: data.button.as_str(),
            link: data.link.as_str(),
        }
    }
}

pub fn render_email(data: &EmailTemplateData) -> Result<String, Error> {
    debug!("📧 Rendering email template: {}", data.title);

    EmailTemplate::from(data).render().inspect_err(|e| {
        error!("❌ Failed to render email template: {}", e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_title_message_and_escaped_link() {
        let html = render_email(&EmailTemplateData {
            title: "Order Confirmation #7".into(),
            message: "Thanks for shopping <3".into(),
            button: "View order".into(),
            link: "http://localhost:3000/orders/7".into(),
        })
        .unwrap();

        assert!(html.contains("Order Confirmation #7"));
        assert!(html.contains("Thanks for shopping &#60;3") || html.contains("Thanks for shopping &lt;3"));
        assert!(html.contains("View order"));
    }

    #[test]
    fn omits_button_without_link() {
        let html = render_email(&EmailTemplateData {
            title: "Hello".into(),
            message: "Plain note".into(),
            button: "Open".into(),
            link: String::new(),
        })
        .unwrap();

        assert!(!html.contains("Open</a>"));
    }
}
