//! Contact form delivery.
//!
//! Uses SMTP via lettre with Askama plain-text and HTML templates. When
//! delivery is disabled the rendered message is logged instead and the
//! submission is reported as queued.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use flower_shop_core::{ContactStatus, ValidContact};

use crate::config::EmailConfig;

/// HTML body of the contact notification.
#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmailHtml<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    phone: &'a str,
    message: &'a str,
}

/// Plain text body of the contact notification.
#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactEmailText<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    phone: &'a str,
    message: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Sends contact form submissions to the shop inbox.
#[derive(Clone)]
pub struct ContactMailer {
    /// `None` when delivery is disabled.
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for ContactMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactMailer")
            .field("enabled", &self.transport.is_some())
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .finish()
    }
}

impl ContactMailer {
    /// Create the mailer from configuration.
    ///
    /// No connection is made until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::InvalidAddress` if a configured address does not
    /// parse, or `EmailError::Smtp` if the relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from = parse_mailbox(&config.from_address)?;
        let to = parse_mailbox(&config.to_address)?;

        let transport = if config.enabled {
            let mut builder = if config.starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
            .port(config.smtp_port);

            if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password)
            {
                builder = builder.credentials(Credentials::new(
                    username.clone(),
                    password.expose_secret().to_string(),
                ));
            }
            Some(builder.build())
        } else {
            tracing::info!("Contact email delivery disabled; messages will be logged");
            None
        };

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Deliver a contact submission to the shop inbox.
    ///
    /// Returns [`ContactStatus::Queued`] without sending when delivery is
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or the SMTP send fails.
    pub async fn send_contact(&self, contact: &ValidContact) -> Result<ContactStatus, EmailError> {
        let message = self.build_message(contact)?;

        let Some(transport) = &self.transport else {
            tracing::info!(
                from = %contact.email,
                subject = %contact.subject_line(),
                message = %contact.message,
                "Contact message received (delivery disabled)"
            );
            return Ok(ContactStatus::Queued);
        };

        transport.send(message).await?;
        tracing::info!(
            from = %contact.email,
            to = %self.to,
            "Contact email sent successfully"
        );
        Ok(ContactStatus::Sent)
    }

    /// Build the multipart notification, replying to the sender.
    fn build_message(&self, contact: &ValidContact) -> Result<Message, EmailError> {
        let name = contact.name.as_str();
        let email = contact.email.as_str();
        let subject = contact.subject.as_deref().unwrap_or("No subject");
        let phone = contact.phone.as_deref().unwrap_or("Not provided");
        let message = contact.message.as_str();

        let html = ContactEmailHtml {
            name,
            email,
            subject,
            phone,
            message,
        }
        .render()?;
        let text = ContactEmailText {
            name,
            email,
            subject,
            phone,
            message,
        }
        .render()?;

        let reply_to = Mailbox::new(
            Some(contact.name.clone()),
            contact
                .email
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(contact.email.to_string()))?,
        );

        let message = Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(contact.subject_line())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;
        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flower_shop_core::ContactRequest;

    use super::*;

    fn config(enabled: bool) -> EmailConfig {
        EmailConfig {
            enabled,
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            starttls: false,
            smtp_username: None,
            smtp_password: None,
            to_address: "owner@example.com".to_string(),
            from_address: "no-reply@example.com".to_string(),
        }
    }

    fn contact() -> ValidContact {
        ContactRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: Some("Wedding order".into()),
            phone: Some("+1 555 0100".into()),
            message: "Do you deliver <b>on Sundays</b>?".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_message_headers_and_bodies() {
        let mailer = ContactMailer::new(&config(false)).unwrap();
        let raw = String::from_utf8(mailer.build_message(&contact()).unwrap().formatted()).unwrap();

        assert!(raw.contains("Subject: Flower Shop Contact: Wedding order"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Reply-To:"));
        assert!(raw.contains("<ana@example.com>"));
        assert!(raw.contains("+1 555 0100"));
    }

    #[test]
    fn test_html_body_escapes_message() {
        let html = ContactEmailHtml {
            name: "Ana",
            email: "ana@example.com",
            subject: "Wedding order",
            phone: "Not provided",
            message: "Do you deliver <b>on Sundays</b>?",
        }
        .render()
        .unwrap();

        assert!(html.contains("&#60;b&#62;on Sundays&#60;/b&#62;"));
        assert!(!html.contains("<b>on Sundays</b>"));
    }

    #[tokio::test]
    async fn test_disabled_delivery_is_queued() {
        let mailer = ContactMailer::new(&config(false)).unwrap();
        assert!(!mailer.is_enabled());
        assert_eq!(
            mailer.send_contact(&contact()).await.unwrap(),
            ContactStatus::Queued
        );
    }

    #[test]
    fn test_invalid_configured_address() {
        let mut cfg = config(false);
        cfg.to_address = "not an address".to_string();
        assert!(matches!(
            ContactMailer::new(&cfg),
            Err(EmailError::InvalidAddress(_))
        ));
    }
}
