//! Contact form submissions.

use serde::{Deserialize, Serialize};

use crate::types::Email;
use crate::validation::{self, ValidationError};

pub const MESSAGE_MAX: usize = 5_000;

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// A contact request with trimmed fields and a parsed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: Email,
    pub subject: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when name, email or message is
    /// blank, and [`ValidationError::InvalidEmail`] for a malformed address.
    pub fn validate(&self) -> Result<ValidContact, ValidationError> {
        let name = validation::required("Name", &self.name)?;
        let email = validation::required("Email", &self.email)?;
        let message = validation::required("Message", &self.message)?;
        validation::max_len("Message", message, MESSAGE_MAX)?;

        Ok(ValidContact {
            name: name.to_owned(),
            email: Email::parse(email)?,
            subject: validation::optional(self.subject.as_deref()),
            phone: validation::optional(self.phone.as_deref()),
            message: message.to_owned(),
        })
    }
}

impl ValidContact {
    /// Subject line of the notification sent to the shop.
    #[must_use]
    pub fn subject_line(&self) -> String {
        format!(
            "Flower Shop Contact: {}",
            self.subject.as_deref().unwrap_or("No subject")
        )
    }
}

/// What happened to a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Handed to the SMTP relay.
    Sent,
    /// Delivery is disabled; the message was logged only.
    Queued,
}

/// Successful response of `POST /api/contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub status: ContactStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: " Iris ".to_string(),
            email: "iris@example.com".to_string(),
            subject: Some(" ".to_string()),
            phone: None,
            message: "Do you deliver on Sundays?".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let contact = request().validate().unwrap();
        assert_eq!(contact.name, "Iris");
        assert_eq!(contact.subject, None);
        assert_eq!(contact.subject_line(), "Flower Shop Contact: No subject");
    }

    #[test]
    fn test_validate_required_fields() {
        let mut r = request();
        r.message = "\n".to_string();
        assert_eq!(r.validate(), Err(ValidationError::Required("Message")));

        let mut r = request();
        r.email = String::new();
        assert_eq!(r.validate(), Err(ValidationError::Required("Email")));
    }

    #[test]
    fn test_validate_bad_email() {
        let mut r = request();
        r.email = "iris-at-example".to_string();
        assert!(matches!(r.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_subject_line_uses_subject() {
        let mut r = request();
        r.subject = Some("Wedding order".to_string());
        assert_eq!(
            r.validate().unwrap().subject_line(),
            "Flower Shop Contact: Wedding order"
        );
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ContactReceipt {
            status: ContactStatus::Queued,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"queued"}"#);
    }
}
