//! # Lead Dispatch Module
//!
//! Prospective-student enquiries ("leads") are validated here and handed to
//! a transactional email service for delivery. The service speaks the
//! EmailJS wire format: `POST {endpoint}/api/v1.0/email/send` with a JSON
//! body naming the service, template, user and template parameters.
//!
//! Validation happens before any network call so a malformed enquiry is
//! rejected locally with a field-level message.

use crate::config::LeadsConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use uniscout_core::DirectoryError;

/// Cap on every free-text lead field.
const MAX_FIELD_LENGTH: usize = 2048;

// =============================================================================
// LEAD FORM
// =============================================================================

/// An enquiry submitted through the contact form.
///
/// Only name, email and message are required; the remaining fields carry
/// optional context about the prospective student and the institution the
/// enquiry targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: String,
    pub city: String,
    /// Which university the enquiry is about.
    pub university: String,
    /// Which program the enquiry is about.
    pub program: String,
}

impl LeadSubmission {
    /// Validate the submission, returning the first problem found as
    /// [`DirectoryError::InvalidInput`].
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::InvalidInput("Name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(DirectoryError::InvalidInput("Email is required".to_string()));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(DirectoryError::InvalidInput(format!(
                "'{}' is not a valid email address",
                self.email.trim()
            )));
        }
        if self.message.trim().is_empty() {
            return Err(DirectoryError::InvalidInput(
                "Message is required".to_string(),
            ));
        }
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
            ("phone", &self.phone),
            ("city", &self.city),
            ("university", &self.university),
            ("program", &self.program),
        ] {
            if value.len() > MAX_FIELD_LENGTH {
                return Err(DirectoryError::InvalidInput(format!(
                    "Field '{}' exceeds maximum length of {} bytes",
                    field, MAX_FIELD_LENGTH
                )));
            }
        }
        Ok(())
    }
}

/// Minimal structural check: exactly one '@' with a dot somewhere after it,
/// and no whitespace. Deliverability is the mail service's problem.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// =============================================================================
// LEAD SINK
// =============================================================================

/// Delivery client for validated leads.
#[derive(Debug, Clone)]
pub struct LeadSink {
    http: reqwest::Client,
    config: LeadsConfig,
}

impl LeadSink {
    #[must_use]
    pub fn new(config: LeadsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    /// True when the delivery credentials are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.config.service_id.is_empty()
            && !self.config.template_id.is_empty()
            && !self.config.user_id.is_empty()
    }

    /// Validate and deliver a lead.
    ///
    /// Validation failures surface as [`DirectoryError::InvalidInput`];
    /// delivery failures as [`DirectoryError::Upstream`], so callers can
    /// tell the caller's fault from the mail service's.
    ///
    /// An unconfigured sink accepts the lead and logs it instead of
    /// delivering, so a missing email credential never loses the enquiry
    /// silently at the API boundary.
    pub async fn dispatch(&self, form: &LeadSubmission) -> Result<(), DirectoryError> {
        form.validate()?;

        if !self.is_configured() {
            tracing::warn!(
                name = %form.name.trim(),
                email = %form.email.trim(),
                "Lead delivery not configured; enquiry logged only"
            );
            return Ok(());
        }

        let url = format!(
            "{}/api/v1.0/email/send",
            self.config.endpoint.trim_end_matches('/')
        );
        let body = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.user_id,
            "template_params": {
                "from_name": form.name.trim(),
                "from_email": form.email.trim(),
                "phone": form.phone.trim(),
                "city": form.city.trim(),
                "message": form.message.trim(),
                "university": form.university.trim(),
                "program": form.program.trim(),
            },
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DirectoryError::Upstream(format!("Lead delivery failed: {}", e)))?;

        if resp.status().is_success() {
            tracing::info!(name = %form.name.trim(), "Lead delivered");
            Ok(())
        } else {
            Err(DirectoryError::Upstream(format!(
                "Lead delivery rejected with status {}",
                resp.status().as_u16()
            )))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LeadSubmission {
        LeadSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Tell me about admissions".to_string(),
            ..LeadSubmission::default()
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn empty_fields_rejected() {
        for field in ["name", "email", "message"] {
            let mut form = valid_form();
            match field {
                "name" => form.name = "  ".to_string(),
                "email" => form.email = String::new(),
                _ => form.message = String::new(),
            }
            assert!(form.validate().is_err(), "{field} should be required");
        }
    }

    #[test]
    fn email_shape_checked() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("no-at-sign"));
        assert!(!is_plausible_email("a@nodot"));
        assert!(!is_plausible_email("a b@c.d"));
        assert!(!is_plausible_email("a@.com"));
        assert!(!is_plausible_email("delivery@@x.com"));
    }

    #[test]
    fn invalid_email_is_invalid_input() {
        let mut form = valid_form();
        form.email = "delivery@@x.com".to_string();
        assert!(matches!(
            form.validate(),
            Err(DirectoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_field_rejected() {
        let mut form = valid_form();
        form.message = "x".repeat(MAX_FIELD_LENGTH + 1);
        assert!(form.validate().is_err());
    }

    #[test]
    fn unconfigured_sink_is_detected() {
        let sink = LeadSink::new(LeadsConfig::default());
        assert!(!sink.is_configured());
    }
}
