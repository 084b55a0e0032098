//! Form Controller: inline field validation and the submit lifecycle.
//!
//! The controller owns the observable form state (values, inline errors,
//! banners, submit control) and leaves drawing it to the caller. Its checks
//! come from the same schema the server validates against, but only the
//! server decides acceptance.

mod transport;

pub use transport::{HttpTransport, Transport};

use std::collections::HashMap;

use crate::processor::SubmitResponse;
use crate::schema::{field, is_address_shaped, ACKNOWLEDGEMENT, EMAIL, FIELDS};

pub const FIELD_REQUIRED_MESSAGE: &str = "This field is required";
pub const FIELD_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const SUCCESS_BANNER: &str =
    "Thank you! Your creative brief has been submitted successfully. We will contact you soon.";
pub const SERVER_FAILURE_BANNER: &str =
    "There was an error submitting your form. Please try again.";
pub const SUBMIT_LABEL: &str = "Submit Creative Brief";
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// Value posted for a checked acknowledgement box.
const CHECKED: &str = "on";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// Message shown above the form after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(text) | Banner::Error(text) => text,
        }
    }
}

#[derive(Debug)]
pub struct FormController {
    values: HashMap<&'static str, String>,
    acknowledged: bool,
    errors: HashMap<&'static str, &'static str>,
    state: SubmitState,
    banner: Option<Banner>,
    submit_label: &'static str,
    submit_enabled: bool,
    loading: bool,
    scroll_requested: bool,
    contact_email: String,
}

impl FormController {
    /// `contact_email` is offered in the banner when the endpoint is unreachable.
    pub fn new(contact_email: impl Into<String>) -> Self {
        Self {
            values: FIELDS.iter().map(|f| (f.key, String::new())).collect(),
            acknowledged: false,
            errors: HashMap::new(),
            state: SubmitState::Idle,
            banner: None,
            submit_label: SUBMIT_LABEL,
            submit_enabled: true,
            loading: false,
            scroll_requested: false,
            contact_email: contact_email.into(),
        }
    }

    /// Input event: store the value and drop any inline error on the field.
    ///
    /// Returns false for keys outside the form schema.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(spec) = field(key) else {
            return false;
        };
        self.values.insert(spec.key, value.into());
        self.errors.remove(spec.key);
        true
    }

    pub fn set_acknowledged(&mut self, checked: bool) {
        self.acknowledged = checked;
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Inline error a field would show right now, without recording it.
    pub fn validate_field(&self, key: &str) -> Option<&'static str> {
        let spec = field(key)?;
        let value = self.value(key).trim();
        if spec.required && value.is_empty() {
            return Some(FIELD_REQUIRED_MESSAGE);
        }
        if spec.key == EMAIL && !value.is_empty() && !is_address_shaped(value) {
            return Some(FIELD_EMAIL_MESSAGE);
        }
        None
    }

    /// Blur event: show or clear the field's inline error.
    pub fn blur(&mut self, key: &str) {
        let Some(spec) = field(key) else {
            return;
        };
        match self.validate_field(key) {
            Some(message) => {
                self.errors.insert(spec.key, message);
            }
            None => {
                self.errors.remove(spec.key);
            }
        }
    }

    /// Blur every field in schema order; true when no inline error remains.
    pub fn validate_all(&mut self) -> bool {
        for spec in FIELDS {
            self.blur(spec.key);
        }
        self.errors.is_empty()
    }

    pub fn field_error(&self, key: &str) -> Option<&'static str> {
        self.errors.get(key).copied()
    }

    /// Inline errors in schema order.
    pub fn field_errors(&self) -> Vec<(&'static str, &'static str)> {
        FIELDS
            .iter()
            .filter_map(|f| self.errors.get(f.key).map(|m| (f.key, *m)))
            .collect()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        self.submit_label
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the view should scroll to the top; reading it clears the request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Enter `Submitting` and return the field set to post.
    ///
    /// Returns `None` while an attempt is already in flight.
    pub fn begin_submit(&mut self) -> Option<Vec<(String, String)>> {
        if self.state == SubmitState::Submitting {
            return None;
        }
        self.state = SubmitState::Submitting;
        self.submit_enabled = false;
        self.submit_label = SUBMITTING_LABEL;
        self.loading = true;
        self.banner = None;

        let mut fields: Vec<(String, String)> = FIELDS
            .iter()
            .map(|f| (f.key.to_string(), self.value(f.key).to_string()))
            .collect();
        if self.acknowledged {
            fields.push((ACKNOWLEDGEMENT.to_string(), CHECKED.to_string()));
        }
        Some(fields)
    }

    /// Apply the outcome of an attempt and return to `Idle`.
    pub fn finish_submit(&mut self, outcome: crate::Result<SubmitResponse>) {
        match outcome {
            Ok(response) if response.success => {
                self.banner = Some(Banner::Success(SUCCESS_BANNER.to_string()));
                self.reset_fields();
                self.scroll_requested = true;
            }
            Ok(response) => {
                let message = if response.message.trim().is_empty() {
                    SERVER_FAILURE_BANNER.to_string()
                } else {
                    response.message
                };
                self.banner = Some(Banner::Error(message));
            }
            Err(e) => {
                tracing::warn!(error = %e, "brief submission did not reach the server");
                self.banner = Some(Banner::Error(self.transport_failure_banner()));
            }
        }
        self.state = SubmitState::Idle;
        self.submit_enabled = true;
        self.submit_label = SUBMIT_LABEL;
        self.loading = false;
    }

    /// Full submit cycle against `transport`. Returns false if an attempt
    /// was already in flight and nothing was sent.
    pub async fn submit<T>(&mut self, transport: &T) -> bool
    where
        T: Transport + ?Sized,
    {
        let Some(fields) = self.begin_submit() else {
            return false;
        };
        let outcome = transport.post_form(&fields).await;
        self.finish_submit(outcome);
        true
    }

    fn transport_failure_banner(&self) -> String {
        format!(
            "There was an error submitting your form. Please try again or contact us directly at {}",
            self.contact_email
        )
    }

    fn reset_fields(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
        self.acknowledged = false;
        self.errors.clear();
    }
}
