use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::render::{brief_subject, Renderer, SubmissionMeta};
use crate::sanitize::{sanitize, SanitizedSubmission};
use crate::schema::{Submission, EMAIL};
use crate::smtp::{Mailer, OutgoingEmail};
use crate::validate::validate_submission;

pub const SUCCESS_MESSAGE: &str = "Creative brief submitted successfully!";
pub const DISPATCH_FAILED_MESSAGE: &str =
    "Failed to send email. Please try again or contact us directly.";
pub const PROCESSING_FAILED_MESSAGE: &str =
    "An error occurred while processing your submission. Please try again or contact us directly.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// JSON body returned for every submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

impl SubmitResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Validates, sanitizes, renders and dispatches one submission at a time.
///
/// Holds only read-only state, so one instance serves every request.
pub struct SubmissionProcessor {
    config: Arc<AppConfig>,
    renderer: Renderer,
    mailer: Arc<dyn Mailer>,
}

impl SubmissionProcessor {
    pub fn new(config: Arc<AppConfig>, mailer: Arc<dyn Mailer>) -> crate::Result<Self> {
        let renderer = Renderer::new(&config)?;
        Ok(Self {
            config,
            renderer,
            mailer,
        })
    }

    /// Run the full pipeline. Never fails: every outcome is a [`SubmitResponse`].
    ///
    /// The business notification must go out for the submission to succeed;
    /// the receipt is only attempted after that and its outcome is ignored.
    pub async fn process(&self, submission: &Submission, meta: &SubmissionMeta) -> SubmitResponse {
        let validation = validate_submission(submission);
        if !validation.is_ok() {
            tracing::warn!(
                remote_addr = %meta.remote_addr,
                errors = %validation.message(),
                "submission rejected"
            );
            return SubmitResponse::failure(validation.message());
        }

        let sanitized = sanitize(submission);
        // The address already passed validation; header values go through
        // lettre's own address parser rather than the HTML-escaped copy.
        let client_email = submission.get(EMAIL).trim().to_string();

        let business = match self.business_email(&sanitized, meta, &client_email) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(error = %e, "failed to render business notification");
                return SubmitResponse::failure(PROCESSING_FAILED_MESSAGE);
            }
        };

        if let Err(e) = self.mailer.send(&business).await {
            tracing::error!(error = %e, to = %business.to, "business notification not sent");
            return SubmitResponse::failure(DISPATCH_FAILED_MESSAGE);
        }
        tracing::info!(
            remote_addr = %meta.remote_addr,
            subject = %business.subject,
            "creative brief accepted"
        );

        self.send_receipt(&sanitized, meta, client_email).await;
        SubmitResponse::success(SUCCESS_MESSAGE)
    }

    fn business_email(
        &self,
        sanitized: &SanitizedSubmission,
        meta: &SubmissionMeta,
        client_email: &str,
    ) -> crate::Result<OutgoingEmail> {
        let doc = self.renderer.render_brief(sanitized, meta)?;
        Ok(OutgoingEmail {
            to: self.config.to_email.clone(),
            reply_to: Some(client_email.to_string()),
            subject: brief_subject(&self.config.subject_prefix, sanitized),
            html_body: doc.html,
            text_body: doc.text,
        })
    }

    /// Best-effort courtesy email; failures are logged and otherwise dropped.
    async fn send_receipt(
        &self,
        sanitized: &SanitizedSubmission,
        meta: &SubmissionMeta,
        client_email: String,
    ) {
        let doc = match self.renderer.render_receipt(sanitized, meta) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "failed to render receipt");
                return;
            }
        };
        let receipt = OutgoingEmail {
            to: client_email,
            reply_to: None,
            subject: self.config.receipt_subject.clone(),
            html_body: doc.html,
            text_body: doc.text,
        };
        if let Err(e) = self.mailer.send(&receipt).await {
            tracing::warn!(error = %e, to = %receipt.to, "receipt not sent");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use mockall::Sequence;

    use super::*;
    use crate::smtp::MockMailer;
    use crate::validate::ACKNOWLEDGEMENT_MESSAGE;
    use crate::BriefmailError;

    fn meta() -> SubmissionMeta {
        SubmissionMeta {
            submitted_at: Local.with_ymd_and_hms(2026, 5, 2, 9, 30, 0).unwrap(),
            remote_addr: "198.51.100.4".to_string(),
        }
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("fullName", "Alice Example"),
            ("email", "alice@example.com"),
            ("projectTitle", "Spring Campaign"),
            ("projectType", "Branding"),
            ("projectDescription", "A refresh.\nWith detail."),
            ("keyObjectives", "Awareness"),
            ("targetAudience", "Designers"),
            ("mainMessage", "Be bold"),
            ("deliverables", "Logo"),
            ("acknowledgement", "true"),
        ]
    }

    fn processor(mailer: MockMailer) -> SubmissionProcessor {
        SubmissionProcessor::new(Arc::new(AppConfig::default()), Arc::new(mailer)).unwrap()
    }

    fn send_failure() -> BriefmailError {
        BriefmailError::SmtpSend {
            recipient: "x".into(),
            reason: "simulated".into(),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let submission = Submission::from_pairs(
            valid_pairs()
                .into_iter()
                .filter(|(k, _)| *k != "acknowledgement"),
        );
        let response = processor(mailer).process(&submission, &meta()).await;
        assert_eq!(response, SubmitResponse::failure(ACKNOWLEDGEMENT_MESSAGE));
    }

    #[tokio::test]
    async fn test_success_sends_business_then_receipt() {
        let mut seq = Sequence::new();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|e| {
                e.to == "irfan@chroniclecraft.tech"
                    && e.reply_to.as_deref() == Some("alice@example.com")
                    && e.subject == "New Creative Brief Submission - Spring Campaign"
                    && e.html_body.contains("A refresh.<br>")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mailer
            .expect_send()
            .withf(|e| {
                e.to == "alice@example.com"
                    && e.reply_to.is_none()
                    && e.subject
                        == "Thank you for your Creative Brief submission - ChronicleChraft"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let response = processor(mailer)
            .process(&Submission::from_pairs(valid_pairs()), &meta())
            .await;
        assert_eq!(response, SubmitResponse::success(SUCCESS_MESSAGE));
    }

    #[tokio::test]
    async fn test_business_failure_skips_receipt() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(send_failure()));

        let response = processor(mailer)
            .process(&Submission::from_pairs(valid_pairs()), &meta())
            .await;
        assert_eq!(response, SubmitResponse::failure(DISPATCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_receipt_failure_still_succeeds() {
        let mut seq = Sequence::new();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mailer
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(send_failure()));

        let response = processor(mailer)
            .process(&Submission::from_pairs(valid_pairs()), &meta())
            .await;
        assert!(response.success);
        assert_eq!(response.message, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_markup_never_reaches_the_email() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|e| {
                let escaped = e.to != "irfan@chroniclecraft.tech" || e.html_body.contains("&amp;");
                escaped && !e.html_body.contains("<script") && !e.html_body.contains("<tag>")
            })
            .times(2)
            .returning(|_| Ok(()));

        let mut pairs = valid_pairs();
        pairs.push(("inspirations", "<script>alert(1)</script>"));
        pairs.push(("budget", "\"quoted\" & <tag>"));
        let response = processor(mailer)
            .process(&Submission::from_pairs(pairs), &meta())
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_comparison_text_in_required_field_reaches_the_email() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|e| {
                e.to != "irfan@chroniclecraft.tech"
                    || (e.html_body.contains("Main Message")
                        && e.html_body.contains("&lt; 3 pages, punchy"))
            })
            .times(2)
            .returning(|_| Ok(()));

        let mut pairs = valid_pairs();
        pairs.retain(|(k, _)| *k != "mainMessage");
        pairs.push(("mainMessage", "< 3 pages, punchy"));
        let response = processor(mailer)
            .process(&Submission::from_pairs(pairs), &meta())
            .await;
        assert_eq!(response, SubmitResponse::success(SUCCESS_MESSAGE));
    }

    #[tokio::test]
    async fn test_markup_only_required_field_is_rejected() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let mut pairs = valid_pairs();
        pairs.retain(|(k, _)| *k != "mainMessage");
        pairs.push(("mainMessage", "<b></b>"));
        let response = processor(mailer)
            .process(&Submission::from_pairs(pairs), &meta())
            .await;
        assert_eq!(response, SubmitResponse::failure("Main Message is required"));
    }

    #[test]
    fn test_response_json_shape() {
        let json = serde_json::to_value(SubmitResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));
    }
}
