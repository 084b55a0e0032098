use crate::sanitize::strip_tags;
use crate::schema::{is_valid_email, required_fields, Submission, EMAIL};

pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";
pub const ACKNOWLEDGEMENT_MESSAGE: &str = "You must acknowledge the terms to submit the form";

/// Outcome of the server-side checks for one submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Human-readable messages, in check order. Empty means valid.
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All messages joined the way they are reported to the client.
    pub fn message(&self) -> String {
        self.errors.join(", ")
    }
}

/// Authoritative validation of a raw submission.
///
/// Order is fixed: required fields in schema order, then the email format,
/// then the acknowledgement.
pub fn validate_submission(submission: &Submission) -> ValidationResult {
    let mut errors = Vec::new();

    for spec in required_fields() {
        if is_blank(submission.get(spec.key)) {
            errors.push(spec.required_message());
        }
    }

    // Format only when present, so an empty email is reported once.
    let email = submission.get(EMAIL).trim();
    if !is_blank(email) && !is_valid_email(email) {
        errors.push(INVALID_EMAIL_MESSAGE.to_string());
    }

    if !submission.acknowledged() {
        errors.push(ACKNOWLEDGEMENT_MESSAGE.to_string());
    }

    ValidationResult { errors }
}

/// Empty once markup and surrounding whitespace are gone.
fn is_blank(raw: &str) -> bool {
    strip_tags(raw).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("fullName", "Alice Example"),
            ("email", "alice@example.com"),
            ("projectTitle", "Spring Campaign"),
            ("projectType", "Branding"),
            ("projectDescription", "A refresh."),
            ("keyObjectives", "Awareness"),
            ("targetAudience", "Designers"),
            ("mainMessage", "Be bold"),
            ("deliverables", "Logo"),
            ("acknowledgement", "true"),
        ]
    }

    fn without(key: &str) -> Submission {
        Submission::from_pairs(valid_pairs().into_iter().filter(|(k, _)| *k != key))
    }

    fn with(key: &'static str, value: &'static str) -> Submission {
        let mut pairs = valid_pairs();
        pairs.push((key, value));
        Submission::from_pairs(pairs)
    }

    #[test]
    fn test_valid_submission_passes() {
        let result = validate_submission(&Submission::from_pairs(valid_pairs()));
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_each_missing_required_field_is_named() {
        for spec in required_fields() {
            let result = validate_submission(&without(spec.key));
            assert!(!result.is_ok());
            assert!(
                result.message().contains(spec.requirement_label()),
                "message for missing {} was: {}",
                spec.key,
                result.message()
            );
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let result = validate_submission(&with("mainMessage", "   \n\t"));
        assert_eq!(result.errors, vec!["Main Message is required"]);
    }

    #[test]
    fn test_markup_only_counts_as_missing() {
        let result = validate_submission(&with("mainMessage", "<b></b> <i> </i>"));
        assert_eq!(result.errors, vec!["Main Message is required"]);
    }

    #[test]
    fn test_comparison_text_is_present() {
        let result = validate_submission(&with("mainMessage", "< 3 pages, punchy"));
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_email_formats() {
        for bad in ["foo@bar", "foo", "foo@", "@example.com"] {
            let result = validate_submission(&with("email", bad));
            assert_eq!(
                result.errors,
                vec![INVALID_EMAIL_MESSAGE],
                "email {bad:?} should fail format only"
            );
        }
    }

    #[test]
    fn test_empty_email_reports_required_only() {
        let result = validate_submission(&with("email", ""));
        assert_eq!(result.errors, vec!["Email Address is required"]);
    }

    #[test]
    fn test_missing_acknowledgement() {
        let result = validate_submission(&without("acknowledgement"));
        assert_eq!(result.errors, vec![ACKNOWLEDGEMENT_MESSAGE]);

        let result = validate_submission(&with("acknowledgement", ""));
        assert_eq!(result.errors, vec![ACKNOWLEDGEMENT_MESSAGE]);
    }

    #[test]
    fn test_error_order_and_join() {
        let submission = Submission::from_pairs([("email", "not-an-email")]);
        let result = validate_submission(&submission);
        let expected: Vec<String> = required_fields()
            .filter(|f| f.key != "email")
            .map(|f| f.required_message())
            .chain([
                INVALID_EMAIL_MESSAGE.to_string(),
                ACKNOWLEDGEMENT_MESSAGE.to_string(),
            ])
            .collect();
        assert_eq!(result.errors, expected);
        assert_eq!(result.message(), expected.join(", "));
    }

    #[test]
    fn test_empty_submission_message() {
        let result = validate_submission(&Submission::default());
        assert!(result.message().starts_with("Full Name is required, Email Address is required"));
        assert!(result.message().ends_with(ACKNOWLEDGEMENT_MESSAGE));
        assert_eq!(result.errors.len(), 10);
    }
}
