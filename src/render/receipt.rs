use serde::Serialize;

use crate::config::Brand;
use crate::sanitize::SanitizedSubmission;
use crate::schema::{FULL_NAME, PROJECT_TITLE};

use super::SubmissionMeta;

/// Template context for the client receipt. Only two values come from input.
#[derive(Debug, Serialize)]
pub(crate) struct ReceiptView<'a> {
    pub brand: &'a Brand,
    pub full_name: &'a str,
    pub project_title: &'a str,
    pub submitted_on: String,
}

pub(crate) fn receipt_view<'a>(
    brand: &'a Brand,
    submission: &'a SanitizedSubmission,
    meta: &SubmissionMeta,
) -> ReceiptView<'a> {
    ReceiptView {
        brand,
        full_name: submission.get(FULL_NAME),
        project_title: submission.get(PROJECT_TITLE),
        submitted_on: meta.submitted_on_display(),
    }
}
