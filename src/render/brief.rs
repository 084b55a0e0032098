use serde::Serialize;

use crate::config::Brand;
use crate::sanitize::SanitizedSubmission;
use crate::schema::{FieldKind, FieldSpec, Presence, Section, PROJECT_TITLE, SECTIONS};

use super::SubmissionMeta;

/// Template context for the business notification.
#[derive(Debug, Serialize)]
pub(crate) struct BriefView<'a> {
    pub brand: &'a Brand,
    pub sections: Vec<SectionView>,
    pub submitted_at: String,
    pub remote_addr: &'a str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SectionView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: Option<&'static str>,
    /// Sanitized value, with line breaks already applied for multi-line fields.
    pub value: String,
    pub class: Option<&'static str>,
}

/// Group the non-empty sanitized values into sections, in schema order.
///
/// Fixed sections are always present (possibly with no fields); conditional
/// sections appear only when one of their fields has a value.
pub fn build_sections(submission: &SanitizedSubmission) -> Vec<SectionView> {
    SECTIONS
        .iter()
        .filter_map(|section| section_view(section, submission))
        .collect()
}

fn section_view(section: &Section, submission: &SanitizedSubmission) -> Option<SectionView> {
    let fields: Vec<FieldView> = section
        .fields()
        .filter(|spec| !submission.get(spec.key).is_empty())
        .map(|spec| field_view(spec, section.labelled, submission.get(spec.key)))
        .collect();

    if fields.is_empty() && section.presence == Presence::WhenPopulated {
        return None;
    }
    Some(SectionView {
        title: section.title,
        fields,
    })
}

fn field_view(spec: &FieldSpec, labelled: bool, value: &str) -> FieldView {
    let value = match spec.kind {
        FieldKind::MultiLine => line_breaks(value),
        FieldKind::SingleLine => value.to_string(),
    };
    FieldView {
        key: spec.key,
        label: labelled.then_some(spec.label),
        value,
        class: spec.emphasis.css_class(),
    }
}

/// Convert `\r\n`, `\r` and `\n` to `<br>` line breaks.
pub fn line_breaks(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br>\n")
}

/// Notification subject: configured prefix followed by the project title.
pub fn brief_subject(prefix: &str, submission: &SanitizedSubmission) -> String {
    format!("{prefix}{}", submission.get(PROJECT_TITLE))
}

pub(crate) fn brief_view<'a>(
    brand: &'a Brand,
    submission: &SanitizedSubmission,
    meta: &'a SubmissionMeta,
) -> BriefView<'a> {
    BriefView {
        brand,
        sections: build_sections(submission),
        submitted_at: meta.submitted_at_display(),
        remote_addr: &meta.remote_addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize;
    use crate::schema::Submission;

    fn sanitized(pairs: &[(&str, &str)]) -> SanitizedSubmission {
        sanitize(&Submission::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let sections = build_sections(&sanitized(&[("fullName", "Alice"), ("phone", "")]));
        let client = &sections[0];
        assert_eq!(client.title, "Client Information");
        let keys: Vec<&str> = client.fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["fullName"]);
    }

    #[test]
    fn test_fixed_sections_always_present() {
        let sections = build_sections(&sanitized(&[]));
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "Client Information",
                "Project Overview",
                "Creative Direction",
                "Content & Deliverables",
                "Timeline & Budget",
                "Contact & Communication",
            ]
        );
        assert!(sections.iter().all(|s| s.fields.is_empty()));
    }

    #[test]
    fn test_additional_notes_last_and_unlabelled() {
        let sections = build_sections(&sanitized(&[("additionalNotes", "Call first")]));
        let notes = sections.last().unwrap();
        assert_eq!(notes.title, "Additional Notes");
        assert_eq!(notes.fields.len(), 1);
        assert_eq!(notes.fields[0].label, None);
        assert_eq!(notes.fields[0].class, Some("priority"));
    }

    #[test]
    fn test_multi_line_fields_get_line_breaks() {
        let sections = build_sections(&sanitized(&[
            ("projectDescription", "line one\nline two"),
            ("budget", "5k\n10k"),
        ]));
        let description = &sections[1].fields[0];
        assert_eq!(description.value, "line one<br>\nline two");
        let budget = &sections[4].fields[0];
        assert_eq!(budget.value, "5k\n10k");
    }

    #[test]
    fn test_line_breaks_normalizes_carriage_returns() {
        assert_eq!(line_breaks("a\r\nb\rc"), "a<br>\nb<br>\nc");
    }

    #[test]
    fn test_highlight_class() {
        let sections = build_sections(&sanitized(&[("projectTitle", "Launch"), ("projectType", "Web")]));
        let overview = &sections[1];
        assert_eq!(overview.fields[0].class, Some("highlight"));
        assert_eq!(overview.fields[1].class, None);
    }

    #[test]
    fn test_subject_uses_sanitized_title() {
        let s = sanitized(&[("projectTitle", " Fish & <b>Chips</b> ")]);
        assert_eq!(
            brief_subject("New Creative Brief Submission - ", &s),
            "New Creative Brief Submission - Fish &amp; Chips"
        );
    }
}
