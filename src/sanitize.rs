use std::collections::HashMap;

use crate::schema::{Submission, FIELDS};

/// Field values that are safe to interpolate into HTML as-is.
///
/// Only [`sanitize`] constructs this type, so renderers can never see raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    values: HashMap<&'static str, String>,
}

impl SanitizedSubmission {
    /// Sanitized value for `key`; empty for unknown keys.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// Trim, strip markup, then HTML-escape every schema field.
pub fn sanitize(submission: &Submission) -> SanitizedSubmission {
    let values = FIELDS
        .iter()
        .map(|spec| (spec.key, sanitize_value(submission.get(spec.key))))
        .collect();
    SanitizedSubmission { values }
}

pub fn sanitize_value(raw: &str) -> String {
    handlebars::html_escape(&strip_tags(raw.trim()))
}

/// Remove everything between `<` and the next `>`.
///
/// A `<` opens a tag only when a non-whitespace character follows it, so
/// comparison text such as `< 2 weeks` survives. An unterminated tag drops
/// the rest of the input. A lone `>` outside a tag is kept (and later escaped).
pub fn strip_tags(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '<' if !in_tag => match chars.peek() {
                Some(next) if !next.is_whitespace() => in_tag = true,
                _ => result.push(ch),
            },
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}
