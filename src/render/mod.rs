mod brief;
mod receipt;

pub use brief::{brief_subject, build_sections, line_breaks, FieldView, SectionView};

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Local, Offset, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::{AppConfig, Brand};
use crate::sanitize::SanitizedSubmission;
use crate::BriefmailError;

const BRIEF_TEMPLATE: &str = include_str!("../../templates/brief.hbs");
const RECEIPT_TEMPLATE: &str = include_str!("../../templates/receipt.hbs");
const DOCUMENT_TEMPLATE: &str = include_str!("../../templates/document.hbs");
const DEFAULT_STYLESHEET: &str = include_str!("../../templates/email.css");
const FOOTER_TIMESTAMP: &str = "%B %-d, %Y at %-I:%M %p %Z";

/// Request-scoped facts shown in the notification footer.
#[derive(Debug, Clone)]
pub struct SubmissionMeta {
    pub submitted_at: DateTime<Local>,
    /// Network address of the submitting client.
    pub remote_addr: String,
}

impl SubmissionMeta {
    pub fn now(remote_addr: impl ToString) -> Self {
        Self {
            submitted_at: Local::now(),
            remote_addr: remote_addr.to_string(),
        }
    }

    /// e.g. `March 4, 2026 at 3:07 PM CET`.
    ///
    /// The abbreviation comes from the host's IANA zone. When that zone is
    /// unknown, or disagrees with the local offset (a `TZ` override), the
    /// numeric offset is printed instead.
    pub fn submitted_at_display(&self) -> String {
        let local_offset = self.submitted_at.offset().fix();
        match local_zone() {
            Some(tz) => {
                let zoned = self.submitted_at.with_timezone(&tz);
                if zoned.offset().fix() == local_offset {
                    footer_timestamp(&zoned)
                } else {
                    footer_timestamp(&self.submitted_at)
                }
            }
            None => footer_timestamp(&self.submitted_at),
        }
    }

    pub fn submitted_on_display(&self) -> String {
        self.submitted_at.format("%B %-d, %Y").to_string()
    }
}

fn footer_timestamp<Z>(at: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    at.format(FOOTER_TIMESTAMP).to_string()
}

/// The host's IANA zone, looked up once.
fn local_zone() -> Option<Tz> {
    static ZONE: OnceLock<Option<Tz>> = OnceLock::new();
    *ZONE.get_or_init(|| {
        let name = match iana_time_zone::get_timezone() {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(error = %e, "host time zone unknown");
                return None;
            }
        };
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                tracing::debug!(zone = %name, error = %e, "unrecognised time zone");
                None
            }
        }
    })
}

/// A finished HTML document plus its plain-text alternative.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    pub text: String,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    title: &'a str,
    body: &'a str,
}

/// Renders both outbound documents. Built once at startup and shared.
pub struct Renderer {
    hbs: handlebars::Handlebars<'static>,
    css: String,
    brand: Brand,
}

impl Renderer {
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        Ok(Self {
            hbs: make_handlebars()?,
            css: resolve_css(config.stylesheet.as_deref())?,
            brand: config.brand.clone(),
        })
    }

    /// Render the business notification for a sanitized submission.
    pub fn render_brief(
        &self,
        submission: &SanitizedSubmission,
        meta: &SubmissionMeta,
    ) -> crate::Result<RenderedDocument> {
        let view = brief::brief_view(&self.brand, submission, meta);
        let body = self.render("brief", &view)?;
        self.finish("New Creative Brief Submission", &body)
    }

    /// Render the thank-you receipt addressed to the submitter.
    pub fn render_receipt(
        &self,
        submission: &SanitizedSubmission,
        meta: &SubmissionMeta,
    ) -> crate::Result<RenderedDocument> {
        let view = receipt::receipt_view(&self.brand, submission, meta);
        let body = self.render("receipt", &view)?;
        self.finish("Thank You!", &body)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> crate::Result<String> {
        self.hbs
            .render(name, data)
            .map_err(|e| BriefmailError::HandlebarsRender {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    fn finish(&self, title: &str, body: &str) -> crate::Result<RenderedDocument> {
        let body = apply_css(body, &self.css)?;
        let text = html_to_text(&body);
        let html = self.render("document", &DocumentView { title, body: &body })?;
        Ok(RenderedDocument { html, text })
    }
}

/// Strict mode with the default HTML escaping: anything interpolated with
/// `{{ }}` is escaped, sanitized values are interpolated with `{{{ }}}`.
fn make_handlebars() -> crate::Result<handlebars::Handlebars<'static>> {
    let mut hbs = handlebars::Handlebars::new();
    hbs.set_strict_mode(true);
    for (name, source) in [
        ("brief", BRIEF_TEMPLATE),
        ("receipt", RECEIPT_TEMPLATE),
        ("document", DOCUMENT_TEMPLATE),
    ] {
        hbs.register_template_string(name, source)
            .map_err(|e| BriefmailError::HandlebarsTemplate {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(hbs)
}

fn resolve_css(stylesheet: Option<&Path>) -> crate::Result<String> {
    let Some(path) = stylesheet else {
        return Ok(DEFAULT_STYLESHEET.to_string());
    };
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BriefmailError::StylesheetNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BriefmailError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn apply_css(html: &str, css: &str) -> crate::Result<String> {
    if css.trim().is_empty() {
        return Ok(html.to_string());
    }
    let inliner = css_inline::CSSInliner::options()
        .load_remote_stylesheets(false)
        .build();
    // Wrap in a <div> because inline_fragment only processes the first
    // top-level element when there are multiple siblings.
    let wrapped = format!("<div>{html}</div>");
    // The inliner reserializes the tree: text nodes keep `&`, `<` and `>`
    // escaped, while `&quot;` and `&#x27;` come back as literal quotes.
    // Submitted values are only ever placed in text nodes, never attributes.
    let inlined = inliner
        .inline_fragment(&wrapped, css)
        .map_err(|e| BriefmailError::CssInline {
            reason: e.to_string(),
        })?;
    // Strip the wrapper <div>…</div> (the opening tag may have gained
    // inline styles if a CSS rule targets `div`).
    let inner = if inlined.starts_with("<div") {
        let start = inlined.find('>').map(|i| i + 1).unwrap_or(0);
        let end = inlined.rfind("</div>").unwrap_or(inlined.len());
        &inlined[start..end]
    } else {
        &inlined
    };
    Ok(inner.to_string())
}

/// Plain-text rendition of an HTML fragment: line breaks kept, tags dropped,
/// entities decoded, blank runs collapsed.
fn html_to_text(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.replace("<br>", "\n").chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    let decoded = stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&#x3D;", "=")
        .replace("&#x60;", "`")
        .replace("&amp;", "&");

    let mut text = String::with_capacity(decoded.len());
    let mut blank = true;
    for line in decoded.lines().map(str::trim) {
        if line.is_empty() {
            if !blank {
                text.push('\n');
                blank = true;
            }
            continue;
        }
        text.push_str(line);
        text.push('\n');
        blank = false;
    }
    text.trim_end().to_string()
}
