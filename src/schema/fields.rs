use std::sync::OnceLock;

/// Whether a value keeps its internal line breaks when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

/// Visual weight of a field block in the business notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Highlight,
    Priority,
}

impl Emphasis {
    /// CSS class added to the field value block, if any.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Emphasis::Normal => None,
            Emphasis::Highlight => Some("highlight"),
            Emphasis::Priority => Some("priority"),
        }
    }
}

/// One entry of the creative brief form schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Form field name, as posted by the browser.
    pub key: &'static str,
    /// Label shown next to the value in the business notification.
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub emphasis: Emphasis,
    /// Shorter label used in "<label> is required" messages, when it differs.
    pub short_label: Option<&'static str>,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
            kind: FieldKind::SingleLine,
            emphasis: Emphasis::Normal,
            short_label: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn multi_line(mut self) -> Self {
        self.kind = FieldKind::MultiLine;
        self
    }

    const fn emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    const fn short_label(mut self, label: &'static str) -> Self {
        self.short_label = Some(label);
        self
    }

    /// Label used when reporting this field as missing.
    pub fn requirement_label(&self) -> &'static str {
        self.short_label.unwrap_or(self.label)
    }

    /// The `"<label> is required"` validation message for this field.
    pub fn required_message(&self) -> String {
        format!("{} is required", self.requirement_label())
    }
}

pub const FULL_NAME: &str = "fullName";
pub const EMAIL: &str = "email";
pub const PROJECT_TITLE: &str = "projectTitle";
pub const ADDITIONAL_NOTES: &str = "additionalNotes";

/// Out-of-band checkbox that gates acceptance; never rendered.
pub const ACKNOWLEDGEMENT: &str = "acknowledgement";

/// Every recognized field, in schema order.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(FULL_NAME, "Full Name").required(),
    FieldSpec::new("companyName", "Company/Organization Name"),
    FieldSpec::new("jobTitle", "Job Title/Role"),
    FieldSpec::new(EMAIL, "Email Address")
        .required()
        .emphasis(Emphasis::Highlight),
    FieldSpec::new("phone", "Phone Number"),
    FieldSpec::new("website", "Website / Social Media Handles"),
    FieldSpec::new(PROJECT_TITLE, "Project Title")
        .required()
        .emphasis(Emphasis::Highlight),
    FieldSpec::new("projectType", "Type of Project")
        .required()
        .short_label("Project Type"),
    FieldSpec::new("projectDescription", "Project Description")
        .required()
        .multi_line(),
    FieldSpec::new("keyObjectives", "Key Objectives")
        .required()
        .multi_line(),
    FieldSpec::new("targetAudience", "Target Audience")
        .required()
        .multi_line(),
    FieldSpec::new("preferredStyle", "Preferred Style/Tone").multi_line(),
    FieldSpec::new("designElements", "Design Elements to Use").multi_line(),
    FieldSpec::new("avoidElements", "Design Elements to Avoid").multi_line(),
    FieldSpec::new("inspirations", "Inspirations/References").multi_line(),
    FieldSpec::new("mainMessage", "Main Message")
        .required()
        .multi_line(),
    FieldSpec::new("contentProvided", "Content Provided by Client").multi_line(),
    FieldSpec::new("deliverables", "Final Deliverables Expected")
        .required()
        .multi_line()
        .emphasis(Emphasis::Highlight)
        .short_label("Deliverables"),
    FieldSpec::new("fileFormats", "File Formats Required").multi_line(),
    FieldSpec::new("startDate", "Ideal Start Date"),
    FieldSpec::new("deadline", "Ideal Completion Date"),
    FieldSpec::new("budget", "Budget Range"),
    FieldSpec::new("primaryContact", "Primary Contact Person"),
    FieldSpec::new("communicationMethod", "Preferred Communication Method"),
    FieldSpec::new("secondaryContact", "Secondary Contact"),
    FieldSpec::new(ADDITIONAL_NOTES, "Additional Notes")
        .multi_line()
        .emphasis(Emphasis::Priority),
];

pub fn field(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.key == key)
}

/// Required fields, in schema order.
pub fn required_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|f| f.required)
}

/// Checkbox truthiness: any non-blank value counts as checked.
pub fn is_acknowledged(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Loose `local@domain.tld` shape check used for inline feedback in the form.
pub fn is_address_shaped(value: &str) -> bool {
    static SHAPE: OnceLock<regex::Regex> = OnceLock::new();
    SHAPE
        .get_or_init(|| {
            regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid address pattern")
        })
        .is_match(value)
}

/// Authoritative address check: RFC 5321 syntax plus a dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    let Ok(address) = value.parse::<lettre::Address>() else {
        return false;
    };
    let domain = address.domain();
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}
