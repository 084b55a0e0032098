use super::fields::{field, FieldSpec, ADDITIONAL_NOTES, EMAIL, FULL_NAME, PROJECT_TITLE};

/// When a section's heading is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Always,
    /// Only when at least one of its fields has a value.
    WhenPopulated,
}

/// Presentation grouping of fields in the business notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub field_keys: &'static [&'static str],
    pub presence: Presence,
    /// Whether field blocks carry a label line.
    pub labelled: bool,
}

impl Section {
    const fn fixed(title: &'static str, field_keys: &'static [&'static str]) -> Self {
        Self {
            title,
            field_keys,
            presence: Presence::Always,
            labelled: true,
        }
    }

    /// Field specs for this section, in section order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.field_keys.iter().filter_map(|key| field(key))
    }
}

pub const SECTIONS: &[Section] = &[
    Section::fixed(
        "Client Information",
        &[FULL_NAME, "companyName", "jobTitle", EMAIL, "phone", "website"],
    ),
    Section::fixed(
        "Project Overview",
        &[
            PROJECT_TITLE,
            "projectType",
            "projectDescription",
            "keyObjectives",
            "targetAudience",
        ],
    ),
    Section::fixed(
        "Creative Direction",
        &[
            "preferredStyle",
            "designElements",
            "avoidElements",
            "inspirations",
        ],
    ),
    Section::fixed(
        "Content & Deliverables",
        &["mainMessage", "contentProvided", "deliverables", "fileFormats"],
    ),
    Section::fixed("Timeline & Budget", &["startDate", "deadline", "budget"]),
    Section::fixed(
        "Contact & Communication",
        &["primaryContact", "communicationMethod", "secondaryContact"],
    ),
    Section {
        title: "Additional Notes",
        field_keys: &[ADDITIONAL_NOTES],
        presence: Presence::WhenPopulated,
        labelled: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FIELDS;

    #[test]
    fn test_sections_partition_schema_in_order() {
        let keys: Vec<&str> = SECTIONS
            .iter()
            .flat_map(|s| s.field_keys.iter().copied())
            .collect();
        let schema: Vec<&str> = FIELDS.iter().map(|f| f.key).collect();
        assert_eq!(keys, schema);
    }

    #[test]
    fn test_every_section_key_resolves() {
        for section in SECTIONS {
            assert_eq!(
                section.fields().count(),
                section.field_keys.len(),
                "unknown key in section '{}'",
                section.title
            );
        }
    }

    #[test]
    fn test_only_additional_notes_is_conditional() {
        let conditional: Vec<&str> = SECTIONS
            .iter()
            .filter(|s| s.presence == Presence::WhenPopulated)
            .map(|s| s.title)
            .collect();
        assert_eq!(conditional, vec!["Additional Notes"]);
        assert_eq!(SECTIONS.last().unwrap().title, "Additional Notes");
    }
}
