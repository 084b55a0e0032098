//! The creative brief form schema, shared by the server and the form controller.

mod fields;
mod sections;
mod submission;

pub use fields::{
    field, is_acknowledged, is_address_shaped, is_valid_email, required_fields, Emphasis,
    FieldKind, FieldSpec, ACKNOWLEDGEMENT, ADDITIONAL_NOTES, EMAIL, FIELDS, FULL_NAME,
    PROJECT_TITLE,
};
pub use sections::{Presence, Section, SECTIONS};
pub use submission::Submission;
