use std::collections::HashMap;

use super::fields::{field, is_acknowledged, ACKNOWLEDGEMENT, FIELDS};

/// Raw field values for one form post.
///
/// Every schema key is present; fields the client did not send hold an empty
/// string. Keys outside the schema are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    values: HashMap<&'static str, String>,
    acknowledged: bool,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            values: FIELDS.iter().map(|f| (f.key, String::new())).collect(),
            acknowledged: false,
        }
    }
}

impl Submission {
    /// Build from posted `(name, value)` pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            if name == ACKNOWLEDGEMENT {
                let value: String = value.into();
                submission.acknowledged = is_acknowledged(Some(&value));
            } else if let Some(spec) = field(name) {
                submission.values.insert(spec.key, value.into());
            }
        }
        submission
    }

    /// Raw value for `key`; empty for unknown keys.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }
}
