//! Process-wide settings, loaded once at startup and never mutated.

mod format;

pub use format::{detect_format, ConfigFormat};

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::smtp::SmtpProfile;
use crate::BriefmailError;

/// Public-facing identity used in email headers, footers and the receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    pub name: String,
    pub tagline: String,
    pub website: String,
    /// Address shown to clients for direct contact.
    pub contact_email: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: "ChronicleChraft Creative Solutions".to_string(),
            tagline: "Your Creative Brief Has Been Received".to_string(),
            website: "https://chroniclecraft.tech".to_string(),
            contact_email: "irfan@chroniclecraft.tech".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recipient of the business notification.
    pub to_email: String,
    /// Sender for both outbound emails.
    pub from_email: String,
    /// Prepended to the project title in the notification subject.
    pub subject_prefix: String,
    pub receipt_subject: String,
    pub bind: SocketAddr,
    /// Replaces the built-in email stylesheet. Relative to the config file.
    pub stylesheet: Option<PathBuf>,
    pub brand: Brand,
    pub smtp: SmtpProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            to_email: "irfan@chroniclecraft.tech".to_string(),
            from_email: "noreply@chroniclecraft.tech".to_string(),
            subject_prefix: "New Creative Brief Submission - ".to_string(),
            receipt_subject: "Thank you for your Creative Brief submission - ChronicleChraft"
                .to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            stylesheet: None,
            brand: Brand::default(),
            smtp: SmtpProfile::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or defaults), apply `BRIEFMAIL_*` environment
    /// overrides, then validate.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let format = detect_format(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| BriefmailError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str_with_format(&content, &format, path)?;

        if let Some(stylesheet) = config.stylesheet.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.stylesheet = Some(base.join(stylesheet));
        }
        Ok(config)
    }

    fn from_str_with_format(
        content: &str,
        format: &ConfigFormat,
        path: &Path,
    ) -> crate::Result<Self> {
        match format {
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|source| BriefmailError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|source| BriefmailError::YamlParse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|source| BriefmailError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BRIEFMAIL_TO_EMAIL") {
            self.to_email = v;
        }
        if let Some(v) = lookup("BRIEFMAIL_FROM_EMAIL") {
            self.from_email = v;
        }
        if let Some(v) = lookup("BRIEFMAIL_SUBJECT_PREFIX") {
            self.subject_prefix = v;
        }
        if let Some(v) = lookup("BRIEFMAIL_BIND") {
            self.bind = v.parse().map_err(|e| BriefmailError::InvalidConfig {
                key: "bind".into(),
                reason: format!("'{v}': {e}"),
            })?;
        }
        if let Some(v) = lookup("BRIEFMAIL_SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Some(v) = lookup("BRIEFMAIL_SMTP_PORT") {
            self.smtp.port = v.parse().map_err(|e| BriefmailError::InvalidConfig {
                key: "smtp.port".into(),
                reason: format!("'{v}': {e}"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        for (key, value) in [("to_email", &self.to_email), ("from_email", &self.from_email)] {
            value
                .parse::<lettre::message::Mailbox>()
                .map_err(|e| BriefmailError::InvalidConfig {
                    key: key.to_string(),
                    reason: format!("'{value}': {e}"),
                })?;
        }
        if self.smtp.host.trim().is_empty() {
            return Err(BriefmailError::InvalidConfig {
                key: "smtp.host".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
