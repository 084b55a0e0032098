use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use crate::{BriefmailError, Result};

/// Encryption mode for an SMTP connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encryption {
    None,
    StartTls,
    Tls,
}

/// SMTP connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpProfile {
    /// Keychain entry name used to look up credentials.
    pub name: String,
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
}

impl Default for SmtpProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            host: "smtp.gmail.com".to_string(),
            port: 587,
            encryption: Encryption::StartTls,
        }
    }
}

/// SMTP account credentials.
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

/// One fully rendered message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    /// Plain-text alternative of `html_body`.
    pub text_body: String,
}

/// Outbound mail capability. Either the message was handed off, or it wasn't.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

const KEYRING_SERVICE: &str = "briefmail";

pub const USERNAME_ENV: &str = "BRIEFMAIL_SMTP_USERNAME";
pub const PASSWORD_ENV: &str = "BRIEFMAIL_SMTP_PASSWORD";

/// Store SMTP credentials in the OS keychain for `profile_name`.
///
/// Both `username` and `password` are stored in a single keyring entry,
/// separated by a newline.
pub fn store_credential(profile_name: &str, username: &str, password: &str) -> Result<()> {
    let entry = keyring_entry(profile_name)?;
    let value = format!("{username}\n{password}");
    entry
        .set_password(&value)
        .map_err(|e| BriefmailError::Keyring {
            reason: e.to_string(),
        })
}

/// Retrieve SMTP credentials from the OS keychain for `profile_name`.
pub fn retrieve_credential(profile_name: &str) -> Result<SmtpCredentials> {
    let entry = keyring_entry(profile_name)?;
    let value = entry.get_password().map_err(|e| BriefmailError::Keyring {
        reason: e.to_string(),
    })?;
    let (username, password) = value
        .split_once('\n')
        .ok_or_else(|| BriefmailError::Keyring {
            reason: format!("malformed credential entry for profile '{profile_name}'"),
        })?;
    Ok(SmtpCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Remove SMTP credentials from the OS keychain for `profile_name`.
pub fn delete_credential(profile_name: &str) -> Result<()> {
    keyring_entry(profile_name)?
        .delete_credential()
        .map_err(|e| BriefmailError::Keyring {
            reason: e.to_string(),
        })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, profile_name).map_err(|e| BriefmailError::Keyring {
        reason: e.to_string(),
    })
}

/// Credentials from the environment, else the keychain, else none.
///
/// A missing keychain entry means "no authentication", not an error.
pub fn resolve_credentials<F>(profile: &SmtpProfile, lookup: F) -> Option<SmtpCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    if let (Some(username), Some(password)) = (lookup(USERNAME_ENV), lookup(PASSWORD_ENV)) {
        return Some(SmtpCredentials { username, password });
    }
    match retrieve_credential(&profile.name) {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            tracing::debug!(profile = %profile.name, error = %e, "no keychain credentials");
            None
        }
    }
}

/// [`Mailer`] backed by a lettre async SMTP transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        profile: &SmtpProfile,
        credentials: Option<&SmtpCredentials>,
        from: &str,
    ) -> Result<Self> {
        let from = parse_mailbox(from)?;
        Ok(Self {
            transport: build_transport(profile, credentials)?,
            from,
        })
    }

    /// Open an SMTP connection and verify the server is reachable (no message sent).
    pub async fn test_connection(&self) -> Result<()> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| BriefmailError::SmtpConnect {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = build_message(email, &self.from)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| BriefmailError::SmtpSend {
                recipient: email.to.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Build a lettre async SMTP transport from the given profile and credentials.
fn build_transport(
    profile: &SmtpProfile,
    credentials: Option<&SmtpCredentials>,
) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let builder = match profile.encryption {
        Encryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&profile.host)
            .map_err(|e| BriefmailError::SmtpConnect {
                reason: e.to_string(),
            })?,
        Encryption::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&profile.host)
            .map_err(|e| BriefmailError::SmtpConnect {
                reason: e.to_string(),
            })?,
        Encryption::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&profile.host),
    };
    let builder = builder.port(profile.port);
    let builder = match credentials {
        Some(c) => builder.credentials(Credentials::new(c.username.clone(), c.password.clone())),
        None => builder,
    };
    Ok(builder.build())
}

fn parse_mailbox(value: &str) -> Result<Mailbox> {
    value
        .parse::<Mailbox>()
        .map_err(|e| BriefmailError::InvalidAddress {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Build a `multipart/alternative` lettre [`Message`] (plain text + HTML).
fn build_message(email: &OutgoingEmail, from: &Mailbox) -> Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&email.to)?)
        .subject(&email.subject);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let alt = MultiPart::alternative()
        .singlepart(SinglePart::plain(email.text_body.clone()))
        .singlepart(SinglePart::html(email.html_body.clone()));

    builder
        .multipart(alt)
        .map_err(|e| BriefmailError::SmtpSend {
            recipient: email.to.clone(),
            reason: format!("failed to build message: {e}"),
        })
}
